//! trackchanges - Generate package CHANGES entries from upstream git history.
//!
//! # Overview
//!
//! Given the previous and new version of a package and a checkout of its
//! upstream repository, trackchanges summarizes the commits between the two
//! release tags, collects `BUG:` references, flags added or removed patches
//! for manual review, and prepends the resulting entry to the package's
//! `.changes` file.

pub mod batch;
pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod record;
pub mod report;

// Re-export commonly used types
pub use changelog::{Clock, EntryRequest, FixedClock, PatchChanges, ReleaseKind, SystemClock};
pub use error::{ChangelogError, ConfigError, GitError, ManifestError};
pub use git::{CommitRange, GitRepository, Vcs};
pub use record::{record_changes, PackageUpdate, RecordOutcome, RecordSettings};
pub use report::{report_changes, Outcome, OutcomeCounts};
