//! Git operations using git2-rs.

pub mod range;
pub mod repository;

pub use range::{resolve_commit_range, CommitRange};
pub use repository::{GitRepository, Vcs};
