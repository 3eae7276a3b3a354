//! Changelog entry synthesis and writing.

pub mod date;
pub mod entry;
pub mod patches;
pub mod summary;
pub mod writer;

pub use date::{format_entry_date, Clock, FixedClock, SystemClock};
pub use entry::{compose_body, dummy_body, render_entry, EntryRequest, ReleaseKind};
pub use patches::{patches_from_spec, PatchChanges};
pub use summary::{summarize, CommitLines};
pub use writer::prepend_entry;
