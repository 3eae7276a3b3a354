//! Batch processing of package updates from a JSON manifest.
//!
//! A manifest is a JSON array of package updates:
//!
//! ```json
//! [
//!   {
//!     "changes_file": "kcalc/kcalc.changes",
//!     "upstream_repo": "kcalc",
//!     "version_from": "23.04.3",
//!     "version_to": "23.08.0",
//!     "kind": "applications",
//!     "branch": "release/23.08"
//!   }
//! ]
//! ```
//!
//! Relative `changes_file` paths are resolved against the manifest's directory.

use std::path::Path;

use tracing::warn;

use crate::changelog::Clock;
use crate::error::ManifestError;
use crate::record::{record_changes, DummyReason, PackageUpdate, RecordOutcome, RecordSettings};
use crate::report::{Outcome, OutcomeCounts};

/// Load the package updates listed in a manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<PackageUpdate>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut updates: Vec<PackageUpdate> =
        serde_json::from_str(&content).map_err(|source| ManifestError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(base) = path.parent() {
        for update in &mut updates {
            if update.changes_file.is_relative() {
                update.changes_file = base.join(&update.changes_file);
            }
        }
    }

    Ok(updates)
}

/// Classify the result of recording one package.
pub fn classify<E>(result: &Result<RecordOutcome, E>) -> Outcome {
    match result {
        Ok(RecordOutcome::Recorded { .. }) | Ok(RecordOutcome::Dummy(DummyReason::NoCheckoutDir)) => {
            Outcome::Updated
        }
        Ok(RecordOutcome::Dummy(DummyReason::MissingCheckout(_))) => Outcome::Missing,
        Err(_) => Outcome::FailedSkipped,
    }
}

/// Record every update in order. A failing package is logged and counted,
/// and does not stop the run.
pub fn run_batch<C: Clock + ?Sized>(
    updates: &[PackageUpdate],
    settings: &RecordSettings,
    clock: &C,
) -> OutcomeCounts {
    let mut counts = OutcomeCounts::new();

    for update in updates {
        let package = update.package_name();
        let result = record_changes(update, settings, clock);

        if let Err(e) = &result {
            warn!(package = %package, error = %e, "Failed to record changes");
        }

        counts.record(classify(&result), package);
    }

    counts
}
