//! Record a package update in its changes file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::changelog::{
    compose_body, dummy_body, format_entry_date, prepend_entry, render_entry, Clock, EntryRequest,
    ReleaseKind,
};
use crate::error::ChangelogError;
use crate::git::{resolve_commit_range, CommitRange, GitRepository, Vcs};

/// Suffix of changes files; the rest of the file name is the package name.
pub const CHANGES_SUFFIX: &str = ".changes";

fn default_changetype() -> String {
    "bugfix".to_string()
}

fn default_kind() -> String {
    ReleaseKind::Applications.as_str().to_string()
}

/// One package update to record.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageUpdate {
    /// The changes file to prepend the entry to.
    pub changes_file: PathBuf,
    /// Directory name of the upstream repository inside the checkout directory.
    pub upstream_repo: String,
    pub version_from: String,
    pub version_to: String,
    #[serde(default = "default_changetype")]
    pub changetype: String,
    /// `plasma`, `frameworks`, `applications` or `other`.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Revision to use when the `version_to` tag does not exist.
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub previous_patches: Option<Vec<String>>,
    #[serde(default)]
    pub current_patches: Option<Vec<String>>,
}

impl PackageUpdate {
    /// Package name derived from the changes file, e.g. `kdelibs4.changes` -> `kdelibs4`.
    pub fn package_name(&self) -> String {
        package_name(&self.changes_file)
    }
}

/// Settings shared by every package of a run.
#[derive(Debug, Clone)]
pub struct RecordSettings {
    /// Directory holding upstream checkouts, one subdirectory per repository.
    pub checkout_dir: Option<PathBuf>,
    /// Identity written in the entry header.
    pub committer: String,
}

/// Why an update was recorded without upstream history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DummyReason {
    NoCheckoutDir,
    MissingCheckout(PathBuf),
}

/// What [`record_changes`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A full entry summarizing `range`.
    Recorded { range: CommitRange },
    /// A one-line entry, since the upstream checkout was unavailable.
    Dummy(DummyReason),
}

/// Package name for a changes file path.
pub fn package_name(changes_file: &Path) -> String {
    let file_name = changes_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    file_name
        .strip_suffix(CHANGES_SUFFIX)
        .map(str::to_string)
        .unwrap_or(file_name)
}

/// Record `update` in its changes file.
///
/// Without a checkout directory, or when the upstream repository is missing
/// from it, a one-line entry is written instead of a commit summary.
pub fn record_changes<C: Clock + ?Sized>(
    update: &PackageUpdate,
    settings: &RecordSettings,
    clock: &C,
) -> Result<RecordOutcome, ChangelogError> {
    let Some(checkout_dir) = settings.checkout_dir.as_deref() else {
        warn!("No checkout directory supplied for {}", update.upstream_repo);
        compose_dummy(&update.version_to, &update.changes_file, &settings.committer, clock)?;
        return Ok(RecordOutcome::Dummy(DummyReason::NoCheckoutDir));
    };

    let repo_path = checkout_dir.join(&update.upstream_repo);
    if !repo_path.exists() {
        warn!(path = %repo_path.display(), "Missing checkout for {}", update.upstream_repo);
        compose_dummy(&update.version_to, &update.changes_file, &settings.committer, clock)?;
        return Ok(RecordOutcome::Dummy(DummyReason::MissingCheckout(repo_path)));
    }

    let repo = GitRepository::open(&repo_path)?;
    let range = resolve_commit_range(
        &repo,
        &update.package_name(),
        &update.version_from,
        &update.version_to,
        update.branch.as_deref(),
    )?;

    info!(
        package = %update.package_name(),
        from = %range.from,
        to = %range.to,
        "Summarizing upstream changes"
    );

    compose_and_write(&repo, &range, update, &settings.committer, clock)?;

    Ok(RecordOutcome::Recorded { range })
}

/// Compose a full entry for `update` over `range` and prepend it to the
/// changes file.
pub fn compose_and_write<V: Vcs + ?Sized, C: Clock + ?Sized>(
    vcs: &V,
    range: &CommitRange,
    update: &PackageUpdate,
    committer: &str,
    clock: &C,
) -> Result<(), ChangelogError> {
    let kind: ReleaseKind = update.kind.parse()?;

    let request = EntryRequest {
        version_from: &update.version_from,
        version_to: &update.version_to,
        changetype: &update.changetype,
        kind,
        previous_patches: update.previous_patches.as_deref(),
        current_patches: update.current_patches.as_deref(),
    };

    let body = compose_body(vcs, range, &request)?;
    let entry = render_entry(&format_entry_date(&clock.now()), committer, &body);

    prepend_entry(&update.changes_file, &entry)
}

/// Prepend a one-line `Update to {version_to}` entry to `destination`.
pub fn compose_dummy<C: Clock + ?Sized>(
    version_to: &str,
    destination: &Path,
    committer: &str,
    clock: &C,
) -> Result<(), ChangelogError> {
    let entry = render_entry(
        &format_entry_date(&clock.now()),
        committer,
        &dummy_body(version_to),
    );

    prepend_entry(destination, &entry)
}
