//! Commit range resolution from package versions.

use tracing::{info, warn};

use crate::error::GitError;

use super::repository::Vcs;

/// Package that never received release tags for its last versions.
pub const KDELIBS4_PACKAGE: &str = "kdelibs4";

/// Branch used in place of the missing kdelibs4 tags.
pub const KDELIBS4_BRANCH: &str = "KDE/4.14";

/// Resolved commit range, as revisions the repository understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub from: String,
    pub to: String,
}

/// Tag name for a released version, e.g. `5.27.0` -> `v5.27.0`.
pub fn version_tag(version: &str) -> String {
    format!("v{}", version)
}

/// Resolve the commit range between two released versions.
///
/// The lower bound is always the `from` version tag. If the `to` tag is
/// missing, `kdelibs4` falls back to [`KDELIBS4_BRANCH`] and every other
/// package to `fallback_branch`.
pub fn resolve_commit_range<V: Vcs + ?Sized>(
    vcs: &V,
    package: &str,
    version_from: &str,
    version_to: &str,
    fallback_branch: Option<&str>,
) -> Result<CommitRange, GitError> {
    let from = version_tag(version_from);
    let to_tag = version_tag(version_to);

    let to = if vcs.tag_exists(&to_tag)? {
        to_tag
    } else if package == KDELIBS4_PACKAGE {
        info!(tag = %to_tag, branch = KDELIBS4_BRANCH, "Tag missing, using kdelibs4 branch");
        KDELIBS4_BRANCH.to_string()
    } else {
        match fallback_branch {
            Some(branch) => {
                warn!(tag = %to_tag, branch = %branch, "Tag missing, using fallback branch");
                branch.to_string()
            }
            None => return Err(GitError::MissingFallbackBranch { tag: to_tag }),
        }
    };

    Ok(CommitRange { from, to })
}
