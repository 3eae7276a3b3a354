//! Changelog entry composition.

use std::fmt;

use tracing::warn;

use crate::error::ChangelogError;
use crate::git::{CommitRange, Vcs};

use super::patches::PatchChanges;
use super::summary::{summarize, NO_CHANGES_LINE};

/// Base URL of the release announcements.
pub const ANNOUNCEMENT_BASE_URL: &str = "https://www.kde.org/announcements/";

/// Separator line opening every entry.
pub const ENTRY_SEPARATOR: &str =
    "-------------------------------------------------------------------";

/// Release family of an update, selecting the announcement page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Plasma,
    Frameworks,
    Applications,
    Other,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plasma => "plasma",
            Self::Frameworks => "frameworks",
            Self::Applications => "applications",
            Self::Other => "other",
        }
    }

    /// Announcement page for `version`, if this kind has one.
    pub fn announcement_url(&self, version: &str) -> Option<String> {
        let page = match self {
            Self::Plasma => format!("plasma-{}.php", version),
            Self::Frameworks => format!("kde-frameworks-{}.php", version),
            Self::Applications => format!("announce-applications-{}.php", version),
            Self::Other => return None,
        };

        Some(format!("{}{}", ANNOUNCEMENT_BASE_URL, page))
    }
}

impl std::str::FromStr for ReleaseKind {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plasma" => Ok(Self::Plasma),
            "frameworks" => Ok(Self::Frameworks),
            "applications" => Ok(Self::Applications),
            "other" => Ok(Self::Other),
            _ => Err(ChangelogError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an update entry describes.
#[derive(Debug, Clone)]
pub struct EntryRequest<'a> {
    pub version_from: &'a str,
    pub version_to: &'a str,
    /// Free-text release nature, e.g. `bugfix` or `feature`.
    pub changetype: &'a str,
    pub kind: ReleaseKind,
    pub previous_patches: Option<&'a [String]>,
    pub current_patches: Option<&'a [String]>,
}

/// Build the body lines of a full update entry.
///
/// Walks `range` through the summarizer; any repository error aborts the
/// entry.
pub fn compose_body<V: Vcs + ?Sized>(
    vcs: &V,
    range: &CommitRange,
    request: &EntryRequest<'_>,
) -> Result<Vec<String>, ChangelogError> {
    let mut body = vec![
        format!("- Update to {}", request.version_to),
        format!("  * New {} release", request.changetype),
    ];

    if let Some(url) = request.kind.announcement_url(request.version_to) {
        body.push("  * For more details please see:".to_string());
        body.push(format!("  * {}", url));
    }

    body.push(format!("- Changes since {}:", request.version_from));

    let commit_lines = summarize(vcs, &range.from, &range.to)?.collect::<Result<Vec<_>, _>>()?;
    if commit_lines.is_empty() {
        body.push(NO_CHANGES_LINE.to_string());
    } else {
        body.extend(commit_lines);
    }

    let patches = PatchChanges::between(request.previous_patches, request.current_patches);
    if !patches.is_empty() {
        warn!(
            added = patches.added.len(),
            removed = patches.removed.len(),
            "Patches changed. The changes will be recorded, but this requires MANUAL REVIEW: \
             their nature cannot be guessed automatically."
        );
        body.extend(patches.to_lines());
    }

    Ok(body)
}

/// Body of an entry written without access to the upstream history.
pub fn dummy_body(version_to: &str) -> Vec<String> {
    vec![format!("  * Update to {}", version_to)]
}

/// Render a complete entry block, terminated by a blank line.
pub fn render_entry(date: &str, committer: &str, body: &[String]) -> String {
    format!(
        "{}\n{} - {}\n\n{}\n\n",
        ENTRY_SEPARATOR,
        date,
        committer,
        body.join("\n")
    )
}
