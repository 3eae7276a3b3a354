//! Commit range summarization into changelog lines.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::error::GitError;
use crate::git::Vcs;

/// Line emitted when the range holds no commits.
pub const NO_CHANGES_LINE: &str = "  * None";

/// Line emitted instead of the commit list for oversized ranges.
pub const TOO_MANY_CHANGES_LINE: &str = "  * Too many changes to list here";

/// Largest range whose commits are listed one by one.
pub const MAX_LISTED_COMMITS: usize = 30;

/// Subject markers asking changelog generators to leave a commit out.
pub const SILENT_MARKERS: [&str; 2] = ["GIT_SILENT", "SVN_SILENT"];

static BUG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BUG:\s*(.*?)\s*$").expect("BUG line pattern is valid"));

/// Whether a subject carries one of the [`SILENT_MARKERS`].
pub fn is_silent(subject: &str) -> bool {
    SILENT_MARKERS.iter().any(|marker| subject.contains(marker))
}

/// Collect `kde#<id>` references from the `BUG:` lines of a commit body.
pub fn extract_bug_references<S: AsRef<str>>(body: &[S]) -> Vec<String> {
    body.iter()
        .filter_map(|line| BUG_LINE.captures(line.as_ref()))
        .filter_map(|caps| caps.get(1))
        .map(|id| format!("kde#{}", id.as_str()))
        .collect()
}

/// Format a commit as a changelog line, e.g. `  * Fix crash (kde#123)`.
pub fn format_commit_line(subject: &str, bugs: &[String]) -> String {
    let bugs = if bugs.is_empty() {
        String::new()
    } else {
        format!("({})", bugs.join(", "))
    };

    format!("  * {} {}", subject, bugs).trim_end().to_string()
}

/// Lazily formatted changelog lines for a commit range.
///
/// Subjects and bodies are only fetched as the iterator advances. The
/// sequence cannot be restarted; summarize the range again for a fresh one.
pub struct CommitLines<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    placeholder: Option<&'static str>,
    hashes: std::vec::IntoIter<String>,
}

impl<V: Vcs + ?Sized> CommitLines<'_, V> {
    fn next_commit_line(&mut self) -> Result<Option<String>, GitError> {
        for hash in self.hashes.by_ref() {
            let subject = self.vcs.commit_subject(&hash)?;

            if is_silent(&subject) {
                debug!(commit = %hash, subject = %subject, "Skipping silent commit");
                continue;
            }

            let body = self.vcs.commit_body(&hash)?;
            let bugs = extract_bug_references(&body);

            return Ok(Some(format_commit_line(&subject, &bugs)));
        }

        Ok(None)
    }
}

impl<V: Vcs + ?Sized> Iterator for CommitLines<'_, V> {
    type Item = Result<String, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.placeholder.take() {
            return Some(Ok(line.to_string()));
        }

        self.next_commit_line().transpose()
    }
}

/// Summarize the commits between `commit_from` (exclusive) and `commit_to`.
///
/// An empty range yields [`NO_CHANGES_LINE`]; a range with more than
/// [`MAX_LISTED_COMMITS`] commits yields [`TOO_MANY_CHANGES_LINE`]. Otherwise
/// one line per commit, in the order the repository lists them, minus
/// silent commits.
pub fn summarize<'a, V: Vcs + ?Sized>(
    vcs: &'a V,
    commit_from: &str,
    commit_to: &str,
) -> Result<CommitLines<'a, V>, GitError> {
    let hashes = vcs.list_commit_hashes(commit_from, commit_to)?;
    debug!(from = %commit_from, to = %commit_to, count = hashes.len(), "Listed commits");

    let placeholder = if hashes.is_empty() {
        Some(NO_CHANGES_LINE)
    } else if hashes.len() > MAX_LISTED_COMMITS {
        Some(TOO_MANY_CHANGES_LINE)
    } else {
        None
    };

    let hashes = if placeholder.is_some() { Vec::new() } else { hashes };

    Ok(CommitLines {
        vcs,
        placeholder,
        hashes: hashes.into_iter(),
    })
}
