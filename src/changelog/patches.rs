//! Patch-set comparison between package revisions.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;

static PATCH_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*patch\d*\s*:\s*(\S+)").expect("patch tag pattern is valid")
});

/// Patches that appeared or disappeared between two package revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl PatchChanges {
    /// Compare the previous and current patch sets.
    ///
    /// Both sets must be present and non-empty, otherwise nothing is
    /// reported: a package that gains its first patch or drops its last one
    /// is not flagged. Names are sorted within each group.
    pub fn between(previous: Option<&[String]>, current: Option<&[String]>) -> Self {
        let (Some(previous), Some(current)) = (previous, current) else {
            return Self::default();
        };
        if previous.is_empty() || current.is_empty() {
            return Self::default();
        }

        let previous: BTreeSet<&String> = previous.iter().collect();
        let current: BTreeSet<&String> = current.iter().collect();

        Self {
            added: current.difference(&previous).map(|p| p.to_string()).collect(),
            removed: previous.difference(&current).map(|p| p.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Changelog lines describing the change, one section per direction.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        push_section(&mut lines, "- Added patches:", &self.added);
        push_section(&mut lines, "- Removed patches:", &self.removed);
        lines
    }
}

fn push_section(lines: &mut Vec<String>, heading: &str, patches: &[String]) {
    if patches.is_empty() {
        return;
    }

    lines.push(heading.to_string());
    lines.extend(patches.iter().map(|patch| format!("  * {}", patch)));
}

/// Patch file names declared by `Patch:` / `PatchN:` tags in an RPM spec file.
pub fn patches_from_spec(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| PATCH_TAG.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_added_and_removed_are_separated() {
        let previous = names(&["a.patch", "b.patch"]);
        let current = names(&["b.patch", "c.patch"]);

        let changes = PatchChanges::between(Some(previous.as_slice()), Some(current.as_slice()));

        assert_eq!(changes.added, vec!["c.patch"]);
        assert_eq!(changes.removed, vec!["a.patch"]);
    }

    /// Removed patches get their own heading instead of being listed as added.
    #[test]
    fn test_removed_only_patches_use_removed_heading() {
        let previous = names(&["a.patch", "b.patch"]);
        let current = names(&["b.patch"]);

        let lines = PatchChanges::between(Some(previous.as_slice()), Some(current.as_slice())).to_lines();

        assert_eq!(lines, vec!["- Removed patches:", "  * a.patch"]);
    }

    #[test]
    fn test_identical_sets_report_nothing() {
        let previous = names(&["b.patch", "a.patch"]);
        let current = names(&["a.patch", "b.patch"]);

        let changes = PatchChanges::between(Some(previous.as_slice()), Some(current.as_slice()));
        assert!(changes.is_empty());
        assert!(changes.to_lines().is_empty());
    }

    #[test]
    fn test_missing_or_empty_side_reports_nothing() {
        let patches = names(&["a.patch"]);
        let empty: Vec<String> = Vec::new();

        assert!(PatchChanges::between(None, Some(patches.as_slice())).is_empty());
        assert!(PatchChanges::between(Some(patches.as_slice()), None).is_empty());
        assert!(PatchChanges::between(Some(empty.as_slice()), Some(patches.as_slice())).is_empty());
        assert!(PatchChanges::between(Some(patches.as_slice()), Some(empty.as_slice())).is_empty());
    }

    #[test]
    fn test_lines_list_added_before_removed() {
        let changes = PatchChanges {
            added: names(&["new.patch"]),
            removed: names(&["old.patch"]),
        };

        assert_eq!(
            changes.to_lines(),
            vec![
                "- Added patches:",
                "  * new.patch",
                "- Removed patches:",
                "  * old.patch",
            ]
        );
    }

    #[test]
    fn test_patches_from_spec() {
        let spec = "\
Name:           kcalc
Version:        23.08.0
Source0:        kcalc-%{version}.tar.xz
Patch:          0001-fix-build.patch
Patch12:        0002-Use-system-gmp.patch
patch3: lowercase.diff
# Patch99: commented.patch
BuildRequires:  cmake
";
        assert_eq!(
            patches_from_spec(spec),
            vec!["0001-fix-build.patch", "0002-Use-system-gmp.patch", "lowercase.diff"]
        );
    }
}
