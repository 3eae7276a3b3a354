//! Outcome summary for batch runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// How processing a package ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// An entry was written.
    Updated,
    /// Processing failed or the package was skipped.
    FailedSkipped,
    /// The upstream checkout was missing.
    Missing,
}

/// Package names grouped by outcome.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OutcomeCounts {
    packages: BTreeMap<Outcome, BTreeSet<String>>,
}

impl OutcomeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome, package: impl Into<String>) {
        self.packages.entry(outcome).or_default().insert(package.into());
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.packages.get(&outcome).map_or(0, BTreeSet::len)
    }

    /// Number of entries across every outcome.
    pub fn total(&self) -> usize {
        self.packages.values().map(BTreeSet::len).sum()
    }

    /// Package names with the given outcome, sorted.
    pub fn packages(&self, outcome: Outcome) -> impl Iterator<Item = &str> {
        self.packages
            .get(&outcome)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }
}

/// Lines of the end-of-run report.
pub fn render_report(counts: &OutcomeCounts) -> Vec<String> {
    let missing = counts.count(Outcome::Missing);

    let mut lines = vec![format!(
        "Processed {} packages: updated {}, failed/skipped {}, missing {}",
        counts.total(),
        counts.count(Outcome::Updated),
        counts.count(Outcome::FailedSkipped),
        missing
    )];

    if missing > 0 {
        lines.push("Missing packages:".to_string());
        lines.extend(counts.packages(Outcome::Missing).map(|name| format!("- {}", name)));
    }

    lines
}

/// Print the end-of-run report.
pub fn report_changes(counts: &OutcomeCounts) {
    for line in render_report(counts) {
        println!("{}", line);
    }
}
