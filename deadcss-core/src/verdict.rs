//! Verdict assignment over the merged usages of a whole run.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analyze::Usage;
use crate::selectors::SelectorUniverse;
use crate::shape::{is_simple_class_or_id, SelectorShape};

/// Whether a selector is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// At least one usage was found
    Used,
    /// A simple class or id with no usage
    Unused,
    /// Any other shape with no usage; detection may have missed it
    Indeterminate,
}

impl Verdict {
    /// Verdict for a selector with no recorded usage.
    pub fn for_unreferenced(selector: &str) -> Self {
        if is_simple_class_or_id(selector) {
            Self::Unused
        } else {
            Self::Indeterminate
        }
    }

    /// Value written in the report's `Used?` column.
    pub fn report_label(self) -> &'static str {
        match self {
            Self::Used => "YES",
            Self::Unused => "NO",
            Self::Indeterminate => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Used => "USED",
            Self::Unused => "UNUSED",
            Self::Indeterminate => "INDETERMINATE",
        })
    }
}

/// Final state of one selector: its verdict and every usage found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorReport {
    pub selector: String,
    pub defined_in: PathBuf,
    pub shape: SelectorShape,
    pub verdict: Verdict,
    /// Sorted by file path, then line number. Empty unless `verdict` is `Used`.
    pub usages: Vec<Usage>,
}

impl SelectorReport {
    /// Number of distinct files the selector is used in.
    pub fn file_count(&self) -> usize {
        self.usages
            .iter()
            .map(|u| &u.file)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Statistics over a reconciled run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictStats {
    pub total_selectors: usize,
    pub used: usize,
    pub unused: usize,
    pub indeterminate: usize,
    pub total_usages: usize,
}

impl VerdictStats {
    pub fn from_reports(reports: &[SelectorReport]) -> Self {
        let mut stats = Self {
            total_selectors: reports.len(),
            ..Self::default()
        };
        for r in reports {
            match r.verdict {
                Verdict::Used => stats.used += 1,
                Verdict::Unused => stats.unused += 1,
                Verdict::Indeterminate => stats.indeterminate += 1,
            }
            stats.total_usages += r.usages.len();
        }
        stats
    }
}

/// Merges usages from every file and assigns a verdict to every selector in
/// the universe.
///
/// The result is ordered by selector text, and each selector's usages by file
/// path then line number, so the outcome does not depend on the order files
/// were analyzed in. Usages for selectors outside the universe are dropped.
pub fn reconcile(universe: &SelectorUniverse, usages: Vec<Usage>) -> Vec<SelectorReport> {
    let mut by_selector: HashMap<String, Vec<Usage>> = HashMap::new();
    for usage in usages {
        by_selector.entry(usage.selector.clone()).or_default().push(usage);
    }

    universe
        .iter()
        .map(|(selector, defined_in)| {
            let mut found = by_selector.remove(selector).unwrap_or_default();
            found.sort_by(|a, b| {
                a.file
                    .cmp(&b.file)
                    .then_with(|| a.line_number.cmp(&b.line_number))
            });
            found.dedup_by(|a, b| a.file == b.file && a.line_number == b.line_number);

            let verdict = if found.is_empty() {
                Verdict::for_unreferenced(selector)
            } else {
                Verdict::Used
            };

            SelectorReport {
                selector: selector.to_string(),
                defined_in: defined_in.to_path_buf(),
                shape: SelectorShape::of(selector),
                verdict,
                usages: found,
            }
        })
        .collect()
}
