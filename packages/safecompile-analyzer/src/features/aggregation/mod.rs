//! Finding Aggregator
//!
//! Pure merge of detector outputs. No I/O, cannot fail.

use rustc_hash::FxHashMap;

use crate::shared::models::Finding;

/// Finding aggregator
///
/// Two findings are duplicates when they share a line number and their titles
/// match case-insensitively, whatever detector produced them.
pub struct FindingAggregator;

impl FindingAggregator {
    /// Deduplicate one ordered list of findings.
    ///
    /// For a repeated key, the entry with a non-empty suggestion wins; on a
    /// tie the first-seen entry wins. The survivor keeps the position where
    /// its key was first seen.
    pub fn deduplicate<I>(findings: I) -> Vec<Finding>
    where
        I: IntoIterator<Item = Finding>,
    {
        let mut index: FxHashMap<(u32, String), usize> = FxHashMap::default();
        let mut merged: Vec<Finding> = Vec::new();

        for finding in findings {
            match index.get(&finding.dedup_key()) {
                Some(&slot) => {
                    if finding.has_suggestion() && !merged[slot].has_suggestion() {
                        merged[slot] = finding;
                    }
                }
                None => {
                    index.insert(finding.dedup_key(), merged.len());
                    merged.push(finding);
                }
            }
        }

        merged
    }

    /// Concatenate detector lists in order, then deduplicate.
    ///
    /// # Example
    /// ```
    /// use safecompile_analyzer::features::aggregation::FindingAggregator;
    /// use safecompile_analyzer::shared::models::{Finding, Severity};
    ///
    /// let parser = vec![Finding::new("Foo", 3, Severity::High, "parser")];
    /// let llm = vec![Finding::new("foo", 3, Severity::Low, "llm").with_suggestion("fix it")];
    ///
    /// let merged = FindingAggregator::merge_sets(vec![parser, llm]);
    /// assert_eq!(merged.len(), 1);
    /// assert_eq!(merged[0].suggestion, "fix it");
    /// ```
    pub fn merge_sets(finding_sets: Vec<Vec<Finding>>) -> Vec<Finding> {
        let total_size: usize = finding_sets.iter().map(|s| s.len()).sum();
        let mut all = Vec::with_capacity(total_size);
        for findings in finding_sets {
            all.extend(findings);
        }
        Self::deduplicate(all)
    }
}

/// Shorthand for [`FindingAggregator::merge_sets`]
pub fn aggregate(finding_sets: Vec<Vec<Finding>>) -> Vec<Finding> {
    FindingAggregator::merge_sets(finding_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Severity;

    fn finding(title: &str, line: u32, suggestion: &str, tag: &str) -> Finding {
        Finding::new(title, line, Severity::Medium, tag).with_suggestion(suggestion)
    }

    #[test]
    fn test_suggestion_wins_case_insensitively() {
        let merged = aggregate(vec![
            vec![finding("Foo", 3, "", "a")],
            vec![finding("foo", 3, "fix it", "b")],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].suggestion, "fix it");
        assert_eq!(merged[0].source_tag, "b");
    }

    #[test]
    fn test_first_seen_wins_on_tie() {
        let merged = aggregate(vec![
            vec![finding("Foo", 3, "first", "a")],
            vec![finding("FOO", 3, "second", "b")],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].suggestion, "first");

        let merged = aggregate(vec![vec![finding("Foo", 3, "", "a"), finding("foo", 3, " ", "b")]]);
        assert_eq!(merged[0].source_tag, "a");
    }

    #[test]
    fn test_replacement_keeps_first_position() {
        let merged = aggregate(vec![
            vec![finding("A", 1, "", "x"), finding("B", 2, "", "x")],
            vec![finding("a", 1, "better", "y")],
        ]);
        let order: Vec<_> = merged.iter().map(|f| (f.line_number, f.suggestion.as_str())).collect();
        assert_eq!(order, vec![(1, "better"), (2, "")]);
    }

    #[test]
    fn test_same_title_different_line_kept() {
        let merged = aggregate(vec![vec![finding("Foo", 1, "", "a"), finding("Foo", 2, "", "a")]]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(Vec::new()).is_empty());
        assert!(aggregate(vec![Vec::new(), Vec::new()]).is_empty());
    }
}
