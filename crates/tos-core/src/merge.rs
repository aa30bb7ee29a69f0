//! Merge engine - combines per-chunk records into one report
//!
//! Output depends only on input order: the same records in the same order
//! always produce the same report, whatever order the analyses finished in.

use std::collections::HashSet;

use crate::{AnalysisRecord, Report};

const SUMMARY_SEPARATOR: &str = " ";

/// Merge chunk records, in chunk order, into a single report.
///
/// Summaries are joined with a single space (an empty summary still
/// contributes its segment). List fields are flattened and deduplicated by
/// exact string equality across all records; the first occurrence wins.
pub fn merge(records: &[AnalysisRecord]) -> Report {
    let summary = records
        .iter()
        .map(|r| r.summary.as_str())
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR);

    Report {
        summary,
        red_flags: dedup_flatten(records.iter().map(|r| &r.red_flags)),
        financial_clauses: dedup_flatten(records.iter().map(|r| &r.financial_clauses)),
        recommendations: dedup_flatten(records.iter().map(|r| &r.recommendations)),
    }
}

fn dedup_flatten<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for item in lists.flatten() {
        if seen.insert(item.as_str()) {
            merged.push(item.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(summary: &str, red_flags: &[&str]) -> AnalysisRecord {
        AnalysisRecord {
            summary: summary.to_string(),
            red_flags: red_flags.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        assert_eq!(merge(&[]), Report::default());
    }

    #[test]
    fn test_red_flags_deduplicated_across_chunks() {
        let merged = merge(&[record("", &["A", "B"]), record("", &["B", "C"])]);

        assert_eq!(merged.red_flags, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_duplicates_within_one_record_removed() {
        let merged = merge(&[record("s", &["A", "A", "B", "A"])]);

        assert_eq!(merged.red_flags, vec!["A", "B"]);
    }

    #[test]
    fn test_dedup_is_exact_match() {
        let merged = merge(&[record("", &["Fee", "fee", "Fee "])]);

        assert_eq!(merged.red_flags.len(), 3);
    }

    #[test]
    fn test_summaries_joined_in_order() {
        let merged = merge(&[
            record("First part.", &[]),
            record("", &[]),
            record("Third part.", &[]),
        ]);

        assert_eq!(merged.summary, "First part.  Third part.");
    }

    #[test]
    fn test_all_list_fields_merged() {
        let a = AnalysisRecord {
            summary: "a".into(),
            red_flags: vec!["arbitration".into()],
            financial_clauses: vec!["auto-renewal".into()],
            recommendations: vec!["cancel early".into()],
        };
        let b = AnalysisRecord {
            summary: "b".into(),
            red_flags: vec!["data sharing".into(), "arbitration".into()],
            financial_clauses: vec!["auto-renewal".into(), "late fee".into()],
            recommendations: vec![],
        };

        let merged = merge(&[a, b]);

        assert_eq!(merged.summary, "a b");
        assert_eq!(merged.red_flags, vec!["arbitration", "data sharing"]);
        assert_eq!(merged.financial_clauses, vec!["auto-renewal", "late fee"]);
        assert_eq!(merged.recommendations, vec!["cancel early"]);
    }
}
