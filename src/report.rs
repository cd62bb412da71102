//! Human and JSON rendering of prune outcomes
//!
//! Text mode mirrors the classic cleaner output: a header naming the mode,
//! one line per bucket, and a closing summary line.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::humanize::RetentionAge;
use crate::ledger::{Applied, BucketPolicy, Cutoff, OutcomeRecord, RetentionPolicy};

/// Totals over one prune run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneSummary {
    pub buckets_deleted: usize,
    pub entries_deleted: usize,
    pub missing: usize,
    pub refused: usize,
}

impl PruneSummary {
    pub fn from_outcomes(outcomes: &[OutcomeRecord]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.applied {
                Applied::NoOp => summary.missing += 1,
                Applied::FullDelete => summary.buckets_deleted += 1,
                Applied::TimeFiltered => summary.entries_deleted += outcome.deleted.unwrap_or(0),
                Applied::Unsupported => summary.refused += 1,
            }
        }
        summary
    }
}

/// First line of a text report
pub fn header(older_than: Option<RetentionAge>, cutoff: Option<Cutoff>) -> String {
    match (older_than, cutoff) {
        (Some(age), Some(cutoff)) => {
            format!("Clearing entries older than {} (before {})...", age, cutoff)
        }
        _ => "Clearing entire buckets...".to_string(),
    }
}

/// One report line per bucket outcome
pub fn outcome_line(outcome: &OutcomeRecord) -> String {
    let marker = match outcome.applied {
        Applied::FullDelete | Applied::TimeFiltered => '✓',
        Applied::NoOp | Applied::Unsupported => '⚠',
    };
    format!("  {} {}: {}", marker, outcome.bucket, outcome.message)
}

pub fn summary_line(summary: &PruneSummary) -> String {
    format!(
        "✓ Database cleanup complete \
         ({} buckets deleted, {} entries deleted, {} missing, {} refused)",
        summary.buckets_deleted, summary.entries_deleted, summary.missing, summary.refused
    )
}

/// Full text report
pub fn render_text(
    older_than: Option<RetentionAge>,
    cutoff: Option<Cutoff>,
    outcomes: &[OutcomeRecord],
) -> String {
    let mut lines = vec![header(older_than, cutoff), String::new()];
    lines.extend(outcomes.iter().map(outcome_line));
    lines.push(String::new());
    lines.push(summary_line(&PruneSummary::from_outcomes(outcomes)));
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    older_than: Option<RetentionAge>,
    cutoff: Option<String>,
    cutoff_nanos: Option<i64>,
    /// Policy table the run was evaluated against
    policies: BTreeMap<&'a str, BucketPolicy>,
    outcomes: &'a [OutcomeRecord],
    summary: PruneSummary,
}

/// Pretty-printed JSON report
pub fn render_json(
    older_than: Option<RetentionAge>,
    cutoff: Option<Cutoff>,
    policy: &RetentionPolicy,
    outcomes: &[OutcomeRecord],
) -> serde_json::Result<String> {
    let report = JsonReport {
        older_than,
        cutoff: cutoff.map(|c| c.to_string()),
        cutoff_nanos: cutoff.map(|c| c.as_nanos()),
        policies: policy.iter().collect(),
        outcomes,
        summary: PruneSummary::from_outcomes(outcomes),
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn outcome(
        bucket: &str,
        applied: Applied,
        deleted: Option<usize>,
        message: &str,
    ) -> OutcomeRecord {
        OutcomeRecord {
            bucket: bucket.to_string(),
            applied,
            deleted,
            message: message.to_string(),
        }
    }

    fn sample() -> Vec<OutcomeRecord> {
        vec![
            outcome(
                "circuit-fwd-log",
                Applied::TimeFiltered,
                Some(2),
                "deleted 2 entries older than cutoff",
            ),
            outcome(
                "closed-chan-bucket",
                Applied::Unsupported,
                None,
                "time-based cleanup not supported; use full clear instead",
            ),
            outcome("gone", Applied::NoOp, None, "does not exist"),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let mut outcomes = sample();
        outcomes.push(outcome("old", Applied::FullDelete, None, "deleted entire bucket"));

        let summary = PruneSummary::from_outcomes(&outcomes);
        assert_eq!(
            summary,
            PruneSummary {
                buckets_deleted: 1,
                entries_deleted: 2,
                missing: 1,
                refused: 1,
            }
        );
    }

    #[test]
    fn test_header() {
        assert_eq!(header(None, None), "Clearing entire buckets...");

        let age: RetentionAge = "1w".parse().unwrap();
        let cutoff = Cutoff::from_nanos(0);
        assert_eq!(
            header(Some(age), Some(cutoff)),
            "Clearing entries older than 1w (before 1970-01-01T00:00:00Z)..."
        );
    }

    #[test]
    fn test_outcome_lines() {
        let lines: Vec<String> = sample().iter().map(outcome_line).collect();
        assert_eq!(lines[0], "  ✓ circuit-fwd-log: deleted 2 entries older than cutoff");
        assert_eq!(
            lines[1],
            "  ⚠ closed-chan-bucket: time-based cleanup not supported; use full clear instead"
        );
        assert_eq!(lines[2], "  ⚠ gone: does not exist");
    }

    #[test]
    fn test_render_text_layout() {
        let text = render_text(None, None, &sample());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Clearing entire buckets...");
        assert_eq!(lines[1], "");
        assert_eq!(lines[5], "");
        assert_eq!(
            lines[6],
            "✓ Database cleanup complete (0 buckets deleted, 2 entries deleted, 1 missing, 1 refused)"
        );
    }

    #[test]
    fn test_render_json() {
        let age: RetentionAge = "2w".parse().unwrap();
        let cutoff = Some(Cutoff::from_nanos(250));
        let json = render_json(Some(age), cutoff, &RetentionPolicy::builtin(), &sample()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["older_than"], "2w");
        assert_eq!(value["policies"]["circuit-fwd-log"], "time_filtered");
        assert_eq!(value["policies"]["closed-chan-bucket"], "bucket_only");
        assert_eq!(value["cutoff_nanos"], 250);
        assert_eq!(value["outcomes"][0]["applied"], "time_filtered");
        assert_eq!(value["outcomes"][0]["deleted"], 2);
        assert_eq!(value["outcomes"][2]["applied"], "no_op");
        assert!(value["outcomes"][2]["deleted"].is_null());
        assert_eq!(value["summary"]["entries_deleted"], 2);
    }

    #[test]
    fn test_render_json_without_cutoff() {
        let json = render_json(None, None, &RetentionPolicy::empty(), &[]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value["older_than"].is_null());
        assert_eq!(value["policies"], Value::Object(Default::default()));
        assert!(value["cutoff"].is_null());
        assert_eq!(value["outcomes"], Value::Array(vec![]));
    }
}
