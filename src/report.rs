//! Plain-text tables for the console

use std::fmt::Write;

use crate::split::Partition;
use crate::summary::{PremiumSummary, RelativePremium};

fn pct(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:+.1}%", value * 100.0)
    }
}

/// Above/below premium table for one grouping column
pub fn premium_table(group_col: &str, summaries: &[PremiumSummary]) -> String {
    let width = label_width(group_col, summaries.iter().map(|s| s.value.to_string()));
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$} | {:>9} | {:>6} | {:>9} | {:>6}",
        group_col, "above", "n", "below", "n"
    );
    let _ = writeln!(out, "{}", "-".repeat(width + 43));
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<width$} | {:>9} | {:>6} | {:>9} | {:>6}",
            s.value.to_string(),
            pct(s.above_premium),
            s.above_count,
            pct(s.below_premium),
            s.below_count
        );
    }
    out
}

/// Ranked relative premium table for one grouping column
pub fn comparison_table(group_col: &str, records: &[RelativePremium]) -> String {
    let width = label_width(group_col, records.iter().map(|r| r.value.to_string()));
    let mut out = String::new();
    let _ = writeln!(out, "{:<width$} | {:>9} | {:>6}", group_col, "premium", "n");
    let _ = writeln!(out, "{}", "-".repeat(width + 21));
    for r in records {
        let _ = writeln!(
            out,
            "{:<width$} | {:>9} | {:>6}",
            r.value.to_string(),
            pct(r.relative_premium),
            r.total_count
        );
    }
    out
}

/// One-line overview of a split
pub fn split_overview(partition: &Partition) -> String {
    format!(
        "{} groups, {} listings above and {} at or below their group's split point",
        partition.group_stats().len(),
        partition.above.len(),
        partition.below.len()
    )
}

fn label_width(header: &str, labels: impl Iterator<Item = String>) -> usize {
    labels.map(|l| l.chars().count()).fold(header.chars().count(), usize::max)
}
