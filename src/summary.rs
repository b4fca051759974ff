//! Per-value premium summaries over an above/below split

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Result;
use crate::schema::Value;
use crate::split::{AnnotatedRow, AnnotatedTable};
use crate::stats::mean;

/// Mean premium on each side of the split for one value of the grouping column
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumSummary {
    pub value: Value,
    /// Mean `premium_discount` of matching above rows, NaN when there are none
    pub above_premium: f64,
    pub above_count: usize,
    /// Mean `premium_discount` of matching below rows, NaN when there are none
    pub below_premium: f64,
    pub below_count: usize,
}

/// Mean above price relative to mean below price for one value
#[derive(Debug, Clone, PartialEq)]
pub struct RelativePremium {
    pub value: Value,
    /// `mean(above price) / mean(below price) - 1`
    pub relative_premium: f64,
    pub total_count: usize,
}

/// Summarise premiums per distinct value of `group_col`.
///
/// Values are listed in first-seen order across `above` then `below`.
pub fn aggregate_premium(
    group_col: &str,
    above: &AnnotatedTable,
    below: &AnnotatedTable,
) -> Result<Vec<PremiumSummary>> {
    let (above_idx, below_idx) = resolve(group_col, above, below)?;

    let summaries = distinct_values(above_idx, above, below_idx, below)
        .into_iter()
        .map(|value| {
            let above_rows: Vec<&AnnotatedRow> = above.matching(above_idx, &value).collect();
            let below_rows: Vec<&AnnotatedRow> = below.matching(below_idx, &value).collect();
            PremiumSummary {
                above_premium: mean(above_rows.iter().map(|r| r.premium_discount)),
                above_count: above_rows.len(),
                below_premium: mean(below_rows.iter().map(|r| r.premium_discount)),
                below_count: below_rows.len(),
                value,
            }
        })
        .collect();
    Ok(summaries)
}

/// Rank distinct values of `group_col` by how much pricier the above rows are.
///
/// Sorted ascending by `relative_premium`; NaN ratios (no above or no below
/// rows, or a zero below mean) keep their relative order at the end.
pub fn compare_premium(
    group_col: &str,
    above: &AnnotatedTable,
    below: &AnnotatedTable,
) -> Result<Vec<RelativePremium>> {
    let (above_idx, below_idx) = resolve(group_col, above, below)?;

    let mut records: Vec<RelativePremium> = distinct_values(above_idx, above, below_idx, below)
        .into_iter()
        .map(|value| {
            let (above_mean, above_count) = price_mean(above, above_idx, &value);
            let (below_mean, below_count) = price_mean(below, below_idx, &value);
            RelativePremium {
                value,
                relative_premium: above_mean / below_mean - 1.0,
                total_count: above_count + below_count,
            }
        })
        .collect();

    records.sort_by(|a, b| nan_last(a.relative_premium, b.relative_premium));
    Ok(records)
}

fn resolve(group_col: &str, above: &AnnotatedTable, below: &AnnotatedTable) -> Result<(usize, usize)> {
    Ok((
        above.schema().index_of(group_col)?,
        below.schema().index_of(group_col)?,
    ))
}

fn distinct_values(
    above_idx: usize,
    above: &AnnotatedTable,
    below_idx: usize,
    below: &AnnotatedTable,
) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    let cells = above
        .rows()
        .iter()
        .map(|r| &r.values[above_idx])
        .chain(below.rows().iter().map(|r| &r.values[below_idx]));
    for value in cells {
        if seen.insert(value) {
            values.push(value.clone());
        }
    }
    values
}

fn price_mean(table: &AnnotatedTable, idx: usize, value: &Value) -> (f64, usize) {
    let prices: Vec<f64> = table
        .matching(idx, value)
        .map(|row| table.price(row).unwrap_or(f64::NAN))
        .collect();
    (mean(prices.iter().copied()), prices.len())
}

fn nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}
