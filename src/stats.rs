//! Central-tendency helpers shared by the splitter and the aggregators

use serde::{Deserialize, Serialize};

/// Statistic used as a group's split point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CentralTendency {
    #[default]
    Mean,
    Median,
}

impl CentralTendency {
    pub fn compute(self, values: impl IntoIterator<Item = f64>) -> f64 {
        match self {
            CentralTendency::Mean => mean(values),
            CentralTendency::Median => median(values),
        }
    }
}

/// Arithmetic mean ignoring NaN; NaN when nothing is left
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Median ignoring NaN; NaN when nothing is left
pub fn median(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
