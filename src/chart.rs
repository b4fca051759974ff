//! Rendering-neutral bar chart descriptions built from summaries

use std::path::Path;

use crate::summary::{PremiumSummary, RelativePremium};

/// One bar: category label, height and the number of listings behind it
#[derive(Debug, Clone, PartialEq)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
    pub count: usize,
}

/// A named series of bars, one per category
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub points: Vec<BarPoint>,
}

/// Everything a renderer needs to draw a grouped or single-series bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    /// Category labels taken from the first series
    pub fn categories(&self) -> Vec<&str> {
        self.series
            .first()
            .map(|s| s.points.iter().map(|p| p.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Smallest and largest finite bar heights, always spanning zero
    pub fn value_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value))
            .filter(|v| v.is_finite())
            .fold((0.0, 0.0), |(lo, hi), v| (f64::min(lo, v), f64::max(hi, v)))
    }
}

/// Title and axis labels of a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }
}

/// Two-series chart of mean premium above and below the split point
pub fn premium_chart(
    summaries: &[PremiumSummary],
    above_label: &str,
    below_label: &str,
    labels: &ChartLabels,
) -> BarChart {
    let series = |name: &str, pick: fn(&PremiumSummary) -> (f64, usize)| BarSeries {
        name: name.to_string(),
        points: summaries
            .iter()
            .map(|s| {
                let (value, count) = pick(s);
                BarPoint {
                    label: s.value.to_string(),
                    value,
                    count,
                }
            })
            .collect(),
    };

    BarChart {
        title: labels.title.clone(),
        x_label: labels.x_label.clone(),
        y_label: labels.y_label.clone(),
        series: vec![
            series(above_label, |s| (s.above_premium, s.above_count)),
            series(below_label, |s| (s.below_premium, s.below_count)),
        ],
    }
}

/// Single-series chart of relative premium, in ranking order
pub fn comparison_chart(records: &[RelativePremium], labels: &ChartLabels) -> BarChart {
    BarChart {
        title: labels.title.clone(),
        x_label: labels.x_label.clone(),
        y_label: labels.y_label.clone(),
        series: vec![BarSeries {
            name: labels.y_label.clone(),
            points: records
                .iter()
                .map(|r| BarPoint {
                    label: r.value.to_string(),
                    value: r.relative_premium,
                    count: r.total_count,
                })
                .collect(),
        }],
    }
}

/// Draws a [`BarChart`] to a file
pub trait Renderer {
    fn render(&self, chart: &BarChart, path: &Path) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Value;

    fn summaries() -> Vec<PremiumSummary> {
        vec![
            PremiumSummary {
                value: Value::from("Soho"),
                above_premium: 0.25,
                above_count: 3,
                below_premium: -0.1,
                below_count: 5,
            },
            PremiumSummary {
                value: Value::from("Chelsea"),
                above_premium: f64::NAN,
                above_count: 0,
                below_premium: 0.0,
                below_count: 1,
            },
        ]
    }

    #[test]
    fn test_premium_chart_has_two_series() {
        let labels = ChartLabels::new("Premium by neighbourhood", "Neighbourhood", "Premium/Discount");
        let chart = premium_chart(&summaries(), "Above average", "Below average", &labels);

        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.categories(), vec!["Soho", "Chelsea"]);
        assert_eq!(chart.series[0].name, "Above average");
        assert_eq!(chart.series[1].points[0].count, 5);
        assert_eq!(chart.value_range(), (-0.1, 0.25));
    }

    #[test]
    fn test_comparison_chart_keeps_order() {
        let records = vec![
            RelativePremium {
                value: Value::Int(2),
                relative_premium: -0.2,
                total_count: 4,
            },
            RelativePremium {
                value: Value::Int(1),
                relative_premium: 0.4,
                total_count: 7,
            },
        ];
        let labels = ChartLabels::new("Rated premium", "Bedrooms", "Premium");
        let chart = comparison_chart(&records, &labels);

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.categories(), vec!["2", "1"]);
        assert_eq!(chart.series[0].points[1].value, 0.4);
    }
}
