//! PremiumLens: price premiums of short-term rental listings
//!
//! Listings are grouped by neighbourhood, property type and room count. Each
//! group is split at the mean (or median) of a rating-like column, every row is
//! annotated with its premium over the group's mean price, and the two sides
//! are summarised per value of any column.

pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod schema;
pub mod split;
pub mod stats;
pub mod summary;
#[cfg(feature = "plot")]
pub mod viz;

// Re-export public items for easier access
pub use chart::{comparison_chart, premium_chart, BarChart, ChartLabels, Renderer};
pub use cli::Args;
pub use config::Config;
pub use data::{combine_csv, load_csv, CombineOptions, Table};
pub use error::{AnalysisError, Result};
pub use schema::{Column, ColumnType, Schema, Value};
pub use split::{split_data, AnnotatedRow, AnnotatedTable, Partition, SplitColumns};
pub use stats::CentralTendency;
pub use summary::{aggregate_premium, compare_premium, PremiumSummary, RelativePremium};
#[cfg(feature = "plot")]
pub use viz::PlottersRenderer;
