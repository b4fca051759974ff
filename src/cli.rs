//! Command-line interface definitions and argument parsing

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use crate::stats::CentralTendency;

/// Rental listing premium analysis: how much more do better-rated listings charge?
///
/// Splits listings in every (neighbourhood, property type, bedrooms) group at
/// the group's mean rating and summarises the price premium of each side.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Listing CSV files with identical columns
    #[arg(value_name = "CSV", required_unless_present = "init_config")]
    pub inputs: Vec<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, uses premiumlens.toml in the current directory when present
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a default premiumlens.toml and exit
    #[arg(long)]
    pub init_config: bool,

    /// Neighbourhood column
    #[arg(long, value_name = "COLUMN")]
    pub neighbourhood_col: Option<String>,

    /// Property type column
    #[arg(long, value_name = "COLUMN")]
    pub property_type_col: Option<String>,

    /// Room count column
    #[arg(long, value_name = "COLUMN")]
    pub rooms_col: Option<String>,

    /// Price column
    #[arg(long, value_name = "COLUMN")]
    pub price_col: Option<String>,

    /// Numeric column used to split each group (e.g. a rating)
    #[arg(long, value_name = "COLUMN")]
    pub split_col: Option<String>,

    /// Statistic used as each group's split point
    #[arg(long, value_enum)]
    pub mode: Option<CentralTendency>,

    /// Columns to summarise premiums by (comma-separated)
    #[arg(short, long, value_name = "COLUMNS", value_delimiter = ',')]
    pub group_by: Option<Vec<String>>,

    /// Tag every row with the file it was loaded from
    #[arg(long)]
    pub append_file_name: bool,

    /// Save the combined input data to this CSV file
    #[arg(long, value_name = "FILE")]
    pub save_combined: Option<PathBuf>,

    /// Directory for chart images
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    pub no_plot: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log level implied by the flags
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}
