//! Configuration file handling.
//!
//! Settings are read from `premiumlens.toml` and then overridden by
//! command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::CombineOptions;
use crate::split::SplitColumns;
use crate::stats::CentralTendency;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "premiumlens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Column names in the listing data.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Split settings.
    #[serde(default)]
    pub split: SplitConfig,

    /// Data loading settings.
    #[serde(default)]
    pub load: LoadConfig,

    /// Summary and chart settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Column selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_neighbourhood")]
    pub neighbourhood: String,

    #[serde(default = "default_property_type")]
    pub property_type: String,

    #[serde(default = "default_rooms")]
    pub rooms: String,

    #[serde(default = "default_price")]
    pub price: String,

    /// Numeric column that divides each group.
    #[serde(default = "default_split_column")]
    pub split: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            neighbourhood: default_neighbourhood(),
            property_type: default_property_type(),
            rooms: default_rooms(),
            price: default_price(),
            split: default_split_column(),
        }
    }
}

fn default_neighbourhood() -> String {
    "neighbourhood_cleansed".to_string()
}

fn default_property_type() -> String {
    "property_type".to_string()
}

fn default_rooms() -> String {
    "bedrooms".to_string()
}

fn default_price() -> String {
    "price".to_string()
}

fn default_split_column() -> String {
    "review_scores_rating".to_string()
}

/// Split settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Statistic used as each group's split point.
    #[serde(default)]
    pub mode: CentralTendency,
}

/// Data loading settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Tag rows with the file they came from.
    #[serde(default)]
    pub append_file_name: bool,

    /// Save the combined data to this CSV file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_combined: Option<PathBuf>,

    /// Extra columns holding currency text such as "$1,250.00".
    /// The price column is always parsed this way.
    #[serde(default)]
    pub currency_columns: Vec<String>,
}

/// Summary and chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Columns to summarise premiums by.
    #[serde(default = "default_group_by")]
    pub group_by: Vec<String>,

    #[serde(default = "default_above_label")]
    pub above_label: String,

    #[serde(default = "default_below_label")]
    pub below_label: String,

    /// Directory for chart images.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Draw charts.
    #[serde(default = "default_true")]
    pub plot: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            group_by: default_group_by(),
            above_label: default_above_label(),
            below_label: default_below_label(),
            output_dir: default_output_dir(),
            plot: true,
        }
    }
}

fn default_group_by() -> Vec<String> {
    vec!["neighbourhood_cleansed", "property_type", "bedrooms"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_above_label() -> String {
    "Above average rating".to_string()
}

fn default_below_label() -> String {
    "Below average rating".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `premiumlens.toml` from the current directory if it exists.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only flags the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref column) = args.neighbourhood_col {
            self.columns.neighbourhood = column.clone();
        }
        if let Some(ref column) = args.property_type_col {
            self.columns.property_type = column.clone();
        }
        if let Some(ref column) = args.rooms_col {
            self.columns.rooms = column.clone();
        }
        if let Some(ref column) = args.price_col {
            self.columns.price = column.clone();
        }
        if let Some(ref column) = args.split_col {
            self.columns.split = column.clone();
        }

        if let Some(mode) = args.mode {
            self.split.mode = mode;
        }

        if args.append_file_name {
            self.load.append_file_name = true;
        }
        if let Some(ref path) = args.save_combined {
            self.load.save_combined = Some(path.clone());
        }

        if let Some(ref group_by) = args.group_by {
            self.report.group_by = group_by.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.report.output_dir = dir.clone();
        }
        if args.no_plot {
            self.report.plot = false;
        }
    }

    pub fn split_columns(&self) -> SplitColumns {
        SplitColumns::new(
            self.columns.neighbourhood.as_str(),
            self.columns.rooms.as_str(),
            self.columns.property_type.as_str(),
            self.columns.split.as_str(),
        )
        .with_price(self.columns.price.as_str())
    }

    pub fn combine_options(&self) -> CombineOptions {
        let mut currency_columns = vec![self.columns.price.clone()];
        for column in &self.load.currency_columns {
            if !currency_columns.contains(column) {
                currency_columns.push(column.clone());
            }
        }

        CombineOptions {
            append_file_name: self.load.append_file_name,
            save_to: self.load.save_combined.clone(),
            currency_columns,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
