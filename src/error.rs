//! Error types for loading, validating and analysing listing data

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::schema::ColumnType;

/// Errors raised by the analysis library
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unknown column '{name}' (available: {})", .available.join(", "))]
    UnknownColumn { name: String, available: Vec<String> },

    #[error("column '{name}' must be numeric but is {column_type}")]
    NonNumericColumn {
        name: String,
        column_type: ColumnType,
    },

    #[error("schema mismatch in '{source_name}': expected columns [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    SchemaMismatch {
        source_name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("row {row} has {found} values but the schema has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("no source files given")]
    EmptySourceList,

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_lists_available() {
        let err = AnalysisError::UnknownColumn {
            name: "pirce".to_string(),
            available: vec!["price".to_string(), "bedrooms".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("pirce"));
        assert!(msg.contains("price, bedrooms"));
    }

    #[test]
    fn test_non_numeric_display() {
        let err = AnalysisError::NonNumericColumn {
            name: "neighbourhood".to_string(),
            column_type: ColumnType::Categorical,
        };
        assert!(err.to_string().contains("categorical"));
    }
}
