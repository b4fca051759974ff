//! In-memory listing tables and CSV loading using Polars

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::schema::{Column, ColumnType, Schema, Value};

/// Name of the column that tags rows with their source file
pub const SOURCE_COLUMN: &str = "filename";

/// Rows scanned by Polars when inferring column types
const INFER_SCHEMA_ROWS: usize = 10_000;

/// A rectangular table of listings: one schema, many rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row against the schema width
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Table::new(schema);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(AnalysisError::RowWidth {
                row: self.rows.len(),
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.schema.index_of(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Parse currency-formatted text ("$1,250.00") in `name` into numbers.
    ///
    /// Text that still fails to parse becomes `Null`.
    pub fn parse_currency_column(&mut self, name: &str) -> Result<()> {
        let idx = self.schema.index_of(name)?;
        let mut columns = self.schema.columns().to_vec();
        columns[idx].column_type = ColumnType::Numeric;
        self.schema = Schema::new(columns)?;

        for row in &mut self.rows {
            let parsed = match std::mem::replace(&mut row[idx], Value::Null) {
                Value::Text(text) => parse_currency(&text).map_or(Value::Null, Value::Float),
                Value::Int(v) => Value::Float(v as f64),
                Value::Float(v) => Value::Float(v),
                _ => Value::Null,
            };
            row[idx] = parsed;
        }
        Ok(())
    }

    fn from_frame(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        let mut cells: Vec<Vec<Value>> = Vec::with_capacity(df.width());

        for series in df.get_columns() {
            let (column_type, values) = series_values(series)?;
            columns.push(Column {
                name: series.name().to_string(),
                column_type,
            });
            cells.push(values);
        }

        let mut rows: Vec<Vec<Value>> = (0..df.height())
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();
        for values in cells {
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
        }

        Table::from_rows(Schema::new(columns)?, rows)
    }

    fn to_frame(&self) -> Result<DataFrame> {
        let mut series = Vec::with_capacity(self.schema.len());

        for (idx, column) in self.schema.columns().iter().enumerate() {
            let cells = self.rows.iter().map(|row| &row[idx]);
            let name = column.name.as_str();
            let s = match column.column_type {
                ColumnType::Boolean => {
                    let values: Vec<Option<bool>> = cells
                        .map(|v| match v {
                            Value::Bool(b) => Some(*b),
                            _ => None,
                        })
                        .collect();
                    Series::new(name, values)
                }
                ColumnType::Integer => {
                    let values: Vec<Option<i64>> = cells
                        .map(|v| match v {
                            Value::Int(i) => Some(*i),
                            _ => None,
                        })
                        .collect();
                    Series::new(name, values)
                }
                ColumnType::Numeric | ColumnType::Empty => {
                    let values: Vec<Option<f64>> = cells.map(Value::as_f64).collect();
                    Series::new(name, values)
                }
                ColumnType::Categorical => {
                    let values: Vec<Option<String>> = cells
                        .map(|v| if v.is_null() { None } else { Some(v.to_string()) })
                        .collect();
                    Series::new(name, values)
                }
            };
            series.push(s);
        }

        Ok(DataFrame::new(series)?)
    }

    /// Write the table as CSV with a header row
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut frame = self.to_frame()?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)?;
        info!("Saved {} rows to {}", self.len(), path.display());
        Ok(())
    }
}

/// Options for [`combine_csv`]
#[derive(Debug, Clone, Default)]
pub struct CombineOptions {
    /// Tag each row with the path it was loaded from
    pub append_file_name: bool,
    /// Write the combined table to this path
    pub save_to: Option<PathBuf>,
    /// Columns holding currency text to convert to numbers
    pub currency_columns: Vec<String>,
}

/// Load a single CSV file
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table> {
    combine_csv(&[path], &CombineOptions::default())
}

/// Load one or more CSV files with the same columns and concatenate them.
///
/// Later files may order their columns differently; they are realigned to the
/// first file. A column inferred as integer in one file and float in another
/// becomes numeric, any other disagreement becomes categorical.
pub fn combine_csv<P: AsRef<Path>>(paths: &[P], options: &CombineOptions) -> Result<Table> {
    if paths.is_empty() {
        return Err(AnalysisError::EmptySourceList);
    }

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        info!("Loaded {} rows from {}", df.height(), path.display());
        sources.push((path.display().to_string(), Table::from_frame(&df)?));
    }

    let expected = sources[0].1.schema().names();
    let expected_set: HashSet<&String> = expected.iter().collect();
    let mut types: Vec<ColumnType> = sources[0]
        .1
        .schema()
        .columns()
        .iter()
        .map(|c| c.column_type)
        .collect();

    // Position of each expected column within every source
    let mut layouts: Vec<Vec<usize>> = Vec::with_capacity(sources.len());
    for (name, table) in &sources {
        let found = table.schema().names();
        if found.len() != expected.len() || !found.iter().all(|n| expected_set.contains(n)) {
            return Err(AnalysisError::SchemaMismatch {
                source_name: name.clone(),
                expected: expected.clone(),
                found,
            });
        }
        let layout = expected
            .iter()
            .map(|n| table.schema().index_of(n))
            .collect::<Result<Vec<_>>>()?;
        for (target, &idx) in types.iter_mut().zip(&layout) {
            *target = target.unify(table.schema().column_type(idx));
        }
        layouts.push(layout);
    }

    let mut columns: Vec<Column> = expected
        .iter()
        .zip(&types)
        .map(|(name, &column_type)| Column {
            name: name.clone(),
            column_type,
        })
        .collect();
    if options.append_file_name {
        columns.push(Column {
            name: SOURCE_COLUMN.to_string(),
            column_type: ColumnType::Categorical,
        });
    }
    let mut combined = Table::new(Schema::new(columns)?);

    for ((name, table), layout) in sources.into_iter().zip(layouts) {
        debug!("Appending {} rows from {}", table.len(), name);
        for mut row in table.rows {
            let mut aligned: Vec<Value> = layout
                .iter()
                .zip(&types)
                .map(|(&idx, &column_type)| {
                    std::mem::replace(&mut row[idx], Value::Null).coerce(column_type)
                })
                .collect();
            if options.append_file_name {
                aligned.push(Value::Text(name.clone()));
            }
            combined.push_row(aligned)?;
        }
    }

    for column in &options.currency_columns {
        combined.parse_currency_column(column)?;
    }

    if let Some(path) = &options.save_to {
        combined.write_csv(path)?;
    }

    Ok(combined)
}

fn series_values(series: &Series) -> Result<(ColumnType, Vec<Value>)> {
    let dtype = series.dtype();
    // Polars reads columns without any values as strings
    let out = if matches!(dtype, DataType::Null) || series.null_count() == series.len() {
        (ColumnType::Empty, vec![Value::Null; series.len()])
    } else if matches!(dtype, DataType::Boolean) {
        let values = series.bool()?.into_iter().map(Value::from).collect();
        (ColumnType::Boolean, values)
    } else if dtype.is_integer() {
        let cast = series.cast(&DataType::Int64)?;
        let values = cast.i64()?.into_iter().map(Value::from).collect();
        (ColumnType::Integer, values)
    } else if dtype.is_float() {
        let cast = series.cast(&DataType::Float64)?;
        let values = cast.f64()?.into_iter().map(Value::from).collect();
        (ColumnType::Numeric, values)
    } else {
        let cast = series.cast(&DataType::String)?;
        let values = cast.str()?.into_iter().map(Value::from).collect();
        (ColumnType::Categorical, values)
    };
    Ok(out)
}

fn parse_currency(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | ' '))
        .collect();
    cleaned.parse().ok()
}
