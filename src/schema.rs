//! Column schema descriptor and cell values

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Categorical,
    Integer,
    Numeric,
    Boolean,
    /// No values seen yet (header-only file or an all-blank column)
    Empty,
}

impl ColumnType {
    /// Empty columns count as numeric: none of their values contradict it
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Numeric | ColumnType::Empty)
    }

    /// Common type for a column that was inferred differently in two sources.
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Empty, other) | (other, ColumnType::Empty) => other,
            (ColumnType::Integer, ColumnType::Numeric) | (ColumnType::Numeric, ColumnType::Integer) => {
                ColumnType::Numeric
            }
            _ => ColumnType::Categorical,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Categorical => "categorical",
            ColumnType::Integer => "integer",
            ColumnType::Numeric => "numeric",
            ColumnType::Boolean => "boolean",
            ColumnType::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Ordered set of columns shared by every row of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut schema = Schema::default();
        for column in columns {
            schema.push(column)?;
        }
        Ok(schema)
    }

    /// Append a column, rejecting duplicate names
    pub fn push(&mut self, column: Column) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(AnalysisError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Position of `name`, or `UnknownColumn`
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| AnalysisError::UnknownColumn {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Position of a column that must hold numbers
    pub fn numeric_index_of(&self, name: &str) -> Result<usize> {
        let idx = self.index_of(name)?;
        let column_type = self.columns[idx].column_type;
        if !column_type.is_numeric() {
            return Err(AnalysisError::NonNumericColumn {
                name: name.to_string(),
                column_type,
            });
        }
        Ok(idx)
    }

    pub fn column_type(&self, idx: usize) -> ColumnType {
        self.columns[idx].column_type
    }
}

/// A single cell.
///
/// Equality and hashing are total so any column can serve as a grouping key:
/// floats compare by bit pattern with `-0.0` folded into `0.0`, and `Null`
/// equals `Null`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert to the representation used by a column of type `target`
    pub fn coerce(self, target: ColumnType) -> Value {
        match (target, self) {
            (_, Value::Null) => Value::Null,
            (ColumnType::Numeric, Value::Int(v)) => Value::Float(v as f64),
            (ColumnType::Categorical, Value::Text(s)) => Value::Text(s),
            (ColumnType::Categorical, other) => Value::Text(other.to_string()),
            (_, other) => other,
        }
    }

    fn float_bits(v: f64) -> u64 {
        if v == 0.0 {
            0.0f64.to_bits()
        } else if v.is_nan() {
            f64::NAN.to_bits()
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Value::float_bits(*a) == Value::float_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Float(v) => Value::float_bits(*v).hash(state),
            Value::Text(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn schema() -> Schema {
        Schema::new(vec![
            Column {
                name: "neighbourhood".to_string(),
                column_type: ColumnType::Categorical,
            },
            Column {
                name: "price".to_string(),
                column_type: ColumnType::Numeric,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_index_of_unknown_column() {
        let schema = schema();
        assert_eq!(schema.index_of("price").unwrap(), 1);
        match schema.index_of("rating") {
            Err(AnalysisError::UnknownColumn { name, available }) => {
                assert_eq!(name, "rating");
                assert_eq!(available, vec!["neighbourhood", "price"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_index_rejects_categorical() {
        let schema = schema();
        assert!(matches!(
            schema.numeric_index_of("neighbourhood"),
            Err(AnalysisError::NonNumericColumn { .. })
        ));
        assert_eq!(schema.numeric_index_of("price").unwrap(), 1);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut schema = schema();
        let result = schema.push(Column {
            name: "price".to_string(),
            column_type: ColumnType::Integer,
        });
        assert!(matches!(result, Err(AnalysisError::DuplicateColumn(_))));
    }

    #[test]
    fn test_value_equality_is_total() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Int(1), Value::Float(1.0));

        let set: HashSet<Value> = [Value::Float(0.0), Value::Float(-0.0), Value::Null, Value::Null]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unify_and_coerce() {
        assert_eq!(ColumnType::Integer.unify(ColumnType::Numeric), ColumnType::Numeric);
        assert_eq!(ColumnType::Integer.unify(ColumnType::Categorical), ColumnType::Categorical);
        assert_eq!(Value::Int(3).coerce(ColumnType::Numeric), Value::Float(3.0));
        assert_eq!(Value::Int(3).coerce(ColumnType::Categorical), Value::from("3"));
        assert_eq!(Value::Null.coerce(ColumnType::Numeric), Value::Null);
    }

    #[test]
    fn test_empty_unifies_with_anything() {
        assert_eq!(ColumnType::Empty.unify(ColumnType::Integer), ColumnType::Integer);
        assert_eq!(ColumnType::Categorical.unify(ColumnType::Empty), ColumnType::Categorical);
        assert_eq!(ColumnType::Empty.unify(ColumnType::Empty), ColumnType::Empty);
        assert!(ColumnType::Empty.is_numeric());
        assert!(!ColumnType::Categorical.is_numeric());
    }
}
