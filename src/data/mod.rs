// Data module for the in-memory tabular model
// Author: Gabriel Demetrios Lafis

mod csv;

pub use csv::*;

use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar type inferred for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// Name and inferred type of a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnInfo {
    /// Create a new column descriptor
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        ColumnInfo {
            name: name.to_string(),
            column_type,
        }
    }
}

/// Typed storage for the values of one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    /// Get the number of values in the column
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    /// Check if the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the scalar type of the column
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Integer(_) => ColumnType::Integer,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    /// Render the value at the given row as CSV field text
    pub fn render(&self, row: usize) -> String {
        match self {
            ColumnData::Integer(values) => values[row].to_string(),
            ColumnData::Float(values) => values[row].to_string(),
            ColumnData::Text(values) => values[row].clone(),
        }
    }

    /// Compare the values at two rows with a total ordering
    pub fn compare_rows(&self, a: usize, b: usize) -> Ordering {
        match self {
            ColumnData::Integer(values) => values[a].cmp(&values[b]),
            ColumnData::Float(values) => values[a].total_cmp(&values[b]),
            ColumnData::Text(values) => values[a].cmp(&values[b]),
        }
    }

    /// Copy the values at the given rows, in the given order
    pub fn gather(&self, rows: &[usize]) -> ColumnData {
        match self {
            ColumnData::Integer(values) => {
                ColumnData::Integer(rows.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Float(values) => {
                ColumnData::Float(rows.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Text(values) => {
                ColumnData::Text(rows.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Create a new column
    pub fn new(name: &str, data: ColumnData) -> Self {
        Column {
            name: name.to_string(),
            data,
        }
    }

    /// Get the descriptor for this column
    pub fn info(&self) -> ColumnInfo {
        ColumnInfo::new(&self.name, self.data.column_type())
    }
}

/// An in-memory table of named, typed columns with equal row counts
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns, checking name uniqueness and row counts
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(DataError::DuplicateColumn(column.name.clone()));
            }
        }

        if let Some(first) = columns.first() {
            let rows = first.data.len();
            for column in &columns[1..] {
                if column.data.len() != rows {
                    return Err(DataError::LengthMismatch {
                        column: column.name.clone(),
                        expected: rows,
                        actual: column.data.len(),
                    });
                }
            }
        }

        Ok(Table { columns })
    }

    /// Create a table with no columns
    pub fn empty() -> Self {
        Table {
            columns: Vec::new(),
        }
    }

    /// Get the columns of the table, in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get the number of rows in the table
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Get the number of columns in the table
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get the descriptors of all columns, in order
    pub fn infos(&self) -> Vec<ColumnInfo> {
        self.columns.iter().map(|c| c.info()).collect()
    }

    /// Build a new table holding the given rows, in the given order
    pub fn gather_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: c.data.gather(rows),
            })
            .collect();

        Table { columns }
    }
}

/// Represents an error in the data module
#[derive(Debug)]
pub enum DataError {
    IoError(std::io::Error),
    ParseError(String),
    DuplicateColumn(String),
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    Other(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataError::IoError(err) => write!(f, "IO error: {}", err),
            DataError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataError::DuplicateColumn(name) => {
                write!(f, "Duplicate column name '{}'", name)
            }
            DataError::LengthMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Column '{}' has {} rows, expected {}",
                column, actual, expected
            ),
            DataError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::IoError(err)
    }
}
