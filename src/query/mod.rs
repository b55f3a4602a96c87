// Query module for filter/sort transformations over uploaded tables
// Author: Gabriel Demetrios Lafis

mod filter;
mod sort;

pub use filter::*;
pub use sort::*;

use std::error::Error;
use std::fmt;

use crate::data::{parse_table, write_table, DataError, Table};

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FilterOp {
    /// Parse an operator token, returning None for anything unsupported
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(FilterOp::Eq),
            "ne" => Some(FilterOp::Ne),
            "gt" => Some(FilterOp::Gt),
            "ge" => Some(FilterOp::Ge),
            "lt" => Some(FilterOp::Lt),
            "le" => Some(FilterOp::Le),
            _ => None,
        }
    }

    /// Check whether the operator requires an ordered column type
    pub fn is_ordering(&self) -> bool {
        !matches!(self, FilterOp::Eq | FilterOp::Ne)
    }

    /// Get the operator token
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single (column, operator, value) narrowing predicate
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// One level of a multi-key ordering
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub column: String,
    pub ascending: bool,
}

/// Parse a serialized filter spec: comma-separated `column__op__value` triples
pub fn parse_filter_spec(spec: &str) -> Result<Vec<FilterCondition>, QueryError> {
    let mut conditions = Vec::new();

    for part in spec.split(',') {
        let tokens: Vec<&str> = part.split("__").collect();

        if tokens.len() != 3 {
            return Err(QueryError::MalformedFilterSpec(part.to_string()));
        }

        let op = FilterOp::parse(tokens[1]).ok_or_else(|| QueryError::UnsupportedOperator {
            column: tokens[0].to_string(),
            operator: tokens[1].to_string(),
        })?;

        conditions.push(FilterCondition {
            column: tokens[0].to_string(),
            op,
            value: tokens[2].to_string(),
        });
    }

    Ok(conditions)
}

/// Parse a serialized sort spec: comma-separated `column:direction` pairs,
/// where a direction of `"true"` (case-insensitive) means ascending
pub fn parse_sort_spec(spec: &str) -> Result<Vec<SortKey>, QueryError> {
    let mut keys = Vec::new();

    for part in spec.split(',') {
        let tokens: Vec<&str> = part.split(':').collect();

        if tokens.len() != 2 {
            return Err(QueryError::MalformedSortSpec(part.to_string()));
        }

        keys.push(SortKey {
            column: tokens[0].to_string(),
            ascending: tokens[1].eq_ignore_ascii_case("true"),
        });
    }

    Ok(keys)
}

/// A fully parsed query request: filters applied first, then sort keys
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    pub filters: Vec<FilterCondition>,
    pub sort_keys: Vec<SortKey>,
}

impl QueryRequest {
    /// Parse the optional serialized specs into a request
    pub fn parse(
        filter_spec: Option<&str>,
        sort_spec: Option<&str>,
    ) -> Result<Self, QueryError> {
        let filters = match filter_spec {
            Some(spec) => parse_filter_spec(spec)?,
            None => Vec::new(),
        };

        let sort_keys = match sort_spec {
            Some(spec) => parse_sort_spec(spec)?,
            None => Vec::new(),
        };

        Ok(QueryRequest { filters, sort_keys })
    }

    /// Apply the request to a table: filter first, then sort
    pub fn apply(&self, table: &Table) -> Result<Table, QueryError> {
        let filtered = apply_filters(table, &self.filters)?;
        apply_sort(&filtered, &self.sort_keys)
    }
}

/// Run a full query over raw CSV bytes.
///
/// When neither spec is given the original bytes are returned untouched,
/// preserving the file's exact formatting. Otherwise the file is parsed,
/// transformed and re-serialized as UTF-8 CSV with a header row.
pub fn run_query(
    bytes: &[u8],
    filter_spec: Option<&str>,
    sort_spec: Option<&str>,
) -> Result<Vec<u8>, QueryError> {
    if filter_spec.is_none() && sort_spec.is_none() {
        return Ok(bytes.to_vec());
    }

    let request = QueryRequest::parse(filter_spec, sort_spec)?;
    let table = parse_table(bytes)?;
    let result = request.apply(&table)?;

    write_table(&result).map_err(QueryError::from)
}

/// Represents an error in the query module
#[derive(Debug)]
pub enum QueryError {
    Data(DataError),
    MalformedFilterSpec(String),
    MalformedSortSpec(String),
    UnknownColumn(String),
    InvalidValue { column: String, value: String },
    UnsupportedOperator { column: String, operator: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryError::Data(err) => write!(f, "Data error: {}", err),
            QueryError::MalformedFilterSpec(part) => {
                write!(f, "Malformed filter condition '{}'", part)
            }
            QueryError::MalformedSortSpec(part) => {
                write!(f, "Malformed sort key '{}'", part)
            }
            QueryError::UnknownColumn(name) => {
                write!(f, "Column '{}' does not exist in file", name)
            }
            QueryError::InvalidValue { column, value } => {
                write!(f, "Invalid value '{}' for column '{}'", value, column)
            }
            QueryError::UnsupportedOperator { column, operator } => {
                write!(
                    f,
                    "Unsupported operator '{}' for column '{}'",
                    operator, column
                )
            }
        }
    }
}

impl Error for QueryError {}

impl From<DataError> for QueryError {
    fn from(err: DataError) -> Self {
        QueryError::Data(err)
    }
}
