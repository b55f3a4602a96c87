// Filter engine: ordered conditions narrowing the row set
// Author: Gabriel Demetrios Lafis

use crate::data::{ColumnData, Table};
use super::{FilterCondition, FilterOp, QueryError};

/// Apply an ordered list of conditions to a table.
///
/// Each condition narrows the rows kept by the previous one (AND
/// semantics), and row order is preserved throughout. The result is a
/// new table; the input is never touched, so a failing condition leaves
/// no partial transformation behind.
pub fn apply_filters(
    table: &Table,
    conditions: &[FilterCondition],
) -> Result<Table, QueryError> {
    if conditions.is_empty() {
        return Ok(table.clone());
    }

    let mut rows: Vec<usize> = (0..table.row_count()).collect();

    for condition in conditions {
        rows = narrow(table, &rows, condition)?;
    }

    Ok(table.gather_rows(&rows))
}

/// Keep the rows matching one condition, dispatching on the column type
fn narrow(
    table: &Table,
    rows: &[usize],
    condition: &FilterCondition,
) -> Result<Vec<usize>, QueryError> {
    let column = table
        .column(&condition.column)
        .ok_or_else(|| QueryError::UnknownColumn(condition.column.clone()))?;

    match &column.data {
        ColumnData::Integer(values) => {
            let target: i64 = condition.value.parse().map_err(|_| {
                QueryError::InvalidValue {
                    column: condition.column.clone(),
                    value: condition.value.clone(),
                }
            })?;

            Ok(rows
                .iter()
                .copied()
                .filter(|&i| compare(&values[i], &target, condition.op))
                .collect())
        }
        ColumnData::Float(values) => {
            let target: f64 = condition.value.parse().map_err(|_| {
                QueryError::InvalidValue {
                    column: condition.column.clone(),
                    value: condition.value.clone(),
                }
            })?;

            Ok(rows
                .iter()
                .copied()
                .filter(|&i| compare(&values[i], &target, condition.op))
                .collect())
        }
        ColumnData::Text(values) => {
            // Only equality is defined on text columns
            if condition.op.is_ordering() {
                return Err(QueryError::UnsupportedOperator {
                    column: condition.column.clone(),
                    operator: condition.op.to_string(),
                });
            }

            Ok(rows
                .iter()
                .copied()
                .filter(|&i| match condition.op {
                    FilterOp::Eq => values[i] == condition.value,
                    FilterOp::Ne => values[i] != condition.value,
                    _ => false,
                })
                .collect())
        }
    }
}

/// Evaluate one comparison between a stored value and the coerced target
fn compare<T: PartialOrd>(value: &T, target: &T, op: FilterOp) -> bool {
    match op {
        FilterOp::Eq => value == target,
        FilterOp::Ne => value != target,
        FilterOp::Gt => value > target,
        FilterOp::Ge => value >= target,
        FilterOp::Lt => value < target,
        FilterOp::Le => value <= target,
    }
}
