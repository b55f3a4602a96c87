// Sort engine: stable multi-key ordering
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use crate::data::{Column, Table};
use super::{QueryError, SortKey};

/// Sort a table by the given keys.
///
/// A single stable sort compares rows by the first key, breaking ties
/// with each following key; every key carries its own direction. Rows
/// equal on all keys keep their relative input order. An empty key list
/// is a no-op and returns the table unchanged.
pub fn apply_sort(table: &Table, keys: &[SortKey]) -> Result<Table, QueryError> {
    if keys.is_empty() {
        return Ok(table.clone());
    }

    // Resolve every key up front so an unknown column rejects the
    // request before any reordering happens
    let columns: Vec<&Column> = keys
        .iter()
        .map(|key| {
            table
                .column(&key.column)
                .ok_or_else(|| QueryError::UnknownColumn(key.column.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows: Vec<usize> = (0..table.row_count()).collect();

    rows.sort_by(|&a, &b| {
        for (key, column) in keys.iter().zip(&columns) {
            let mut ordering = column.data.compare_rows(a, b);

            if !key.ascending {
                ordering = ordering.reverse();
            }

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    });

    Ok(table.gather_rows(&rows))
}
