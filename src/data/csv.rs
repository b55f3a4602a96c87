// CSV parsing, column introspection and serialization
// Author: Gabriel Demetrios Lafis

use super::{Column, ColumnData, ColumnInfo, DataError, Table};

/// Parse CSV bytes into a table, inferring one scalar type per column.
///
/// The first record is the header row. A column is `integer` when every
/// value parses as a base-10 integer, `float` when every value parses as
/// a decimal number, and `text` otherwise. An empty input (zero bytes or
/// header only) yields a table with zero rows rather than an error.
pub fn parse_table(bytes: &[u8]) -> Result<Table, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::ParseError(e.to_string()))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    for (i, name) in headers.iter().enumerate() {
        if headers[..i].iter().any(|other| other == name) {
            return Err(DataError::DuplicateColumn(name.clone()));
        }
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for result in reader.records() {
        let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        if record.len() != headers.len() {
            return Err(DataError::ParseError(format!(
                "Expected {} fields, found {}",
                headers.len(),
                record.len()
            )));
        }

        for (i, field) in record.iter().enumerate() {
            cells[i].push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(&name, infer_column(values)))
        .collect();

    Table::new(columns)
}

/// Extract the ordered column descriptors from CSV bytes.
///
/// Inference needs at least one data row, so an empty file (zero bytes
/// or header only) reports no columns.
pub fn introspect(bytes: &[u8]) -> Result<Vec<ColumnInfo>, DataError> {
    let table = parse_table(bytes)?;

    if table.row_count() == 0 {
        return Ok(Vec::new());
    }

    Ok(table.infos())
}

/// Serialize a table back to CSV bytes (UTF-8, comma-delimited, header row)
pub fn write_table(table: &Table) -> Result<Vec<u8>, DataError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    let headers: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
    writer
        .write_record(&headers)
        .map_err(|e| DataError::Other(e.to_string()))?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.data.render(row))
            .collect();

        writer
            .write_record(&record)
            .map_err(|e| DataError::Other(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DataError::Other(e.to_string()))
}

/// Pick the narrowest scalar type that fits every observed value
fn infer_column(values: Vec<String>) -> ColumnData {
    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        let parsed = values
            .iter()
            .map(|v| v.parse::<i64>().unwrap_or_default())
            .collect();
        return ColumnData::Integer(parsed);
    }

    if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        let parsed = values
            .iter()
            .map(|v| v.parse::<f64>().unwrap_or_default())
            .collect();
        return ColumnData::Float(parsed);
    }

    ColumnData::Text(values)
}
