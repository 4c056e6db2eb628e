//! Numeric CSV tables (the smoother's input and output).
//!
//! Every column is read as `f64`:
//! - empty cells and `nan` (any case) become `NaN`
//! - short rows are padded with `NaN`
//! - non-numeric cells and rows with extra fields are errors (exit code 2)
//! - repeated header names get `.1`, `.2`, ... suffixes, as pandas does

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::StringRecord;

use crate::domain::RawTable;
use crate::error::AppError;

/// Read a numeric CSV file with a header row.
pub fn read_table_csv(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_table(file).map_err(|e| AppError::new(e.exit_code(), format!("{}: {}", path.display(), e.message())))
}

pub fn parse_table<R: Read>(reader: R) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();
    let headers = dedup_headers(headers);

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        push_record(&mut columns, &headers, &record, line)?;
    }

    Ok(RawTable::new(headers, columns))
}

fn push_record(columns: &mut [Vec<f64>], headers: &[String], record: &StringRecord, line: usize) -> Result<(), AppError> {
    if record.len() > headers.len() {
        return Err(AppError::new(
            2,
            format!("line {line} has {} fields, header has {}", record.len(), headers.len()),
        ));
    }
    for (col, header) in headers.iter().enumerate() {
        let value = match record.get(col) {
            Some(cell) => parse_cell(cell).ok_or_else(|| {
                AppError::new(2, format!("non-numeric value '{cell}' in column `{header}` on line {line}"))
            })?,
            None => f64::NAN,
        };
        columns[col].push(value);
    }
    Ok(())
}

/// Rename repeats to `name.1`, `name.2`, ... skipping suffixes already taken.
fn dedup_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let mut unique = name.clone();
        let mut k = 1;
        while seen.contains(&unique) {
            unique = format!("{name}.{k}");
            k += 1;
        }
        seen.insert(unique.clone());
        out.push(unique);
    }
    out
}

/// Parse one numeric cell; `None` means it is not a number.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Write a table as CSV; `NaN` is written as an empty cell.
pub fn write_table_csv(path: &Path, table: &RawTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_table(file, table)
}

pub fn write_table<W: Write>(writer: W, table: &RawTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    let write_err = |e: csv::Error| AppError::new(2, format!("Failed to write CSV: {e}"));

    writer.write_record(&table.headers).map_err(write_err)?;
    for row in 0..table.n_rows() {
        let record = table.columns.iter().map(|col| format_cell(col[row]));
        writer.write_record(record).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() { String::new() } else { value.to_string() }
}
