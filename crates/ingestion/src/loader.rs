//! CSV sales sheet loader.
//!
//! Parses an uploaded sheet into a `SalesDataset`. Headers are normalized
//! before the required columns are located; empty cells are missing values.

use crate::columns::{normalize_column_name, ColumnIndex};
use sales_core::{Error, Month, Result, SalesDataset, SalesRecord};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Statistics about a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Data rows parsed.
    pub rows: usize,
    /// Numeric cells left empty.
    pub missing_cells: usize,
    /// Distinct products seen.
    pub distinct_products: usize,
}

/// Load a sales sheet from a CSV reader.
///
/// The reader is consumed to the end before the dataset is returned.
pub fn load_sales_csv<R: Read>(reader: R) -> Result<SalesDataset> {
    load_sales_csv_with_stats(reader).map(|(dataset, _)| dataset)
}

/// Load a sales sheet and report load statistics.
pub fn load_sales_csv_with_stats<R: Read>(reader: R) -> Result<(SalesDataset, LoadStats)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| normalize_column_name(h.trim_start_matches('\u{FEFF}')))
        .collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(Error::EmptyInput);
    }
    let index = ColumnIndex::resolve(&columns)?;

    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for (row_num, result) in csv_reader.records().enumerate() {
        // Header is line 1.
        let line = row_num + 2;
        let row = result?;

        let cell = |i: usize| row.get(i).map(str::trim).filter(|v| !v.is_empty());

        let product = cell(index.product)
            .ok_or_else(|| Error::data(format!("line {}: PRODUCT is empty", line)))?
            .to_string();
        let month: Month = cell(index.month)
            .ok_or_else(|| Error::data(format!("line {}: MONTH is empty", line)))?
            .parse()
            .map_err(|e| Error::data(format!("line {}: {}", line, e)))?;

        let record = SalesRecord {
            product,
            month,
            price: parse_decimal(cell(index.price), "PRICE_(GHS)", line)?,
            quantity_sold: parse_integer(cell(index.quantity_sold), "QTY_SOLD", line)?,
            sales_amount: parse_decimal(cell(index.sales), "SALES", line)?,
            total_stock: parse_integer(cell(index.total_stock), "TOTAL_STOCK", line)?,
            actual_stock: parse_integer(cell(index.actual_stock), "ACTUAL_STOCK", line)?,
        };

        stats.missing_cells += [
            record.price.is_none(),
            record.quantity_sold.is_none(),
            record.sales_amount.is_none(),
            record.total_stock.is_none(),
            record.actual_stock.is_none(),
        ]
        .iter()
        .filter(|&&missing| missing)
        .count();

        records.push(record);
    }

    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let dataset = SalesDataset::new(columns, records);
    stats.rows = dataset.len();
    stats.distinct_products = dataset.products_in_sheet_order().len();

    debug!(
        rows = stats.rows,
        missing_cells = stats.missing_cells,
        products = stats.distinct_products,
        "Parsed sales sheet"
    );

    Ok((dataset, stats))
}

/// Load a sales sheet from a file path.
///
/// The file handle is closed before this returns.
pub fn load_sales_file(path: impl AsRef<Path>) -> Result<SalesDataset> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    info!(path = %path.display(), bytes = bytes.len(), "Loading sales sheet");
    load_sales_csv(bytes.as_slice())
}

fn parse_decimal(value: Option<&str>, column: &str, line: usize) -> Result<Option<f64>> {
    value
        .map(|v| {
            v.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| {
                    Error::data(format!("line {}: {} is not a number: '{}'", line, column, v))
                })
        })
        .transpose()
}

/// Integers written with a zero fraction (e.g. "12.0") are accepted as
/// long as they fit in an `i64`.
fn parse_integer(value: Option<&str>, column: &str, line: usize) -> Result<Option<i64>> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    let range = (i64::MIN as f64)..(i64::MAX as f64);
    value
        .map(|v| {
            v.parse::<i64>().or_else(|_| match v.parse::<f64>() {
                Ok(f) if f.fract() == 0.0 && range.contains(&f) => Ok(f as i64),
                _ => Err(Error::data(format!(
                    "line {}: {} is not a whole number: '{}'",
                    line, column, v
                ))),
            })
        })
        .transpose()
}
