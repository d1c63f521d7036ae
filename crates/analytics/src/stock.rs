//! Per-product stock totals.

use sales_core::{Error, Result, SalesRecord, StockRow};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Stock and sales totals per product, largest total stock first.
///
/// Equal stock totals keep product key order. Missing cells count as zero.
/// Fails if a product's stock total does not fit in an `i64`.
pub fn stock_by_product(records: &[SalesRecord]) -> Result<Vec<StockRow>> {
    let mut rows: BTreeMap<&str, StockRow> = BTreeMap::new();

    for record in records {
        let row = rows.entry(record.product.as_str()).or_insert_with(|| StockRow {
            product: record.product.clone(),
            total_stock: 0,
            actual_stock: 0,
            sales: 0.0,
        });
        let overflow = || Error::data(format!("stock total for {} overflows", record.product));
        row.total_stock = row
            .total_stock
            .checked_add(record.total_stock.unwrap_or(0))
            .ok_or_else(overflow)?;
        row.actual_stock = row
            .actual_stock
            .checked_add(record.actual_stock.unwrap_or(0))
            .ok_or_else(overflow)?;
        row.sales += record.sales();
    }

    let mut rows: Vec<StockRow> = rows.into_values().collect();
    rows.sort_by_key(|r| Reverse(r.total_stock));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::Month;

    fn stocked(product: &str, total: Option<i64>, actual: Option<i64>, sales: f64) -> SalesRecord {
        SalesRecord {
            total_stock: total,
            actual_stock: actual,
            ..SalesRecord::new(product, Month::January, sales)
        }
    }

    #[test]
    fn test_stock_totals() {
        let records = vec![
            stocked("Soap", Some(10), Some(8), 5.0),
            stocked("Oil", Some(40), Some(35), 12.0),
            stocked("Soap", Some(15), None, 2.5),
        ];

        let rows = stock_by_product(&records).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product, "Oil");
        assert_eq!(rows[0].shortage(), 5);
        assert_eq!(rows[1].product, "Soap");
        assert_eq!(rows[1].total_stock, 25);
        assert_eq!(rows[1].actual_stock, 8);
        assert!((rows[1].sales - 7.5).abs() < 1e-10);
    }

    #[test]
    fn test_equal_stock_keeps_key_order() {
        let records = vec![
            stocked("Zinc", Some(5), Some(5), 1.0),
            stocked("Apple", Some(5), Some(5), 1.0),
        ];
        let rows = stock_by_product(&records).unwrap();
        assert_eq!(rows[0].product, "Apple");
        assert_eq!(rows[1].product, "Zinc");
    }

    #[test]
    fn test_stock_overflow_is_error() {
        let records = vec![
            stocked("Soap", Some(i64::MAX), Some(1), 1.0),
            stocked("Soap", Some(1), Some(1), 1.0),
        ];
        assert!(matches!(stock_by_product(&records), Err(Error::Data(_))));
    }
}
