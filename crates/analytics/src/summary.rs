//! Headline sales metrics.
//!
//! Computes the key figures shown above the charts: totals, product count,
//! and the best product and month.

use crate::grouping::{group_sum, sales_by_month};
use sales_core::{Error, Month, Result, SalesRecord};
use serde::{Deserialize, Serialize};

/// Headline metrics for a set of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Sum of sales amounts.
    pub total_sales: f64,
    /// Sum of units sold.
    pub total_units: i64,
    /// Number of distinct products.
    pub distinct_product_count: usize,
    /// Product with the highest total sales.
    pub top_product: String,
    /// Total sales of the top product.
    pub top_product_sales: f64,
    /// Month with the highest total sales.
    pub top_month: Month,
    /// Total sales of the top month.
    pub top_month_sales: f64,
}

/// Calculate headline metrics.
///
/// Ties for top product go to the first product in key order; ties for
/// top month go to the earliest month present in the records.
pub fn calculate_summary(records: &[SalesRecord]) -> Result<SummaryMetrics> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let total_sales: f64 = records.iter().map(SalesRecord::sales).sum();
    let total_units = records
        .iter()
        .map(SalesRecord::quantity)
        .try_fold(0i64, i64::checked_add)
        .ok_or_else(|| Error::data("total units sold overflows"))?;

    let by_product = group_sum(records, |r| r.product.as_str(), SalesRecord::sales);
    let distinct_product_count = by_product.len();
    let (top_product, top_product_sales) = first_max(by_product.into_iter())
        .map(|(p, s)| (p.to_string(), s))
        .ok_or(Error::EmptyInput)?;

    let present = |month: Month| records.iter().any(|r| r.month == month);
    let (top_month, top_month_sales) = first_max(
        sales_by_month(records)
            .into_iter()
            .filter(|m| present(m.month))
            .map(|m| (m.month, m.sales)),
    )
    .ok_or(Error::EmptyInput)?;

    Ok(SummaryMetrics {
        total_sales,
        total_units,
        distinct_product_count,
        top_product,
        top_product_sales,
        top_month,
        top_month_sales,
    })
}

/// First entry holding the maximum value.
fn first_max<K>(entries: impl Iterator<Item = (K, f64)>) -> Option<(K, f64)> {
    entries.fold(None, |best, (key, value)| match best {
        Some((_, best_value)) if value <= best_value => best,
        _ => Some((key, value)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(product: &str, month: Month, sales: f64, qty: i64) -> SalesRecord {
        SalesRecord {
            quantity_sold: Some(qty),
            ..SalesRecord::new(product, month, sales)
        }
    }

    #[test]
    fn test_basic_summary() {
        let records = vec![
            make_record("Wipes", Month::March, 120.0, 10),
            make_record("Baby Oil", Month::January, 100.0, 4),
            make_record("Diapers", Month::January, 160.0, 2),
            make_record("Baby Oil", Month::March, 50.0, 2),
        ];

        let summary = calculate_summary(&records).unwrap();

        assert!((summary.total_sales - 430.0).abs() < 1e-10);
        assert_eq!(summary.total_units, 18);
        assert_eq!(summary.distinct_product_count, 3);
        assert_eq!(summary.top_product, "Diapers");
        assert!((summary.top_product_sales - 160.0).abs() < 1e-10);
        assert_eq!(summary.top_month, Month::January);
        assert!((summary.top_month_sales - 260.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_records() {
        assert!(matches!(calculate_summary(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_ties_break_by_key_order() {
        let records = vec![
            make_record("Zinc", Month::June, 50.0, 1),
            make_record("Apple", Month::April, 50.0, 1),
        ];

        let summary = calculate_summary(&records).unwrap();

        assert_eq!(summary.top_product, "Apple");
        assert_eq!(summary.top_month, Month::April);
    }

    #[test]
    fn test_zero_sales_top_month_is_present_month() {
        let records = vec![make_record("Soap", Month::July, 0.0, 0)];
        let summary = calculate_summary(&records).unwrap();
        assert_eq!(summary.top_month, Month::July);
        assert_eq!(summary.top_product, "Soap");
    }

    #[test]
    fn test_units_overflow_is_error() {
        let records = vec![
            make_record("Soap", Month::May, 1.0, i64::MAX),
            make_record("Oil", Month::May, 1.0, 1),
        ];
        match calculate_summary(&records) {
            Err(Error::Data(msg)) => assert!(msg.contains("overflows")),
            other => panic!("expected data error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_values_skipped() {
        let mut record = make_record("Soap", Month::July, 0.0, 0);
        record.sales_amount = None;
        record.quantity_sold = None;
        let records = vec![record, make_record("Soap", Month::July, 12.5, 3)];

        let summary = calculate_summary(&records).unwrap();
        assert!((summary.total_sales - 12.5).abs() < 1e-10);
        assert_eq!(summary.total_units, 3);
    }
}
