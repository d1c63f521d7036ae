//! Grouped sales aggregates.
//!
//! Groups are returned in key order: months in calendar order, products
//! lexicographically. Month groupings are zero-filled so every month is
//! present.

use ordered_float::OrderedFloat;
use sales_core::{
    Error, Month, MonthProductQuantity, MonthProductSales, MonthlySales, ProductSales, Result,
    SalesRecord,
};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

/// Sum a measure per key. Keys come back in ascending order.
pub fn group_sum<'a, K, F, M>(records: &'a [SalesRecord], key: F, measure: M) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&'a SalesRecord) -> K,
    M: Fn(&SalesRecord) -> f64,
{
    let mut groups = BTreeMap::new();
    for record in records {
        *groups.entry(key(record)).or_insert(0.0) += measure(record);
    }
    groups
}

/// Total sales per month, all 12 months in calendar order.
pub fn sales_by_month(records: &[SalesRecord]) -> Vec<MonthlySales> {
    let mut totals = [0.0; 12];
    for record in records {
        totals[record.month.index()] += record.sales();
    }

    Month::ALL
        .iter()
        .map(|&month| MonthlySales {
            month,
            sales: totals[month.index()],
        })
        .collect()
}

/// Total sales per product, products in key order.
pub fn sales_by_product(records: &[SalesRecord]) -> Vec<ProductSales> {
    group_sum(records, |r| r.product.clone(), SalesRecord::sales)
        .into_iter()
        .map(|(product, sales)| ProductSales { product, sales })
        .collect()
}

/// The `n` best-selling products, highest first.
///
/// Equal totals keep product key order.
pub fn top_products_by_sales(records: &[SalesRecord], n: usize) -> Vec<ProductSales> {
    let mut products = sales_by_product(records);
    products.sort_by_key(|p| Reverse(OrderedFloat(p.sales)));
    products.truncate(n);
    products
}

/// Products present in the records, in key order, optionally narrowed
/// to a selection.
fn product_universe(records: &[SalesRecord], selection: Option<&[String]>) -> Vec<String> {
    let all: BTreeSet<&str> = records.iter().map(|r| r.product.as_str()).collect();
    all.into_iter()
        .filter(|p| selection.map_or(true, |sel| sel.iter().any(|s| s == p)))
        .map(str::to_string)
        .collect()
}

/// A measure that can be summed into a grid cell.
trait CellValue: Copy + Default {
    /// `None` when the sum does not fit.
    fn accumulate(self, rhs: Self) -> Option<Self>;
}

impl CellValue for f64 {
    fn accumulate(self, rhs: Self) -> Option<Self> {
        Some(self + rhs)
    }
}

impl CellValue for i64 {
    fn accumulate(self, rhs: Self) -> Option<Self> {
        self.checked_add(rhs)
    }
}

/// Month-major cross product of months and products, zero-filled.
fn month_product_grid<T, M>(
    records: &[SalesRecord],
    selection: Option<&[String]>,
    measure: M,
) -> Result<Vec<(Month, String, T)>>
where
    T: CellValue,
    M: Fn(&SalesRecord) -> T,
{
    let products = product_universe(records, selection);

    let mut cells: BTreeMap<(Month, &str), T> = BTreeMap::new();
    for record in records {
        let cell = cells.entry((record.month, record.product.as_str())).or_default();
        *cell = cell.accumulate(measure(record)).ok_or_else(|| {
            Error::data(format!("{} total for {} overflows", record.product, record.month))
        })?;
    }

    Ok(Month::ALL
        .iter()
        .flat_map(|&month| products.iter().map(move |product| (month, product)))
        .map(|(month, product)| {
            let value = cells.get(&(month, product.as_str())).copied().unwrap_or_default();
            (month, product.clone(), value)
        })
        .collect())
}

/// Sales per (month, product), every month for every product.
///
/// With a selection, only selected products that appear in the records
/// are included.
pub fn sales_by_month_product(
    records: &[SalesRecord],
    selection: Option<&[String]>,
) -> Result<Vec<MonthProductSales>> {
    Ok(month_product_grid(records, selection, SalesRecord::sales)?
        .into_iter()
        .map(|(month, product, sales)| MonthProductSales { month, product, sales })
        .collect())
}

/// Units sold per (month, product), every month for every product.
///
/// Fails if a cell total does not fit in an `i64`.
pub fn quantity_by_month_product(
    records: &[SalesRecord],
    selection: Option<&[String]>,
) -> Result<Vec<MonthProductQuantity>> {
    Ok(month_product_grid(records, selection, SalesRecord::quantity)?
        .into_iter()
        .map(|(month, product, quantity)| MonthProductQuantity {
            month,
            product,
            quantity,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<SalesRecord> {
        vec![
            SalesRecord::new("Wipes", Month::March, 120.0),
            SalesRecord::new("Baby Oil", Month::January, 100.0),
            SalesRecord::new("Diapers", Month::January, 160.0),
            SalesRecord::new("Baby Oil", Month::March, 50.0),
        ]
    }

    #[test]
    fn test_sales_by_month_zero_filled() {
        let months = sales_by_month(&records());

        assert_eq!(months.len(), 12);
        for (i, row) in months.iter().enumerate() {
            assert_eq!(row.month, Month::ALL[i]);
        }
        assert!((months[0].sales - 260.0).abs() < 1e-10);
        assert_eq!(months[1].sales, 0.0);
        assert!((months[2].sales - 170.0).abs() < 1e-10);
        assert_eq!(months[11].sales, 0.0);
    }

    #[test]
    fn test_sales_by_month_empty() {
        let months = sales_by_month(&[]);
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.sales == 0.0));
    }

    #[test]
    fn test_sales_by_product_key_order() {
        let products = sales_by_product(&records());
        let names: Vec<&str> = products.iter().map(|p| p.product.as_str()).collect();
        assert_eq!(names, vec!["Baby Oil", "Diapers", "Wipes"]);
        assert!((products[0].sales - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_sales_count_as_zero() {
        let mut rows = records();
        rows[0].sales_amount = None;
        let products = sales_by_product(&rows);
        assert_eq!(products[2].product, "Wipes");
        assert_eq!(products[2].sales, 0.0);
    }

    #[test]
    fn test_top_products() {
        let top = top_products_by_sales(&records(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product, "Diapers");
        assert_eq!(top[1].product, "Baby Oil");
    }

    #[test]
    fn test_top_products_ties_keep_key_order() {
        let rows = vec![
            SalesRecord::new("Zinc", Month::May, 10.0),
            SalesRecord::new("Apple", Month::May, 10.0),
        ];
        let top = top_products_by_sales(&rows, 5);
        assert_eq!(top[0].product, "Apple");
        assert_eq!(top[1].product, "Zinc");
    }

    #[test]
    fn test_month_product_grid() {
        let grid = sales_by_month_product(&records(), None).unwrap();

        // 12 months x 3 products
        assert_eq!(grid.len(), 36);
        assert_eq!(grid[0].month, Month::January);
        assert_eq!(grid[0].product, "Baby Oil");
        assert!((grid[0].sales - 100.0).abs() < 1e-10);
        // February is zero-filled
        assert_eq!(grid[3].month, Month::February);
        assert_eq!(grid[3].sales, 0.0);
    }

    #[test]
    fn test_month_product_selection() {
        let selection = vec!["Wipes".to_string(), "Unknown".to_string()];
        let grid = sales_by_month_product(&records(), Some(selection.as_slice())).unwrap();

        assert_eq!(grid.len(), 12);
        assert!(grid.iter().all(|r| r.product == "Wipes"));
        assert!((grid[2].sales - 120.0).abs() < 1e-10);
    }

    #[test]
    fn test_quantity_grid() {
        let mut rows = records();
        rows[1].quantity_sold = Some(4);
        rows[3].quantity_sold = Some(2);
        let selection = vec!["Baby Oil".to_string()];
        let grid = quantity_by_month_product(&rows, Some(selection.as_slice())).unwrap();

        assert_eq!(grid.len(), 12);
        assert_eq!(grid[0].quantity, 4);
        assert_eq!(grid[2].quantity, 2);
        assert_eq!(grid[5].quantity, 0);
    }

    #[test]
    fn test_quantity_grid_overflow_is_error() {
        let mut rows = records();
        rows[1].quantity_sold = Some(i64::MAX);
        rows[3].quantity_sold = Some(i64::MAX);
        rows[3].month = Month::January;

        let result = quantity_by_month_product(&rows, None);
        assert!(matches!(result, Err(Error::Data(_))));
    }

    #[test]
    fn test_group_sum_custom_key() {
        let by_quarter = group_sum(&records(), |r| r.month.index() / 3, SalesRecord::sales);
        assert_eq!(by_quarter.len(), 1);
        assert!((by_quarter[&0] - 430.0).abs() < 1e-10);
    }
}
