//! Column-name normalization.
//!
//! Sheet headers are matched after trimming, replacing spaces with
//! underscores and uppercasing, so "Qty Sold " and "QTY_SOLD" agree.

use sales_core::{Error, Result};

pub const PRODUCT: &str = "PRODUCT";
pub const MONTH: &str = "MONTH";
pub const PRICE: &str = "PRICE_(GHS)";
pub const QTY_SOLD: &str = "QTY_SOLD";
pub const SALES: &str = "SALES";
pub const TOTAL_STOCK: &str = "TOTAL_STOCK";
pub const ACTUAL_STOCK: &str = "ACTUAL_STOCK";

/// Columns every sheet must provide, in checking order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    PRODUCT,
    MONTH,
    PRICE,
    QTY_SOLD,
    SALES,
    TOTAL_STOCK,
    ACTUAL_STOCK,
];

/// Normalize a header: trim, spaces to underscores, uppercase.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_").to_uppercase()
}

/// Positions of the required columns within a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub product: usize,
    pub month: usize,
    pub price: usize,
    pub quantity_sold: usize,
    pub sales: usize,
    pub total_stock: usize,
    pub actual_stock: usize,
}

impl ColumnIndex {
    /// Locate the required columns among normalized headers.
    ///
    /// Fails on the first required column that is absent.
    pub fn resolve(normalized: &[String]) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            normalized
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::missing_column(name))
        };

        Ok(Self {
            product: find(PRODUCT)?,
            month: find(MONTH)?,
            price: find(PRICE)?,
            quantity_sold: find(QTY_SOLD)?,
            sales: find(SALES)?,
            total_stock: find(TOTAL_STOCK)?,
            actual_stock: find(ACTUAL_STOCK)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| normalize_column_name(n)).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_column_name("  qty sold "), "QTY_SOLD");
        assert_eq!(normalize_column_name("Price (GHS)"), "PRICE_(GHS)");
        assert_eq!(normalize_column_name("STOCK LEFT(EXCEL)"), "STOCK_LEFT(EXCEL)");
        assert_eq!(normalize_column_name("Total  Stock"), "TOTAL__STOCK");
    }

    #[test]
    fn test_resolve_any_order() {
        let cols = headers(&[
            "Sales", "Product", "Month", "Price (GHS)", "Qty Sold", "Actual Stock", "Total Stock",
        ]);
        let index = ColumnIndex::resolve(&cols).unwrap();
        assert_eq!(index.sales, 0);
        assert_eq!(index.product, 1);
        assert_eq!(index.total_stock, 6);
    }

    #[test]
    fn test_missing_column() {
        let cols = headers(&[
            "Product",
            "Month",
            "Price (GHS)",
            "Qty Sold",
            "Sales",
            "Total Stock",
        ]);
        match ColumnIndex::resolve(&cols) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, ACTUAL_STOCK),
            other => panic!("expected missing column, got {:?}", other),
        }
    }
}
