//! Core data types for the sales dashboard.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Calendar month, ordered January to December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position in the calendar.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Month number, 1 for January.
    #[inline]
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl From<chrono::Month> for Month {
    fn from(month: chrono::Month) -> Self {
        Month::ALL[month.number_from_month() as usize - 1]
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Accepts full or abbreviated English names, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<chrono::Month>()
            .map(Month::from)
            .map_err(|_| Error::data(format!("unrecognized month '{}'", s.trim())))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single row of the uploaded sales sheet.
///
/// Numeric cells left empty in the sheet are `None` and are skipped by
/// sums and means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Product name.
    pub product: String,
    /// Month of sale.
    pub month: Month,
    /// Unit price.
    pub price: Option<f64>,
    /// Units sold.
    pub quantity_sold: Option<i64>,
    /// Sales amount.
    pub sales_amount: Option<f64>,
    /// Total stock held.
    pub total_stock: Option<i64>,
    /// Stock counted on hand.
    pub actual_stock: Option<i64>,
}

impl SalesRecord {
    /// Create a record carrying only the fields the aggregations need.
    pub fn new(product: impl Into<String>, month: Month, sales_amount: f64) -> Self {
        Self {
            product: product.into(),
            month,
            price: None,
            quantity_sold: None,
            sales_amount: Some(sales_amount),
            total_stock: None,
            actual_stock: None,
        }
    }

    /// Sales amount, zero when missing.
    #[inline]
    pub fn sales(&self) -> f64 {
        self.sales_amount.unwrap_or(0.0)
    }

    /// Units sold, zero when missing.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity_sold.unwrap_or(0)
    }
}

/// A loaded, validated sales sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesDataset {
    /// Normalized column names in sheet order.
    pub columns: Vec<String>,
    /// Records in sheet order.
    pub records: Vec<SalesRecord>,
}

impl SalesDataset {
    /// Create a dataset from records.
    pub fn new(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Products in order of first appearance.
    pub fn products_in_sheet_order(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.product.as_str()))
            .map(|r| r.product.clone())
            .collect()
    }

    /// Months present in the data, in calendar order.
    pub fn months_present(&self) -> Vec<Month> {
        let present: BTreeSet<Month> = self.records.iter().map(|r| r.month).collect();
        present.into_iter().collect()
    }

    /// Records whose month is in the given selection.
    pub fn filter_months(&self, months: &[Month]) -> Vec<SalesRecord> {
        self.records
            .iter()
            .filter(|r| months.contains(&r.month))
            .cloned()
            .collect()
    }
}

/// Total sales for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: Month,
    pub sales: f64,
}

/// Total sales for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product: String,
    pub sales: f64,
}

/// Total sales for one (month, product) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProductSales {
    pub month: Month,
    pub product: String,
    pub sales: f64,
}

/// Total units sold for one (month, product) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProductQuantity {
    pub month: Month,
    pub product: String,
    pub quantity: i64,
}

/// One equal-width price interval with the mean sales of its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    /// Lower edge (inclusive).
    pub left: f64,
    /// Upper edge (exclusive, inclusive for the last bucket).
    pub right: f64,
    /// Display label, e.g. "10.00 - 19.00".
    pub label: String,
    /// Records whose price falls in the bucket.
    pub record_count: usize,
    /// Mean sales amount, `None` if no record in the bucket has one.
    pub mean_sales: Option<f64>,
}

impl PriceBucket {
    /// Bucket midpoint.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

/// Least-squares line of mean sales against price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Evaluate the line at a price.
    #[inline]
    pub fn at(&self, price: f64) -> f64 {
        self.intercept + self.slope * price
    }
}

/// Stock totals for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub product: String,
    pub total_stock: i64,
    pub actual_stock: i64,
    pub sales: f64,
}

impl StockRow {
    /// Total minus counted stock; positive means units unaccounted for.
    #[inline]
    pub fn shortage(&self) -> i64 {
        self.total_stock.saturating_sub(self.actual_stock)
    }
}

/// ABC (Pareto) category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcCategory {
    /// Highest contribution.
    A,
    B,
    /// Lowest contribution.
    C,
}

impl AbcCategory {
    /// Categorize a cumulative percentage with inclusive upper thresholds.
    #[inline]
    pub fn from_cumulative(cumulative_percentage: f64, a_threshold: f64, b_threshold: f64) -> Self {
        if cumulative_percentage <= a_threshold {
            AbcCategory::A
        } else if cumulative_percentage <= b_threshold {
            AbcCategory::B
        } else {
            AbcCategory::C
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbcCategory::A => "A",
            AbcCategory::B => "B",
            AbcCategory::C => "C",
        }
    }
}

impl fmt::Display for AbcCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product in the ABC table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcRow {
    pub product: String,
    pub sales: f64,
    pub cumulative_sales: f64,
    /// Running share of total sales, 0-100.
    pub cumulative_percentage: f64,
    pub category: AbcCategory,
}

/// Roll-up of one ABC category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: AbcCategory,
    pub sales: f64,
    /// Share of total sales, 0-100.
    pub percentage: f64,
    pub product_count: usize,
}
