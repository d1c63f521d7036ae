//! ABC (Pareto) classification.
//!
//! Ranks products by total sales and assigns categories from each
//! product's cumulative share of sales.

use crate::grouping::sales_by_product;
use ordered_float::OrderedFloat;
use sales_core::config::AbcConfig;
use sales_core::{AbcCategory, AbcRow, CategorySummary, Error, ProductSales, Result, SalesRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Result of one classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcReport {
    /// Products ranked by sales, highest first.
    pub rows: Vec<AbcRow>,
    /// Roll-up of the categories present, in A, B, C order.
    pub summary: Vec<CategorySummary>,
    /// Best-selling category C products.
    pub top_category_c: Vec<AbcRow>,
    /// Sales total the percentages are relative to.
    pub total_sales: f64,
}

impl AbcReport {
    /// Rows of one category, in rank order.
    pub fn category(&self, category: AbcCategory) -> impl Iterator<Item = &AbcRow> {
        self.rows.iter().filter(move |r| r.category == category)
    }
}

/// ABC classifier.
pub struct AbcClassifier {
    config: AbcConfig,
}

impl AbcClassifier {
    /// Create a new classifier.
    pub fn new(config: AbcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AbcConfig {
        &self.config
    }

    /// Classify the products in `records`.
    ///
    /// Percentages are relative to these records only, so a filtered
    /// subset yields a self-consistent table.
    pub fn classify(&self, records: &[SalesRecord]) -> Result<AbcReport> {
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.classify_totals(sales_by_product(records))
    }

    /// Classify pre-aggregated product totals.
    ///
    /// Equal totals keep their input order.
    pub fn classify_totals(&self, mut totals: Vec<ProductSales>) -> Result<AbcReport> {
        if totals.is_empty() {
            return Err(Error::EmptyInput);
        }

        let total_sales: f64 = totals.iter().map(|p| p.sales).sum();
        if total_sales == 0.0 {
            return Err(Error::DegenerateTotals);
        }

        // Stable: ties stay in input order.
        totals.sort_by_key(|p| Reverse(OrderedFloat(p.sales)));

        let mut cumulative_sales = 0.0;
        let rows: Vec<AbcRow> = totals
            .into_iter()
            .map(|p| {
                cumulative_sales += p.sales;
                let cumulative_percentage = 100.0 * cumulative_sales / total_sales;
                AbcRow {
                    category: AbcCategory::from_cumulative(
                        cumulative_percentage,
                        self.config.a_threshold,
                        self.config.b_threshold,
                    ),
                    product: p.product,
                    sales: p.sales,
                    cumulative_sales,
                    cumulative_percentage,
                }
            })
            .collect();

        let summary = summarize_categories(&rows, total_sales);
        let top_category_c = rows
            .iter()
            .filter(|r| r.category == AbcCategory::C)
            .take(self.config.top_category_c)
            .cloned()
            .collect();

        Ok(AbcReport {
            rows,
            summary,
            top_category_c,
            total_sales,
        })
    }
}

/// Sales and share per category, for categories that occur.
fn summarize_categories(rows: &[AbcRow], total_sales: f64) -> Vec<CategorySummary> {
    [AbcCategory::A, AbcCategory::B, AbcCategory::C]
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&AbcRow> = rows.iter().filter(|r| r.category == category).collect();
            if members.is_empty() {
                return None;
            }
            let sales: f64 = members.iter().map(|r| r.sales).sum();
            Some(CategorySummary {
                category,
                sales,
                percentage: 100.0 * sales / total_sales,
                product_count: members.len(),
            })
        })
        .collect()
}
