//! Dashboard engine.
//!
//! Combines all aggregation components into a single pure render step:
//! each user interaction (upload or filter change) maps a dataset and a
//! set of filters to a complete view.

use crate::{
    abc::{AbcClassifier, AbcReport},
    grouping::{
        quantity_by_month_product, sales_by_month, sales_by_month_product, sales_by_product,
        top_products_by_sales,
    },
    price_buckets::{price_trend_line, PriceBucketer},
    stock::stock_by_product,
    summary::{calculate_summary, SummaryMetrics},
};
use sales_core::{
    Config, Error, Month, MonthProductQuantity, MonthProductSales, MonthlySales, PriceBucket,
    ProductSales, Result, SalesDataset, StockRow, TrendLine,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// User selections driving the filtered sections.
///
/// `None` means the default selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardFilters {
    /// Products shown in the monthly sales trend.
    pub trend_products: Option<Vec<String>>,
    /// Products shown in the monthly quantity comparison.
    pub performance_products: Option<Vec<String>>,
    /// Months included in the ABC classification.
    pub abc_months: Option<Vec<Month>>,
}

/// ABC section outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AbcSection {
    Ready(AbcReport),
    /// The section could not be computed for the selected months.
    Skipped { reason: String },
}

impl AbcSection {
    pub fn report(&self) -> Option<&AbcReport> {
        match self {
            AbcSection::Ready(report) => Some(report),
            AbcSection::Skipped { .. } => None,
        }
    }
}

/// Everything the dashboard displays for one dataset and filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub summary: SummaryMetrics,
    pub sales_by_month: Vec<MonthlySales>,
    pub trend_products: Vec<String>,
    pub monthly_trends: Vec<MonthProductSales>,
    pub sales_by_product: Vec<ProductSales>,
    pub top_products: Vec<ProductSales>,
    pub stock: Vec<StockRow>,
    pub price_buckets: Vec<PriceBucket>,
    pub price_trend: Option<TrendLine>,
    pub performance_products: Vec<String>,
    pub monthly_performance: Vec<MonthProductQuantity>,
    pub abc_months: Vec<Month>,
    pub abc: AbcSection,
}

impl DashboardView {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Dashboard engine.
pub struct DashboardEngine {
    config: Config,
    bucketer: PriceBucketer,
    classifier: AbcClassifier,
}

impl DashboardEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bucketer: PriceBucketer::from_config(&config.price_buckets),
            classifier: AbcClassifier::new(config.abc.clone()),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the full view.
    ///
    /// Fails only when the dataset itself is unusable. An ABC subset with
    /// no records or zero sales is reported as a skipped section.
    pub fn render(
        &self,
        dataset: &SalesDataset,
        filters: &DashboardFilters,
    ) -> Result<DashboardView> {
        if dataset.is_empty() {
            return Err(Error::EmptyInput);
        }
        let records = dataset.records.as_slice();
        let default_count = self.config.charts.default_selected_products;

        let summary = calculate_summary(records)?;
        let sales_by_product = sales_by_product(records);

        let trend_products = filters.trend_products.clone().unwrap_or_else(|| {
            sales_by_product
                .iter()
                .take(default_count)
                .map(|p| p.product.clone())
                .collect()
        });
        let performance_products = filters.performance_products.clone().unwrap_or_else(|| {
            dataset
                .products_in_sheet_order()
                .into_iter()
                .take(default_count)
                .collect()
        });

        let monthly_trends = sales_by_month_product(records, Some(trend_products.as_slice()))?;
        let monthly_performance =
            quantity_by_month_product(records, Some(performance_products.as_slice()))?;
        let stock = stock_by_product(records)?;

        let price_buckets = self.bucketer.bucket(records);
        let price_trend = price_trend_line(&price_buckets);

        let (abc_months, abc) = self.abc_section(dataset, filters.abc_months.as_deref())?;

        debug!(
            records = dataset.len(),
            products = summary.distinct_product_count,
            buckets = price_buckets.len(),
            "Rendered dashboard"
        );

        Ok(DashboardView {
            sales_by_month: sales_by_month(records),
            top_products: top_products_by_sales(
                records,
                self.config.charts.top_contribution_products,
            ),
            summary,
            monthly_trends,
            stock,
            monthly_performance,
            trend_products,
            sales_by_product,
            price_buckets,
            price_trend,
            performance_products,
            abc_months,
            abc,
        })
    }

    /// Classify the records of the selected months.
    fn abc_section(
        &self,
        dataset: &SalesDataset,
        months: Option<&[Month]>,
    ) -> Result<(Vec<Month>, AbcSection)> {
        let months: Vec<Month> = match months {
            Some(selected) => {
                let unique: BTreeSet<Month> = selected.iter().copied().collect();
                unique.into_iter().collect()
            }
            None => dataset.months_present(),
        };

        let subset = dataset.filter_months(&months);
        let section = match self.classifier.classify(&subset) {
            Ok(report) => AbcSection::Ready(report),
            Err(e) if e.is_section_local() => {
                warn!(error = %e, months = months.len(), "ABC classification skipped");
                AbcSection::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => return Err(e),
        };

        Ok((months, section))
    }
}
