//! Aggregation and classification for the sales dashboard.
//!
//! This crate handles:
//! - Headline metrics (totals, top product and month)
//! - Grouped aggregates by month, product and month x product
//! - Equal-width price buckets and the price trend line
//! - Per-product stock totals
//! - ABC (Pareto) classification

pub mod grouping;
pub mod summary;
pub mod price_buckets;
pub mod stock;
pub mod abc;
pub mod engine;

pub use summary::{calculate_summary, SummaryMetrics};
pub use price_buckets::{price_trend_line, PriceBucketer};
pub use stock::stock_by_product;
pub use abc::{AbcClassifier, AbcReport};
pub use engine::{AbcSection, DashboardEngine, DashboardFilters, DashboardView};
