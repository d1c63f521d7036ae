//! Data ingestion and normalization for the sales dashboard.
//!
//! This crate handles:
//! - Column-name normalization and required-column checks
//! - CSV parsing into validated sales records
//! - Content-hash memoization of loaded datasets

pub mod columns;
pub mod loader;
pub mod cache;

pub use columns::{normalize_column_name, ColumnIndex, REQUIRED_COLUMNS};
pub use loader::{load_sales_csv, load_sales_csv_with_stats, load_sales_file, LoadStats};
pub use cache::{content_hash, DatasetCache};
