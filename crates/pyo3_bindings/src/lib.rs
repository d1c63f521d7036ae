//! PyO3 bindings for the sales dashboard engine.
//!
//! Exposes the Rust components to the Python dashboard layer:
//! - CSV loading and the content-hash dataset cache
//! - Dashboard rendering (summary, grouped aggregates, price buckets, stock)
//! - ABC classification

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

use sales_analytics::{
    AbcClassifier, AbcReport as RustAbcReport, AbcSection, DashboardEngine, DashboardFilters,
    DashboardView as RustDashboardView, SummaryMetrics as RustSummaryMetrics,
};
use sales_core::{
    config::AbcConfig, AbcRow as RustAbcRow, CategorySummary as RustCategorySummary,
    Config as RustConfig, Error as RustError, Month, PriceBucket as RustPriceBucket, ProductSales,
    SalesDataset as RustSalesDataset,
};
use sales_ingestion::DatasetCache as RustDatasetCache;

fn to_py_err(e: RustError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_months(months: Vec<String>) -> PyResult<Vec<Month>> {
    months
        .iter()
        .map(|m| m.parse::<Month>().map_err(to_py_err))
        .collect()
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// A loaded sales sheet.
#[pyclass]
#[derive(Clone)]
pub struct SalesDataset {
    inner: Arc<RustSalesDataset>,
}

#[pymethods]
impl SalesDataset {
    /// Normalized column names, in sheet order.
    #[getter]
    fn columns(&self) -> Vec<String> {
        self.inner.columns.clone()
    }

    /// Distinct products in order of first appearance.
    fn products(&self) -> Vec<String> {
        self.inner.products_in_sheet_order()
    }

    /// Months present in the sheet, in calendar order.
    fn months(&self) -> Vec<String> {
        self.inner
            .months_present()
            .into_iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "SalesDataset(records={}, columns={})",
            self.inner.len(),
            self.inner.columns.len()
        )
    }
}

impl From<Arc<RustSalesDataset>> for SalesDataset {
    fn from(inner: Arc<RustSalesDataset>) -> Self {
        SalesDataset { inner }
    }
}

/// Headline metrics.
#[pyclass]
#[derive(Clone)]
pub struct SummaryMetrics {
    #[pyo3(get)]
    pub total_sales: f64,
    #[pyo3(get)]
    pub total_units: i64,
    #[pyo3(get)]
    pub distinct_product_count: usize,
    #[pyo3(get)]
    pub top_product: String,
    #[pyo3(get)]
    pub top_product_sales: f64,
    #[pyo3(get)]
    pub top_month: String,
    #[pyo3(get)]
    pub top_month_sales: f64,
}

#[pymethods]
impl SummaryMetrics {
    fn __repr__(&self) -> String {
        format!(
            "SummaryMetrics(total_sales={:.2}, total_units={}, products={}, \
             top_product={}, top_month={})",
            self.total_sales,
            self.total_units,
            self.distinct_product_count,
            self.top_product,
            self.top_month
        )
    }
}

impl From<RustSummaryMetrics> for SummaryMetrics {
    fn from(s: RustSummaryMetrics) -> Self {
        SummaryMetrics {
            total_sales: s.total_sales,
            total_units: s.total_units,
            distinct_product_count: s.distinct_product_count,
            top_product: s.top_product,
            top_product_sales: s.top_product_sales,
            top_month: s.top_month.name().to_string(),
            top_month_sales: s.top_month_sales,
        }
    }
}

/// One equal-width price interval.
#[pyclass]
#[derive(Clone)]
pub struct PriceBucket {
    #[pyo3(get)]
    pub left: f64,
    #[pyo3(get)]
    pub right: f64,
    #[pyo3(get)]
    pub label: String,
    #[pyo3(get)]
    pub record_count: usize,
    #[pyo3(get)]
    pub mean_sales: Option<f64>,
}

#[pymethods]
impl PriceBucket {
    #[getter]
    fn midpoint(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    fn __repr__(&self) -> String {
        format!("PriceBucket({}, records={})", self.label, self.record_count)
    }
}

impl From<RustPriceBucket> for PriceBucket {
    fn from(b: RustPriceBucket) -> Self {
        PriceBucket {
            left: b.left,
            right: b.right,
            label: b.label,
            record_count: b.record_count,
            mean_sales: b.mean_sales,
        }
    }
}

/// A product's rank in the ABC table.
#[pyclass]
#[derive(Clone)]
pub struct AbcRow {
    #[pyo3(get)]
    pub product: String,
    #[pyo3(get)]
    pub sales: f64,
    #[pyo3(get)]
    pub cumulative_sales: f64,
    #[pyo3(get)]
    pub cumulative_percentage: f64,
    #[pyo3(get)]
    pub category: String,
}

#[pymethods]
impl AbcRow {
    fn __repr__(&self) -> String {
        format!(
            "AbcRow(product={}, sales={:.2}, cumulative={:.2}%, category={})",
            self.product, self.sales, self.cumulative_percentage, self.category
        )
    }
}

impl From<RustAbcRow> for AbcRow {
    fn from(r: RustAbcRow) -> Self {
        AbcRow {
            product: r.product,
            sales: r.sales,
            cumulative_sales: r.cumulative_sales,
            cumulative_percentage: r.cumulative_percentage,
            category: r.category.as_str().to_string(),
        }
    }
}

/// Sales roll-up of one ABC category.
#[pyclass]
#[derive(Clone)]
pub struct CategorySummary {
    #[pyo3(get)]
    pub category: String,
    #[pyo3(get)]
    pub sales: f64,
    #[pyo3(get)]
    pub percentage: f64,
    #[pyo3(get)]
    pub product_count: usize,
}

impl From<RustCategorySummary> for CategorySummary {
    fn from(c: RustCategorySummary) -> Self {
        CategorySummary {
            category: c.category.as_str().to_string(),
            sales: c.sales,
            percentage: c.percentage,
            product_count: c.product_count,
        }
    }
}

/// ABC classification output.
#[pyclass]
#[derive(Clone)]
pub struct AbcReport {
    #[pyo3(get)]
    pub rows: Vec<AbcRow>,
    #[pyo3(get)]
    pub summary: Vec<CategorySummary>,
    #[pyo3(get)]
    pub top_category_c: Vec<AbcRow>,
    #[pyo3(get)]
    pub total_sales: f64,
}

#[pymethods]
impl AbcReport {
    /// Rows of one category ("A", "B" or "C").
    fn category(&self, category: &str) -> Vec<AbcRow> {
        self.rows
            .iter()
            .filter(|r| r.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }
}

impl From<RustAbcReport> for AbcReport {
    fn from(r: RustAbcReport) -> Self {
        AbcReport {
            rows: r.rows.into_iter().map(Into::into).collect(),
            summary: r.summary.into_iter().map(Into::into).collect(),
            top_category_c: r.top_category_c.into_iter().map(Into::into).collect(),
            total_sales: r.total_sales,
        }
    }
}

/// Everything the dashboard displays for one dataset and filter state.
///
/// Row sets are returned as tuples; `to_json()` gives the full view.
#[pyclass]
pub struct DashboardView {
    inner: RustDashboardView,
}

#[pymethods]
impl DashboardView {
    #[getter]
    fn summary(&self) -> SummaryMetrics {
        self.inner.summary.clone().into()
    }

    /// `(month, sales)` for all 12 months.
    #[getter]
    fn sales_by_month(&self) -> Vec<(String, f64)> {
        self.inner
            .sales_by_month
            .iter()
            .map(|r| (r.month.name().to_string(), r.sales))
            .collect()
    }

    /// `(product, sales)` in product order.
    #[getter]
    fn sales_by_product(&self) -> Vec<(String, f64)> {
        product_pairs(&self.inner.sales_by_product)
    }

    /// `(product, sales)` for the best sellers, highest first.
    #[getter]
    fn top_products(&self) -> Vec<(String, f64)> {
        product_pairs(&self.inner.top_products)
    }

    #[getter]
    fn trend_products(&self) -> Vec<String> {
        self.inner.trend_products.clone()
    }

    /// `(month, product, sales)` for the trend products.
    #[getter]
    fn monthly_trends(&self) -> Vec<(String, String, f64)> {
        self.inner
            .monthly_trends
            .iter()
            .map(|r| (r.month.name().to_string(), r.product.clone(), r.sales))
            .collect()
    }

    #[getter]
    fn performance_products(&self) -> Vec<String> {
        self.inner.performance_products.clone()
    }

    /// `(month, product, quantity)` for the performance products.
    #[getter]
    fn monthly_performance(&self) -> Vec<(String, String, i64)> {
        self.inner
            .monthly_performance
            .iter()
            .map(|r| (r.month.name().to_string(), r.product.clone(), r.quantity))
            .collect()
    }

    /// `(product, total_stock, actual_stock, sales)`, largest stock first.
    #[getter]
    fn stock(&self) -> Vec<(String, i64, i64, f64)> {
        self.inner
            .stock
            .iter()
            .map(|r| (r.product.clone(), r.total_stock, r.actual_stock, r.sales))
            .collect()
    }

    #[getter]
    fn price_buckets(&self) -> Vec<PriceBucket> {
        self.inner.price_buckets.iter().cloned().map(Into::into).collect()
    }

    /// `(slope, intercept)` of the price trend line.
    #[getter]
    fn price_trend(&self) -> Option<(f64, f64)> {
        self.inner.price_trend.as_ref().map(|t| (t.slope, t.intercept))
    }

    #[getter]
    fn abc_months(&self) -> Vec<String> {
        self.inner
            .abc_months
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }

    /// ABC report, or `None` when the section was skipped.
    #[getter]
    fn abc(&self) -> Option<AbcReport> {
        self.inner.abc.report().cloned().map(Into::into)
    }

    /// Why the ABC section was skipped, if it was.
    #[getter]
    fn abc_skipped_reason(&self) -> Option<String> {
        match &self.inner.abc {
            AbcSection::Skipped { reason } => Some(reason.clone()),
            AbcSection::Ready(_) => None,
        }
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(to_py_err)
    }
}

fn product_pairs(rows: &[ProductSales]) -> Vec<(String, f64)> {
    rows.iter().map(|r| (r.product.clone(), r.sales)).collect()
}

// ============================================================================
// Python-exposed Engine Classes
// ============================================================================

/// Dashboard engine.
#[pyclass(name = "DashboardEngine")]
pub struct PyDashboardEngine {
    inner: DashboardEngine,
}

#[pymethods]
impl PyDashboardEngine {
    /// Create an engine from an optional JSON configuration.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => RustConfig::from_json_str(json).map_err(to_py_err)?,
            None => RustConfig::default(),
        };
        Ok(PyDashboardEngine {
            inner: DashboardEngine::new(config).map_err(to_py_err)?,
        })
    }

    /// Create with custom ABC thresholds and defaults otherwise.
    #[staticmethod]
    fn with_thresholds(a_threshold: f64, b_threshold: f64) -> PyResult<Self> {
        let mut config = RustConfig::default();
        config.abc.a_threshold = a_threshold;
        config.abc.b_threshold = b_threshold;
        Ok(PyDashboardEngine {
            inner: DashboardEngine::new(config).map_err(to_py_err)?,
        })
    }

    /// Compute the full view for a dataset and filter selection.
    #[pyo3(signature = (dataset, trend_products=None, performance_products=None, abc_months=None))]
    fn render(
        &self,
        dataset: &SalesDataset,
        trend_products: Option<Vec<String>>,
        performance_products: Option<Vec<String>>,
        abc_months: Option<Vec<String>>,
    ) -> PyResult<DashboardView> {
        let filters = DashboardFilters {
            trend_products,
            performance_products,
            abc_months: abc_months.map(parse_months).transpose()?,
        };
        let inner = self.inner.render(&dataset.inner, &filters).map_err(to_py_err)?;
        Ok(DashboardView { inner })
    }

    /// Current configuration as JSON.
    fn config_json(&self) -> PyResult<String> {
        self.inner.config().to_json().map_err(to_py_err)
    }
}

/// Content-hash cache of loaded datasets.
#[pyclass(name = "DatasetCache")]
pub struct PyDatasetCache {
    inner: RustDatasetCache,
}

#[pymethods]
impl PyDatasetCache {
    #[new]
    #[pyo3(signature = (capacity=4))]
    fn new(capacity: usize) -> PyResult<Self> {
        Ok(PyDatasetCache {
            inner: RustDatasetCache::new(capacity).map_err(to_py_err)?,
        })
    }

    /// Load CSV bytes, parsing only when the content is new.
    fn load(&mut self, data: &[u8]) -> PyResult<SalesDataset> {
        self.inner.load(data).map(Into::into).map_err(to_py_err)
    }

    /// Drop one entry by content hash.
    fn invalidate(&mut self, hash: &str) -> bool {
        self.inner.invalidate(hash)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    /// `(hits, misses)` since creation.
    fn stats(&self) -> (u64, u64) {
        self.inner.stats()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Parse CSV bytes into a dataset.
#[pyfunction]
fn load_sales_csv(data: &[u8]) -> PyResult<SalesDataset> {
    let dataset = sales_ingestion::load_sales_csv(data).map_err(to_py_err)?;
    Ok(Arc::new(dataset).into())
}

/// Trim, replace spaces with underscores and upper-case a column name.
#[pyfunction]
fn normalize_column_name(name: &str) -> String {
    sales_ingestion::normalize_column_name(name)
}

/// Hex SHA-256 of the given bytes, as used for cache keys.
#[pyfunction]
fn content_hash(data: &[u8]) -> String {
    sales_ingestion::content_hash(data)
}

/// Classify `(product, sales)` totals into ABC categories.
#[pyfunction]
#[pyo3(signature = (totals, a_threshold=20.0, b_threshold=50.0, top_category_c=5))]
fn classify_abc(
    totals: Vec<(String, f64)>,
    a_threshold: f64,
    b_threshold: f64,
    top_category_c: usize,
) -> PyResult<AbcReport> {
    let config = AbcConfig {
        a_threshold,
        b_threshold,
        top_category_c,
    };
    config.validate().map_err(to_py_err)?;

    let totals = totals
        .into_iter()
        .map(|(product, sales)| ProductSales { product, sales })
        .collect();
    AbcClassifier::new(config)
        .classify_totals(totals)
        .map(Into::into)
        .map_err(to_py_err)
}

/// Install a stderr log subscriber with the given filter (e.g. "info").
///
/// Subsequent calls are ignored.
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn init_logging(level: &str) -> PyResult<()> {
    let filter = EnvFilter::try_new(level).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level, "Logging initialized");
    }
    Ok(())
}

// ============================================================================
// Module Definition
// ============================================================================

/// Sales Dashboard Core - Rust aggregation engine for the Python dashboard.
#[pymodule]
fn sales_dashboard_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<SalesDataset>()?;
    m.add_class::<SummaryMetrics>()?;
    m.add_class::<PriceBucket>()?;
    m.add_class::<AbcRow>()?;
    m.add_class::<CategorySummary>()?;
    m.add_class::<AbcReport>()?;
    m.add_class::<DashboardView>()?;

    // Engine classes
    m.add_class::<PyDashboardEngine>()?;
    m.add_class::<PyDatasetCache>()?;

    // Functions
    m.add_function(wrap_pyfunction!(load_sales_csv, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_column_name, m)?)?;
    m.add_function(wrap_pyfunction!(content_hash, m)?)?;
    m.add_function(wrap_pyfunction!(classify_abc, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;

    Ok(())
}
