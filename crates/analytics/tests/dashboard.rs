//! End-to-end: CSV sheet through the dashboard engine.

use approx::assert_relative_eq;
use sales_analytics::{AbcSection, DashboardEngine, DashboardFilters};
use sales_core::{AbcCategory, Config, Month};
use sales_ingestion::{load_sales_csv, DatasetCache};

const SHEET: &str = "\
PRODUCT,MONTH,PRICE (GHS),QTY SOLD,SALES,TOTAL STOCK,STOCK LEFT(EXCEL),ACTUAL STOCK,SYSTEM STOCK,SURPLUS & SHORTAGE
Diapers,January,80,5,400,20,15,15,15,0
Diapers,February,80,5,400,20,15,14,15,-1
Baby Oil,January,25,4,100,12,8,8,8,0
Baby Oil,March,25,2,50,12,10,10,10,0
Wipes,February,10,15,150,40,25,25,25,0
Cream,March,40,1,40,6,5,5,5,0
Powder,March,20,3,60,9,6,,6,
";

#[test]
fn test_sheet_to_view() {
    let dataset = load_sales_csv(SHEET.as_bytes()).unwrap();
    let engine = DashboardEngine::new(Config::default()).unwrap();
    let view = engine.render(&dataset, &DashboardFilters::default()).unwrap();

    assert_relative_eq!(view.summary.total_sales, 1200.0);
    assert_eq!(view.summary.total_units, 35);
    assert_eq!(view.summary.distinct_product_count, 5);
    assert_eq!(view.summary.top_product, "Diapers");
    assert_eq!(view.summary.top_month, Month::February);

    assert_eq!(view.sales_by_month.len(), 12);
    assert_relative_eq!(view.sales_by_month[0].sales, 500.0);
    assert_eq!(view.sales_by_month[6].sales, 0.0);

    assert!(view.price_buckets.len() <= 10);
    assert_relative_eq!(view.price_buckets[0].left, 10.0);
    assert_relative_eq!(view.price_buckets.last().unwrap().right, 80.0);

    let report = match &view.abc {
        AbcSection::Ready(report) => report,
        AbcSection::Skipped { reason } => panic!("ABC skipped: {}", reason),
    };
    // Diapers 800 of 1200 = 66.7% -> C under default thresholds
    assert_eq!(report.rows[0].product, "Diapers");
    assert_eq!(report.rows[0].category, AbcCategory::C);
    assert_relative_eq!(report.rows.last().unwrap().cumulative_percentage, 100.0, epsilon = 1e-9);
}

#[test]
fn test_threshold_change_relabels_only() {
    let dataset = load_sales_csv(SHEET.as_bytes()).unwrap();
    let default_view = DashboardEngine::new(Config::default())
        .unwrap()
        .render(&dataset, &DashboardFilters::default())
        .unwrap();

    let mut config = Config::default();
    config.abc.a_threshold = 70.0;
    config.abc.b_threshold = 90.0;
    let wide_view = DashboardEngine::new(config)
        .unwrap()
        .render(&dataset, &DashboardFilters::default())
        .unwrap();

    let products = |section: &AbcSection| -> Vec<String> {
        section.report().unwrap().rows.iter().map(|r| r.product.clone()).collect()
    };
    assert_eq!(products(&default_view.abc), products(&wide_view.abc));
    assert_eq!(wide_view.abc.report().unwrap().rows[0].category, AbcCategory::A);
}

#[test]
fn test_month_filter_through_cache() {
    let mut cache = DatasetCache::new(2).unwrap();
    let dataset = cache.load(SHEET.as_bytes()).unwrap();
    let again = cache.load(SHEET.as_bytes()).unwrap();
    assert_eq!(cache.stats(), (1, 1));

    let engine = DashboardEngine::new(Config::default()).unwrap();
    let filters = DashboardFilters {
        abc_months: Some(vec![Month::March]),
        ..Default::default()
    };
    let view = engine.render(&again, &filters).unwrap();
    let report = view.abc.report().unwrap();

    assert_relative_eq!(report.total_sales, 150.0);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(dataset.len(), again.len());
}
