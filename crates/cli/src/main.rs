//! `sales-report`: load a sales sheet and print the dashboard view as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use sales_analytics::{DashboardEngine, DashboardFilters};
use sales_core::{Config, Month};
use sales_ingestion::load_sales_file;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sales-report", version, about = "Sales dashboard report", long_about = None)]
struct Cli {
    /// Sales sheet (CSV)
    csv: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Months included in the ABC classification (default: all present)
    #[arg(short, long, num_args = 1.., value_parser = parse_month)]
    months: Vec<Month>,

    /// Upper cumulative percentage of category A
    #[arg(long)]
    a_threshold: Option<f64>,

    /// Upper cumulative percentage of category B
    #[arg(long)]
    b_threshold: Option<f64>,

    /// Products shown in the monthly trend (repeatable)
    #[arg(long = "trend-product")]
    trend_products: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_month(s: &str) -> std::result::Result<Month, String> {
    s.parse().map_err(|e: sales_core::Error| e.to_string())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(a) = cli.a_threshold {
        config.abc.a_threshold = a;
    }
    if let Some(b) = cli.b_threshold {
        config.abc.b_threshold = b;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(?cli, "Parsed arguments");

    let config = load_config(&cli)?;
    let dataset = load_sales_file(&cli.csv)
        .with_context(|| format!("failed to load {}", cli.csv.display()))?;
    info!(records = dataset.len(), "Loaded sales sheet");

    let filters = DashboardFilters {
        trend_products: (!cli.trend_products.is_empty()).then(|| cli.trend_products.clone()),
        performance_products: None,
        abc_months: (!cli.months.is_empty()).then(|| cli.months.clone()),
    };

    let engine = DashboardEngine::new(config)?;
    let view = engine
        .render(&dataset, &filters)
        .context("failed to render dashboard")?;

    println!("{}", view.to_json()?);
    Ok(())
}
