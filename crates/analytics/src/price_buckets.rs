//! Equal-width price buckets.
//!
//! Splits the observed price range into fixed-width intervals and averages
//! the sales of the records falling in each, for the price vs. sales view.

use ordered_float::OrderedFloat;
use sales_core::config::PriceBucketConfig;
use sales_core::{PriceBucket, SalesRecord, TrendLine};
use statrs::statistics::Statistics;
use tracing::debug;

/// Equal-width price bucketer.
pub struct PriceBucketer {
    bucket_count: usize,
}

/// Running totals for one bucket.
#[derive(Debug, Clone, Default)]
struct BucketAccumulator {
    records: usize,
    sales_sum: f64,
    sales_count: usize,
}

impl PriceBucketer {
    /// Create a bucketer producing `bucket_count` buckets (at least one).
    pub fn new(bucket_count: usize) -> Self {
        Self {
            bucket_count: bucket_count.max(1),
        }
    }

    pub fn from_config(config: &PriceBucketConfig) -> Self {
        Self::new(config.bucket_count)
    }

    /// Bucket edges over `[min, max]`; `bucket_count + 1` values.
    ///
    /// A zero-width range is widened by 0.1% on each side.
    fn edges(&self, min: f64, max: f64) -> Vec<f64> {
        let (min, max) = if min == max {
            let adj = if min == 0.0 { 0.001 } else { min.abs() * 0.001 };
            (min - adj, max + adj)
        } else {
            (min, max)
        };

        let width = (max - min) / self.bucket_count as f64;
        let mut edges: Vec<f64> = (0..self.bucket_count)
            .map(|i| min + width * i as f64)
            .collect();
        edges.push(max);
        edges
    }

    /// Index of the bucket holding `price`. Left-inclusive; the last
    /// bucket also holds the right edge.
    fn bucket_index(edges: &[f64], price: f64) -> usize {
        let n = edges.len() - 1;
        let width = (edges[n] - edges[0]) / n as f64;
        let mut idx = (((price - edges[0]) / width).floor().max(0.0) as usize).min(n - 1);

        // Correct float drift at the edges.
        while idx + 1 < n && price >= edges[idx + 1] {
            idx += 1;
        }
        while idx > 0 && price < edges[idx] {
            idx -= 1;
        }
        idx
    }

    /// Bucket records by price. Records without a price are skipped; if no
    /// record has a price the result is empty.
    pub fn bucket(&self, records: &[SalesRecord]) -> Vec<PriceBucket> {
        let priced: Vec<(f64, Option<f64>)> = records
            .iter()
            .filter_map(|r| r.price.map(|p| (p, r.sales_amount)))
            .collect();

        let min = priced.iter().map(|(p, _)| OrderedFloat(*p)).min();
        let max = priced.iter().map(|(p, _)| OrderedFloat(*p)).max();
        let (min, max) = match (min, max) {
            (Some(min), Some(max)) => (min.0, max.0),
            _ => return Vec::new(),
        };

        let edges = self.edges(min, max);
        let mut accumulators = vec![BucketAccumulator::default(); self.bucket_count];

        for &(price, sales) in &priced {
            let acc = &mut accumulators[Self::bucket_index(&edges, price)];
            acc.records += 1;
            if let Some(sales) = sales {
                acc.sales_sum += sales;
                acc.sales_count += 1;
            }
        }

        debug!(
            priced = priced.len(),
            min,
            max,
            buckets = self.bucket_count,
            "Bucketed prices"
        );

        accumulators
            .into_iter()
            .enumerate()
            .map(|(i, acc)| {
                let (left, right) = (edges[i], edges[i + 1]);
                PriceBucket {
                    left,
                    right,
                    label: format!("{:.2} - {:.2}", left, right),
                    record_count: acc.records,
                    mean_sales: (acc.sales_count > 0)
                        .then(|| acc.sales_sum / acc.sales_count as f64),
                }
            })
            .collect()
    }
}

/// Least-squares line of bucket mean sales against bucket midpoint.
///
/// Buckets without a mean are ignored. Returns `None` with fewer than two
/// usable buckets.
pub fn price_trend_line(buckets: &[PriceBucket]) -> Option<TrendLine> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = buckets
        .iter()
        .filter_map(|b| b.mean_sales.map(|m| (b.midpoint(), m)))
        .unzip();

    if xs.len() < 2 {
        return None;
    }

    let var_x = xs.iter().variance();
    if !(var_x > 0.0) {
        return None;
    }

    let slope = xs.iter().covariance(ys.iter()) / var_x;
    let intercept = ys.iter().mean() - slope * xs.iter().mean();
    Some(TrendLine { slope, intercept })
}
