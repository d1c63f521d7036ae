//! Configuration structures for the sales dashboard.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the dashboard engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ABC classification configuration.
    pub abc: AbcConfig,
    /// Price bucketing configuration.
    pub price_buckets: PriceBucketConfig,
    /// Chart table configuration.
    pub charts: ChartConfig,
    /// Dataset cache configuration.
    pub cache: CacheConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing sections use defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that all sections hold usable values.
    pub fn validate(&self) -> Result<()> {
        self.abc.validate()?;
        if self.price_buckets.bucket_count == 0 {
            return Err(Error::config("price_buckets.bucket_count must be at least 1"));
        }
        if self.cache.capacity == 0 {
            return Err(Error::config("cache.capacity must be at least 1"));
        }
        Ok(())
    }
}

/// ABC classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbcConfig {
    /// Upper bound (inclusive) of cumulative percentage for category A.
    pub a_threshold: f64,
    /// Upper bound (inclusive) of cumulative percentage for category B.
    pub b_threshold: f64,
    /// Number of category C products listed in the report.
    pub top_category_c: usize,
}

impl Default for AbcConfig {
    fn default() -> Self {
        Self {
            a_threshold: 20.0,
            b_threshold: 50.0,
            top_category_c: 5,
        }
    }
}

impl AbcConfig {
    /// Check threshold ordering and range.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("a_threshold", self.a_threshold),
            ("b_threshold", self.b_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::config(format!(
                    "abc.{} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }
        if self.a_threshold > self.b_threshold {
            return Err(Error::config(format!(
                "abc.a_threshold ({}) must not exceed abc.b_threshold ({})",
                self.a_threshold, self.b_threshold
            )));
        }
        Ok(())
    }
}

/// Price bucketing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBucketConfig {
    /// Number of equal-width buckets over the observed price range.
    pub bucket_count: usize,
}

impl Default for PriceBucketConfig {
    fn default() -> Self {
        Self { bucket_count: 10 }
    }
}

/// Chart table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Products shown in the sales contribution table.
    pub top_contribution_products: usize,
    /// Products preselected when no product filter is given.
    pub default_selected_products: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_contribution_products: 20,
            default_selected_products: 2,
        }
    }
}

/// Dataset cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of parsed datasets kept in memory.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.abc.a_threshold, 20.0);
        assert_eq!(config.abc.b_threshold, 50.0);
        assert_eq!(config.price_buckets.bucket_count, 10);
        assert_eq!(config.charts.top_contribution_products, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json_str(r#"{"abc": {"b_threshold": 80}}"#).unwrap();
        assert_eq!(config.abc.a_threshold, 20.0);
        assert_eq!(config.abc.b_threshold, 80.0);
        assert_eq!(config.price_buckets.bucket_count, 10);
        assert_eq!(config.cache.capacity, 4);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let err = Config::from_json_str(r#"{"abc": {"a_threshold": 70}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let abc = AbcConfig {
            a_threshold: 20.0,
            b_threshold: 120.0,
            top_category_c: 5,
        };
        assert!(abc.validate().is_err());
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let mut config = Config::default();
        config.price_buckets.bucket_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_overrides() {
        let mut config = Config::default();
        config.abc.b_threshold = 75.0;
        config.price_buckets.bucket_count = 6;
        let parsed = Config::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.abc.b_threshold, 75.0);
        assert_eq!(parsed.price_buckets.bucket_count, 6);
    }
}
