//! Core types and configuration for the sales dashboard.
//!
//! This crate provides shared types used across all other crates:
//! - Sales records and the loaded dataset
//! - Aggregate and ABC classification rows
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
