//! Error handling for stockrev
//!
//! Defines the typed failures of each stage and establishes a unified
//! Result type using anyhow for context chaining and error propagation.
//!
//! Row-level problems while scraping are not errors: they are reported as
//! [`crate::scraping::RowOutcome::Skipped`] and filtered out.

use thiserror::Error;

/// Structural failures while extracting the revenue table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("revenue table #{wanted} not found: page has {found} historical data table(s)")]
    TableNotFound { wanted: usize, found: usize },

    #[error("invalid period label: {0:?}")]
    InvalidPeriod(String),

    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Failures reported by a price provider
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("provider returned error status: {0}")]
    Status(reqwest::StatusCode),

    #[error("provider error: {code} - {description}")]
    Provider { code: String, description: String },

    #[error("no data returned for {0}")]
    NoData(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Failures while assembling or rasterizing a dashboard
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("nothing to plot: both series are empty")]
    NoData,

    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for stockrev operations
pub type Result<T> = anyhow::Result<T>;
