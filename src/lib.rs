//! Stockrev - share price vs quarterly revenue dashboards
//!
//! Fetches the full daily price history and the quarterly revenue table
//! for Tesla and GameStop, writes them as CSV and draws one dual-axis
//! dashboard per company.

pub mod chart;
pub mod company;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod preview;
pub mod pricing;
pub mod scraping;
pub mod utils;
