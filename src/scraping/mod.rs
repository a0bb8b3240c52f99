// Web scraping module for revenue history pages
// Pages are fetched through `PageFetcher` so parsing can run on fixtures

pub mod revenue;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

pub use revenue::{
    fetch_revenue_history, parse_revenue_amount, parse_revenue_table, RevenueRecord,
    RevenueSeries, RowOutcome, SkipReason, TableLookup,
};

/// Browser-like identification; the revenue pages reject default clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Source of HTML documents
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET with a fixed `User-Agent`
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed for {}", url))?
            .error_for_status()
            .with_context(|| format!("error status for {}", url))?;

        response
            .text()
            .await
            .with_context(|| format!("failed reading response for {}", url))
    }
}
