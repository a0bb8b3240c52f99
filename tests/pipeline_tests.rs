//! End-to-end runs of the pipeline against stubbed sources
//!
//! - Tables and dashboards land in the output directory
//! - A failing image export does not stop the run
//! - A structural scrape failure aborts before anything is exported

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;
use stockrev::chart::{Dashboard, Rasterizer};
use stockrev::company::Company;
use stockrev::config::Config;
use stockrev::error::{ChartError, ScrapeError};
use stockrev::pipeline::Pipeline;
use stockrev::pricing::{PriceBar, PriceProvider};
use stockrev::scraping::PageFetcher;
use tempfile::TempDir;

struct StubPrices;

impl PriceProvider for StubPrices {
    async fn max_history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let base = match symbol {
            "TSLA" => dec!(100.0),
            "GME" => dec!(20.0),
            other => return Err(anyhow!("unknown symbol {}", other)),
        };
        let bars = (2..=4)
            .map(|day| PriceBar {
                date: NaiveDate::from_ymd_opt(2020, 1, day).unwrap(),
                open: None,
                high: None,
                low: None,
                close: base + Decimal::from(day),
                volume: Some(10),
                dividends: Decimal::ZERO,
                stock_splits: Decimal::ZERO,
            })
            .collect();
        Ok(bars)
    }
}

struct StubPages {
    gamestop: String,
}

impl PageFetcher for StubPages {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        if url.contains("/TSLA/") {
            Ok(fs::read_to_string("tests/fixtures/revenue_page.html")?)
        } else if url.contains("/GME/") {
            Ok(self.gamestop.clone())
        } else {
            Err(anyhow!("unexpected url {}", url))
        }
    }
}

fn gamestop_page() -> String {
    r#"<html><body>
    <table class="historical_data_table"><tr><th>GameStop Annual Revenue</th></tr>
      <tr><td>2023</td><td>$5,927</td></tr></table>
    <table class="historical_data_table"><tr><th>GameStop Quarterly Revenue</th></tr>
      <tr><td>2023-04-30</td><td>$1,237</td></tr>
      <tr><td>2023-01-31</td><td>$2,226</td></tr>
      <tr><td>2022-10-31</td><td>N/A</td></tr></table>
    </body></html>"#
        .to_string()
}

struct NoRasterizer;

impl Rasterizer for NoRasterizer {
    fn rasterize(&self, _: &Dashboard, _: &Path) -> Result<(), ChartError> {
        Err(ChartError::Drawing("no font available".to_string()))
    }
}

fn config_for(dir: &TempDir) -> Config {
    Config {
        output_dir: dir.path().join("screenshots"),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_run_writes_all_artifacts() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = Pipeline::new(
        config_for(&dir),
        StubPrices,
        StubPages {
            gamestop: gamestop_page(),
        },
    )
    .with_rasterizer(Some(Box::new(NoRasterizer)));

    let summary = pipeline.run().await?;
    let out = dir.path().join("screenshots");

    for name in [
        "tesla_stock.csv",
        "tesla_revenue.csv",
        "gamestop_stock.csv",
        "gamestop_revenue.csv",
        "tesla_dashboard.html",
        "gamestop_dashboard.html",
    ] {
        assert!(out.join(name).exists(), "{} missing", name);
    }
    assert_eq!(summary.tables.len(), 4);
    assert_eq!(summary.documents.len(), 2);
    assert!(summary.images.is_empty());
    assert_eq!(
        summary.image_failures,
        vec![Company::Tesla, Company::GameStop]
    );
    assert_eq!(summary.files().count(), 6);

    let gme_stock = fs::read_to_string(out.join("gamestop_stock.csv"))?;
    assert_eq!(
        gme_stock,
        "Date,Close\n2020-01-02,22.0\n2020-01-03,23.0\n2020-01-04,24.0\n"
    );

    let gme_revenue = fs::read_to_string(out.join("gamestop_revenue.csv"))?;
    assert_eq!(gme_revenue, "Date,Revenue\n2023-04-30,1237\n2023-01-31,2226\n");

    // Empty revenue cell in the fixture is dropped, order kept
    let tesla_revenue = fs::read_to_string(out.join("tesla_revenue.csv"))?;
    let lines: Vec<&str> = tesla_revenue.lines().collect();
    assert_eq!(lines.len(), 1 + 7);
    assert_eq!(lines[1], "2023-03-31,23329");
    assert_eq!(lines[7], "2009-09-30,46");

    let html = fs::read_to_string(out.join("tesla_dashboard.html"))?;
    assert!(html.contains("Tesla: Share Price vs Revenue"));
    Ok(())
}

#[tokio::test]
async fn test_run_without_images() -> Result<()> {
    let dir = TempDir::new()?;
    let config = Config {
        image: false,
        ..config_for(&dir)
    };
    let summary = Pipeline::new(
        config,
        StubPrices,
        StubPages {
            gamestop: gamestop_page(),
        },
    )
    .run()
    .await?;

    assert!(summary.image_failures.is_empty());
    assert!(!dir
        .path()
        .join("screenshots")
        .join("tesla_dashboard.png")
        .exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_quarterly_table_aborts_run() -> Result<()> {
    let dir = TempDir::new()?;
    let pipeline = Pipeline::new(
        config_for(&dir),
        StubPrices,
        StubPages {
            gamestop: r#"<table class="historical_data_table"><tr><th>Annual</th></tr></table>"#
                .to_string(),
        },
    )
    .with_rasterizer(None);

    let err = pipeline.run().await.unwrap_err();

    assert!(err.chain().any(|cause| matches!(
        cause.downcast_ref::<ScrapeError>(),
        Some(ScrapeError::TableNotFound { wanted: 1, found: 1 })
    )));
    // Tesla data was fetched, but nothing is exported before every fetch succeeds
    assert!(!dir
        .path()
        .join("screenshots")
        .join("tesla_stock.csv")
        .exists());
    Ok(())
}
