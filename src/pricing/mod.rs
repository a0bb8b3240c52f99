// Pricing module - daily price history behind a provider trait

pub mod yahoo;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

pub use yahoo::YahooClient;

/// One daily bar as returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<i64>,
    pub dividends: Decimal,
    pub stock_splits: Decimal,
}

/// Closing price for one trading day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: Decimal,
}

/// Date-ascending closing prices, in provider order
pub type PriceSeries = Vec<PricePoint>;

/// Source of full daily history for a ticker symbol
#[allow(async_fn_in_trait)]
pub trait PriceProvider {
    /// Every bar the provider has for `symbol`, oldest first
    async fn max_history(&self, symbol: &str) -> Result<Vec<PriceBar>>;
}

impl From<PriceBar> for PricePoint {
    fn from(bar: PriceBar) -> Self {
        PricePoint {
            date: bar.date,
            close: bar.close,
        }
    }
}

/// Fetch the whole available history for `symbol` and keep only
/// (date, close). Order is whatever the provider returned.
pub async fn fetch_price_history<P: PriceProvider>(
    provider: &P,
    symbol: &str,
) -> Result<PriceSeries> {
    info!("Fetching price history for {}", symbol);
    let bars = provider
        .max_history(symbol)
        .await
        .with_context(|| format!("Failed to fetch price history for {}", symbol))?;

    let series: PriceSeries = bars.into_iter().map(PricePoint::from).collect();
    debug!("Projected {} bars for {}", series.len(), symbol);
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct StubProvider {
        bars: Vec<PriceBar>,
    }

    impl PriceProvider for StubProvider {
        async fn max_history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
            if symbol == "X" {
                Ok(self.bars.clone())
            } else {
                Err(anyhow::anyhow!("unknown symbol {}", symbol))
            }
        }
    }

    fn bar(date: NaiveDate, close: Decimal) -> PriceBar {
        PriceBar {
            date,
            open: Some(close - dec!(1)),
            high: Some(close + dec!(2)),
            low: Some(close - dec!(2)),
            close,
            volume: Some(1_000_000),
            dividends: Decimal::ZERO,
            stock_splits: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_date_and_close_in_order() {
        let d1 = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let provider = StubProvider {
            bars: vec![bar(d1, dec!(100.0)), bar(d2, dec!(102.5))],
        };

        let series = fetch_price_history(&provider, "X").await.unwrap();

        assert_eq!(
            series,
            vec![
                PricePoint {
                    date: d1,
                    close: dec!(100.0)
                },
                PricePoint {
                    date: d2,
                    close: dec!(102.5)
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_projection_drops_every_other_field() {
        let d1 = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let provider = StubProvider {
            bars: vec![PriceBar {
                dividends: dec!(0.5),
                stock_splits: dec!(3),
                ..bar(d1, dec!(42))
            }],
        };

        let series = fetch_price_history(&provider, "X").await.unwrap();
        let json = serde_json::to_value(&series[0]).unwrap();
        let fields: Vec<&String> = json.as_object().unwrap().keys().collect();

        assert_eq!(fields, vec!["Close", "Date"]);
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let provider = StubProvider { bars: Vec::new() };
        let err = fetch_price_history(&provider, "NOPE").await.unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }
}
