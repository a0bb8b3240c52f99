use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{PriceBar, PriceProvider};
use crate::error::PricingError;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<Events>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    symbol: String,
    /// Exchange offset from UTC in seconds
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

#[derive(Debug, Default, Deserialize)]
struct Events {
    #[serde(default)]
    dividends: HashMap<String, Dividend>,
    #[serde(default)]
    splits: HashMap<String, Split>,
}

#[derive(Debug, Deserialize)]
struct Dividend {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct Split {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

/// Yahoo Finance chart API client
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PriceProvider for YahooClient {
    async fn max_history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/{}?range=max&interval=1d&events=div%2Csplit",
            CHART_URL, symbol
        );
        info!("Requesting max history for {} from Yahoo Finance", symbol);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to Yahoo Finance")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Yahoo Finance response")?;

        // Yahoo reports unknown symbols as 404 with a chart.error payload
        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<YahooChartResponse>(&body) {
                if let Some(error) = parsed.chart.error {
                    return Err(provider_error(error).into());
                }
            }
            return Err(PricingError::Status(status).into());
        }

        parse_chart_response(&body)
    }
}

fn provider_error(error: YahooError) -> PricingError {
    PricingError::Provider {
        code: error.code,
        description: error.description,
    }
}

/// Parse a chart API body into daily bars.
///
/// Slots with a `null` close are dropped; dividends and splits are joined
/// onto the bar of the same exchange-local date.
pub fn parse_chart_response(body: &str) -> Result<Vec<PriceBar>> {
    let data: YahooChartResponse =
        serde_json::from_str(body).context("Failed to parse Yahoo Finance response")?;

    if let Some(error) = data.chart.error {
        return Err(provider_error(error).into());
    }

    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| PricingError::NoData("chart result".to_string()))?;

    let symbol = result.meta.symbol;
    let offset = result.meta.gmtoffset.unwrap_or(0);
    // A symbol with no trading history has no timestamp array at all
    let timestamps = result.timestamp.unwrap_or_default();

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| PricingError::Malformed(format!("no quote block for {}", symbol)))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let events = result.events.unwrap_or_default();
    let mut dividends: HashMap<NaiveDate, Decimal> = HashMap::new();
    for dividend in events.dividends.values() {
        let date = local_date(dividend.date, offset)?;
        let amount = to_decimal(dividend.amount)?;
        *dividends.entry(date).or_insert(Decimal::ZERO) += amount;
    }
    let mut splits: HashMap<NaiveDate, Decimal> = HashMap::new();
    for split in events.splits.values() {
        if split.denominator == 0.0 {
            continue;
        }
        let date = local_date(split.date, offset)?;
        splits.insert(date, to_decimal(split.numerator / split.denominator)?);
    }

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        let date = local_date(timestamp, offset)?;

        bars.push(PriceBar {
            date,
            open: opens.get(i).copied().flatten().and_then(Decimal::from_f64),
            high: highs.get(i).copied().flatten().and_then(Decimal::from_f64),
            low: lows.get(i).copied().flatten().and_then(Decimal::from_f64),
            close: to_decimal(close)?,
            volume: volumes.get(i).copied().flatten(),
            dividends: dividends.get(&date).copied().unwrap_or(Decimal::ZERO),
            stock_splits: splits.get(&date).copied().unwrap_or(Decimal::ZERO),
        });
    }

    debug!("Parsed {} daily bars for {}", bars.len(), symbol);
    Ok(bars)
}

fn local_date(timestamp: i64, offset: i64) -> Result<NaiveDate> {
    let date = chrono::DateTime::from_timestamp(timestamp + offset, 0)
        .ok_or_else(|| PricingError::Malformed(format!("invalid timestamp {}", timestamp)))?
        .date_naive();
    Ok(date)
}

fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| PricingError::Malformed(format!("invalid price value {}", value)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn should_skip_online_tests() -> bool {
        std::env::var("STOCKREV_SKIP_ONLINE_TESTS")
            .map(|v| v != "0")
            .unwrap_or(false)
    }

    // 2020-01-02 and 2020-01-03 14:30 UTC, exchange offset -5h
    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "X", "gmtoffset": -18000},
                "timestamp": [1577975400, 1578061800, 1578321000],
                "events": {
                    "dividends": {"1578061800": {"amount": 0.25, "date": 1578061800}},
                    "splits": {"1577975400": {"date": 1577975400, "numerator": 5.0, "denominator": 1.0, "splitRatio": "5:1"}}
                },
                "indicators": {"quote": [{
                    "open": [99.0, 101.0, null],
                    "high": [101.0, 103.0, null],
                    "low": [98.5, 100.0, null],
                    "close": [100.0, 102.5, null],
                    "volume": [1200, 1500, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response() {
        let bars = parse_chart_response(SAMPLE).unwrap();

        assert_eq!(bars.len(), 2, "null close slot must be dropped");
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(bars[0].close, dec!(100.0));
        assert_eq!(bars[0].stock_splits, dec!(5));
        assert_eq!(bars[0].dividends, Decimal::ZERO);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2020, 1, 3).unwrap());
        assert_eq!(bars[1].close, dec!(102.5));
        assert_eq!(bars[1].dividends, dec!(0.25));
        assert_eq!(bars[1].volume, Some(1500));
    }

    #[test]
    fn test_parse_chart_error_payload() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response(body).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
        assert!(err.downcast_ref::<PricingError>().is_some());
    }

    #[test]
    fn test_parse_symbol_without_history() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"NEW"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let bars = parse_chart_response(body).unwrap();
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_max_history() {
        if should_skip_online_tests() {
            return;
        }

        let client = YahooClient::new("Mozilla/5.0").unwrap();
        let result = client.max_history("TSLA").await;
        if let Err(e) = &result {
            eprintln!("Skipping Yahoo max history test: {}", e);
            return;
        }
        let bars = result.unwrap();

        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
