//! Dual-axis dashboards: share price against quarterly revenue
//!
//! A [`Dashboard`] is built once per company. Building it renders the
//! interactive figure (a Plotly JSON document embedded in HTML) right away;
//! the static image is drawn later, on demand, by a [`raster::Rasterizer`].

pub mod raster;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::ops::Range;
use tracing::debug;

use crate::company::Company;
use crate::error::ChartError;
use crate::pricing::PricePoint;
use crate::scraping::RevenueRecord;

pub use raster::{PlottersRasterizer, Rasterizer};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Presentation-only description of a dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub price_label: String,
    pub revenue_label: String,
    pub legend_title: String,
    pub price_color: (u8, u8, u8),
    pub revenue_color: (u8, u8, u8),
}

impl ChartSpec {
    pub fn for_company(company: Company, title: &str) -> Self {
        let profile = company.profile();
        ChartSpec {
            title: title.to_string(),
            x_label: "Date".to_string(),
            price_label: "Share Price (USD)".to_string(),
            revenue_label: "Revenue (Millions USD)".to_string(),
            legend_title: "Metrics".to_string(),
            price_color: profile.price_color,
            revenue_color: profile.revenue_color,
        }
    }
}

/// A rendered dashboard ready for export
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub company: Company,
    pub spec: ChartSpec,
    prices: Vec<(NaiveDate, f64)>,
    revenue: Vec<(NaiveDate, f64)>,
    figure: Value,
    html: String,
}

/// Build the price/revenue dashboard for `company`.
///
/// Both series share the date axis and keep their own dates: daily prices
/// and quarterly revenue are overlaid as they are.
pub fn build_dashboard(
    prices: &[PricePoint],
    revenue: &[RevenueRecord],
    title: &str,
    company: Company,
) -> Result<Dashboard> {
    if prices.is_empty() && revenue.is_empty() {
        return Err(ChartError::NoData.into());
    }

    let spec = ChartSpec::for_company(company, title);
    let prices: Vec<(NaiveDate, f64)> = prices.iter().map(|p| (p.date, to_f64(p.close))).collect();
    let revenue: Vec<(NaiveDate, f64)> = revenue
        .iter()
        .map(|r| (r.period, to_f64(r.revenue)))
        .collect();

    let figure = figure(&spec, &prices, &revenue);
    let html = html_document(&spec.title, &figure);
    debug!(
        "Built {} dashboard: {} price point(s), {} revenue point(s)",
        company,
        prices.len(),
        revenue.len()
    );

    Ok(Dashboard {
        company,
        spec,
        prices,
        revenue,
        figure,
        html,
    })
}

impl Dashboard {
    /// Plotly figure (`data` + `layout`)
    pub fn figure(&self) -> &Value {
        &self.figure
    }

    /// Self-contained interactive document
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn prices(&self) -> &[(NaiveDate, f64)] {
        &self.prices
    }

    pub fn revenue(&self) -> &[(NaiveDate, f64)] {
        &self.revenue
    }

    /// Shared x range over both series, never empty
    pub fn date_range(&self) -> Range<NaiveDate> {
        let dates = self.prices.iter().chain(self.revenue.iter()).map(|(d, _)| *d);
        let min = dates.clone().min().unwrap_or_default();
        let max = dates.max().unwrap_or_default();
        if min == max {
            min..max + chrono::Duration::days(1)
        } else {
            min..max
        }
    }

    pub fn price_range(&self) -> Range<f64> {
        padded_range(&self.prices)
    }

    pub fn revenue_range(&self) -> Range<f64> {
        padded_range(&self.revenue)
    }
}

/// Min..max with 10% padding; unit range for an empty series
fn padded_range(points: &[(NaiveDate, f64)]) -> Range<f64> {
    if points.is_empty() {
        return 0.0..1.0;
    }
    let min = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max - min) * 0.1).max(1e-8);
    let start = if min >= 0.0 {
        (min - padding).max(0.0)
    } else {
        min - padding
    };
    start..max + padding
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn css_color((r, g, b): (u8, u8, u8)) -> String {
    format!("rgb({}, {}, {})", r, g, b)
}

fn trace(name: &str, points: &[(NaiveDate, f64)], color: (u8, u8, u8), axis: &str) -> Value {
    let x: Vec<String> = points
        .iter()
        .map(|(d, _)| d.format("%Y-%m-%d").to_string())
        .collect();
    let y: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    json!({
        "type": "scatter",
        "mode": "lines",
        "name": name,
        "x": x,
        "y": y,
        "yaxis": axis,
        "line": {"color": css_color(color)},
    })
}

fn figure(spec: &ChartSpec, prices: &[(NaiveDate, f64)], revenue: &[(NaiveDate, f64)]) -> Value {
    json!({
        "data": [
            trace(&spec.price_label, prices, spec.price_color, "y"),
            trace(&spec.revenue_label, revenue, spec.revenue_color, "y2"),
        ],
        "layout": {
            "title": {"text": spec.title},
            "xaxis": {"title": {"text": spec.x_label}, "type": "date"},
            "yaxis": {"title": {"text": spec.price_label}},
            "yaxis2": {
                "title": {"text": spec.revenue_label},
                "overlaying": "y",
                "side": "right",
            },
            "legend": {"title": {"text": spec.legend_title}},
        },
    })
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_document(title: &str, figure: &Value) -> String {
    // "</" inside the inline script would close it early
    let payload = figure.to_string().replace("</", "<\\/");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body>
<div id="dashboard" style="width:100%;height:95vh;"></div>
<script>
const figure = {payload};
Plotly.newPlot("dashboard", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#,
        title = escape_html(title),
    )
}
