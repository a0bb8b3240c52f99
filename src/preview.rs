//! Console previews of fetched tables
//!
//! Price tables show their first rows (oldest), revenue tables their last
//! rows (oldest too, since the source lists newest first).

use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::pricing::PricePoint;
use crate::scraping::RevenueRecord;
use crate::utils::format_usd;

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Close")]
    close: String,
}

#[derive(Tabled)]
struct RevenueRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Revenue (M)")]
    revenue: String,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// First `rows` records of a price series
pub fn price_head(series: &[PricePoint], rows: usize) -> String {
    let preview: Vec<PriceRow> = series
        .iter()
        .take(rows)
        .map(|p| PriceRow {
            date: p.date.format("%Y-%m-%d").to_string(),
            close: format_usd(p.close),
        })
        .collect();
    render(&preview)
}

/// Last `rows` records of a revenue series, in series order
pub fn revenue_tail(series: &[RevenueRecord], rows: usize) -> String {
    let start = series.len().saturating_sub(rows);
    let preview: Vec<RevenueRow> = series[start..]
        .iter()
        .map(|r| RevenueRow {
            date: r.period.format("%Y-%m-%d").to_string(),
            revenue: format_usd(r.revenue),
        })
        .collect();
    render(&preview)
}
