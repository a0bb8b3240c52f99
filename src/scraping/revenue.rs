// Quarterly revenue extraction from `historical_data_table` tables
//
// Two-tier policy: a row that cannot be read is skipped, a page without
// the wanted table is an error.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::PageFetcher;
use crate::error::ScrapeError;

const TABLE_SELECTOR: &str = "table.historical_data_table";

/// Period labels accepted in the first column
const PERIOD_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Revenue reported for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueRecord {
    #[serde(rename = "Date")]
    pub period: NaiveDate,
    #[serde(rename = "Revenue")]
    pub revenue: Decimal,
}

/// Revenue records in source-table row order
pub type RevenueSeries = Vec<RevenueRecord>;

/// How to pick the revenue table among the page's historical data tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "lowercase")]
pub enum TableLookup {
    /// Zero-based position; the quarterly table is the second one
    Position { index: usize },
    /// First table whose header text contains `contains` (case-insensitive),
    /// otherwise the table at `fallback`
    Heading { contains: String, fallback: usize },
}

impl Default for TableLookup {
    fn default() -> Self {
        TableLookup::Position { index: 1 }
    }
}

/// Why a body row did not produce a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingCells(usize),
    NotNumeric(String),
}

/// Result of reading one body row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Parsed { label: String, revenue: Decimal },
    Skipped(SkipReason),
}

/// Fetch `url` and extract its quarterly revenue table
pub async fn fetch_revenue_history<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    lookup: &TableLookup,
) -> Result<RevenueSeries> {
    info!("Fetching revenue history from {}", url);
    let html = fetcher.fetch_page(url).await?;
    parse_revenue_table(&html, lookup)
        .with_context(|| format!("Failed to extract revenue table from {}", url))
}

/// Extract the revenue series from a page
pub fn parse_revenue_table(html: &str, lookup: &TableLookup) -> Result<RevenueSeries> {
    let document = Html::parse_document(html);
    let table_sel = selector(TABLE_SELECTOR)?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let tables: Vec<ElementRef> = document.select(&table_sel).collect();
    let table = select_table(&tables, lookup)?;

    let mut series = RevenueSeries::new();
    let mut skipped = 0usize;

    for row in table.select(&row_sel).skip(1) {
        match read_row(row, &cell_sel) {
            RowOutcome::Parsed { label, revenue } => {
                let period = parse_period(&label)?;
                series.push(RevenueRecord { period, revenue });
            }
            RowOutcome::Skipped(reason) => {
                debug!("Skipping revenue row: {:?}", reason);
                skipped += 1;
            }
        }
    }

    info!(
        "Parsed {} revenue record(s), skipped {} row(s)",
        series.len(),
        skipped
    );
    Ok(series)
}

fn select_table<'a>(tables: &[ElementRef<'a>], lookup: &TableLookup) -> Result<ElementRef<'a>> {
    let index = match lookup {
        TableLookup::Position { index } => *index,
        TableLookup::Heading { contains, fallback } => {
            let th_sel = selector("th")?;
            let needle = contains.to_lowercase();
            let found = tables.iter().position(|table| {
                table
                    .select(&th_sel)
                    .any(|th| cell_text(th).to_lowercase().contains(&needle))
            });
            match found {
                Some(index) => index,
                None => {
                    warn!(
                        "No revenue table headed {:?}, using table #{}",
                        contains, fallback
                    );
                    *fallback
                }
            }
        }
    };

    tables.get(index).copied().ok_or_else(|| {
        ScrapeError::TableNotFound {
            wanted: index,
            found: tables.len(),
        }
        .into()
    })
}

fn read_row(row: ElementRef, cell_sel: &Selector) -> RowOutcome {
    let cells: Vec<String> = row.select(cell_sel).map(cell_text).collect();
    if cells.len() < 2 {
        return RowOutcome::Skipped(SkipReason::MissingCells(cells.len()));
    }

    match parse_revenue_amount(&cells[1]) {
        Some(revenue) => RowOutcome::Parsed {
            label: cells[0].clone(),
            revenue,
        },
        None => RowOutcome::Skipped(SkipReason::NotNumeric(cells[1].clone())),
    }
}

/// Coerce a revenue cell such as `"$24,578"` to a number.
///
/// Returns `None` when nothing numeric is left after stripping the
/// currency symbol and thousands separators.
pub fn parse_revenue_amount(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace(['$', ','], "");
    Decimal::from_str(cleaned.trim()).ok()
}

fn parse_period(label: &str) -> Result<NaiveDate> {
    let label = label.trim();
    PERIOD_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
        .ok_or_else(|| ScrapeError::InvalidPeriod(label.to_string()).into())
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(e.to_string()).into())
}
