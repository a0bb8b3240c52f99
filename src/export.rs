//! Persistence of tables (CSV) and dashboards (HTML + PNG)

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::chart::{Dashboard, Rasterizer};
use crate::error::ChartError;
use crate::pricing::PricePoint;
use crate::scraping::RevenueRecord;

/// A row type with a fixed CSV header
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

impl TableRow for PricePoint {
    const HEADERS: &'static [&'static str] = &["Date", "Close"];
}

impl TableRow for RevenueRecord {
    const HEADERS: &'static [&'static str] = &["Date", "Revenue"];
}

/// Files written for one dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartExport {
    pub html: PathBuf,
    pub image: Option<PathBuf>,
    /// Why the image is missing, when it was attempted and failed
    pub image_error: Option<String>,
}

/// Create the output directory if it does not exist
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory {}", path.display()))
}

/// Write `rows` as comma-separated UTF-8 with a header line, replacing any
/// existing file.
pub fn export_table<T: TableRow>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("Wrote {} row(s) to {}", rows.len(), path.display());
    Ok(())
}

/// Write `<base>.html`, then try `<base>.png`.
///
/// The HTML document is always written first; an image failure is logged
/// and reported in the result, never returned as an error.
pub fn export_chart(
    chart: &Dashboard,
    base_path: &Path,
    rasterizer: Option<&dyn Rasterizer>,
) -> Result<ChartExport> {
    let html = base_path.with_extension("html");
    fs::write(&html, chart.html())
        .with_context(|| format!("Failed to write {}", html.display()))?;
    info!("Wrote dashboard document {}", html.display());

    let Some(rasterizer) = rasterizer else {
        return Ok(ChartExport {
            html,
            image: None,
            image_error: None,
        });
    };

    let png = base_path.with_extension("png");
    // Drawn beside the target, so a failed attempt never touches an earlier image
    let partial = base_path.with_extension("partial.png");
    let drawn = rasterizer.rasterize(chart, &partial).and_then(|()| {
        fs::rename(&partial, &png).map_err(ChartError::from)
    });

    match drawn {
        Ok(()) => Ok(ChartExport {
            html,
            image: Some(png),
            image_error: None,
        }),
        Err(e) => {
            warn!(
                "Could not save {}: {}. HTML saved instead.",
                png.display(),
                e
            );
            let _ = fs::remove_file(&partial);
            Ok(ChartExport {
                html,
                image: None,
                image_error: Some(e.to_string()),
            })
        }
    }
}
