use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use stockrev::config::Config;

#[derive(Parser, Debug)]
#[command(name = "stockrev")]
#[command(version, about = "Share price vs quarterly revenue dashboards")]
#[command(
    long_about = "Fetch the full share price history and the quarterly revenue table for Tesla and GameStop, export them as CSV, and draw one dual-axis dashboard per company (HTML, plus PNG when possible)."
)]
pub struct Cli {
    /// Directory for CSV tables and dashboards [default: screenshots]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rows shown in each table preview [default: 5]
    #[arg(long)]
    pub preview_rows: Option<usize>,

    /// Skip the PNG export of dashboards
    #[arg(long)]
    pub no_image: bool,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(rows) = self.preview_rows {
            config.preview_rows = rows;
        }
        if self.no_image {
            config.image = false;
        }
        Ok(config)
    }
}
