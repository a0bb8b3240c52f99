//! Run configuration
//!
//! Defaults, optionally replaced key by key from a TOML file, then by
//! command-line flags. The company list itself is fixed.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::scraping::{TableLookup, DEFAULT_USER_AGENT};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where CSVs and dashboards are written
    pub output_dir: PathBuf,
    /// Sent with every HTTP request
    pub user_agent: String,
    /// Rows shown in each console preview
    pub preview_rows: usize,
    /// Attempt the PNG export
    pub image: bool,
    pub image_width: u32,
    pub image_height: u32,
    pub revenue_table: TableLookup,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("screenshots"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            preview_rows: 5,
            image: true,
            image_width: 1280,
            image_height: 720,
            revenue_table: TableLookup::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }
}
