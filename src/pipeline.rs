//! The fixed run: fetch prices and revenue for every company, export the
//! tables, then build and export one dashboard per company.
//!
//! Steps run strictly in order and the first error aborts the rest. The
//! only failure tolerated is a missing dashboard image.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use crate::chart::{build_dashboard, PlottersRasterizer, Rasterizer};
use crate::company::Company;
use crate::config::Config;
use crate::export::{ensure_output_dir, export_chart, export_table};
use crate::preview::{price_head, revenue_tail};
use crate::pricing::{fetch_price_history, PriceProvider, PriceSeries};
use crate::scraping::{fetch_revenue_history, PageFetcher, RevenueSeries};

/// Everything fetched for one company
#[derive(Debug, Clone)]
pub struct CompanyData {
    pub company: Company,
    pub prices: PriceSeries,
    pub revenue: RevenueSeries,
}

/// Artifacts written by a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub tables: Vec<PathBuf>,
    pub documents: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
    /// Dashboards whose image export failed
    pub image_failures: Vec<Company>,
}

impl RunSummary {
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.tables
            .iter()
            .chain(self.documents.iter())
            .chain(self.images.iter())
    }
}

pub struct Pipeline<P, F> {
    config: Config,
    prices: P,
    pages: F,
    rasterizer: Option<Box<dyn Rasterizer>>,
}

fn step(message: &str) {
    println!("\n{} {}", "→".cyan().bold(), message);
}

fn done(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

impl<P: PriceProvider, F: PageFetcher> Pipeline<P, F> {
    pub fn new(config: Config, prices: P, pages: F) -> Self {
        let rasterizer: Option<Box<dyn Rasterizer>> = if config.image {
            Some(Box::new(PlottersRasterizer {
                width: config.image_width,
                height: config.image_height,
            }))
        } else {
            None
        };
        Self {
            config,
            prices,
            pages,
            rasterizer,
        }
    }

    /// Replace the image exporter (`None` disables images)
    pub fn with_rasterizer(mut self, rasterizer: Option<Box<dyn Rasterizer>>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let out = &self.config.output_dir;
        ensure_output_dir(out)?;
        info!("Writing results to {}", out.display());

        let mut datasets = Vec::with_capacity(Company::ALL.len());
        for company in Company::ALL {
            datasets.push(self.fetch_company(company).await?);
        }

        let mut summary = RunSummary::default();

        step("Exporting tables...");
        for data in &datasets {
            let slug = data.company.profile().slug;
            let stock_path = out.join(format!("{}_stock.csv", slug));
            export_table(&data.prices, &stock_path)?;
            let revenue_path = out.join(format!("{}_revenue.csv", slug));
            export_table(&data.revenue, &revenue_path)?;
            summary.tables.push(stock_path);
            summary.tables.push(revenue_path);
        }
        done(&format!("{} tables written", summary.tables.len()));

        for data in &datasets {
            let company = data.company;
            step(&format!("Building {} dashboard...", company));
            let dashboard = build_dashboard(
                &data.prices,
                &data.revenue,
                &company.dashboard_title(),
                company,
            )
            .with_context(|| format!("Failed to build {} dashboard", company))?;

            let base = out.join(format!("{}_dashboard", company.profile().slug));
            let export = export_chart(&dashboard, &base, self.rasterizer.as_deref())?;

            done(&format!("Saved {}", export.html.display()));
            if let Some(image) = &export.image {
                done(&format!("Saved {}", image.display()));
                summary.images.push(image.clone());
            }
            if let Some(reason) = &export.image_error {
                println!(
                    "{} Could not save {}.png: {}. HTML saved instead.",
                    "⚠".yellow().bold(),
                    base.display(),
                    reason
                );
                summary.image_failures.push(company);
            }
            summary.documents.push(export.html);
        }

        println!(
            "\n{} Analysis complete. Results are in '{}'.",
            "✓".green().bold(),
            out.display()
        );
        Ok(summary)
    }

    async fn fetch_company(&self, company: Company) -> Result<CompanyData> {
        let profile = company.profile();
        let rows = self.config.preview_rows;

        step(&format!("Fetching {} share prices ({})...", company, profile.ticker));
        let prices = fetch_price_history(&self.prices, profile.ticker).await?;
        done(&format!("{} price rows; first {}:", prices.len(), rows.min(prices.len())));
        println!("{}", price_head(&prices, rows));

        step(&format!("Fetching {} revenue...", company));
        let revenue = fetch_revenue_history(
            &self.pages,
            profile.revenue_url,
            &self.config.revenue_table,
        )
        .await?;
        done(&format!(
            "{} revenue rows; last {}:",
            revenue.len(),
            rows.min(revenue.len())
        ));
        println!("{}", revenue_tail(&revenue, rows));

        Ok(CompanyData {
            company,
            prices,
            revenue,
        })
    }
}
