mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stockrev::pipeline::Pipeline;
use stockrev::pricing::YahooClient;
use stockrev::scraping::HttpPageFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.resolve_config()?;
    debug!("Resolved configuration: {:?}", config);

    let prices = YahooClient::new(&config.user_agent)?;
    let pages = HttpPageFetcher::new(&config.user_agent)?;

    Pipeline::new(config, prices, pages).run().await?;
    Ok(())
}
