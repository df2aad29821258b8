mod collect;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "surplus")]
#[command(about = "Collect third-party foreclosure sales and their surplus amounts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one county site for one auction date
    Run {
        /// Auction-site hostname, e.g. manatee.realforeclose.com
        #[arg(long, conflicts_with = "county")]
        host: Option<String>,

        /// County name or slug from the counties file
        #[arg(long)]
        county: Option<String>,

        /// Auction date as MM/DD/YYYY or YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_auction_date)]
        date: Option<NaiveDate>,

        /// Scrape and write local files without posting to the spreadsheet
        #[arg(long)]
        dry_run: bool,
    },
    /// Scrape every county in the counties file, retrying failed counties once
    Batch {
        /// Auction date as MM/DD/YYYY or YYYY-MM-DD (defaults to today)
        #[arg(long, value_parser = parse_auction_date)]
        date: Option<NaiveDate>,

        /// Counties file to use instead of SURPLUS_COUNTIES_PATH
        #[arg(long)]
        counties: Option<PathBuf>,

        /// Scrape and write local files without posting to the spreadsheet
        #[arg(long)]
        dry_run: bool,
    },
}

/// Accepts the site's `MM/DD/YYYY` form or ISO `YYYY-MM-DD`.
fn parse_auction_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{raw}': expected MM/DD/YYYY or YYYY-MM-DD"))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = surplus_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run {
            host,
            county,
            date,
            dry_run,
        } => {
            let target = collect::resolve_target(&config, host.as_deref(), county.as_deref())?;
            collect::run_single(&config, target, date.unwrap_or_else(today), dry_run).await
        }
        Commands::Batch {
            date,
            counties,
            dry_run,
        } => {
            let path = counties.unwrap_or_else(|| config.counties_path.clone());
            collect::run_all(&config, &path, date.unwrap_or_else(today), dry_run).await
        }
    }
}

#[cfg(test)]
mod tests;
