//! Per-county pipeline: session, page walk, cleaning, files, delivery.

use anyhow::Context;
use chrono::NaiveDate;
use surplus_core::{AppConfig, CountyConfig};
use surplus_export::{ResultsDir, SheetClient};
use surplus_scraper::{clean_auctions, AuctionClient, HttpTransport, RetryPolicy};

use super::runner::{CountySummary, Delivery};

/// Everything shared by the counties of one run. One transport serves all
/// counties so they go through the same proxy client.
pub(super) struct CountyPipeline {
    transport: HttpTransport,
    retry: RetryPolicy,
    inter_request_delay_ms: u64,
    results: ResultsDir,
    sheet: Option<SheetClient>,
    date: NaiveDate,
    dry_run: bool,
}

impl CountyPipeline {
    /// # Errors
    ///
    /// Returns an error if the scraper or spreadsheet HTTP client cannot be
    /// built.
    pub(super) fn new(config: &AppConfig, date: NaiveDate, dry_run: bool) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.proxy.as_ref(),
        )
        .context("failed to build auction transport")?;

        if config.proxy.is_none() {
            tracing::warn!("no proxy configured; requesting auction sites directly");
        }

        let sheet = match (&config.spreadsheet_url, dry_run) {
            (Some(url), false) => Some(
                SheetClient::new(url, config.request_timeout_secs)
                    .context("failed to build spreadsheet client")?,
            ),
            (Some(_), true) => None,
            (None, _) => {
                tracing::info!("SPREADSHEET_APPS_SCRIPT_URL not set; delivery disabled");
                None
            }
        };

        Ok(Self {
            transport,
            retry: RetryPolicy::new(config.fetch_max_attempts, config.fetch_retry_delay_ms),
            inter_request_delay_ms: config.inter_request_delay_ms,
            results: ResultsDir::new(config.output_dir.clone()),
            sheet,
            date,
            dry_run,
        })
    }

    /// Runs the whole pipeline for `county`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened, a page cannot be
    /// fetched, or the artifacts cannot be written. Delivery failures are
    /// reported through [`Delivery::Failed`] instead.
    pub(super) async fn process(&self, county: &CountyConfig) -> anyhow::Result<CountySummary> {
        let client = AuctionClient::new(
            &self.transport,
            &county.host,
            self.retry,
            self.inter_request_delay_ms,
        )?;

        let session = client
            .open_session(self.date)
            .await
            .with_context(|| format!("failed to open session for {}", county.host))?;
        let run = client
            .fetch_all_pages(&session)
            .await
            .with_context(|| format!("failed to fetch auctions from {}", county.host))?;

        let auction_date = self.date.format("%m/%d/%Y").to_string();
        let report = clean_auctions(&run.auctions, &auction_date, &county.name);

        let paths = self
            .results
            .write_run(&county.slug(), self.date, &run, &report.auctions)
            .context("failed to write run artifacts")?;

        let delivery = match &self.sheet {
            Some(sheet) => match sheet.send(&auction_date, &report.auctions).await {
                Ok(_) => Delivery::Sent,
                Err(e) => Delivery::Failed(e.to_string()),
            },
            None => {
                if self.dry_run {
                    println!(
                        "dry-run: would deliver {} rows for {} on {auction_date}",
                        report.auctions.len(),
                        county.name
                    );
                }
                Delivery::Skipped
            }
        };

        tracing::info!(
            county = %county.name,
            auctions = run.auctions.len(),
            cleaned = report.auctions.len(),
            warnings = report.warnings.len(),
            "county complete"
        );

        Ok(CountySummary {
            county: county.name.clone(),
            auctions: run.auctions.len(),
            cleaned: report.auctions.len(),
            warnings: report.warnings.len(),
            artifacts: paths.dir,
            delivery,
        })
    }
}
