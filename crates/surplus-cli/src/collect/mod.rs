//! Scrape command handlers for the CLI.
//!
//! These are called from `main` after config is loaded. Per-county failures
//! are logged and retried once rather than propagated, so a single blocked
//! county site does not abort the batch.

mod county;
mod runner;

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use surplus_core::{AppConfig, CountyConfig};

use self::county::CountyPipeline;
use self::runner::{run_batch, BatchReport, Delivery};

/// Picks the county for a single run: an explicit host, a county looked up in
/// the counties file, or the configured default host.
///
/// # Errors
///
/// Returns an error if the counties file cannot be loaded or has no entry
/// matching `county`.
pub(crate) fn resolve_target(
    config: &AppConfig,
    host: Option<&str>,
    county: Option<&str>,
) -> anyhow::Result<CountyConfig> {
    if let Some(host) = host {
        return Ok(CountyConfig::from_host(host.trim()));
    }
    if let Some(name) = county {
        let file = surplus_core::load_counties(&config.counties_path)?;
        return file.find(name).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "county '{name}' not found in {}",
                config.counties_path.display()
            )
        });
    }
    Ok(CountyConfig::from_host(&config.auction_host))
}

/// Scrape one county for `date`, retrying it once if the first attempt fails.
///
/// # Errors
///
/// Returns an error if the HTTP clients cannot be built or the county fails
/// both attempts.
pub(crate) async fn run_single(
    config: &AppConfig,
    county: CountyConfig,
    date: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<()> {
    let pipeline = CountyPipeline::new(config, date, dry_run)?;
    let counties = [county];
    let report = run_batch(&counties, |c| pipeline.process(c)).await;
    finish(&report, counties.len())
}

/// Scrape every county in the counties file at `path` for `date`.
///
/// # Errors
///
/// Returns an error if the counties file is invalid, the HTTP clients cannot
/// be built, or every county fails.
pub(crate) async fn run_all(
    config: &AppConfig,
    path: &Path,
    date: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<()> {
    let file = surplus_core::load_counties(path)
        .with_context(|| format!("failed to load counties from {}", path.display()))?;
    if file.counties.is_empty() {
        println!("no counties configured in {}; nothing to do", path.display());
        return Ok(());
    }

    let pipeline = CountyPipeline::new(config, date, dry_run)?;
    let report = run_batch(&file.counties, |c| pipeline.process(c)).await;
    finish(&report, file.counties.len())
}

/// Prints the per-county outcome and fails only when no county succeeded.
fn finish(report: &BatchReport, county_count: usize) -> anyhow::Result<()> {
    for line in outcome_lines(report) {
        println!("{line}");
    }

    let delivery_failures = report.delivery_failures().count();
    if !report.failed.is_empty() || delivery_failures > 0 {
        tracing::warn!(
            failed_counties = report.failed.len(),
            delivery_failures,
            total_counties = county_count,
            "some counties did not complete"
        );
    }

    if report.failed.len() == county_count {
        anyhow::bail!("all {county_count} counties failed");
    }
    Ok(())
}

fn outcome_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();
    for summary in &report.succeeded {
        let delivery = match &summary.delivery {
            Delivery::Sent => "delivered".to_string(),
            Delivery::Skipped => "not delivered".to_string(),
            Delivery::Failed(reason) => format!("delivery failed: {reason}"),
        };
        let retried = if report.recovered.contains(&summary.county) {
            ", recovered on retry"
        } else {
            ""
        };
        lines.push(format!(
            "{}: {} auctions, {} third-party sales, {} value warnings, {}{} ({})",
            summary.county,
            summary.auctions,
            summary.cleaned,
            summary.warnings,
            delivery,
            retried,
            summary.artifacts.display()
        ));
    }
    for failure in &report.failed {
        lines.push(format!("{}: FAILED: {}", failure.county, failure.error));
    }
    lines
}
