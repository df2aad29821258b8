//! Sequential multi-county driver.
//!
//! Provides `CountySummary`, `BatchReport`, and `run_batch`, which walks the
//! county list once and then gives every failed county exactly one more try.

use std::future::Future;
use std::path::PathBuf;

use surplus_core::CountyConfig;

/// What happened to the cleaned rows after they were written locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Delivery {
    Sent,
    /// No spreadsheet endpoint configured, or a dry run.
    Skipped,
    Failed(String),
}

/// Result of one county whose scrape completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountySummary {
    pub county: String,
    pub auctions: usize,
    pub cleaned: usize,
    pub warnings: usize,
    pub artifacts: PathBuf,
    pub delivery: Delivery,
}

/// A county that failed both the main pass and its retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountyFailure {
    pub county: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub(crate) struct BatchReport {
    pub succeeded: Vec<CountySummary>,
    pub failed: Vec<CountyFailure>,
    /// Counties that failed the main pass and succeeded on retry.
    pub recovered: Vec<String>,
}

impl BatchReport {
    pub(crate) fn delivery_failures(&self) -> impl Iterator<Item = &CountySummary> {
        self.succeeded
            .iter()
            .filter(|s| matches!(s.delivery, Delivery::Failed(_)))
    }
}

/// Runs `process` for each county in order, then retries failed counties once.
///
/// An `Err` from `process` means the session, fetch or file write failed and
/// the county is eligible for the retry pass. Delivery problems come back as
/// `Ok` with [`Delivery::Failed`] and are never retried.
pub(crate) async fn run_batch<'a, F, Fut>(
    counties: &'a [CountyConfig],
    mut process: F,
) -> BatchReport
where
    F: FnMut(&'a CountyConfig) -> Fut,
    Fut: Future<Output = anyhow::Result<CountySummary>>,
{
    let mut report = BatchReport::default();
    let mut retry: Vec<&'a CountyConfig> = Vec::new();

    for county in counties {
        tracing::info!(county = %county.name, host = %county.host, "processing county");
        match process(county).await {
            Ok(summary) => record_success(&mut report, summary),
            Err(e) => {
                let message = format!("{e:#}");
                tracing::error!(
                    county = %county.name,
                    error = %message,
                    "county failed; will retry"
                );
                retry.push(county);
            }
        }
    }

    if !retry.is_empty() {
        tracing::info!(count = retry.len(), "retrying failed counties");
    }

    for county in retry {
        match process(county).await {
            Ok(summary) => {
                tracing::info!(county = %county.name, "county succeeded on retry");
                report.recovered.push(county.name.clone());
                record_success(&mut report, summary);
            }
            Err(e) => {
                let message = format!("{e:#}");
                tracing::error!(
                    county = %county.name,
                    error = %message,
                    "county failed after retry"
                );
                report.failed.push(CountyFailure {
                    county: county.name.clone(),
                    error: message,
                });
            }
        }
    }

    report
}

fn record_success(report: &mut BatchReport, summary: CountySummary) {
    if let Delivery::Failed(reason) = &summary.delivery {
        tracing::warn!(county = %summary.county, error = %reason, "spreadsheet delivery failed");
    }
    report.succeeded.push(summary);
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
