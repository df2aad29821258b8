//! On-disk artifacts for one county/date run.
//!
//! Layout under the results root:
//!
//! ```text
//! <root>/<county-slug>/<YYYY-MM-DD>/
//!     detail_page_<n>.json     parsed detail page
//!     status_page_<n>.json     parsed status page
//!     merged_page_<n>.json     merged page
//!     cleaned_data.json        cleaned rows
//!     <MM-DD-YYYY>.csv         cleaned rows, fixed column order
//!     <MM-DD-YYYY>_final.json  {pageInfo, resetRequired, auctions}
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use surplus_core::{format_currency, CleanedAuction, CSV_COLUMNS};
use surplus_scraper::AuctionRun;

use crate::ExportError;

/// Paths written by [`ResultsDir::write_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub dir: PathBuf,
    pub snapshots: Vec<PathBuf>,
    pub cleaned_json: PathBuf,
    pub csv: PathBuf,
    pub final_json: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ResultsDir {
    root: PathBuf,
}

impl ResultsDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every artifact for `county_slug` on `date`.
    #[must_use]
    pub fn run_dir(&self, county_slug: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(county_slug)
            .join(date.format("%Y-%m-%d").to_string())
    }

    /// Writes snapshots, cleaned JSON, cleaned CSV and the final dump.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if a directory or file cannot be written.
    pub fn write_run(
        &self,
        county_slug: &str,
        date: NaiveDate,
        run: &AuctionRun,
        cleaned: &[CleanedAuction],
    ) -> Result<ExportPaths, ExportError> {
        let dir = self.run_dir(county_slug, date);
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        let snapshots = write_page_snapshots(&dir, run)?;

        let stem = date.format("%m-%d-%Y").to_string();
        let cleaned_json = dir.join("cleaned_data.json");
        write_json(&cleaned_json, cleaned)?;

        let csv = dir.join(format!("{stem}.csv"));
        write_cleaned_csv(&csv, cleaned)?;

        let final_json = dir.join(format!("{stem}_final.json"));
        write_json(&final_json, run)?;

        tracing::info!(
            county = county_slug,
            dir = %dir.display(),
            pages = run.pages.len(),
            cleaned = cleaned.len(),
            "wrote run artifacts"
        );

        Ok(ExportPaths {
            dir,
            snapshots,
            cleaned_json,
            csv,
            final_json,
        })
    }
}

fn write_page_snapshots(dir: &Path, run: &AuctionRun) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::with_capacity(run.pages.len() * 3);
    for trace in &run.pages {
        let detail = dir.join(format!("detail_page_{}.json", trace.page));
        write_json(&detail, &trace.detail)?;
        let status = dir.join(format!("status_page_{}.json", trace.page));
        write_json(&status, &trace.status)?;
        let merged = dir.join(format!("merged_page_{}.json", trace.page));
        write_json(&merged, &trace.merged)?;
        written.extend([detail, status, merged]);
    }
    Ok(written)
}

/// Pretty-prints `value` as JSON to `path`.
///
/// # Errors
///
/// Returns [`ExportError::Io`] or [`ExportError::Json`].
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| ExportError::Json {
        context: path.display().to_string(),
        source: e,
    })?;
    writer.flush().map_err(|e| io_error(path, e))
}

/// Writes cleaned rows as CSV with [`CSV_COLUMNS`] as the header.
///
/// Money columns are rendered as `$x.xx`; a missing amount is an empty cell.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the file cannot be created or written.
pub fn write_cleaned_csv(path: &Path, rows: &[CleanedAuction]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.write_record(csv_record(row))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

fn csv_record(row: &CleanedAuction) -> [String; 18] {
    [
        row.auction_date.clone(),
        row.county.clone(),
        row.auction_type.clone(),
        format_currency(row.sold_amount),
        format_currency(row.opening_bid),
        format_currency(row.excess_amount),
        row.case_number.clone(),
        row.parcel_id.clone(),
        row.property_address.clone(),
        row.property_city.clone(),
        row.property_state.clone(),
        row.property_zip.clone(),
        format_currency(row.assessed_value),
        row.auction_status.clone(),
        row.certificate_number.clone(),
        row.sold_date.clone(),
        row.sold_to.clone(),
        format_currency(row.final_judgment_amount),
    ]
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "files_test.rs"]
mod tests;
