//! Delivery of cleaned rows to the spreadsheet web-app endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use surplus_core::{format_currency, CleanedAuction};

use crate::ExportError;

/// One spreadsheet row. Field order is the sheet's column order, and money
/// columns are pre-formatted as `$x.xx` (empty when missing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    #[serde(rename = "Auction Date")]
    pub auction_date: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Auction Type")]
    pub auction_type: String,
    #[serde(rename = "Sold Amount")]
    pub sold_amount: String,
    #[serde(rename = "Opening Bid")]
    pub opening_bid: String,
    #[serde(rename = "Excess Amount")]
    pub excess_amount: String,
    #[serde(rename = "Case #")]
    pub case_number: String,
    #[serde(rename = "Parcel ID")]
    pub parcel_id: String,
    #[serde(rename = "Property Address")]
    pub property_address: String,
    #[serde(rename = "Property City")]
    pub property_city: String,
    #[serde(rename = "Property State")]
    pub property_state: String,
    #[serde(rename = "Property Zip")]
    pub property_zip: String,
    #[serde(rename = "Assessed Value")]
    pub assessed_value: String,
    #[serde(rename = "Auction Status")]
    pub auction_status: String,
    #[serde(rename = "Certificate #")]
    pub certificate_number: String,
    #[serde(rename = "Sold Date")]
    pub sold_date: String,
    #[serde(rename = "Sold To")]
    pub sold_to: String,
    #[serde(rename = "Final Judgment Amount")]
    pub final_judgment_amount: String,
    #[serde(rename = "Plaintiff Max Bid")]
    pub plaintiff_max_bid: String,
}

impl From<&CleanedAuction> for SheetRow {
    fn from(row: &CleanedAuction) -> Self {
        Self {
            auction_date: row.auction_date.clone(),
            county: row.county.clone(),
            auction_type: row.auction_type.clone(),
            sold_amount: format_currency(row.sold_amount),
            opening_bid: format_currency(row.opening_bid),
            excess_amount: format_currency(row.excess_amount),
            case_number: row.case_number.clone(),
            parcel_id: row.parcel_id.clone(),
            property_address: row.property_address.clone(),
            property_city: row.property_city.clone(),
            property_state: row.property_state.clone(),
            property_zip: row.property_zip.clone(),
            assessed_value: format_currency(row.assessed_value),
            auction_status: row.auction_status.clone(),
            certificate_number: row.certificate_number.clone(),
            sold_date: row.sold_date.clone(),
            sold_to: row.sold_to.clone(),
            final_judgment_amount: format_currency(row.final_judgment_amount),
            plaintiff_max_bid: row.plaintiff_max_bid.clone(),
        }
    }
}

/// Request body: `{ "date": "MM/DD/YYYY", "items": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetPayload {
    pub date: String,
    pub items: Vec<SheetRow>,
}

impl SheetPayload {
    #[must_use]
    pub fn new(date: &str, rows: &[CleanedAuction]) -> Self {
        Self {
            date: date.to_owned(),
            items: rows.iter().map(SheetRow::from).collect(),
        }
    }
}

/// Posts cleaned rows to the spreadsheet endpoint. Only HTTP 200 counts as
/// delivered.
pub struct SheetClient {
    client: Client,
    url: String,
}

impl SheetClient {
    /// # Errors
    ///
    /// Returns [`ExportError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// Sends `rows` for `date` and returns the endpoint's response text.
    ///
    /// # Errors
    ///
    /// - [`ExportError::Http`] on network failure.
    /// - [`ExportError::SheetRejected`] for any status other than 200.
    pub async fn send(&self, date: &str, rows: &[CleanedAuction]) -> Result<String, ExportError> {
        let payload = SheetPayload::new(date, rows);
        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            tracing::error!(status = status.as_u16(), %body, "spreadsheet endpoint rejected rows");
            return Err(ExportError::SheetRejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            date,
            items = payload.items.len(),
            "delivered rows to spreadsheet"
        );
        Ok(body)
    }
}
