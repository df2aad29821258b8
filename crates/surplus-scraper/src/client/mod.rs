//! Auction-platform client: session setup and per-page detail/status fetches.

mod fetch_all;
mod origin;

use chrono::NaiveDate;

use crate::detail::parse_detail_response;
use crate::error::ScraperError;
use crate::retry::{retry_fixed, RetryPolicy};
use crate::status::parse_status_response;
use crate::transport::{FetchRequest, Session, Transport};
use crate::types::{DetailPage, StatusPage};

pub use origin::site_origin;

/// Maximum number of pages to walk for one county/date.
///
/// Each page costs a detail and a status request, each retried up to the
/// policy's attempt count.
pub(super) const MAX_PAGES: usize = 200;

/// Offset between the `tx` and `_` cache-busting parameters of a status request.
const STATUS_CACHE_BUST_OFFSET_MS: i64 = 321;

/// Client for one county auction site.
///
/// Every network step (session, detail page, status page) runs inside the
/// same fixed-delay retry policy; decoding and parsing happen inside the
/// retried step, so a malformed body is retried like a dropped connection.
pub struct AuctionClient<T> {
    pub(super) transport: T,
    pub(super) origin: String,
    pub(super) host: String,
    pub(super) retry: RetryPolicy,
    /// Pause before every page after the first.
    pub(super) inter_request_delay_ms: u64,
}

impl<T: Transport> AuctionClient<T> {
    /// `site` is a bare hostname or a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `site` has no usable host.
    pub fn new(
        transport: T,
        site: &str,
        retry: RetryPolicy,
        inter_request_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let (origin, host) = site_origin(site)?;
        Ok(Self {
            transport,
            origin,
            host,
            retry,
            inter_request_delay_ms,
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Preview page for `date`; opening it establishes the session.
    #[must_use]
    pub fn preview_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/index.cfm?zaction=AUCTION&zmethod=PREVIEW&AuctionDate={}",
            self.origin,
            date.format("%m/%d/%Y")
        )
    }

    /// Detail listing for `page` (1-based).
    #[must_use]
    pub fn detail_url(&self, page: u32) -> String {
        format!(
            "{}/index.cfm?zaction=AUCTION&Zmethod=UPDATE&FNC=LOAD&AREA=C&PageDir=1&doR=0&bypassPage={page}",
            self.origin
        )
    }

    /// Status feed for the auctions in `rlist`, stamped with `now_ms`.
    #[must_use]
    pub fn status_url(&self, rlist: &[String], now_ms: i64) -> String {
        format!(
            "{}/index.cfm?zaction=AUCTION&ZMETHOD=UPDATE&FNC=UPDATE&ref={}&tx={now_ms}&_={}",
            self.origin,
            rlist.join(","),
            now_ms - STATUS_CACHE_BUST_OFFSET_MS
        )
    }

    /// Opens the preview page for `date` and collects its cookies.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RetriesExhausted`] once every attempt has failed,
    /// or the first non-retriable error.
    pub async fn open_session(&self, date: NaiveDate) -> Result<Session, ScraperError> {
        let url = self.preview_url(date);
        tracing::info!(host = %self.host, %url, "initializing session");
        let operation = format!("session for {}", self.host);
        let session = retry_fixed(self.retry, &operation, || self.transport.navigate(&url)).await?;
        tracing::info!(
            host = %self.host,
            cookies = session.cookies.len(),
            "session initialized"
        );
        Ok(session)
    }

    /// Fetches, decodes and parses one detail page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RetriesExhausted`] once every attempt has failed,
    /// or the first non-retriable error.
    pub async fn fetch_detail_page(
        &self,
        session: &Session,
        page: u32,
    ) -> Result<DetailPage, ScraperError> {
        let request = FetchRequest {
            url: self.detail_url(page),
            referer: None,
            xhr: false,
        };
        let operation = format!("detail page {page}");

        retry_fixed(self.retry, &operation, || {
            let request = &request;
            let operation = &operation;
            async move {
                let body = self.transport.fetch(session, request).await?;
                parse_detail_response(&body, operation)
            }
        })
        .await
    }

    /// Fetches, decodes and parses the status feed for one page's auctions.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RetriesExhausted`] once every attempt has failed,
    /// or the first non-retriable error.
    pub async fn fetch_status_page(
        &self,
        session: &Session,
        page: u32,
        rlist: &[String],
    ) -> Result<StatusPage, ScraperError> {
        let operation = format!("status page {page}");

        retry_fixed(self.retry, &operation, || {
            let operation = &operation;
            async move {
                let request = FetchRequest {
                    url: self.status_url(rlist, chrono::Utc::now().timestamp_millis()),
                    referer: Some(session.landing_url.clone()),
                    xhr: true,
                };
                let body = self.transport.fetch(session, &request).await?;
                parse_status_response(&body, operation)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
