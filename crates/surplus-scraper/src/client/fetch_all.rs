//! Multi-page walk for `AuctionClient`.

use std::time::Duration;

use crate::error::ScraperError;
use crate::merge::merge_page;
use crate::pagination::{FetchState, NextPage, PageCursor};
use crate::transport::{Session, Transport};
use crate::types::{AuctionRun, PageTrace};

use super::AuctionClient;
use super::MAX_PAGES;

impl<T: Transport> AuctionClient<T> {
    /// Walks every page of the listing for the session's date.
    ///
    /// Each page is a detail fetch, a status fetch for the ids the detail page
    /// named, and a merge. The walk ends after the page total reported by the
    /// first status page, or immediately if that page has no auctions.
    ///
    /// **All-or-nothing semantics**: if any step exhausts its retries, pages
    /// already merged are discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_detail_page`] or
    /// [`Self::fetch_status_page`]. Returns [`ScraperError::PaginationLimit`]
    /// if the walk would exceed [`MAX_PAGES`].
    pub async fn fetch_all_pages(&self, session: &Session) -> Result<AuctionRun, ScraperError> {
        let mut run = AuctionRun::default();
        let mut cursor = PageCursor::new();
        let mut state = FetchState::FetchingDetail { page: 1 };

        loop {
            state = match state {
                FetchState::FetchingDetail { page } => {
                    if usize::try_from(page).unwrap_or(usize::MAX) > MAX_PAGES {
                        return Err(ScraperError::PaginationLimit {
                            max_pages: MAX_PAGES,
                        });
                    }
                    if page > 1 && self.inter_request_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms))
                            .await;
                    }
                    tracing::debug!(host = %self.host, page, "fetching detail page");
                    let detail = self.fetch_detail_page(session, page).await?;
                    FetchState::FetchingStatus { page, detail }
                }

                FetchState::FetchingStatus { page, detail } => {
                    tracing::debug!(
                        host = %self.host,
                        page,
                        references = detail.rlist.len(),
                        "fetching status page"
                    );
                    let status = self.fetch_status_page(session, page, &detail.rlist).await?;
                    if cursor.is_zero_page(&status) {
                        tracing::info!(host = %self.host, "no auctions for this date");
                        run.page_info = status.page_info;
                        run.reset_required = status.reset_required;
                        FetchState::Done
                    } else {
                        FetchState::Merging {
                            page,
                            detail,
                            status,
                        }
                    }
                }

                FetchState::Merging {
                    page,
                    detail,
                    status,
                } => {
                    let merged = merge_page(&detail, &status);
                    let next = cursor.advance(page, &status);
                    tracing::info!(
                        host = %self.host,
                        page,
                        total = cursor.total().unwrap_or_default(),
                        auctions = merged.auctions.len(),
                        "processed page"
                    );

                    run.auctions.extend(merged.auctions.iter().cloned());
                    run.page_info = merged.page_info.clone();
                    run.reset_required = merged.reset_required.clone();
                    run.pages.push(PageTrace {
                        page,
                        detail,
                        status,
                        merged,
                    });

                    match next {
                        NextPage::Page(next) => FetchState::FetchingDetail { page: next },
                        NextPage::Done => FetchState::Done,
                    }
                }

                FetchState::Done => break,
            };
        }

        tracing::info!(
            host = %self.host,
            pages = run.pages.len(),
            auctions = run.auctions.len(),
            "fetched all pages"
        );
        Ok(run)
    }
}
