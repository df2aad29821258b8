//! Page-walk state for one county/date run.
//!
//! The status feed reports the total page count. It is read once from the
//! first status page; later pages that report a different total are logged
//! and ignored, so the walk length is fixed once it starts.

use crate::types::{DetailPage, StatusPage};

/// Where the page walk is. Each fetch state owns what the previous step produced.
#[derive(Debug)]
pub(crate) enum FetchState {
    FetchingDetail {
        page: u32,
    },
    FetchingStatus {
        page: u32,
        detail: DetailPage,
    },
    Merging {
        page: u32,
        detail: DetailPage,
        status: StatusPage,
    },
    Done,
}

/// Outcome of [`PageCursor::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    Page(u32),
    Done,
}

/// Tracks the current page index against the total learned from page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    total: Option<u32>,
}

impl PageCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total page count, once the first status page has been seen.
    #[must_use]
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// `true` when `status` is the first page and reports nothing to walk:
    /// a zero total or no auction items.
    #[must_use]
    pub fn is_zero_page(&self, status: &StatusPage) -> bool {
        self.total.is_none() && status.is_empty()
    }

    /// Records `status` for `page` and decides what to fetch next.
    pub fn advance(&mut self, page: u32, status: &StatusPage) -> NextPage {
        let reported = status.page_info.total;
        let total = *self.total.get_or_insert(reported);
        if reported != total {
            tracing::warn!(
                page,
                first_total = total,
                reported_total = reported,
                "status feed changed its page total mid-run; keeping the first value"
            );
        }

        let next = page.saturating_add(1);
        if next > total {
            NextPage::Done
        } else {
            NextPage::Page(next)
        }
    }
}
