pub mod client;
pub mod detail;
pub mod error;
pub mod expand;
pub mod merge;
pub mod normalize;
pub mod pagination;
pub mod retry;
pub mod status;
pub mod transport;
pub mod types;

pub use client::AuctionClient;
pub use detail::{parse_detail_html, parse_detail_response, split_address};
pub use error::{ErrorKind, ScraperError};
pub use expand::expand_tokens;
pub use merge::merge_page;
pub use normalize::{clean_auctions, CleanReport, ValueWarning};
pub use retry::RetryPolicy;
pub use status::{parse_status_response, resolve_code};
pub use transport::{FetchRequest, HttpTransport, Session, SessionCookie, Transport};
pub use types::{
    AuctionDetails, AuctionRun, DetailPage, DetailRecord, MergedAuction, MergedPage, PageInfo,
    PageTrace, ResetFlags, Resolved, StatusPage, StatusRecord,
};
