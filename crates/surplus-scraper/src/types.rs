//! Auction-platform payload shapes and the records parsed from them.
//!
//! ## Observed wire shapes
//!
//! ### Detail payload (`FNC=LOAD`)
//! A JSON object with `retHTML`, a token-compressed HTML fragment holding one
//! `.AUCTION_ITEM` block per auction, and `rlist`, a comma-separated string of
//! auction ids in the same order as those blocks. `rlist` is `""` on an empty
//! page.
//!
//! ### Status payload (`FNC=UPDATE`)
//! A JSON object of short upper-case keys. `CC`/`CM` are the current and total
//! page (sometimes strings, sometimes numbers). `ADATA.AITEM` is the per-auction
//! list and `RTIME.RITEM` the countdown list. All of them are absent on a date
//! with no auctions. Scalar values arrive as either strings or numbers, so
//! they are modelled as `serde_json::Value` and rendered to text where needed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetailPayload {
    #[serde(rename = "retHTML")]
    pub ret_html: Option<String>,
    pub rlist: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawStatusPayload {
    #[serde(rename = "CC")]
    pub cc: Option<Value>,
    #[serde(rename = "CM")]
    pub cm: Option<Value>,
    #[serde(rename = "WC", default)]
    pub wc: Value,
    #[serde(rename = "WM", default)]
    pub wm: Value,
    #[serde(rename = "NC", default)]
    pub nc: Value,
    #[serde(rename = "RA", default)]
    pub ra: Value,
    #[serde(rename = "RR", default)]
    pub rr: Value,
    #[serde(rename = "RC", default)]
    pub rc: Value,
    #[serde(rename = "RW", default)]
    pub rw: Value,
    #[serde(rename = "ADATA")]
    pub adata: Option<RawStatusItems>,
    #[serde(rename = "RTIME")]
    pub rtime: Option<RawRemainingTimes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStatusItems {
    #[serde(rename = "AITEM")]
    pub aitem: Option<Vec<RawStatusItem>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRemainingTimes {
    #[serde(rename = "RITEM")]
    pub ritem: Option<Vec<RawRemainingTime>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStatusItem {
    #[serde(rename = "AID")]
    pub aid: Option<Value>,
    #[serde(rename = "A", default)]
    pub a: Value,
    #[serde(rename = "B", default)]
    pub b: Value,
    #[serde(rename = "C", default)]
    pub c: Value,
    #[serde(rename = "D", default)]
    pub d: Value,
    #[serde(rename = "E", default)]
    pub e: Value,
    #[serde(rename = "F", default)]
    pub f: Value,
    #[serde(rename = "G", default)]
    pub g: Value,
    #[serde(rename = "H", default)]
    pub h: Value,
    #[serde(rename = "I", default)]
    pub i: Value,
    #[serde(rename = "P", default)]
    pub p: Value,
    #[serde(rename = "PB", default)]
    pub pb: Value,
    #[serde(rename = "PS", default)]
    pub ps: Value,
    #[serde(rename = "S", default)]
    pub s: Value,
    #[serde(rename = "SBH", default)]
    pub sbh: Value,
    #[serde(rename = "SL", default)]
    pub sl: Value,
    #[serde(rename = "SP", default)]
    pub sp: Value,
    #[serde(rename = "ST", default)]
    pub st: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRemainingTime {
    #[serde(rename = "AID", default)]
    pub aid: Value,
    #[serde(rename = "TREM", default)]
    pub trem: Value,
}

/// Renders a loosely typed payload scalar as text. `null` becomes `""`.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Detail listing
// ---------------------------------------------------------------------------

/// Labelled fields of one `.AUCTION_ITEM` block, e.g. `"Case #" → "2023CA001234"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DetailRecord {
    pub fields: BTreeMap<String, String>,
}

impl DetailRecord {
    /// Field value by label, `""` when the label was not present.
    #[must_use]
    pub fn get(&self, label: &str) -> &str {
        self.fields.get(label).map_or("", String::as_str)
    }
}

/// One parsed detail page: records in page order plus the id reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailPage {
    pub auctions: Vec<DetailRecord>,
    pub rlist: Vec<String>,
}

// ---------------------------------------------------------------------------
// Status feed
// ---------------------------------------------------------------------------

/// Outcome of decoding one symbolic status field.
///
/// Serializes untagged: a phrase or literal as itself, a flag as a JSON bool,
/// and an unmapped code as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved {
    Phrase(String),
    Flag(bool),
    Literal(Value),
    Unmapped,
}

impl Resolved {
    /// Display text for exports: phrase or literal text, `"true"`/`"false"`
    /// for flags, `""` when unmapped.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Phrase(s) => s.clone(),
            Self::Flag(b) => b.to_string(),
            Self::Literal(v) => value_text(v),
            Self::Unmapped => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub message: Resolved,
    pub timestamp: String,
}

/// A label/value pair as shown in the auction panel, e.g. `"Sold To"` / `"3rd Party Bidder"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraInfo {
    pub proxy_bid: Resolved,
    #[serde(rename = "F")]
    pub f: Value,
    #[serde(rename = "G")]
    pub g: Value,
    #[serde(rename = "H")]
    pub h: Value,
    pub name_on_title: Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidInfo {
    pub place_bid: Resolved,
    pub show_place_bid: Value,
    pub show_bid_history: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleInfo {
    pub panel_status: Resolved,
    pub item_type: Resolved,
    pub price_visibility: Resolved,
}

/// Live status of one auction from the status feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub id: String,
    pub status: StatusMessage,
    pub amount: LabeledValue,
    pub sold_to: LabeledValue,
    pub extra_info: ExtraInfo,
    pub bid_info: BidInfo,
    pub style_info: StyleInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WinningInfo {
    pub count: Value,
    pub max: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current: u32,
    pub total: u32,
    pub winning: WinningInfo,
    pub next_check: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetFlags {
    pub all: Value,
    pub regular: Value,
    pub completed: Value,
    pub winning: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingTime {
    pub id: String,
    pub time_remaining: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPage {
    pub page_info: PageInfo,
    pub reset_required: ResetFlags,
    pub auctions: Vec<StatusRecord>,
    pub remaining_time: Vec<RemainingTime>,
}

impl StatusPage {
    /// `true` for the "no auctions today" shape: zero total or no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page_info.total == 0 || self.auctions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Merged output
// ---------------------------------------------------------------------------

/// Detail fields attached to a status record. Missing details are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionDetails {
    pub auction_type: String,
    pub case_number: String,
    pub final_judgment_amount: String,
    pub parcel_id: String,
    pub assessed_value: String,
    pub plaintiff_max_bid: String,
    pub property_address: String,
    pub property_city: String,
    pub property_state: String,
    pub property_zip: String,
    pub certificate_number: String,
    pub opening_bid: String,
}

/// A status record joined with its detail record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedAuction {
    #[serde(flatten)]
    pub status: StatusRecord,
    pub details: AuctionDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPage {
    pub page_info: PageInfo,
    pub reset_required: ResetFlags,
    pub auctions: Vec<MergedAuction>,
    pub rlist: Vec<String>,
}

/// Everything fetched for one page, kept for diagnostic snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTrace {
    pub page: u32,
    pub detail: DetailPage,
    pub status: StatusPage,
    pub merged: MergedPage,
}

/// Accumulated result of one county/date run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRun {
    pub page_info: PageInfo,
    pub reset_required: ResetFlags,
    pub auctions: Vec<MergedAuction>,
    #[serde(skip)]
    pub pages: Vec<PageTrace>,
}
