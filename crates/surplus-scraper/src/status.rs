//! Status-feed parser: field-coded JSON → [`StatusPage`].

use serde_json::Value;

use crate::error::ScraperError;
use crate::types::{
    value_text, BidInfo, ExtraInfo, LabeledValue, PageInfo, RawRemainingTime, RawStatusItem,
    RawStatusPayload, RemainingTime, ResetFlags, Resolved, StatusMessage, StatusPage,
    StatusRecord, StyleInfo, WinningInfo,
};

/// Phrase table for the `A`/`B` codes, keyed `{field}_{code}`.
const PHRASES: [(&str, &str); 10] = [
    ("A_A", "Auction Starts"),
    ("A_B", "Auction Status"),
    ("PS_A", "NORMAL"),
    ("I_A", "Name on Title (Nickname)"),
    ("S_A", "AUCTION_ITEM_PUBLIC"),
    ("S_B", "AUCTION_ITEM"),
    ("P_A", "Hidden"),
    ("E_A", "My Proxy Bid"),
    ("E_B", "My Maximum Bid"),
    ("PB_A", "Place Bid"),
];

/// Decodes one coded status field.
///
/// `"A"`/`"B"` look up the phrase for `field` (unknown combinations are
/// [`Resolved::Unmapped`]), `"-"`/`"+"` are `false`/`true`, and every other
/// value passes through as a literal.
#[must_use]
pub fn resolve_code(field: &str, raw: &Value) -> Resolved {
    match raw.as_str() {
        Some(code @ ("A" | "B")) => {
            let key = format!("{field}_{code}");
            PHRASES
                .iter()
                .find(|(k, _)| *k == key)
                .map_or(Resolved::Unmapped, |(_, phrase)| {
                    Resolved::Phrase((*phrase).to_owned())
                })
        }
        Some("-") => Resolved::Flag(false),
        Some("+") => Resolved::Flag(true),
        _ => Resolved::Literal(raw.clone()),
    }
}

/// Decodes a raw status response body and parses it.
///
/// # Errors
///
/// - [`ScraperError::Deserialize`] if the body is not a JSON object of the expected shape.
/// - [`ScraperError::Parse`] if `CC`/`CM` are not page numbers or an item lacks `AID`.
pub fn parse_status_response(body: &str, context: &str) -> Result<StatusPage, ScraperError> {
    let payload: RawStatusPayload =
        serde_json::from_str(body.trim()).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;
    parse_status_payload(payload)
}

pub(crate) fn parse_status_payload(payload: RawStatusPayload) -> Result<StatusPage, ScraperError> {
    let (Some(cc), Some(cm)) = (
        payload.cc.as_ref().filter(|v| !v.is_null()),
        payload.cm.as_ref().filter(|v| !v.is_null()),
    ) else {
        tracing::debug!("status payload has no page counters; treating as no auctions");
        return Ok(StatusPage::default());
    };

    let page_info = PageInfo {
        current: page_number("CC", cc)?,
        total: page_number("CM", cm)?,
        winning: WinningInfo {
            count: payload.wc,
            max: payload.wm,
        },
        next_check: payload.nc,
    };

    let reset_required = ResetFlags {
        all: payload.ra,
        regular: payload.rr,
        completed: payload.rc,
        winning: payload.rw,
    };

    let auctions = payload
        .adata
        .and_then(|items| items.aitem)
        .unwrap_or_default()
        .into_iter()
        .map(status_record)
        .collect::<Result<Vec<_>, _>>()?;

    let remaining_time = payload
        .rtime
        .and_then(|items| items.ritem)
        .unwrap_or_default()
        .into_iter()
        .map(remaining_time)
        .collect();

    Ok(StatusPage {
        page_info,
        reset_required,
        auctions,
        remaining_time,
    })
}

fn page_number(key: &str, value: &Value) -> Result<u32, ScraperError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ScraperError::parse(
            "status payload",
            format!("{key} is not a page number: {value}"),
        )
    })
}

fn status_record(item: RawStatusItem) -> Result<StatusRecord, ScraperError> {
    let id = item
        .aid
        .as_ref()
        .map(value_text)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ScraperError::parse("status payload", "auction item without AID"))?;

    Ok(StatusRecord {
        id,
        status: StatusMessage {
            message: resolve_code("A", &item.a),
            timestamp: value_text(&item.b),
        },
        amount: LabeledValue {
            label: value_text(&item.c),
            value: value_text(&item.d),
        },
        sold_to: LabeledValue {
            label: value_text(&item.sl),
            value: value_text(&item.st),
        },
        extra_info: ExtraInfo {
            proxy_bid: resolve_code("E", &item.e),
            f: item.f,
            g: item.g,
            h: item.h,
            name_on_title: resolve_code("I", &item.i),
        },
        bid_info: BidInfo {
            place_bid: resolve_code("PB", &item.pb),
            show_place_bid: item.sp,
            show_bid_history: item.sbh,
        },
        style_info: StyleInfo {
            panel_status: resolve_code("PS", &item.ps),
            item_type: resolve_code("S", &item.s),
            price_visibility: resolve_code("P", &item.p),
        },
    })
}

fn remaining_time(item: RawRemainingTime) -> RemainingTime {
    RemainingTime {
        id: value_text(&item.aid),
        time_remaining: item.trem,
    }
}
