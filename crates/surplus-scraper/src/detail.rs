//! Detail-listing parser: token-compressed HTML → one [`DetailRecord`] per auction.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;
use crate::expand::expand_tokens;
use crate::types::{value_text, DetailPage, DetailRecord, RawDetailPayload};

static ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".AUCTION_ITEM").expect("valid selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("valid selector"));
static VALUE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

const ADDRESS_LABEL: &str = "Property Address";
const PARCEL_LABEL: &str = "Parcel ID";

/// Decodes a raw detail response body and parses it.
///
/// # Errors
///
/// - [`ScraperError::Deserialize`] if the body is not JSON.
/// - [`ScraperError::Parse`] if `retHTML` or `rlist` is missing.
/// - [`ScraperError::ReferenceMismatch`] if `rlist` and the item blocks disagree in count.
pub fn parse_detail_response(body: &str, context: &str) -> Result<DetailPage, ScraperError> {
    let payload: RawDetailPayload =
        serde_json::from_str(body.trim()).map_err(|e| ScraperError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;
    parse_detail_payload(payload)
}

pub(crate) fn parse_detail_payload(payload: RawDetailPayload) -> Result<DetailPage, ScraperError> {
    let html = payload
        .ret_html
        .ok_or_else(|| ScraperError::parse("detail payload", "missing retHTML"))?;
    let rlist = payload
        .rlist
        .ok_or_else(|| ScraperError::parse("detail payload", "missing rlist"))?;

    let rlist = split_reference_list(&value_text(&rlist));
    let auctions = parse_detail_html(&html);

    if rlist.len() != auctions.len() {
        return Err(ScraperError::ReferenceMismatch {
            references: rlist.len(),
            records: auctions.len(),
        });
    }

    tracing::debug!(auctions = auctions.len(), "parsed detail page");
    Ok(DetailPage { auctions, rlist })
}

/// Splits the comma-separated id list. An empty string is an empty list.
#[must_use]
pub fn split_reference_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|id| id.trim().to_owned()).collect()
}

/// Parses token-compressed listing HTML into records, in document order.
#[must_use]
pub fn parse_detail_html(raw_html: &str) -> Vec<DetailRecord> {
    let fragment = Html::parse_fragment(&expand_tokens(raw_html));
    fragment
        .select(&ITEM_SELECTOR)
        .map(parse_item)
        .collect()
}

fn parse_item(item: ElementRef<'_>) -> DetailRecord {
    let mut record = DetailRecord::default();
    let mut address_parts: Vec<String> = Vec::new();

    for row in item.select(&ROW_SELECTOR) {
        let (Some(label_cell), Some(value_cell)) = (
            row.select(&LABEL_SELECTOR).next(),
            row.select(&VALUE_SELECTOR).next(),
        ) else {
            continue;
        };

        let label = element_text(label_cell);
        let label = label.trim_end_matches(':').trim();

        let value = if label == PARCEL_LABEL {
            value_cell
                .select(&LINK_SELECTOR)
                .next()
                .map_or_else(|| element_text(value_cell), element_text)
        } else {
            element_text(value_cell)
        };

        if label == ADDRESS_LABEL || label.is_empty() {
            address_parts.push(value);
        } else if !value.is_empty() {
            record.fields.insert(label.to_owned(), value);
        }
    }

    let address = split_address(&address_parts.join(" "));
    record
        .fields
        .insert(ADDRESS_LABEL.to_owned(), address.street);
    record
        .fields
        .insert("Property City".to_owned(), address.city);
    record
        .fields
        .insert("Property State".to_owned(), address.state);
    record.fields.insert("Property Zip".to_owned(), address.zip);

    record
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Street line and locality parts reassembled from the address rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Splits `"123 Main St, FL-34202"` into street, city, state and zip.
///
/// The listing does not carry a separate city, so the city is the last word
/// of the street line. Anything that is not exactly `street, STATE-ZIP` keeps
/// the whole text as the street with empty city, state and zip.
#[must_use]
pub fn split_address(full: &str) -> AddressParts {
    let parts: Vec<&str> = full.split(',').collect();
    let [street, locality] = parts.as_slice() else {
        return AddressParts {
            street: full.to_owned(),
            ..AddressParts::default()
        };
    };

    let street = street.trim();
    match locality.trim().rsplit_once('-') {
        Some((state, zip)) => AddressParts {
            street: street.to_owned(),
            city: street
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .to_owned(),
            state: state.trim().to_owned(),
            zip: zip.trim().to_owned(),
        },
        None => AddressParts {
            street: street.to_owned(),
            ..AddressParts::default()
        },
    }
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
