//! Normalization from merged auctions to [`surplus_core::CleanedAuction`].
//!
//! Only finalized third-party sales survive. Currency text is parsed into
//! `Decimal`; unparseable amounts become `None` and are reported as
//! [`ValueWarning`]s instead of failing the run.

use rust_decimal::Decimal;
use serde::Serialize;
use surplus_core::{parse_currency, CleanedAuction, THIRD_PARTY_BIDDER};

use crate::types::MergedAuction;

/// Auction type whose excess is measured against the final judgment.
pub const FORECLOSURE: &str = "FORECLOSURE";

/// A currency cell that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueWarning {
    pub auction_id: String,
    pub field: &'static str,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub auctions: Vec<CleanedAuction>,
    pub warnings: Vec<ValueWarning>,
}

/// Filters `auctions` to third-party sales and converts each to a cleaned row.
#[must_use]
pub fn clean_auctions(auctions: &[MergedAuction], auction_date: &str, county: &str) -> CleanReport {
    let mut report = CleanReport::default();

    for auction in auctions
        .iter()
        .filter(|a| a.status.sold_to.value == THIRD_PARTY_BIDDER)
    {
        let cleaned = clean_auction(auction, auction_date, county, &mut report.warnings);
        report.auctions.push(cleaned);
    }

    tracing::info!(
        county,
        merged = auctions.len(),
        cleaned = report.auctions.len(),
        warnings = report.warnings.len(),
        "cleaned and filtered auctions"
    );
    report
}

fn clean_auction(
    auction: &MergedAuction,
    auction_date: &str,
    county: &str,
    warnings: &mut Vec<ValueWarning>,
) -> CleanedAuction {
    let details = &auction.details;
    let mut money = |field: &'static str, raw: &str| -> Option<Decimal> {
        parse_currency(raw).unwrap_or_else(|e| {
            tracing::warn!(
                auction_id = %auction.status.id,
                field,
                raw = %e.raw,
                "could not convert currency value"
            );
            warnings.push(ValueWarning {
                auction_id: auction.status.id.clone(),
                field,
                raw: e.raw,
            });
            None
        })
    };

    let sold_amount = money("Sold Amount", &auction.status.amount.value);
    let opening_bid = money("Opening Bid", &details.opening_bid);
    let assessed_value = money("Assessed Value", &details.assessed_value);
    let final_judgment_amount = money("Final Judgment Amount", &details.final_judgment_amount);

    let baseline = excess_baseline(&details.auction_type, opening_bid, final_judgment_amount);
    let excess_amount = match (sold_amount, baseline) {
        (Some(sold), Some(baseline)) => {
            let excess = sold.checked_sub(baseline);
            if excess.is_none() {
                let raw = format!("{sold} - {baseline}");
                tracing::warn!(
                    auction_id = %auction.status.id,
                    %raw,
                    "excess amount out of range"
                );
                warnings.push(ValueWarning {
                    auction_id: auction.status.id.clone(),
                    field: "Excess Amount",
                    raw,
                });
            }
            excess
        }
        _ => None,
    };

    CleanedAuction {
        auction_date: auction_date.to_owned(),
        county: county.to_owned(),
        auction_type: details.auction_type.clone(),
        sold_amount,
        opening_bid,
        excess_amount,
        case_number: details.case_number.trim().to_owned(),
        parcel_id: details.parcel_id.clone(),
        property_address: details.property_address.clone(),
        property_city: details.property_city.clone(),
        property_state: details.property_state.clone(),
        property_zip: details.property_zip.clone(),
        assessed_value,
        auction_status: auction.status.status.message.as_text(),
        certificate_number: details.certificate_number.clone(),
        sold_date: auction.status.status.timestamp.clone(),
        sold_to: auction.status.sold_to.value.clone(),
        final_judgment_amount,
        plaintiff_max_bid: details.plaintiff_max_bid.clone(),
    }
}

/// Sale surplus: `sold - final_judgment` for foreclosures, `sold - opening_bid`
/// otherwise. `None` when either operand is missing or the difference does
/// not fit in a `Decimal`.
#[must_use]
pub fn excess_amount(
    auction_type: &str,
    sold: Option<Decimal>,
    opening_bid: Option<Decimal>,
    final_judgment: Option<Decimal>,
) -> Option<Decimal> {
    let baseline = excess_baseline(auction_type, opening_bid, final_judgment)?;
    sold?.checked_sub(baseline)
}

fn excess_baseline(
    auction_type: &str,
    opening_bid: Option<Decimal>,
    final_judgment: Option<Decimal>,
) -> Option<Decimal> {
    if auction_type == FORECLOSURE {
        final_judgment
    } else {
        opening_bid
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
