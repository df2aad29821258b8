//! Joins a detail page with its status page by auction id.

use std::collections::HashMap;

use crate::types::{
    AuctionDetails, DetailPage, DetailRecord, MergedAuction, MergedPage, StatusPage,
};

/// Produces one [`MergedAuction`] per status record, in status order.
///
/// `detail.rlist[i]` names the id of `detail.auctions[i]`; a repeated id keeps
/// the later record. Status records with no matching detail get empty detail
/// fields.
#[must_use]
pub fn merge_page(detail: &DetailPage, status: &StatusPage) -> MergedPage {
    let by_id: HashMap<&str, &DetailRecord> = detail
        .rlist
        .iter()
        .map(String::as_str)
        .zip(detail.auctions.iter())
        .collect();

    let auctions: Vec<MergedAuction> = status
        .auctions
        .iter()
        .map(|record| {
            let details = by_id
                .get(record.id.as_str())
                .map_or_else(AuctionDetails::default, |d| details_from(d));
            MergedAuction {
                status: record.clone(),
                details,
            }
        })
        .collect();

    let unmatched = auctions
        .iter()
        .filter(|a| !by_id.contains_key(a.status.id.as_str()))
        .count();
    if unmatched > 0 {
        tracing::warn!(
            unmatched,
            total = auctions.len(),
            "status records without a matching detail record"
        );
    }

    MergedPage {
        page_info: status.page_info.clone(),
        reset_required: status.reset_required.clone(),
        auctions,
        rlist: detail.rlist.clone(),
    }
}

fn details_from(record: &DetailRecord) -> AuctionDetails {
    let field = |label: &str| record.get(label).to_owned();
    AuctionDetails {
        auction_type: field("Auction Type"),
        case_number: field("Case #"),
        final_judgment_amount: field("Final Judgment Amount"),
        parcel_id: field("Parcel ID"),
        assessed_value: field("Assessed Value"),
        plaintiff_max_bid: field("Plaintiff Max Bid"),
        property_address: field("Property Address"),
        property_city: field("Property City"),
        property_state: field("Property State"),
        property_zip: field("Property Zip"),
        certificate_number: field("Certificate #"),
        opening_bid: field("Opening Bid"),
    }
}
