use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sold-to value marking a sale finalized to an outside buyer.
pub const THIRD_PARTY_BIDDER: &str = "3rd Party Bidder";

/// Column order of the cleaned CSV export.
pub const CSV_COLUMNS: [&str; 18] = [
    "Auction Date",
    "County",
    "Auction Type",
    "Sold Amount",
    "Opening Bid",
    "Excess Amount",
    "Case #",
    "Parcel ID",
    "Property Address",
    "Property City",
    "Property State",
    "Property Zip",
    "Assessed Value",
    "Auction Status",
    "Certificate #",
    "Sold Date",
    "Sold To",
    "Final Judgment Amount",
];

/// Column order of the rows delivered to the spreadsheet endpoint.
pub const SHEET_COLUMNS: [&str; 19] = [
    "Auction Date",
    "County",
    "Auction Type",
    "Sold Amount",
    "Opening Bid",
    "Excess Amount",
    "Case #",
    "Parcel ID",
    "Property Address",
    "Property City",
    "Property State",
    "Property Zip",
    "Assessed Value",
    "Auction Status",
    "Certificate #",
    "Sold Date",
    "Sold To",
    "Final Judgment Amount",
    "Plaintiff Max Bid",
];

/// A finalized third-party sale with parsed money fields.
///
/// Serialized field names are the human column labels used by every export.
/// Money fields serialize as JSON numbers, `null` when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedAuction {
    #[serde(rename = "Auction Date")]
    pub auction_date: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Auction Type")]
    pub auction_type: String,
    #[serde(rename = "Sold Amount", with = "rust_decimal::serde::float_option")]
    pub sold_amount: Option<Decimal>,
    #[serde(rename = "Opening Bid", with = "rust_decimal::serde::float_option")]
    pub opening_bid: Option<Decimal>,
    #[serde(rename = "Excess Amount", with = "rust_decimal::serde::float_option")]
    pub excess_amount: Option<Decimal>,
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
    #[serde(rename = "Assessed Value", with = "rust_decimal::serde::float_option")]
    pub assessed_value: Option<Decimal>,
    #[serde(rename = "Auction Status")]
    pub auction_status: String,
    #[serde(rename = "Certificate #")]
    pub certificate_number: String,
    #[serde(rename = "Sold Date")]
    pub sold_date: String,
    #[serde(rename = "Sold To")]
    pub sold_to: String,
    #[serde(rename = "Final Judgment Amount", with = "rust_decimal::serde::float_option")]
    pub final_judgment_amount: Option<Decimal>,
    #[serde(rename = "Plaintiff Max Bid")]
    pub plaintiff_max_bid: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn sheet_columns_extend_csv_columns() {
        assert_eq!(&SHEET_COLUMNS[..CSV_COLUMNS.len()], &CSV_COLUMNS[..]);
        assert_eq!(SHEET_COLUMNS[18], "Plaintiff Max Bid");
    }

    #[test]
    fn serializes_with_column_labels() {
        let row = CleanedAuction {
            auction_date: "09/16/2024".to_string(),
            county: "Manatee".to_string(),
            auction_type: "FORECLOSURE".to_string(),
            sold_amount: Some(Decimal::from_str("150000.00").unwrap()),
            opening_bid: None,
            excess_amount: Some(Decimal::from_str("25000.00").unwrap()),
            case_number: "2023CA001234".to_string(),
            parcel_id: "1234567890".to_string(),
            property_address: "123 Main St".to_string(),
            property_city: "St".to_string(),
            property_state: "FL".to_string(),
            property_zip: "34202".to_string(),
            assessed_value: None,
            auction_status: "Auction Sold".to_string(),
            certificate_number: String::new(),
            sold_date: "09/16/2024 11:02 AM ET".to_string(),
            sold_to: THIRD_PARTY_BIDDER.to_string(),
            final_judgment_amount: Some(Decimal::from_str("125000.00").unwrap()),
            plaintiff_max_bid: String::new(),
        };

        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();
        for column in SHEET_COLUMNS {
            assert!(object.contains_key(column), "missing column {column}");
        }
        assert_eq!(value["Sold To"], "3rd Party Bidder");
        assert!(value["Opening Bid"].is_null());
        assert_eq!(value["Sold Amount"], serde_json::json!(150_000.0));
        assert_eq!(value["Excess Amount"], serde_json::json!(25_000.0));
    }

    #[test]
    fn money_fields_read_back_from_numbers() {
        let value = serde_json::json!({
            "Auction Date": "09/16/2024",
            "County": "Manatee",
            "Auction Type": "TAXDEED",
            "Sold Amount": 12500.5,
            "Opening Bid": 5000,
            "Excess Amount": 7500.5,
            "Case #": "2024TD000042",
            "Parcel ID": "",
            "Property Address": "",
            "Property City": "",
            "Property State": "",
            "Property Zip": "",
            "Assessed Value": null,
            "Auction Status": "Auction Sold",
            "Certificate #": "",
            "Sold Date": "",
            "Sold To": THIRD_PARTY_BIDDER,
            "Final Judgment Amount": null,
            "Plaintiff Max Bid": ""
        });
        let row: CleanedAuction = serde_json::from_value(value).unwrap();
        assert_eq!(row.sold_amount, Some(Decimal::from_str("12500.5").unwrap()));
        assert_eq!(row.opening_bid, Some(Decimal::from(5000)));
        assert_eq!(row.assessed_value, None);
    }
}
