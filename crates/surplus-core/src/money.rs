use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// A currency cell that survived stripping but still is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not convert {raw:?} to a currency amount")]
pub struct CurrencyError {
    pub raw: String,
}

/// Parse a listing currency string such as `"$1,234.50"`.
///
/// `$`, `,` and whitespace are stripped first. An empty result is `Ok(None)`.
///
/// # Errors
///
/// Returns [`CurrencyError`] when the stripped text is not a decimal number.
pub fn parse_currency(raw: &str) -> Result<Option<Decimal>, CurrencyError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&cleaned)
        .map(Some)
        .map_err(|_| CurrencyError {
            raw: raw.to_string(),
        })
}

/// Render an amount as `$` plus exactly two decimals; `None` renders as `""`.
#[must_use]
pub fn format_currency(value: Option<Decimal>) -> String {
    match value {
        Some(amount) => {
            let mut rounded = amount.round_dp(2);
            rounded.rescale(2);
            format!("${rounded}")
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_dollar_and_thousands_separator() {
        assert_eq!(parse_currency("$1,234.50").unwrap(), Some(dec("1234.50")));
    }

    #[test]
    fn parses_plain_number_with_padding() {
        assert_eq!(parse_currency("  100 ").unwrap(), Some(dec("100")));
    }

    #[test]
    fn empty_and_blank_are_none() {
        assert_eq!(parse_currency("").unwrap(), None);
        assert_eq!(parse_currency("   ").unwrap(), None);
        assert_eq!(parse_currency("$").unwrap(), None);
    }

    #[test]
    fn non_numeric_is_error_with_raw_text() {
        let err = parse_currency("$N/A").unwrap_err();
        assert_eq!(err.raw, "$N/A");
        assert!(err.to_string().contains("$N/A"));
    }

    #[test]
    fn format_pads_to_two_decimals() {
        assert_eq!(format_currency(Some(dec("1234.5"))), "$1234.50");
        assert_eq!(format_currency(Some(dec("100"))), "$100.00");
    }

    #[test]
    fn format_rounds_extra_precision() {
        assert_eq!(format_currency(Some(dec("10.005"))), "$10.00");
        assert_eq!(format_currency(Some(dec("10.015"))), "$10.02");
    }

    #[test]
    fn format_none_is_empty() {
        assert_eq!(format_currency(None), "");
    }

    #[test]
    fn format_negative_keeps_sign_after_symbol() {
        assert_eq!(format_currency(Some(dec("-250.5"))), "$-250.50");
    }

    #[test]
    fn listing_amounts_survive_format_and_reparse() {
        for raw in ["$1,234.56", "98000", "$5,000", "12.5", "$0.99"] {
            let parsed = parse_currency(raw).unwrap();
            let reparsed = parse_currency(&format_currency(parsed)).unwrap();
            assert_eq!(parsed, reparsed, "value changed for {raw}");
        }
    }
}
