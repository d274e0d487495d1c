//! Parsing of operator-entered amounts.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and strips thousands separators and a leading `$`.
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .trim_start_matches('$')
        .replace(',', "")
}

/// Parses an amount field.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0, matching how a blank
/// fee field behaves in the form.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses an amount field whose absence matters (e.g. the new program fee).
///
/// Returns `Ok(None)` for blank input.
pub fn parse_optional_amount(s: &str) -> Result<Option<Decimal>, ParseAmountError> {
    if normalize_amount_input(s).is_empty() {
        Ok(None)
    } else {
        parse_amount(s).map(Some)
    }
}

/// Trims free text and maps blank input to `None`.
pub fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_amount_accepts_currency_prefix() {
        assert_eq!(parse_amount(" $50 ").unwrap(), dec!(50));
    }

    #[test]
    fn parse_amount_empty_treated_as_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_invalid_returns_error() {
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn parse_optional_amount_blank_is_none() {
        assert_eq!(parse_optional_amount("").unwrap(), None);
        assert_eq!(parse_optional_amount("0").unwrap(), Some(dec!(0)));
    }

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank("  note "), Some("note".to_string()));
        assert_eq!(non_blank("   "), None);
    }
}
