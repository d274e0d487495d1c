//! Rounding and display helpers shared by the financial calculator.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regchange_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount for display: half-up to cents, thousands separators,
/// symbol after the sign.
///
/// Only the rendering layer calls this. Stored fields and request payloads
/// keep the unrounded value.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use regchange_core::calculations::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.5), "$"), "$1,234.50");
/// assert_eq!(format_currency(dec!(-50), "$"), "-$50.00");
/// ```
pub fn format_currency(
    value: Decimal,
    symbol: &str,
) -> String {
    let rounded = round_half_up(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        symbol,
        grouped,
        cents
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_zero() {
        assert_eq!(round_half_up(dec!(0.00)), dec!(0.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_negative_and_positive() {
        assert_eq!(max(dec!(-50.00), dec!(50.00)), dec!(50.00));
    }

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn format_currency_pads_cents() {
        assert_eq!(format_currency(dec!(950), "$"), "$950.00");
    }

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(1234567.891), "$"), "$1,234,567.89");
    }

    #[test]
    fn format_currency_three_digit_boundary_has_no_separator() {
        assert_eq!(format_currency(dec!(100), "$"), "$100.00");
        assert_eq!(format_currency(dec!(1000), "$"), "$1,000.00");
    }

    #[test]
    fn format_currency_negative_puts_sign_before_symbol() {
        assert_eq!(format_currency(dec!(-1500.5), "€"), "-€1,500.50");
    }

    #[test]
    fn format_currency_negative_rounding_to_zero_is_unsigned() {
        assert_eq!(format_currency(dec!(-0.001), "$"), "$0.00");
    }
}
