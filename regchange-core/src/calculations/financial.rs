//! Refund, credit and settlement formulas.
//!
//! # Formulas
//!
//! | Value                     | Formula |
//! |---------------------------|---------|
//! | cancellation refund       | originating amount − effective cancellation fee |
//! | net credit (transfer)     | original program fee total − effective transfer fee |
//! | new program net fee       | max(new program fee − effective discount, 0) |
//! | transfer balance due      | new program net fee − net credit |
//!
//! An *effective* amount is the raw amount when its apply flag is on and
//! zero otherwise. A disabled amount never reaches a total, whatever value
//! is left in the input field.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use regchange_core::calculations::{cancellation_refund_amount, net_credit_amount};
//!
//! assert_eq!(cancellation_refund_amount(dec!(1000), true, dec!(50)), dec!(950));
//! assert_eq!(net_credit_amount(dec!(800), true, dec!(100)), dec!(700));
//! assert_eq!(net_credit_amount(dec!(800), false, dec!(100)), dec!(800));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::max;
use crate::models::{PaymentStatus, SettlementType};

const REFUND_OR_CREDIT: &[SettlementType] =
    &[SettlementType::Refund, SettlementType::UnappliedFunds];

const REFUND_CREDIT_OR_BALANCE: &[SettlementType] = &[
    SettlementType::Refund,
    SettlementType::UnappliedFunds,
    SettlementType::ApplyToBalance,
];

/// `amount` when `apply` is set, zero otherwise.
pub fn effective_amount(
    apply: bool,
    amount: Decimal,
) -> Decimal {
    if apply { amount } else { Decimal::ZERO }
}

/// Amount returned to the registrant when the registration is cancelled.
pub fn cancellation_refund_amount(
    originating_amount: Decimal,
    apply_cancellation_fee: bool,
    cancellation_fee_amount: Decimal,
) -> Decimal {
    originating_amount - effective_amount(apply_cancellation_fee, cancellation_fee_amount)
}

/// Credit carried forward from the original registration to the new one.
pub fn net_credit_amount(
    original_program_fee_total: Decimal,
    apply_transfer_fee: bool,
    transfer_fee_amount: Decimal,
) -> Decimal {
    original_program_fee_total - effective_amount(apply_transfer_fee, transfer_fee_amount)
}

/// Fee of the target program after any applied discount, floored at zero.
pub fn new_program_net_fee(
    new_program_fee: Decimal,
    apply_discount: bool,
    discount_amount: Decimal,
) -> Decimal {
    max(
        new_program_fee - effective_amount(apply_discount, discount_amount),
        Decimal::ZERO,
    )
}

/// What the registrant still owes after the transfer (positive) or the
/// surplus credit left over (negative).
pub fn transfer_balance_due(
    new_program_net_fee: Decimal,
    net_credit: Decimal,
) -> Decimal {
    new_program_net_fee - net_credit
}

/// Settlement choices offered on the cancellation settlement step.
///
/// Applying the refund to the remaining balance only makes sense for a
/// bundled registration that is partially paid; every other record gets
/// refund or unapplied funds.
pub fn cancellation_settlement_options(
    payment_status: PaymentStatus,
    is_bundled: bool,
) -> &'static [SettlementType] {
    if is_bundled && payment_status == PaymentStatus::PartialPayment {
        REFUND_CREDIT_OR_BALANCE
    } else {
        REFUND_OR_CREDIT
    }
}

/// Settlement choices for a transfer. Only a surplus credit (negative
/// balance due) needs disposing of.
pub fn transfer_settlement_options(balance_due: Decimal) -> &'static [SettlementType] {
    if balance_due < Decimal::ZERO {
        REFUND_OR_CREDIT
    } else {
        &[]
    }
}

/// True when the transfer target is the program the registrant is already in.
pub fn is_same_program(
    current_program_id: &str,
    target_program_id: Option<&str>,
) -> bool {
    target_program_id.is_some_and(|target| target == current_program_id)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // effective_amount tests
    // =========================================================================

    #[test]
    fn effective_amount_passes_through_when_applied() {
        assert_eq!(effective_amount(true, dec!(42.10)), dec!(42.10));
    }

    #[test]
    fn effective_amount_is_zero_when_disabled() {
        assert_eq!(effective_amount(false, dec!(42.10)), dec!(0));
    }

    // =========================================================================
    // cancellation_refund_amount tests
    // =========================================================================

    #[test]
    fn refund_subtracts_applied_fee() {
        assert_eq!(cancellation_refund_amount(dec!(1000), true, dec!(50)), dec!(950));
    }

    #[test]
    fn refund_ignores_fee_when_disabled() {
        assert_eq!(cancellation_refund_amount(dec!(1000), false, dec!(50)), dec!(1000));
    }

    #[test]
    fn refund_keeps_full_precision() {
        assert_eq!(
            cancellation_refund_amount(dec!(1000.005), true, dec!(0.001)),
            dec!(1000.004)
        );
    }

    #[test]
    fn refund_is_pure() {
        let a = cancellation_refund_amount(dec!(321.45), true, dec!(21.45));
        let b = cancellation_refund_amount(dec!(321.45), true, dec!(21.45));
        assert_eq!(a, b);
    }

    // =========================================================================
    // net_credit_amount tests
    // =========================================================================

    #[test]
    fn net_credit_subtracts_applied_transfer_fee() {
        assert_eq!(net_credit_amount(dec!(800), true, dec!(100)), dec!(700));
    }

    #[test]
    fn net_credit_ignores_transfer_fee_when_disabled() {
        assert_eq!(net_credit_amount(dec!(800), false, dec!(100)), dec!(800));
    }

    // =========================================================================
    // new_program_net_fee / transfer_balance_due tests
    // =========================================================================

    #[test]
    fn net_fee_subtracts_applied_discount() {
        assert_eq!(new_program_net_fee(dec!(900), true, dec!(150)), dec!(750));
    }

    #[test]
    fn net_fee_ignores_disabled_discount() {
        assert_eq!(new_program_net_fee(dec!(900), false, dec!(150)), dec!(900));
    }

    #[test]
    fn net_fee_floors_at_zero() {
        assert_eq!(new_program_net_fee(dec!(100), true, dec!(150)), dec!(0));
    }

    #[test]
    fn balance_due_positive_when_new_program_costs_more() {
        assert_eq!(transfer_balance_due(dec!(900), dec!(700)), dec!(200));
    }

    #[test]
    fn balance_due_negative_on_surplus_credit() {
        assert_eq!(transfer_balance_due(dec!(500), dec!(700)), dec!(-200));
    }

    // =========================================================================
    // settlement option tests
    // =========================================================================

    #[test]
    fn bundled_partial_payment_unlocks_apply_to_balance() {
        assert_eq!(
            cancellation_settlement_options(PaymentStatus::PartialPayment, true),
            &[
                SettlementType::Refund,
                SettlementType::UnappliedFunds,
                SettlementType::ApplyToBalance,
            ]
        );
    }

    #[test]
    fn bundled_alone_does_not_unlock_apply_to_balance() {
        assert_eq!(
            cancellation_settlement_options(PaymentStatus::Paid, true),
            &[SettlementType::Refund, SettlementType::UnappliedFunds]
        );
    }

    #[test]
    fn partial_payment_alone_does_not_unlock_apply_to_balance() {
        assert_eq!(
            cancellation_settlement_options(PaymentStatus::PartialPayment, false),
            &[SettlementType::Refund, SettlementType::UnappliedFunds]
        );
    }

    #[test]
    fn transfer_settlement_offered_only_on_surplus() {
        assert_eq!(
            transfer_settlement_options(dec!(-0.01)),
            &[SettlementType::Refund, SettlementType::UnappliedFunds]
        );
        assert!(transfer_settlement_options(dec!(0)).is_empty());
        assert!(transfer_settlement_options(dec!(25)).is_empty());
    }

    // =========================================================================
    // is_same_program tests
    // =========================================================================

    #[test]
    fn same_program_detected_by_id() {
        assert!(is_same_program("PRG-1", Some("PRG-1")));
        assert!(!is_same_program("PRG-1", Some("PRG-2")));
        assert!(!is_same_program("PRG-1", None));
    }
}
