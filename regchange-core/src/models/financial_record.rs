use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PaymentStatus;

/// The order/invoice-like record tied to the current registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: String,
    pub amount: Decimal,
    pub balance: Decimal,
    pub payment_status: PaymentStatus,
    /// Whether the registration was sold as part of a bundle.
    pub is_bundled: bool,
    /// Price book (or equivalent) the record was priced from; forwarded to
    /// program-detail lookups.
    pub pricing_context_id: Option<String>,
}

impl FinancialRecord {
    /// Amount paid so far (`amount - balance`, never negative).
    pub fn amount_paid(&self) -> Decimal {
        (self.amount - self.balance).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        amount: Decimal,
        balance: Decimal,
    ) -> FinancialRecord {
        FinancialRecord {
            id: "ORD-0001".to_string(),
            amount,
            balance,
            payment_status: PaymentStatus::PartialPayment,
            is_bundled: false,
            pricing_context_id: None,
        }
    }

    #[test]
    fn amount_paid_is_amount_minus_balance() {
        assert_eq!(record(dec!(1000), dec!(400)).amount_paid(), dec!(600));
    }

    #[test]
    fn amount_paid_never_negative() {
        assert_eq!(record(dec!(100), dec!(150)).amount_paid(), dec!(0));
    }
}
