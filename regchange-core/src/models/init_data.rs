use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FinancialRecord, PaymentStatus, ProgramOffering, Registrant};

/// Everything loaded once at session start. Immutable for the lifetime of
/// the session; a reset reuses it without re-fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitData {
    pub registrant: Registrant,
    pub current_program: ProgramOffering,
    /// Absent for registrations that were never invoiced.
    pub financial_record: Option<FinancialRecord>,
    pub catalog: Vec<ProgramOffering>,
    pub prior_discount_total: Decimal,
}

impl InitData {
    /// Finds a catalog row by id.
    pub fn program(
        &self,
        id: &str,
    ) -> Option<&ProgramOffering> {
        self.catalog.iter().find(|p| p.id == id)
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.financial_record
            .as_ref()
            .map(|r| r.payment_status)
            .unwrap_or_default()
    }

    pub fn is_bundled(&self) -> bool {
        self.financial_record.as_ref().is_some_and(|r| r.is_bundled)
    }

    /// Total of the originating record, or zero when there is none.
    pub fn originating_amount(&self) -> Decimal {
        self.financial_record
            .as_ref()
            .map(|r| r.amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn pricing_context_id(&self) -> Option<&str> {
        self.financial_record
            .as_ref()
            .and_then(|r| r.pricing_context_id.as_deref())
    }
}
