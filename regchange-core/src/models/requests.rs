//! Payloads sent to the execution collaborator.
//!
//! Every amount in these structs has already been through the
//! "disabled toggle means zero" coercion; a backend can sum them without
//! consulting the `apply_*` flags.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SettlementType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub registrant_id: String,
    pub current_program_id: String,
    pub new_program_id: String,
    pub originating_record_id: Option<String>,
    pub new_program_fee_amount: Decimal,
    pub apply_transfer_fee: bool,
    pub transfer_fee_amount: Decimal,
    pub net_credit_amount: Decimal,
    pub prior_discount_total: Decimal,
    pub apply_discount: bool,
    pub discount_amount: Decimal,
    pub discount_code: Option<String>,
    pub settlement_type: Option<SettlementType>,
    pub is_same_program: bool,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRequest {
    pub registrant_id: String,
    pub originating_record_id: Option<String>,
    pub apply_cancellation_fee: bool,
    pub cancellation_fee_amount: Decimal,
    pub refund_amount: Decimal,
    pub settlement_type: Option<SettlementType>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRequest {
    pub registrant_id: String,
    pub new_contact_id: String,
    pub apply_substitution_discount: bool,
    pub comments: Option<String>,
}
