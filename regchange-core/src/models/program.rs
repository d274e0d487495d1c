use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog entry a registrant can be registered against
/// (course, cohort or event instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramOffering {
    pub id: String,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub location: Option<String>,
    /// List fee shown in the catalog; used when the detail lookup has no
    /// expected fee.
    pub fee: Option<Decimal>,
}

/// Pricing detail loaded for a transfer target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDetail {
    pub program_id: String,
    pub expected_fee: Option<Decimal>,
    /// Unit price of the transfer-fee item in the pricing context, if one is
    /// configured.
    pub transfer_fee_unit_price: Option<Decimal>,
}
