use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Common view over the three execution results, so the controller can
/// treat business failures uniformly.
pub trait ExecutionOutcome {
    fn is_success(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferResult {
    pub success: bool,
    pub new_opportunity_id: Option<String>,
    pub new_attendee_id: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CancellationResult {
    pub success: bool,
    pub opportunity_id: Option<String>,
    pub payment_id: Option<String>,
    pub unapplied_funds_id: Option<String>,
    pub refund_amount: Option<Decimal>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubstitutionResult {
    pub success: bool,
    pub new_opportunity_id: Option<String>,
    pub new_attendee_id: Option<String>,
    pub error_message: Option<String>,
}

macro_rules! impl_execution_outcome {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ExecutionOutcome for $ty {
                fn is_success(&self) -> bool {
                    self.success
                }

                fn error_message(&self) -> Option<&str> {
                    self.error_message.as_deref()
                }
            }
        )+
    };
}

impl_execution_outcome!(TransferResult, CancellationResult, SubstitutionResult);
