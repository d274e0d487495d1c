use rust_decimal::Decimal;

use crate::models::{
    CancellationResult, ChangeType, Contact, InitData, ProgramDetail, SettlementType,
    SubstitutionResult, TransferResult,
};
use crate::wizard::validator::FieldError;

/// Transfer path inputs and outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferFields {
    pub selected_program_id: Option<String>,
    /// Detail loaded for `selected_program_id` on the way into the details step.
    pub program_detail: Option<ProgramDetail>,
    /// `None` until seeded from the detail lookup or typed by the operator.
    pub new_program_fee_amount: Option<Decimal>,
    pub apply_transfer_fee: bool,
    pub transfer_fee_amount: Decimal,
    pub settlement_type: Option<SettlementType>,
    pub apply_discount: bool,
    pub discount_amount: Decimal,
    pub discount_code: String,
    pub comments: String,
    pub result: Option<TransferResult>,
}

/// Cancellation path inputs and outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CancellationFields {
    pub apply_cancellation_fee: bool,
    pub cancellation_fee_amount: Decimal,
    pub settlement_type: Option<SettlementType>,
    /// Set when the settlement step was entered on the way to review; back
    /// navigation from review follows it.
    pub settlement_step_visited: bool,
    pub comments: String,
    pub result: Option<CancellationResult>,
}

/// Substitution path inputs and outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubstitutionFields {
    pub search_term: String,
    pub search_results: Vec<Contact>,
    pub selected_contact: Option<Contact>,
    pub apply_substitution_discount: bool,
    pub comments: String,
    pub result: Option<SubstitutionResult>,
}

/// Everything one wizard session knows.
///
/// Derived amounts are deliberately absent; they are recomputed from these
/// fields by [`crate::wizard::derived`] on every read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WizardState {
    pub change_type: Option<ChangeType>,
    pub current_step: u8,

    // Busy flags, one per collaborator concern.
    pub is_loading: bool,
    pub is_searching_contacts: bool,
    pub is_processing: bool,

    pub has_error: bool,
    pub error_message: Option<String>,
    /// Most recent validation failure, for field-level display.
    pub field_error: Option<FieldError>,

    pub init_data: Option<InitData>,

    pub transfer: TransferFields,
    pub cancellation: CancellationFields,
    pub substitution: SubstitutionFields,
}

impl WizardState {
    /// Fresh session state over already-loaded data.
    pub fn new(init_data: Option<InitData>) -> Self {
        Self {
            init_data,
            ..Default::default()
        }
    }

    /// Returns every field to its initial value, keeping the loaded data.
    pub fn reset(&mut self) {
        *self = Self::new(self.init_data.take());
    }

    /// Clears every path-specific field, e.g. when the change type changes.
    pub fn clear_paths(&mut self) {
        self.transfer = TransferFields::default();
        self.cancellation = CancellationFields::default();
        self.substitution = SubstitutionFields::default();
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_searching_contacts || self.is_processing
    }

    pub fn clear_errors(&mut self) {
        self.has_error = false;
        self.error_message = None;
        self.field_error = None;
    }

    pub fn set_error(
        &mut self,
        message: impl Into<String>,
    ) {
        self.has_error = true;
        self.error_message = Some(message.into());
    }

    /// True once any path has stored its terminal result.
    pub fn has_result(&self) -> bool {
        self.transfer.result.is_some()
            || self.cancellation.result.is_some()
            || self.substitution.result.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// A transient message for the hosting shell to display (toast, status
/// line, ...). The controller queues them; the shell drains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }
}
