//! Checks run on an explicit forward or execute action.
//!
//! These are the authoritative versions of the [`gate`](super::gate)
//! conditions plus the rules that only make sense once the operator commits
//! to leaving a step (fee presence, discount completeness).

use std::fmt;

use rust_decimal::Decimal;

use crate::wizard::derived;
use crate::wizard::path::{self, PrimaryAction, StepKind};
use crate::wizard::state::WizardState;

/// The input a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ChangeType,
    TargetProgram,
    NewProgramFee,
    TransferFee,
    Discount,
    TransferSettlement,
    CancellationFee,
    CancellationSettlement,
    SubstituteContact,
    /// Not tied to one input (e.g. the session has no loaded data).
    Step,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: Field,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type Validation = Result<(), FieldError>;

/// Validates leaving the current step by its forward control.
pub fn validate_forward(state: &WizardState) -> Validation {
    match derived::current_step_kind(state) {
        Some(kind) => validate_step(kind, state),
        None => Err(FieldError::new(Field::Step, "The current step is not valid.")),
    }
}

/// Validates every input step of the active path before an execute call.
///
/// The settlement step of a cancellation is only checked when it is part of
/// the route.
pub fn validate_execute(state: &WizardState) -> Validation {
    let Some(change_type) = state.change_type else {
        return Err(FieldError::new(Field::ChangeType, "Select a change type."));
    };
    let settlement_required = derived::settlement_step_required(state);

    for def in path::steps(Some(change_type)) {
        if def.kind == StepKind::CancellationSettlement && !settlement_required {
            continue;
        }
        // Only steps with a Next control carry input of their own.
        if def.action == PrimaryAction::Next {
            validate_step(def.kind, state)?;
        }
    }
    Ok(())
}

pub fn validate_step(
    kind: StepKind,
    state: &WizardState,
) -> Validation {
    match kind {
        StepKind::ChooseChangeType => validate_change_type(state),
        StepKind::SelectProgram => validate_target_program(state),
        StepKind::TransferDetails => validate_transfer_details(state),
        StepKind::CancellationFee => validate_cancellation_fee(state),
        StepKind::CancellationSettlement => validate_cancellation_settlement(state),
        StepKind::SelectContact => validate_substitute(state),
        StepKind::TransferReview
        | StepKind::TransferComplete
        | StepKind::CancellationReview
        | StepKind::CancellationComplete
        | StepKind::SubstitutionConfirm
        | StepKind::SubstitutionComplete => Ok(()),
    }
}

fn validate_change_type(state: &WizardState) -> Validation {
    match state.change_type {
        Some(_) => Ok(()),
        None => Err(FieldError::new(Field::ChangeType, "Select a change type.")),
    }
}

fn validate_target_program(state: &WizardState) -> Validation {
    if derived::selected_program(state).is_none() {
        return Err(FieldError::new(
            Field::TargetProgram,
            "Select a program to transfer to.",
        ));
    }
    Ok(())
}

fn validate_transfer_details(state: &WizardState) -> Validation {
    let transfer = &state.transfer;

    match transfer.new_program_fee_amount {
        None => {
            return Err(FieldError::new(
                Field::NewProgramFee,
                "New program fee is required.",
            ));
        }
        Some(fee) if fee < Decimal::ZERO => {
            return Err(FieldError::new(
                Field::NewProgramFee,
                "New program fee cannot be negative.",
            ));
        }
        Some(_) => {}
    }

    if transfer.apply_transfer_fee && transfer.transfer_fee_amount < Decimal::ZERO {
        return Err(FieldError::new(
            Field::TransferFee,
            "Transfer fee cannot be negative.",
        ));
    }

    if transfer.apply_discount {
        if transfer.discount_amount < Decimal::ZERO {
            return Err(FieldError::new(
                Field::Discount,
                "Discount amount cannot be negative.",
            ));
        }
        let has_amount = transfer.discount_amount > Decimal::ZERO;
        let has_code = !transfer.discount_code.trim().is_empty();
        if !has_amount && !has_code {
            return Err(FieldError::new(
                Field::Discount,
                "Enter a discount amount or a discount code.",
            ));
        }
    }

    Ok(())
}

fn validate_cancellation_fee(state: &WizardState) -> Validation {
    let cancellation = &state.cancellation;
    if cancellation.apply_cancellation_fee && cancellation.cancellation_fee_amount <= Decimal::ZERO
    {
        return Err(FieldError::new(
            Field::CancellationFee,
            "Enter a cancellation fee greater than zero.",
        ));
    }
    if derived::cancellation_refund_amount(state) < Decimal::ZERO {
        return Err(FieldError::new(
            Field::CancellationFee,
            "The cancellation fee cannot exceed the amount paid.",
        ));
    }
    Ok(())
}

fn validate_cancellation_settlement(state: &WizardState) -> Validation {
    if derived::effective_cancellation_settlement(state).is_none() {
        return Err(FieldError::new(
            Field::CancellationSettlement,
            "Select how the refund should be settled.",
        ));
    }
    Ok(())
}

fn validate_substitute(state: &WizardState) -> Validation {
    let Some(contact) = &state.substitution.selected_contact else {
        return Err(FieldError::new(
            Field::SubstituteContact,
            "Select a substitute contact.",
        ));
    };
    let is_current = state
        .init_data
        .as_ref()
        .is_some_and(|init| init.registrant.contact_id == contact.id);
    if is_current {
        return Err(FieldError::new(
            Field::SubstituteContact,
            "The substitute must be a different contact than the current registrant.",
        ));
    }
    Ok(())
}
