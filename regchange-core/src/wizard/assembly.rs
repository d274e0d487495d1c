//! Builds execute payloads from the session state.
//!
//! Amounts go through their effective value, so a disabled toggle always
//! sends zero. Free text is trimmed and blank text is sent as `None`.

use crate::input::non_blank;
use crate::models::{CancellationRequest, InitData, SubstitutionRequest, TransferRequest};
use crate::wizard::derived;
use crate::wizard::state::WizardState;
use crate::wizard::validator::{Field, FieldError};

/// The registrant id an execute call is made for.
///
/// Taken from the loaded registrant, trimmed, and rejected when shorter
/// than `min_len`.
pub fn resolve_registrant_id(
    state: &WizardState,
    min_len: usize,
) -> Result<String, String> {
    let id = state
        .init_data
        .as_ref()
        .map(|init| init.registrant.id.trim())
        .unwrap_or_default();

    if id.is_empty() {
        return Err("Registrant id is missing; reload the registration and try again.".to_string());
    }
    if id.chars().count() < min_len {
        return Err(format!(
            "Registrant id '{id}' is not valid (expected at least {min_len} characters)."
        ));
    }
    Ok(id.to_string())
}

fn init_data(state: &WizardState) -> Result<&InitData, FieldError> {
    state
        .init_data
        .as_ref()
        .ok_or_else(|| FieldError::new(Field::Step, "Registration data has not been loaded."))
}

pub fn transfer_request(
    state: &WizardState,
    registrant_id: String,
) -> Result<TransferRequest, FieldError> {
    let init = init_data(state)?;
    let transfer = &state.transfer;

    let new_program_id = derived::selected_program(state)
        .map(|program| program.id.clone())
        .ok_or_else(|| FieldError::new(Field::TargetProgram, "Select a program to transfer to."))?;
    let new_program_fee_amount = transfer
        .new_program_fee_amount
        .ok_or_else(|| FieldError::new(Field::NewProgramFee, "New program fee is required."))?;

    Ok(TransferRequest {
        registrant_id,
        current_program_id: init.current_program.id.clone(),
        new_program_id,
        originating_record_id: init.financial_record.as_ref().map(|r| r.id.clone()),
        new_program_fee_amount,
        apply_transfer_fee: transfer.apply_transfer_fee,
        transfer_fee_amount: derived::effective_transfer_fee(state),
        net_credit_amount: derived::net_credit_amount(state),
        prior_discount_total: init.prior_discount_total,
        apply_discount: transfer.apply_discount,
        discount_amount: derived::effective_discount_amount(state),
        discount_code: transfer
            .apply_discount
            .then(|| non_blank(&transfer.discount_code))
            .flatten(),
        settlement_type: derived::effective_transfer_settlement(state),
        is_same_program: derived::is_same_program_transfer(state),
        comments: non_blank(&transfer.comments),
    })
}

pub fn cancellation_request(
    state: &WizardState,
    registrant_id: String,
) -> Result<CancellationRequest, FieldError> {
    let init = init_data(state)?;
    let cancellation = &state.cancellation;

    // Off-route settlement choices are never sent.
    let settlement_type = if derived::settlement_step_required(state) {
        derived::effective_cancellation_settlement(state)
    } else {
        None
    };

    Ok(CancellationRequest {
        registrant_id,
        originating_record_id: init.financial_record.as_ref().map(|r| r.id.clone()),
        apply_cancellation_fee: cancellation.apply_cancellation_fee,
        cancellation_fee_amount: derived::effective_cancellation_fee(state),
        refund_amount: derived::cancellation_refund_amount(state),
        settlement_type,
        comments: non_blank(&cancellation.comments),
    })
}

pub fn substitution_request(
    state: &WizardState,
    registrant_id: String,
) -> Result<SubstitutionRequest, FieldError> {
    let substitution = &state.substitution;
    let contact = substitution.selected_contact.as_ref().ok_or_else(|| {
        FieldError::new(Field::SubstituteContact, "Select a substitute contact.")
    })?;

    Ok(SubstitutionRequest {
        registrant_id,
        new_contact_id: contact.id.clone(),
        apply_substitution_discount: substitution.apply_substitution_discount,
        comments: non_blank(&substitution.comments),
    })
}
