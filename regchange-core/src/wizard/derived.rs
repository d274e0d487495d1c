//! Values computed from [`WizardState`] on demand.
//!
//! Nothing here is cached. Each getter reads the raw fields and runs them
//! through [`crate::calculations`], so a displayed figure can never drift
//! from the inputs it was derived from.

use rust_decimal::Decimal;

use crate::calculations;
use crate::models::{ProgramOffering, SettlementType};
use crate::wizard::path::{self, RouteFlags, StepKind};
use crate::wizard::state::WizardState;

/// Whether the cancellation path shows its settlement step.
///
/// Depends only on the originating record loaded at session start, so the
/// answer is stable for the whole session.
pub fn settlement_step_required(state: &WizardState) -> bool {
    state
        .init_data
        .as_ref()
        .is_some_and(|init| init.payment_status().has_received_funds())
}

pub fn route_flags(state: &WizardState) -> RouteFlags {
    RouteFlags {
        settlement_required: settlement_step_required(state),
        settlement_visited: state.cancellation.settlement_step_visited,
    }
}

pub fn current_step_kind(state: &WizardState) -> Option<StepKind> {
    path::step_def(state.change_type, state.current_step).map(|def| def.kind)
}

// ── cancellation ─────────────────────────────────────────────────────────────

pub fn originating_amount(state: &WizardState) -> Decimal {
    state
        .init_data
        .as_ref()
        .map(|init| init.originating_amount())
        .unwrap_or(Decimal::ZERO)
}

pub fn effective_cancellation_fee(state: &WizardState) -> Decimal {
    calculations::effective_amount(
        state.cancellation.apply_cancellation_fee,
        state.cancellation.cancellation_fee_amount,
    )
}

pub fn cancellation_refund_amount(state: &WizardState) -> Decimal {
    calculations::cancellation_refund_amount(
        originating_amount(state),
        state.cancellation.apply_cancellation_fee,
        state.cancellation.cancellation_fee_amount,
    )
}

pub fn cancellation_settlement_options(state: &WizardState) -> &'static [SettlementType] {
    match &state.init_data {
        Some(init) => {
            calculations::cancellation_settlement_options(init.payment_status(), init.is_bundled())
        }
        None => &[],
    }
}

/// The stored cancellation settlement, if it is still one of the offered
/// options. A choice that is no longer offered reads as no choice.
pub fn effective_cancellation_settlement(state: &WizardState) -> Option<SettlementType> {
    state
        .cancellation
        .settlement_type
        .filter(|choice| cancellation_settlement_options(state).contains(choice))
}

// ── transfer ─────────────────────────────────────────────────────────────────

pub fn selected_program(state: &WizardState) -> Option<&ProgramOffering> {
    let id = state.transfer.selected_program_id.as_deref()?;
    state.init_data.as_ref()?.program(id)
}

/// Fee total of the registration being transferred away from.
pub fn original_program_fee_total(state: &WizardState) -> Decimal {
    originating_amount(state)
}

pub fn effective_transfer_fee(state: &WizardState) -> Decimal {
    calculations::effective_amount(
        state.transfer.apply_transfer_fee,
        state.transfer.transfer_fee_amount,
    )
}

pub fn effective_discount_amount(state: &WizardState) -> Decimal {
    calculations::effective_amount(state.transfer.apply_discount, state.transfer.discount_amount)
}

pub fn net_credit_amount(state: &WizardState) -> Decimal {
    calculations::net_credit_amount(
        original_program_fee_total(state),
        state.transfer.apply_transfer_fee,
        state.transfer.transfer_fee_amount,
    )
}

/// Target program fee after discount; `None` until a fee is known.
pub fn new_program_net_fee(state: &WizardState) -> Option<Decimal> {
    state.transfer.new_program_fee_amount.map(|fee| {
        calculations::new_program_net_fee(
            fee,
            state.transfer.apply_discount,
            state.transfer.discount_amount,
        )
    })
}

pub fn transfer_balance_due(state: &WizardState) -> Option<Decimal> {
    new_program_net_fee(state)
        .map(|net_fee| calculations::transfer_balance_due(net_fee, net_credit_amount(state)))
}

pub fn transfer_settlement_options(state: &WizardState) -> &'static [SettlementType] {
    transfer_balance_due(state)
        .map(calculations::transfer_settlement_options)
        .unwrap_or(&[])
}

pub fn effective_transfer_settlement(state: &WizardState) -> Option<SettlementType> {
    state
        .transfer
        .settlement_type
        .filter(|choice| transfer_settlement_options(state).contains(choice))
}

pub fn is_same_program_transfer(state: &WizardState) -> bool {
    state.init_data.as_ref().is_some_and(|init| {
        calculations::is_same_program(
            &init.current_program.id,
            state.transfer.selected_program_id.as_deref(),
        )
    })
}

// ── progress ─────────────────────────────────────────────────────────────────

/// "Step N of M" for the shell, counting only the steps this session will
/// actually show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: u8,
    pub total: u8,
    pub label: &'static str,
}

pub fn progress(state: &WizardState) -> Progress {
    let settlement_required = settlement_step_required(state);
    let shown: Vec<_> = path::steps(state.change_type)
        .iter()
        .enumerate()
        .filter(|(_, def)| def.kind != StepKind::CancellationSettlement || settlement_required)
        .collect();

    let position = shown
        .iter()
        .position(|(index, _)| *index == usize::from(state.current_step))
        .map_or(1, |p| p + 1);
    let label = path::step_def(state.change_type, state.current_step)
        .map_or("", |def| def.label);

    Progress {
        position: position as u8,
        total: shown.len() as u8,
        label,
    }
}
