//! Advisory guard for the forward control.
//!
//! [`allowed`] decides whether "Next" (or "Execute") is enabled for the
//! current step. It is cheap and side-effect free, so shells may call it on
//! every render. The [`validator`](super::validator) repeats the checks when
//! the operator actually moves forward.

use rust_decimal::Decimal;

use crate::models::ChangeType;
use crate::wizard::derived;
use crate::wizard::path::{self, StepKind};
use crate::wizard::state::WizardState;

pub fn allowed(
    change_type: Option<ChangeType>,
    step: u8,
    state: &WizardState,
) -> bool {
    if state.is_busy() {
        return false;
    }
    let Some(def) = path::step_def(change_type, step) else {
        return false;
    };
    if def.is_terminal() {
        return false;
    }

    match def.kind {
        StepKind::ChooseChangeType => change_type.is_some(),
        StepKind::SelectProgram => state.transfer.selected_program_id.is_some(),
        StepKind::CancellationFee => {
            !state.cancellation.apply_cancellation_fee
                || state.cancellation.cancellation_fee_amount > Decimal::ZERO
        }
        StepKind::CancellationSettlement => {
            derived::effective_cancellation_settlement(state).is_some()
        }
        StepKind::SelectContact => state.substitution.selected_contact.is_some(),
        // Checked by the validator at Next time.
        _ => true,
    }
}

/// [`allowed`] for the state's own position.
pub fn allowed_here(state: &WizardState) -> bool {
    allowed(state.change_type, state.current_step, state)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Contact, SettlementType};

    fn at(
        change_type: ChangeType,
        step: u8,
    ) -> WizardState {
        WizardState {
            change_type: Some(change_type),
            current_step: step,
            ..Default::default()
        }
    }

    #[test]
    fn step_zero_needs_a_change_type() {
        let state = WizardState::default();
        assert!(!allowed(None, 0, &state));
        assert!(allowed(Some(ChangeType::Substitution), 0, &state));
    }

    #[test]
    fn transfer_step_one_needs_a_program() {
        let mut state = at(ChangeType::Transfer, 1);
        assert!(!allowed_here(&state));
        state.transfer.selected_program_id = Some("PRG-B".to_string());
        assert!(allowed_here(&state));
    }

    #[test]
    fn cancellation_fee_disabled_is_always_allowed() {
        let mut state = at(ChangeType::Cancellation, 1);
        assert!(allowed_here(&state));

        state.cancellation.apply_cancellation_fee = true;
        assert!(!allowed_here(&state));

        state.cancellation.cancellation_fee_amount = dec!(0.01);
        assert!(allowed_here(&state));
    }

    #[test]
    fn settlement_step_needs_a_choice() {
        let mut state = at(ChangeType::Cancellation, 2);
        assert!(!allowed_here(&state));

        // No loaded record means nothing is offered.
        state.cancellation.settlement_type = Some(SettlementType::Refund);
        assert!(!allowed_here(&state));
    }

    #[test]
    fn substitution_step_one_needs_a_contact() {
        let mut state = at(ChangeType::Substitution, 1);
        assert!(!allowed_here(&state));
        state.substitution.selected_contact = Some(Contact {
            id: "003000000000002AAA".to_string(),
            name: "Grace Hopper".to_string(),
            email: None,
            phone: None,
            account_name: None,
        });
        assert!(allowed_here(&state));
    }

    #[test]
    fn busy_blocks_every_step() {
        let mut state = at(ChangeType::Transfer, 3);
        assert!(allowed_here(&state));
        state.is_processing = true;
        assert!(!allowed_here(&state));
    }

    #[test]
    fn terminal_and_out_of_range_steps_block() {
        assert!(!allowed_here(&at(ChangeType::Transfer, 4)));
        assert!(!allowed_here(&at(ChangeType::Substitution, 3)));
        assert!(!allowed_here(&at(ChangeType::Substitution, 7)));
    }
}
