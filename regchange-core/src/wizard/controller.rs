//! The session orchestrator.
//!
//! [`WizardController`] owns the [`WizardState`] for one registrant and is
//! the only thing that mutates it. Field setters apply the storage
//! invariants (a disabled toggle zeroes its amount, a changed path clears
//! path fields) and refuse edits on steps that do not show the field;
//! `next`, `back` and `execute` move between steps through the [`path`]
//! tables after the [`validator`] and [`gate`] agree.
//!
//! Collaborator calls run under a [`BusyGuard`], so the matching busy flag
//! is down again on every exit path.

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::calculations;
use crate::models::{ChangeType, ExecutionOutcome, SettlementType};
use crate::service::{RegistrationChangeService, ServiceError};
use crate::settings::WizardSettings;
use crate::wizard::busy::BusyGuard;
use crate::wizard::derived::{self, Progress};
use crate::wizard::error::WizardError;
use crate::wizard::path::{self, PrimaryAction, StepDef, StepKind};
use crate::wizard::state::{Notification, NotificationKind, WizardState};
use crate::wizard::validator::{self, Field, FieldError};
use crate::wizard::{assembly, gate};

const TRANSFER_DETAILS: &[StepKind] = &[StepKind::TransferDetails];
const SUBSTITUTION_EDITS: &[StepKind] = &[StepKind::SelectContact, StepKind::SubstitutionConfirm];

pub struct WizardController {
    service: Box<dyn RegistrationChangeService>,
    settings: WizardSettings,
    state: WizardState,
    notifications: Vec<Notification>,
}

impl WizardController {
    pub fn new(
        service: Box<dyn RegistrationChangeService>,
        settings: WizardSettings,
    ) -> Self {
        Self {
            service,
            settings,
            state: WizardState::default(),
            notifications: Vec::new(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn progress(&self) -> Progress {
        derived::progress(&self.state)
    }

    /// Definition of the step the session is on.
    pub fn current_step_def(&self) -> Option<&'static StepDef> {
        path::step_def(self.state.change_type, self.state.current_step)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hands queued notifications to the shell and clears the queue.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Renders an amount with the configured currency symbol.
    pub fn format_currency(
        &self,
        value: Decimal,
    ) -> String {
        calculations::format_currency(value, &self.settings.currency_symbol)
    }

    // ── session lifecycle ────────────────────────────────────────────────

    /// Loads the registration and starts a fresh session over it.
    ///
    /// On failure the error is kept as a banner (`has_error`) and the
    /// previous state is otherwise left alone, so the shell can retry.
    pub async fn start(
        &mut self,
        registrant_id: &str,
    ) -> Result<(), WizardError> {
        if self.state.is_busy() {
            return Err(WizardError::Busy);
        }
        let registrant_id = registrant_id.trim();
        info!(registrant_id, "loading registration");

        let result = {
            let _busy = BusyGuard::engage(&mut self.state.is_loading);
            self.service.load_init_data(registrant_id).await
        };

        match result {
            Ok(init) => {
                debug!(
                    registrant_id,
                    catalog_len = init.catalog.len(),
                    payment_status = %init.payment_status(),
                    "registration loaded"
                );
                self.state = WizardState::new(Some(init));
                self.notifications.clear();
                Ok(())
            }
            Err(fault) => {
                let message = format!("Unable to load registration: {}", fault.user_message());
                error!(registrant_id, error = %fault, "failed to load registration");
                self.state.set_error(message.clone());
                Err(WizardError::Load(message))
            }
        }
    }

    /// Returns every field to its initial value over the already-loaded
    /// data. No collaborator is called.
    pub fn reset(&mut self) {
        debug!(
            change_type = ?self.state.change_type,
            step = self.state.current_step,
            "wizard reset"
        );
        self.state.reset();
        self.notifications.clear();
    }

    // ── step 0 ───────────────────────────────────────────────────────────

    /// Picks the path. Only possible on step 0; picking a different path
    /// than before discards everything entered on the old one.
    pub fn select_change_type(
        &mut self,
        change_type: ChangeType,
    ) -> Result<(), WizardError> {
        let step = self.state.current_step;
        if step != 0 {
            return Err(WizardError::InvalidTransition {
                action: "Change type selection",
                step,
            });
        }
        if self.state.change_type != Some(change_type) {
            debug!(from = ?self.state.change_type, to = %change_type, "change type selected");
            self.state.clear_paths();
            self.state.change_type = Some(change_type);
        }
        self.touch(Field::ChangeType);
        Ok(())
    }

    // ── transfer fields ──────────────────────────────────────────────────

    /// Selects the target program from the loaded catalog.
    ///
    /// A new target invalidates everything seeded from the old one: the
    /// loaded detail, the fees and the settlement choice.
    pub fn select_program(
        &mut self,
        program_id: &str,
    ) -> Result<(), WizardError> {
        self.require_step("Program selection", &[StepKind::SelectProgram])?;
        let init = self
            .state
            .init_data
            .as_ref()
            .ok_or(WizardError::NotInitialized)?;
        if init.program(program_id).is_none() {
            return Err(self.reject(FieldError::new(
                Field::TargetProgram,
                format!("Program '{program_id}' is not in the catalog."),
            )));
        }

        let transfer = &mut self.state.transfer;
        if transfer.selected_program_id.as_deref() != Some(program_id) {
            transfer.selected_program_id = Some(program_id.to_string());
            transfer.program_detail = None;
            transfer.new_program_fee_amount = None;
            transfer.apply_transfer_fee = false;
            transfer.transfer_fee_amount = Decimal::ZERO;
            transfer.settlement_type = None;
            debug!(program_id, "transfer target selected");
        }
        self.touch(Field::TargetProgram);
        Ok(())
    }

    pub fn set_new_program_fee(
        &mut self,
        amount: Option<Decimal>,
    ) -> Result<(), WizardError> {
        self.require_step("New program fee", TRANSFER_DETAILS)?;
        self.state.transfer.new_program_fee_amount = amount;
        self.touch(Field::NewProgramFee);
        self.drop_stale_transfer_settlement();
        Ok(())
    }

    /// Turning the toggle off zeroes the amount. Turning it back on restores
    /// the loaded unit price when there is one.
    pub fn set_apply_transfer_fee(
        &mut self,
        apply: bool,
    ) -> Result<(), WizardError> {
        self.require_step("Transfer fee", TRANSFER_DETAILS)?;
        let transfer = &mut self.state.transfer;
        transfer.apply_transfer_fee = apply;
        transfer.transfer_fee_amount = if apply {
            transfer
                .program_detail
                .as_ref()
                .and_then(|detail| detail.transfer_fee_unit_price)
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        self.touch(Field::TransferFee);
        self.drop_stale_transfer_settlement();
        Ok(())
    }

    pub fn set_transfer_fee_amount(
        &mut self,
        amount: Decimal,
    ) -> Result<(), WizardError> {
        self.require_step("Transfer fee", TRANSFER_DETAILS)?;
        let transfer = &mut self.state.transfer;
        transfer.transfer_fee_amount =
            calculations::effective_amount(transfer.apply_transfer_fee, amount);
        self.touch(Field::TransferFee);
        self.drop_stale_transfer_settlement();
        Ok(())
    }

    pub fn set_apply_discount(
        &mut self,
        apply: bool,
    ) -> Result<(), WizardError> {
        self.require_step("Discount", TRANSFER_DETAILS)?;
        let transfer = &mut self.state.transfer;
        transfer.apply_discount = apply;
        if !apply {
            transfer.discount_amount = Decimal::ZERO;
        }
        self.touch(Field::Discount);
        self.drop_stale_transfer_settlement();
        Ok(())
    }

    pub fn set_discount_amount(
        &mut self,
        amount: Decimal,
    ) -> Result<(), WizardError> {
        self.require_step("Discount", TRANSFER_DETAILS)?;
        let transfer = &mut self.state.transfer;
        transfer.discount_amount = calculations::effective_amount(transfer.apply_discount, amount);
        self.touch(Field::Discount);
        self.drop_stale_transfer_settlement();
        Ok(())
    }

    pub fn set_discount_code(
        &mut self,
        code: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.require_step("Discount code", TRANSFER_DETAILS)?;
        self.state.transfer.discount_code = code.into();
        self.touch(Field::Discount);
        Ok(())
    }

    /// Chooses how a surplus transfer credit is settled. `None` clears it.
    pub fn select_transfer_settlement(
        &mut self,
        settlement: Option<SettlementType>,
    ) -> Result<(), WizardError> {
        self.require_step("Transfer settlement", TRANSFER_DETAILS)?;
        let offered = derived::transfer_settlement_options(&self.state);
        if let Some(choice) = settlement.filter(|choice| !offered.contains(choice)) {
            return Err(self.reject(FieldError::new(
                Field::TransferSettlement,
                format!("{choice} is not available for this transfer."),
            )));
        }
        self.state.transfer.settlement_type = settlement;
        self.touch(Field::TransferSettlement);
        Ok(())
    }

    pub fn set_transfer_comments(
        &mut self,
        comments: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.require_step(
            "Transfer comments",
            &[StepKind::TransferDetails, StepKind::TransferReview],
        )?;
        self.state.transfer.comments = comments.into();
        Ok(())
    }

    // ── cancellation fields ──────────────────────────────────────────────

    pub fn set_apply_cancellation_fee(
        &mut self,
        apply: bool,
    ) -> Result<(), WizardError> {
        self.require_step("Cancellation fee", &[StepKind::CancellationFee])?;
        let cancellation = &mut self.state.cancellation;
        cancellation.apply_cancellation_fee = apply;
        if !apply {
            cancellation.cancellation_fee_amount = Decimal::ZERO;
        }
        self.touch(Field::CancellationFee);
        Ok(())
    }

    pub fn set_cancellation_fee_amount(
        &mut self,
        amount: Decimal,
    ) -> Result<(), WizardError> {
        self.require_step("Cancellation fee", &[StepKind::CancellationFee])?;
        let cancellation = &mut self.state.cancellation;
        cancellation.cancellation_fee_amount =
            calculations::effective_amount(cancellation.apply_cancellation_fee, amount);
        self.touch(Field::CancellationFee);
        Ok(())
    }

    /// Chooses how the cancellation refund is settled. Only offered options
    /// are accepted; `None` clears the choice.
    pub fn select_cancellation_settlement(
        &mut self,
        settlement: Option<SettlementType>,
    ) -> Result<(), WizardError> {
        self.require_step(
            "Cancellation settlement",
            &[StepKind::CancellationSettlement],
        )?;
        let offered = derived::cancellation_settlement_options(&self.state);
        if let Some(choice) = settlement.filter(|choice| !offered.contains(choice)) {
            return Err(self.reject(FieldError::new(
                Field::CancellationSettlement,
                format!("{choice} is not available for this registration."),
            )));
        }
        self.state.cancellation.settlement_type = settlement;
        self.touch(Field::CancellationSettlement);
        Ok(())
    }

    pub fn set_cancellation_comments(
        &mut self,
        comments: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.require_step(
            "Cancellation comments",
            &[
                StepKind::CancellationFee,
                StepKind::CancellationSettlement,
                StepKind::CancellationReview,
            ],
        )?;
        self.state.cancellation.comments = comments.into();
        Ok(())
    }

    // ── substitution fields ──────────────────────────────────────────────

    /// Looks up candidate substitutes.
    ///
    /// Terms shorter than the configured minimum clear the results without
    /// a call. A failed search clears the results and queues a
    /// notification; the session stays usable.
    pub async fn search_contacts(
        &mut self,
        term: &str,
    ) -> Result<(), WizardError> {
        self.require_step("Contact search", &[StepKind::SelectContact])?;
        let term = term.trim();
        self.state.substitution.search_term = term.to_string();

        if term.chars().count() < self.settings.min_contact_search_len {
            debug!(term_len = term.len(), "contact search term too short; skipping");
            self.state.substitution.search_results.clear();
            return Ok(());
        }
        if self.state.is_busy() {
            return Err(WizardError::Busy);
        }

        let scope = self
            .state
            .init_data
            .as_ref()
            .and_then(|init| init.registrant.account_id.clone());
        info!(term, account_scope = ?scope, "searching contacts");

        let result = {
            let _busy = BusyGuard::engage(&mut self.state.is_searching_contacts);
            self.service.search_contacts(term, scope.as_deref()).await
        };

        match result {
            Ok(contacts) => {
                debug!(term, found = contacts.len(), "contact search complete");
                self.state.substitution.search_results = contacts;
                Ok(())
            }
            Err(fault) => {
                error!(term, error = %fault, "contact search failed");
                self.state.substitution.search_results.clear();
                let message = fault.user_message();
                self.notify(NotificationKind::Error, "Contact search failed", &message);
                Err(WizardError::Load(message))
            }
        }
    }

    /// Selects a substitute from the current search results.
    pub fn select_contact(
        &mut self,
        contact_id: &str,
    ) -> Result<(), WizardError> {
        self.require_step("Contact selection", &[StepKind::SelectContact])?;
        let found = self
            .state
            .substitution
            .search_results
            .iter()
            .find(|contact| contact.id == contact_id)
            .cloned();
        match found {
            Some(contact) => {
                debug!(contact_id, "substitute selected");
                self.state.substitution.selected_contact = Some(contact);
                self.touch(Field::SubstituteContact);
                Ok(())
            }
            None => Err(self.reject(FieldError::new(
                Field::SubstituteContact,
                "Select a contact from the search results.",
            ))),
        }
    }

    pub fn set_apply_substitution_discount(
        &mut self,
        apply: bool,
    ) -> Result<(), WizardError> {
        self.require_step("Substitution discount", SUBSTITUTION_EDITS)?;
        self.state.substitution.apply_substitution_discount = apply;
        Ok(())
    }

    pub fn set_substitution_comments(
        &mut self,
        comments: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.require_step("Substitution comments", SUBSTITUTION_EDITS)?;
        self.state.substitution.comments = comments.into();
        Ok(())
    }

    // ── navigation ───────────────────────────────────────────────────────

    /// Whether the forward control is enabled right now.
    pub fn can_go_next(&self) -> bool {
        self.current_step_def()
            .is_some_and(|def| def.action == PrimaryAction::Next)
            && gate::allowed_here(&self.state)
    }

    pub fn can_execute(&self) -> bool {
        self.current_step_def()
            .is_some_and(|def| def.action == PrimaryAction::Execute)
            && gate::allowed_here(&self.state)
    }

    pub fn can_go_back(&self) -> bool {
        !self.state.is_busy()
            && path::previous_step(
                self.state.change_type,
                self.state.current_step,
                derived::route_flags(&self.state),
            )
            .is_some()
    }

    /// Moves forward from a step whose primary action is "Next".
    ///
    /// Leaving the program selection step loads the target program's
    /// detail first; a failed load keeps the session where it is.
    pub async fn next(&mut self) -> Result<(), WizardError> {
        let def = self.require_action(PrimaryAction::Next, "Next")?;
        let step = self.state.current_step;

        if let Err(err) = validator::validate_forward(&self.state) {
            return Err(self.reject(err));
        }
        if !gate::allowed_here(&self.state) {
            return Err(WizardError::InvalidTransition {
                action: "Next",
                step,
            });
        }

        if def.kind == StepKind::SelectProgram {
            self.ensure_program_detail().await?;
        }

        let target = path::next_step(
            self.state.change_type,
            step,
            derived::route_flags(&self.state),
        )
        .ok_or(WizardError::InvalidTransition {
            action: "Next",
            step,
        })?;

        if def.kind == StepKind::CancellationFee {
            self.state.cancellation.settlement_step_visited =
                Self::kind_at(self.state.change_type, target)
                    == Some(StepKind::CancellationSettlement);
        }
        self.enter_step(target);
        Ok(())
    }

    /// Moves back one step along the path's back edges.
    pub fn back(&mut self) -> Result<(), WizardError> {
        if self.state.is_busy() {
            return Err(WizardError::Busy);
        }
        let step = self.state.current_step;
        let target = path::previous_step(
            self.state.change_type,
            step,
            derived::route_flags(&self.state),
        )
        .ok_or(WizardError::InvalidTransition {
            action: "Back",
            step,
        })?;
        self.enter_step(target);
        Ok(())
    }

    /// Runs the change on an execute step.
    ///
    /// Validation and registrant-id resolution happen before anything is
    /// sent. A business failure (`success: false`) or a fault leaves the
    /// session on the execute step with the message in `error_message`.
    pub async fn execute(&mut self) -> Result<(), WizardError> {
        self.require_action(PrimaryAction::Execute, "Execute")?;
        let change_type = self.state.change_type.ok_or(WizardError::InvalidTransition {
            action: "Execute",
            step: self.state.current_step,
        })?;
        if self.state.init_data.is_none() {
            return Err(WizardError::NotInitialized);
        }
        if let Err(err) = validator::validate_execute(&self.state) {
            return Err(self.reject(err));
        }

        let registrant_id =
            match assembly::resolve_registrant_id(&self.state, self.settings.min_registrant_id_len)
            {
                Ok(id) => id,
                Err(message) => {
                    warn!(change_type = %change_type, %message, "registrant id not resolved");
                    self.state.set_error(message.clone());
                    return Err(WizardError::Resolution(message));
                }
            };

        match change_type {
            ChangeType::Transfer => {
                let request = assembly::transfer_request(&self.state, registrant_id.clone())
                    .map_err(|err| self.reject(err))?;
                info!(
                    registrant_id = %registrant_id,
                    new_program_id = %request.new_program_id,
                    net_credit = %request.net_credit_amount,
                    same_program = request.is_same_program,
                    "executing transfer"
                );
                let result = {
                    let _busy = BusyGuard::engage(&mut self.state.is_processing);
                    self.service.execute_transfer(&request).await
                };
                let outcome = self.settle(change_type, result)?;
                self.state.transfer.result = Some(outcome);
            }
            ChangeType::Cancellation => {
                let request = assembly::cancellation_request(&self.state, registrant_id.clone())
                    .map_err(|err| self.reject(err))?;
                info!(
                    registrant_id = %registrant_id,
                    refund = %request.refund_amount,
                    settlement = ?request.settlement_type,
                    "executing cancellation"
                );
                let result = {
                    let _busy = BusyGuard::engage(&mut self.state.is_processing);
                    self.service.execute_cancellation(&request).await
                };
                let outcome = self.settle(change_type, result)?;
                self.state.cancellation.result = Some(outcome);
            }
            ChangeType::Substitution => {
                let request = assembly::substitution_request(&self.state, registrant_id.clone())
                    .map_err(|err| self.reject(err))?;
                info!(
                    registrant_id = %registrant_id,
                    new_contact_id = %request.new_contact_id,
                    "executing substitution"
                );
                let result = {
                    let _busy = BusyGuard::engage(&mut self.state.is_processing);
                    self.service.execute_substitution(&request).await
                };
                let outcome = self.settle(change_type, result)?;
                self.state.substitution.result = Some(outcome);
            }
        }

        let terminal = path::terminal_step(change_type);
        info!(registrant_id = %registrant_id, change_type = %change_type, "change completed");
        self.enter_step(terminal);
        self.notify(
            NotificationKind::Success,
            format!("{change_type} complete"),
            format!("The {} was completed successfully.", change_type.label().to_lowercase()),
        );
        Ok(())
    }

    // ── internals ────────────────────────────────────────────────────────

    fn require_action(
        &self,
        action: PrimaryAction,
        name: &'static str,
    ) -> Result<&'static StepDef, WizardError> {
        let step = self.state.current_step;
        let def = self
            .current_step_def()
            .filter(|def| def.action == action)
            .ok_or(WizardError::InvalidTransition { action: name, step })?;
        if self.state.is_busy() {
            return Err(WizardError::Busy);
        }
        Ok(def)
    }

    /// Field edits are only taken on the steps that show the field.
    fn require_step(
        &self,
        action: &'static str,
        kinds: &[StepKind],
    ) -> Result<(), WizardError> {
        let step = self.state.current_step;
        if self.state.is_busy() {
            return Err(WizardError::Busy);
        }
        match derived::current_step_kind(&self.state) {
            Some(kind) if kinds.contains(&kind) => Ok(()),
            current => {
                warn!(action, step, current = ?current, "edit rejected on this step");
                Err(WizardError::InvalidTransition { action, step })
            }
        }
    }

    /// The transfer settlement options follow the balance due. A choice
    /// that is no longer offered is dropped instead of coming back later.
    fn drop_stale_transfer_settlement(&mut self) {
        if self.state.transfer.settlement_type.is_none()
            || derived::effective_transfer_settlement(&self.state).is_some()
        {
            return;
        }
        debug!(
            settlement = ?self.state.transfer.settlement_type,
            "clearing transfer settlement no longer offered"
        );
        self.state.transfer.settlement_type = None;
        self.notify(
            NotificationKind::Warning,
            "Settlement cleared",
            "The transfer no longer leaves a credit to settle.",
        );
    }

    fn kind_at(
        change_type: Option<ChangeType>,
        step: u8,
    ) -> Option<StepKind> {
        path::step_def(change_type, step).map(|def| def.kind)
    }

    fn enter_step(
        &mut self,
        step: u8,
    ) {
        debug!(
            change_type = ?self.state.change_type,
            from = self.state.current_step,
            to = step,
            "step transition"
        );
        self.state.current_step = step;
        self.state.clear_errors();

        // Options are re-derived on entry; a choice that is no longer
        // offered must be made again.
        if Self::kind_at(self.state.change_type, step) == Some(StepKind::CancellationSettlement)
            && derived::effective_cancellation_settlement(&self.state).is_none()
            && self.state.cancellation.settlement_type.is_some()
        {
            debug!("clearing settlement choice no longer offered");
            self.state.cancellation.settlement_type = None;
        }
    }

    /// Loads detail for the selected program unless it is already loaded,
    /// then seeds the fee fields from it.
    async fn ensure_program_detail(&mut self) -> Result<(), WizardError> {
        let Some(program_id) = self.state.transfer.selected_program_id.clone() else {
            return Err(self.reject(FieldError::new(
                Field::TargetProgram,
                "Select a program to transfer to.",
            )));
        };
        let already_loaded = self
            .state
            .transfer
            .program_detail
            .as_ref()
            .is_some_and(|detail| detail.program_id == program_id);
        if already_loaded {
            return Ok(());
        }

        let pricing_context = self
            .state
            .init_data
            .as_ref()
            .and_then(|init| init.pricing_context_id().map(str::to_string));
        info!(program_id = %program_id, pricing_context = ?pricing_context, "loading program detail");

        let result = {
            let _busy = BusyGuard::engage(&mut self.state.is_loading);
            self.service
                .load_program_detail(&program_id, pricing_context.as_deref())
                .await
        };

        let detail = match result {
            Ok(detail) => detail,
            Err(fault) => {
                error!(program_id = %program_id, error = %fault, "failed to load program detail");
                let message = fault.user_message();
                self.notify(
                    NotificationKind::Error,
                    "Program details unavailable",
                    &message,
                );
                return Err(WizardError::Load(message));
            }
        };

        let catalog_fee = derived::selected_program(&self.state).and_then(|program| program.fee);
        let transfer = &mut self.state.transfer;
        transfer.new_program_fee_amount = detail.expected_fee.or(catalog_fee);
        if let Some(unit_price) = detail.transfer_fee_unit_price {
            transfer.apply_transfer_fee = true;
            transfer.transfer_fee_amount = unit_price;
        }
        debug!(
            program_id = %program_id,
            new_program_fee = ?transfer.new_program_fee_amount,
            transfer_fee = %transfer.transfer_fee_amount,
            "program detail seeded"
        );
        transfer.program_detail = Some(detail);
        Ok(())
    }

    /// Sorts an execute result into success, business failure or fault.
    fn settle<R: ExecutionOutcome>(
        &mut self,
        change_type: ChangeType,
        result: Result<R, ServiceError>,
    ) -> Result<R, WizardError> {
        match result {
            Ok(outcome) if outcome.is_success() => Ok(outcome),
            Ok(outcome) => {
                let message = outcome
                    .error_message()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!(
                            "The {} could not be completed.",
                            change_type.label().to_lowercase()
                        )
                    });
                warn!(change_type = %change_type, %message, "change rejected by backend");
                self.state.set_error(message.clone());
                Err(WizardError::Business(message))
            }
            Err(fault) => {
                let message = fault.user_message();
                error!(change_type = %change_type, error = %fault, "execute call failed");
                self.state.set_error(message.clone());
                Err(WizardError::Transport(message))
            }
        }
    }

    /// Records a validation failure for field-level display.
    fn reject(
        &mut self,
        err: FieldError,
    ) -> WizardError {
        warn!(
            change_type = ?self.state.change_type,
            step = self.state.current_step,
            field = ?err.field,
            message = %err.message,
            "validation failed"
        );
        self.state.field_error = Some(err.clone());
        WizardError::Validation(err)
    }

    /// Drops a stale validation message once its field is edited.
    fn touch(
        &mut self,
        field: Field,
    ) {
        if self
            .state
            .field_error
            .as_ref()
            .is_some_and(|err| err.field == field)
        {
            self.state.field_error = None;
        }
    }

    fn notify(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.notifications
            .push(Notification::new(kind, title, message));
    }
}
