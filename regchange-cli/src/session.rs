//! Drives a [`WizardController`] through one path per subcommand, sending
//! the same events an interactive shell would, and writes the review and
//! the outcome to `out`.

use std::io::Write;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use tracing::{info, warn};

use regchange_core::wizard::derived;
use regchange_core::wizard::{NotificationKind, StepKind};
use regchange_core::{ChangeType, InitData, ProgramOffering, WizardController, WizardState};

use crate::cli::{CancelArgs, Command, ShowArgs, SubstituteArgs, TransferArgs};

pub async fn run(
    command: &Command,
    controller: &mut WizardController,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Show(args) => show(controller, args, out).await,
        Command::Cancel(args) => cancel(controller, args, dry_run, out).await,
        Command::Substitute(args) => substitute(controller, args, dry_run, out).await,
        Command::Transfer(args) => transfer(controller, args, dry_run, out).await,
    }
}

pub async fn show(
    controller: &mut WizardController,
    args: &ShowArgs,
    out: &mut dyn Write,
) -> Result<()> {
    controller.start(&args.registrant).await?;
    let init = loaded(controller.state())?;

    write_registration(controller, init, out)?;
    writeln!(out)?;
    writeln!(out, "Catalog:")?;
    for program in &init.catalog {
        let fee = program
            .fee
            .map_or_else(|| "-".to_string(), |fee| controller.format_currency(fee));
        writeln!(
            out,
            "  {}  {}  {:<28} {:<10} {:>12}",
            program.id,
            program
                .start_date
                .map_or_else(|| "----------".to_string(), |d| d.to_string()),
            program.name,
            program.location.as_deref().unwrap_or("-"),
            fee
        )?;
    }
    Ok(())
}

pub async fn cancel(
    controller: &mut WizardController,
    args: &CancelArgs,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<()> {
    controller.start(&args.registrant).await?;
    controller.select_change_type(ChangeType::Cancellation)?;
    controller.next().await?;

    if let Some(fee) = args.fee {
        controller.set_apply_cancellation_fee(true)?;
        controller.set_cancellation_fee_amount(fee)?;
    }
    if let Some(comments) = &args.comments {
        controller.set_cancellation_comments(comments.as_str())?;
    }
    controller.next().await?;

    if derived::current_step_kind(controller.state()) == Some(StepKind::CancellationSettlement) {
        if let Some(settlement) = args.settlement {
            controller.select_cancellation_settlement(Some(settlement))?;
        }
        controller.next().await?;
    } else if args.settlement.is_some() {
        warn!("nothing was paid on this registration; --settlement ignored");
    }

    write_review(controller, out)?;
    finish(controller, dry_run, out).await
}

pub async fn substitute(
    controller: &mut WizardController,
    args: &SubstituteArgs,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<()> {
    controller.start(&args.registrant).await?;
    controller.select_change_type(ChangeType::Substitution)?;
    controller.next().await?;

    controller.search_contacts(&args.search).await?;
    let results = &controller.state().substitution.search_results;
    let contact_id = match (&args.contact, results.as_slice()) {
        (Some(id), _) => id.clone(),
        (None, [only]) => only.id.clone(),
        (None, []) => bail!("No contacts match '{}'", args.search),
        (None, many) => {
            writeln!(out, "Contacts matching '{}':", args.search)?;
            for contact in many {
                writeln!(
                    out,
                    "  {}  {:<24} {}",
                    contact.id,
                    contact.name,
                    contact.email.as_deref().unwrap_or("-")
                )?;
            }
            bail!("{} contacts match; pick one with --contact", many.len());
        }
    };
    controller.select_contact(&contact_id)?;
    controller.set_apply_substitution_discount(args.discount)?;
    if let Some(comments) = &args.comments {
        controller.set_substitution_comments(comments.as_str())?;
    }
    controller.next().await?;

    write_review(controller, out)?;
    finish(controller, dry_run, out).await
}

pub async fn transfer(
    controller: &mut WizardController,
    args: &TransferArgs,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<()> {
    controller.start(&args.registrant).await?;
    controller.select_change_type(ChangeType::Transfer)?;
    controller.next().await?;

    controller.select_program(&args.program)?;
    controller.next().await?;

    if let Some(fee) = args.fee {
        controller.set_new_program_fee(Some(fee))?;
    }
    if args.no_transfer_fee {
        controller.set_apply_transfer_fee(false)?;
    } else if let Some(fee) = args.transfer_fee {
        controller.set_apply_transfer_fee(true)?;
        controller.set_transfer_fee_amount(fee)?;
    }
    if args.discount.is_some() || args.discount_code.is_some() {
        controller.set_apply_discount(true)?;
        controller.set_discount_amount(args.discount.unwrap_or(Decimal::ZERO))?;
        controller.set_discount_code(args.discount_code.clone().unwrap_or_default())?;
    }
    if let Some(settlement) = args.settlement {
        controller.select_transfer_settlement(Some(settlement))?;
    }
    if let Some(comments) = &args.comments {
        controller.set_transfer_comments(comments.as_str())?;
    }
    controller.next().await?;

    write_review(controller, out)?;
    finish(controller, dry_run, out).await
}

/// Executes from the review step, or stops there on a dry run.
async fn finish(
    controller: &mut WizardController,
    dry_run: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if dry_run {
        writeln!(out)?;
        writeln!(out, "Dry run: nothing was executed.")?;
        return Ok(());
    }

    let change_type = controller
        .state()
        .change_type
        .context("No change type selected")?;
    info!(change_type = %change_type, "executing from the command line");
    let executed = controller.execute().await;
    write_notifications(controller, out)?;
    executed.with_context(|| format!("{change_type} was not completed"))?;

    writeln!(out)?;
    write_result(controller, out)
}

fn loaded(state: &WizardState) -> Result<&InitData> {
    state
        .init_data
        .as_ref()
        .context("Registration data is not loaded")
}

fn describe_program(program: &ProgramOffering) -> String {
    let mut text = program.name.clone();
    if let Some(location) = &program.location {
        text.push_str(&format!(", {location}"));
    }
    if let Some(start) = program.start_date {
        text.push_str(&format!(", starts {start}"));
    }
    text
}

fn write_registration(
    controller: &WizardController,
    init: &InitData,
    out: &mut dyn Write,
) -> Result<()> {
    let registrant = &init.registrant;
    writeln!(out, "Registrant:  {} ({})", registrant.name, registrant.id)?;
    if let Some(email) = &registrant.email {
        writeln!(out, "Email:       {email}")?;
    }
    writeln!(
        out,
        "Program:     {} ({})",
        describe_program(&init.current_program),
        init.current_program.id
    )?;
    match &init.financial_record {
        Some(record) => writeln!(
            out,
            "Order:       {} {} paid {} of {}{}",
            record.id,
            record.payment_status,
            controller.format_currency(record.amount_paid()),
            controller.format_currency(record.amount),
            if record.is_bundled { " (bundled)" } else { "" }
        )?,
        None => writeln!(out, "Order:       none")?,
    }
    if !init.prior_discount_total.is_zero() {
        writeln!(
            out,
            "Discounts:   {} already applied",
            controller.format_currency(init.prior_discount_total)
        )?;
    }
    Ok(())
}

fn line(
    out: &mut dyn Write,
    label: &str,
    value: impl std::fmt::Display,
) -> Result<()> {
    writeln!(out, "  {:<22}{}", format!("{label}:"), value)?;
    Ok(())
}

fn write_review(
    controller: &WizardController,
    out: &mut dyn Write,
) -> Result<()> {
    let state = controller.state();
    let init = loaded(state)?;
    let money = |value: Decimal| controller.format_currency(value);
    let progress = controller.progress();

    writeln!(
        out,
        "{} (step {} of {})",
        progress.label, progress.position, progress.total
    )?;
    line(out, "Registrant", &init.registrant.name)?;

    match state.change_type {
        Some(ChangeType::Transfer) => {
            let target = derived::selected_program(state)
                .map_or_else(|| "-".to_string(), describe_program);
            line(out, "From", describe_program(&init.current_program))?;
            line(out, "To", target)?;
            if derived::is_same_program_transfer(state) {
                line(out, "Note", "same program offering")?;
            }
            line(out, "Original fee total", money(derived::original_program_fee_total(state)))?;
            line(out, "Transfer fee", money(derived::effective_transfer_fee(state)))?;
            line(out, "Net credit", money(derived::net_credit_amount(state)))?;
            if let Some(fee) = state.transfer.new_program_fee_amount {
                line(out, "New program fee", money(fee))?;
            }
            line(out, "Discount", money(derived::effective_discount_amount(state)))?;
            if let Some(net_fee) = derived::new_program_net_fee(state) {
                line(out, "New program net fee", money(net_fee))?;
            }
            if let Some(balance) = derived::transfer_balance_due(state) {
                line(out, "Balance due", money(balance))?;
            }
            if let Some(settlement) = derived::effective_transfer_settlement(state) {
                line(out, "Settlement", settlement)?;
            }
        }
        Some(ChangeType::Cancellation) => {
            line(out, "Program", describe_program(&init.current_program))?;
            line(out, "Payment status", init.payment_status())?;
            line(out, "Order total", money(derived::originating_amount(state)))?;
            line(out, "Cancellation fee", money(derived::effective_cancellation_fee(state)))?;
            line(out, "Refund", money(derived::cancellation_refund_amount(state)))?;
            if let Some(settlement) = derived::effective_cancellation_settlement(state) {
                line(out, "Settlement", settlement)?;
            }
        }
        Some(ChangeType::Substitution) => {
            let substitute = state
                .substitution
                .selected_contact
                .as_ref()
                .map_or("-", |contact| contact.name.as_str());
            line(out, "Program", describe_program(&init.current_program))?;
            line(out, "Substitute", substitute)?;
            line(
                out,
                "Substitution discount",
                if state.substitution.apply_substitution_discount { "yes" } else { "no" },
            )?;
        }
        None => {}
    }
    Ok(())
}

fn write_result(
    controller: &WizardController,
    out: &mut dyn Write,
) -> Result<()> {
    let state = controller.state();
    let id = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    if let Some(result) = &state.transfer.result {
        line(out, "New opportunity", id(&result.new_opportunity_id))?;
        line(out, "New attendee", id(&result.new_attendee_id))?;
    }
    if let Some(result) = &state.cancellation.result {
        line(out, "Opportunity", id(&result.opportunity_id))?;
        if let Some(refund) = result.refund_amount {
            line(out, "Refund", controller.format_currency(refund))?;
        }
        if result.payment_id.is_some() {
            line(out, "Payment", id(&result.payment_id))?;
        }
        if result.unapplied_funds_id.is_some() {
            line(out, "Unapplied funds", id(&result.unapplied_funds_id))?;
        }
    }
    if let Some(result) = &state.substitution.result {
        line(out, "New opportunity", id(&result.new_opportunity_id))?;
        line(out, "New attendee", id(&result.new_attendee_id))?;
    }
    Ok(())
}

fn write_notifications(
    controller: &mut WizardController,
    out: &mut dyn Write,
) -> Result<()> {
    for notification in controller.take_notifications() {
        let marker = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        writeln!(out, "[{marker}] {}: {}", notification.title, notification.message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use regchange_core::service::{ServiceConfig, ServiceFactory};
    use regchange_core::{SettlementType, WizardSettings};
    use regchange_db_sqlite::SqliteServiceFactory;

    use super::*;

    const ADA: &str = "a0B5g00000REGN0001";
    const ALAN: &str = "a0B5g00000REGN0003";

    async fn controller() -> WizardController {
        let service = SqliteServiceFactory
            .create(&ServiceConfig::default())
            .await
            .expect("in-memory backend");
        WizardController::new(service, WizardSettings::default())
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).expect("utf-8 output")
    }

    /// True when a review or result line shows `label` with `value`.
    fn shows(
        out: &str,
        label: &str,
        value: &str,
    ) -> bool {
        out.lines().any(|line| {
            line.trim_start()
                .strip_prefix(label)
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|rest| rest.trim() == value)
        })
    }

    #[tokio::test]
    async fn show_lists_active_catalog() {
        let mut controller = controller().await;
        let mut out = Vec::new();

        show(&mut controller, &ShowArgs { registrant: ADA.to_string() }, &mut out)
            .await
            .unwrap();

        let out = text(out);
        assert!(out.contains("Registrant:  Ada Lovelace"));
        assert!(out.contains("a0P5g00000PROG0004"));
        assert!(!out.contains("Data Literacy"));
    }

    #[tokio::test]
    async fn transfer_executes_with_seeded_prices() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = TransferArgs {
            registrant: ADA.to_string(),
            program: "a0P5g00000PROG0002".to_string(),
            ..Default::default()
        };

        transfer(&mut controller, &args, false, &mut out).await.unwrap();

        let out = text(out);
        assert!(shows(&out, "Net credit", "$900.00"), "{out}");
        assert!(shows(&out, "Balance due", "$50.00"), "{out}");
        assert!(out.contains("[ok] Transfer complete"), "{out}");
        assert_eq!(controller.state().current_step, 4);
        assert!(
            controller
                .state()
                .transfer
                .result
                .as_ref()
                .is_some_and(|r| r.success)
        );
    }

    #[tokio::test]
    async fn transfer_dry_run_stops_at_review() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = TransferArgs {
            registrant: ADA.to_string(),
            program: "a0P5g00000PROG0004".to_string(),
            no_transfer_fee: true,
            discount: Some(dec!(200)),
            ..Default::default()
        };

        transfer(&mut controller, &args, true, &mut out).await.unwrap();

        let out = text(out);
        assert!(out.contains("Review transfer"));
        assert!(shows(&out, "Transfer fee", "$0.00"), "{out}");
        assert!(shows(&out, "New program net fee", "$2,000.00"), "{out}");
        assert!(out.contains("Dry run"));
        assert_eq!(controller.state().current_step, 3);
        assert_eq!(controller.state().transfer.result, None);
    }

    #[tokio::test]
    async fn paid_cancellation_needs_a_settlement() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = CancelArgs {
            registrant: ADA.to_string(),
            fee: Some(dec!(50)),
            ..Default::default()
        };

        let err = cancel(&mut controller, &args, false, &mut out).await.unwrap_err();

        assert_eq!(err.to_string(), "Select how the refund should be settled.");
        assert_eq!(controller.state().current_step, 2);
    }

    #[tokio::test]
    async fn paid_cancellation_with_refund() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = CancelArgs {
            registrant: ADA.to_string(),
            fee: Some(dec!(50)),
            settlement: Some(SettlementType::Refund),
            comments: Some("Schedule conflict".to_string()),
        };

        cancel(&mut controller, &args, false, &mut out).await.unwrap();

        let out = text(out);
        assert!(shows(&out, "Refund", "$950.00"), "{out}");
        assert!(shows(&out, "Payment", "PAY-00000001"), "{out}");
    }

    #[tokio::test]
    async fn unpaid_cancellation_skips_settlement() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = CancelArgs {
            registrant: ALAN.to_string(),
            settlement: Some(SettlementType::Refund),
            ..Default::default()
        };

        cancel(&mut controller, &args, false, &mut out).await.unwrap();

        let out = text(out);
        assert!(out.contains("step 3 of 4"), "{out}");
        assert!(!out.contains("Settlement:"), "{out}");
        assert!(out.contains("[ok] Cancellation complete"), "{out}");
    }

    #[tokio::test]
    async fn substitution_picks_the_only_match() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = SubstituteArgs {
            registrant: ADA.to_string(),
            search: "grace".to_string(),
            ..Default::default()
        };

        substitute(&mut controller, &args, false, &mut out).await.unwrap();

        let out = text(out);
        assert!(shows(&out, "Substitute", "Grace Hopper"), "{out}");
        assert!(out.contains("[ok] Substitution complete"), "{out}");
    }

    #[tokio::test]
    async fn substitution_lists_ambiguous_matches() {
        let mut controller = controller().await;
        let mut out = Vec::new();
        let args = SubstituteArgs {
            registrant: ADA.to_string(),
            search: "example.com".to_string(),
            ..Default::default()
        };

        let err = substitute(&mut controller, &args, false, &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "3 contacts match; pick one with --contact");
        assert!(text(out).contains("Alan Turing"));
    }

    #[tokio::test]
    async fn unknown_registrant_fails_to_load() {
        let mut controller = controller().await;
        let mut out = Vec::new();

        let err = show(
            &mut controller,
            &ShowArgs {
                registrant: "a0B5g00000MISSING1".to_string(),
            },
            &mut out,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unable to load registration: Record not found"
        );
    }
}
