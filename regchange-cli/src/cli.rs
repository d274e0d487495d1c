use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use regchange_core::SettlementType;
use regchange_core::input::parse_amount;

/// Cancel, substitute or transfer a program registration.
///
/// Each subcommand walks the registration change wizard step by step,
/// prints the review, and executes the change unless `--dry-run` is given.
#[derive(Debug, Parser)]
#[command(name = "regchange", version)]
pub struct Cli {
    /// TOML configuration file. Defaults to `regchange.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend to use, overriding the config file.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Backend connection string, overriding the config file.
    /// For SQLite this is a file path (e.g. `registrations.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Stop at the review step without executing.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the registration and the program catalog.
    Show(ShowArgs),
    /// Cancel the registration.
    Cancel(CancelArgs),
    /// Hand the registration to another contact.
    Substitute(SubstituteArgs),
    /// Move the registrant to another program offering.
    Transfer(TransferArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Registration (attendee) record id.
    pub registrant: String,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CancelArgs {
    /// Registration (attendee) record id.
    pub registrant: String,

    /// Charge a cancellation fee of this amount.
    #[arg(long, value_parser = amount)]
    pub fee: Option<Decimal>,

    /// How the refund is settled: `refund` or `unapplied-funds`.
    #[arg(long, value_parser = settlement)]
    pub settlement: Option<SettlementType>,

    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SubstituteArgs {
    /// Registration (attendee) record id.
    pub registrant: String,

    /// Name or email fragment to search the registrant's account for.
    #[arg(long)]
    pub search: String,

    /// Contact id to pick from the results. May be omitted when the search
    /// finds exactly one contact.
    #[arg(long)]
    pub contact: Option<String>,

    /// Carry the substitution discount over to the new registrant.
    #[arg(long)]
    pub discount: bool,

    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TransferArgs {
    /// Registration (attendee) record id.
    pub registrant: String,

    /// Target program offering id.
    #[arg(long)]
    pub program: String,

    /// New program fee, overriding the looked-up price.
    #[arg(long, value_parser = amount)]
    pub fee: Option<Decimal>,

    /// Transfer fee amount, overriding the configured unit price.
    #[arg(long, value_parser = amount, conflicts_with = "no_transfer_fee")]
    pub transfer_fee: Option<Decimal>,

    /// Waive the transfer fee.
    #[arg(long)]
    pub no_transfer_fee: bool,

    /// Discount taken off the new program fee.
    #[arg(long, value_parser = amount)]
    pub discount: Option<Decimal>,

    /// Discount code; applies the discount even without an amount.
    #[arg(long)]
    pub discount_code: Option<String>,

    /// How a resulting credit is settled: `refund`, `unapplied-funds` or
    /// `apply-to-balance`.
    #[arg(long, value_parser = settlement)]
    pub settlement: Option<SettlementType>,

    #[arg(long)]
    pub comments: Option<String>,
}

fn amount(s: &str) -> Result<Decimal, String> {
    parse_amount(s).map_err(|e| e.to_string())
}

fn settlement(s: &str) -> Result<SettlementType, String> {
    SettlementType::parse(s).ok_or_else(|| format!("unknown settlement type '{s}'"))
}
