//! Financial computations for registration changes.
//!
//! Everything here is a pure function of its inputs. The wizard recomputes
//! derived amounts on every read instead of caching them, so these functions
//! are the single source of truth for refund, credit and balance figures.

pub mod common;
pub mod financial;

pub use common::{format_currency, max, round_half_up};
pub use financial::{
    cancellation_refund_amount, cancellation_settlement_options, effective_amount,
    is_same_program, net_credit_amount, new_program_net_fee, transfer_balance_due,
    transfer_settlement_options,
};
