//! Per-change-type step tables.
//!
//! Each path is a slice of [`StepDef`]s indexed by step ordinal. Step 0 is
//! shared by every path. Forward and backward moves are data in the table;
//! the only conditional edges belong to the cancellation settlement step.
//!
//! | Path         | 0      | 1              | 2                  | 3         | 4        |
//! |--------------|--------|----------------|--------------------|-----------|----------|
//! | Transfer     | choose | select program | details            | review    | complete |
//! | Cancellation | choose | fee            | settlement (cond.) | review    | complete |
//! | Substitution | choose | select contact | confirm + execute  | complete  |          |

use crate::models::ChangeType;

/// What a step is for, independent of its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    ChooseChangeType,
    SelectProgram,
    TransferDetails,
    TransferReview,
    TransferComplete,
    CancellationFee,
    CancellationSettlement,
    CancellationReview,
    CancellationComplete,
    SelectContact,
    SubstitutionConfirm,
    SubstitutionComplete,
}

/// The forward control a step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Next,
    Execute,
    /// Terminal steps have no forward control.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Forward {
    To(u8),
    /// Goes to `settlement` when the settlement step applies, else `otherwise`.
    ViaSettlement { settlement: u8, otherwise: u8 },
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backward {
    To(u8),
    /// Returns to `settlement` only if it was visited on the way forward.
    ViaSettlement { settlement: u8, otherwise: u8 },
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    pub kind: StepKind,
    pub label: &'static str,
    pub action: PrimaryAction,
    forward: Forward,
    backward: Backward,
}

impl StepDef {
    const fn new(
        kind: StepKind,
        label: &'static str,
        action: PrimaryAction,
        forward: Forward,
        backward: Backward,
    ) -> Self {
        Self {
            kind,
            label,
            action,
            forward,
            backward,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.action == PrimaryAction::Done
    }
}

/// Facts about the session that the conditional edges depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteFlags {
    /// The originating record's status requires a settlement decision.
    pub settlement_required: bool,
    /// The settlement step was entered on the way to the current step.
    pub settlement_visited: bool,
}

const CHOOSE: StepDef = StepDef::new(
    StepKind::ChooseChangeType,
    "Choose change type",
    PrimaryAction::Next,
    Forward::To(1),
    Backward::Stop,
);

const CHOOSE_ONLY: &[StepDef] = &[CHOOSE];

const TRANSFER_STEPS: &[StepDef] = &[
    CHOOSE,
    StepDef::new(
        StepKind::SelectProgram,
        "Select program",
        PrimaryAction::Next,
        Forward::To(2),
        Backward::To(0),
    ),
    StepDef::new(
        StepKind::TransferDetails,
        "Transfer details",
        PrimaryAction::Next,
        Forward::To(3),
        Backward::To(1),
    ),
    StepDef::new(
        StepKind::TransferReview,
        "Review transfer",
        PrimaryAction::Execute,
        Forward::To(4),
        Backward::To(2),
    ),
    StepDef::new(
        StepKind::TransferComplete,
        "Transfer complete",
        PrimaryAction::Done,
        Forward::Stop,
        Backward::Stop,
    ),
];

const CANCELLATION_STEPS: &[StepDef] = &[
    CHOOSE,
    StepDef::new(
        StepKind::CancellationFee,
        "Cancellation fee",
        PrimaryAction::Next,
        Forward::ViaSettlement {
            settlement: 2,
            otherwise: 3,
        },
        Backward::To(0),
    ),
    StepDef::new(
        StepKind::CancellationSettlement,
        "Refund settlement",
        PrimaryAction::Next,
        Forward::To(3),
        Backward::To(1),
    ),
    StepDef::new(
        StepKind::CancellationReview,
        "Review cancellation",
        PrimaryAction::Execute,
        Forward::To(4),
        Backward::ViaSettlement {
            settlement: 2,
            otherwise: 1,
        },
    ),
    StepDef::new(
        StepKind::CancellationComplete,
        "Cancellation complete",
        PrimaryAction::Done,
        Forward::Stop,
        Backward::Stop,
    ),
];

const SUBSTITUTION_STEPS: &[StepDef] = &[
    CHOOSE,
    StepDef::new(
        StepKind::SelectContact,
        "Select substitute",
        PrimaryAction::Next,
        Forward::To(2),
        Backward::To(0),
    ),
    StepDef::new(
        StepKind::SubstitutionConfirm,
        "Confirm substitution",
        PrimaryAction::Execute,
        Forward::To(3),
        Backward::To(1),
    ),
    StepDef::new(
        StepKind::SubstitutionComplete,
        "Substitution complete",
        PrimaryAction::Done,
        Forward::Stop,
        Backward::Stop,
    ),
];

/// The step table for a change type. With no change type selected only
/// step 0 exists.
pub fn steps(change_type: Option<ChangeType>) -> &'static [StepDef] {
    match change_type {
        None => CHOOSE_ONLY,
        Some(ChangeType::Transfer) => TRANSFER_STEPS,
        Some(ChangeType::Cancellation) => CANCELLATION_STEPS,
        Some(ChangeType::Substitution) => SUBSTITUTION_STEPS,
    }
}

pub fn step_def(
    change_type: Option<ChangeType>,
    step: u8,
) -> Option<&'static StepDef> {
    steps(change_type).get(usize::from(step))
}

pub fn step_count(change_type: Option<ChangeType>) -> u8 {
    steps(change_type).len() as u8
}

/// Ordinal of the path's one-way final step.
pub fn terminal_step(change_type: ChangeType) -> u8 {
    step_count(Some(change_type)) - 1
}

pub fn is_valid_step(
    change_type: Option<ChangeType>,
    step: u8,
) -> bool {
    step < step_count(change_type)
}

/// Where the forward control leads from `step`, if anywhere.
pub fn next_step(
    change_type: Option<ChangeType>,
    step: u8,
    flags: RouteFlags,
) -> Option<u8> {
    // Leaving step 0 needs a path to land on.
    change_type?;
    match step_def(change_type, step)?.forward {
        Forward::To(target) => Some(target),
        Forward::ViaSettlement {
            settlement,
            otherwise,
        } => Some(if flags.settlement_required {
            settlement
        } else {
            otherwise
        }),
        Forward::Stop => None,
    }
}

/// Where the back control leads from `step`, if anywhere.
pub fn previous_step(
    change_type: Option<ChangeType>,
    step: u8,
    flags: RouteFlags,
) -> Option<u8> {
    match step_def(change_type, step)?.backward {
        Backward::To(target) => Some(target),
        Backward::ViaSettlement {
            settlement,
            otherwise,
        } => Some(if flags.settlement_visited {
            settlement
        } else {
            otherwise
        }),
        Backward::Stop => None,
    }
}
