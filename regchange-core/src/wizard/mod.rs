//! The registration change wizard.
//!
//! [`WizardState`] is the single aggregate for one session. The other
//! modules are pure functions over it ([`path`], [`gate`], [`validator`],
//! [`derived`], [`assembly`]) plus the [`WizardController`], which is the
//! only thing that mutates it.

pub mod assembly;
mod busy;
pub mod controller;
pub mod derived;
pub mod error;
pub mod gate;
pub mod path;
pub mod state;
pub mod validator;

pub use controller::WizardController;
pub use error::WizardError;
pub use path::{PrimaryAction, StepDef, StepKind};
pub use state::{
    CancellationFields, Notification, NotificationKind, SubstitutionFields, TransferFields,
    WizardState,
};
pub use validator::{Field, FieldError};
