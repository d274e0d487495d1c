//! Registration change wizard.
//!
//! The crate models a guided, multi-step form that cancels a program
//! registration, substitutes its registrant, or transfers the registrant to
//! another program offering. It contains the wizard state machine, the
//! navigation guard and validator, the financial calculator, and the
//! collaborator trait the wizard calls for loading data and executing the
//! change.

pub mod calculations;
pub mod input;
pub mod models;
pub mod service;
pub mod settings;
pub mod wizard;

pub use models::*;
pub use service::{RegistrationChangeService, ServiceError};
pub use settings::WizardSettings;
pub use wizard::{WizardController, WizardError, WizardState};
