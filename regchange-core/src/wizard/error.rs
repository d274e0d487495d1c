use thiserror::Error;

use crate::wizard::validator::FieldError;

/// Why a wizard handler did not complete.
///
/// Every variant leaves the session usable. Nothing advances on error, and
/// the busy flags are already cleared by the time the caller sees it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// A local check failed; no collaborator was contacted.
    #[error("{0}")]
    Validation(FieldError),

    /// The registrant id was missing or too short to dispatch an execute.
    #[error("{0}")]
    Resolution(String),

    /// Loading init data, program detail or contacts failed.
    #[error("{0}")]
    Load(String),

    /// The backend ran the change and reported `success: false`.
    #[error("{0}")]
    Business(String),

    /// The execute call itself failed.
    #[error("{0}")]
    Transport(String),

    #[error("Registration data has not been loaded")]
    NotInitialized,

    /// The navigation control is not offered on this step.
    #[error("{action} is not available on step {step}")]
    InvalidTransition { action: &'static str, step: u8 },

    #[error("Another request is still in progress")]
    Busy,
}

impl From<FieldError> for WizardError {
    fn from(err: FieldError) -> Self {
        WizardError::Validation(err)
    }
}
