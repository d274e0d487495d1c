use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    CancellationRequest, CancellationResult, Contact, InitData, ProgramDetail,
    SubstitutionRequest, SubstitutionResult, TransferRequest, TransferResult,
};
use crate::service::fault::extract_fault_message;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A fault raised by a remote backend, carrying whatever payload it sent
    /// (a bare string, `{"body": {"message": ..}}`, `{"message": ..}`, ...).
    #[error("{}", extract_fault_message(.0))]
    Fault(serde_json::Value),
}

impl ServiceError {
    /// Best-available text for showing to an operator.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// External collaborators consumed by the wizard.
///
/// Every method is a single-shot call. The wizard never retries on its own
/// and enforces no timeouts; it relies on the implementation to report
/// faults.
#[async_trait]
pub trait RegistrationChangeService: Send + Sync {
    // Session start
    async fn load_init_data(
        &self,
        registrant_id: &str,
    ) -> Result<InitData, ServiceError>;

    // Transfer step 1 -> 2
    async fn load_program_detail(
        &self,
        program_id: &str,
        pricing_context_id: Option<&str>,
    ) -> Result<ProgramDetail, ServiceError>;

    // Substitution contact lookup
    async fn search_contacts(
        &self,
        term: &str,
        account_scope_id: Option<&str>,
    ) -> Result<Vec<Contact>, ServiceError>;

    // Terminal execute calls
    async fn execute_transfer(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferResult, ServiceError>;

    async fn execute_cancellation(
        &self,
        request: &CancellationRequest,
    ) -> Result<CancellationResult, ServiceError>;

    async fn execute_substitution(
        &self,
        request: &SubstitutionRequest,
    ) -> Result<SubstitutionResult, ServiceError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn fault_display_uses_extracted_message() {
        let err = ServiceError::Fault(json!({ "body": { "message": "X" } }));
        assert_eq!(err.to_string(), "X");
    }

    #[test]
    fn plain_variants_keep_their_prefix() {
        assert_eq!(
            ServiceError::Connection("refused".to_string()).user_message(),
            "Connection error: refused"
        );
    }
}
