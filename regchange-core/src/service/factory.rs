//! Selecting the collaborator backend from configuration.
//!
//! The wizard only sees a [`RegistrationChangeService`]. Which store answers
//! it is decided once at startup: each backend crate contributes a
//! [`ServiceFactory`], the binary registers them in a [`ServiceRegistry`],
//! and the `[service]` table of the config file picks one.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::collaborator::{RegistrationChangeService, ServiceError};

const DEFAULT_BACKEND: &str = "sqlite";

/// The `[service]` configuration table.
///
/// | backend    | connection_string examples          |
/// |------------|-------------------------------------|
/// | `sqlite`   | `registrations.db`, `:memory:`      |
///
/// Missing keys take the defaults: an in-memory SQLite store seeded with
/// the demo registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Matched against [`ServiceFactory::backend_name`], ignoring case and
    /// surrounding whitespace.
    pub backend: String,
    /// Forwarded to the chosen factory unchanged.
    pub connection_string: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

impl ServiceConfig {
    /// The registry key for `backend`: `" SQLite "` selects `sqlite`.
    pub fn backend_key(&self) -> String {
        self.backend.trim().to_ascii_lowercase()
    }
}

/// Opens one kind of registration store.
#[async_trait]
pub trait ServiceFactory: Send + Sync {
    /// Lowercase identifier, e.g. `"sqlite"`.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Box<dyn RegistrationChangeService>, ServiceError>;
}

/// The backends the binary was built with, keyed by name.
#[derive(Default)]
pub struct ServiceRegistry {
    factories: HashMap<&'static str, Box<dyn ServiceFactory>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later factory with the same name replaces the earlier one.
    pub fn register(
        &mut self,
        factory: Box<dyn ServiceFactory>,
    ) {
        debug!(backend = factory.backend_name(), "registering service backend");
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Sorted, for stable error messages and `--help` output.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the backend named in `config`.
    ///
    /// # Errors
    /// * [`ServiceError::Configuration`] for an unknown backend or an empty
    ///   connection string. No factory is called in either case.
    /// * Whatever the chosen factory returns.
    pub async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Box<dyn RegistrationChangeService>, ServiceError> {
        let key = config.backend_key();
        let factory = self.factories.get(key.as_str()).ok_or_else(|| {
            ServiceError::Configuration(format!(
                "unknown backend '{}'; available: {}",
                config.backend,
                self.available_backends().join(", ")
            ))
        })?;
        if config.connection_string.trim().is_empty() {
            return Err(ServiceError::Configuration(format!(
                "backend '{key}' needs a connection string"
            )));
        }

        info!(backend = %key, connection = %config.connection_string, "opening registration store");
        factory.create(config).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::models::{
        CancellationRequest, CancellationResult, Contact, InitData, ProgramDetail,
        SubstitutionRequest, SubstitutionResult, TransferRequest, TransferResult,
    };

    use super::{RegistrationChangeService, ServiceConfig, ServiceError, ServiceFactory, ServiceRegistry};

    // ── stub service ─────────────────────────────────────────────────────
    // The registry tests only check routing; no method is ever called.
    struct StubService;

    #[async_trait]
    impl RegistrationChangeService for StubService {
        async fn load_init_data(
            &self,
            _registrant_id: &str,
        ) -> Result<InitData, ServiceError> {
            unimplemented!()
        }
        async fn load_program_detail(
            &self,
            _program_id: &str,
            _pricing_context_id: Option<&str>,
        ) -> Result<ProgramDetail, ServiceError> {
            unimplemented!()
        }
        async fn search_contacts(
            &self,
            _term: &str,
            _account_scope_id: Option<&str>,
        ) -> Result<Vec<Contact>, ServiceError> {
            unimplemented!()
        }
        async fn execute_transfer(
            &self,
            _request: &TransferRequest,
        ) -> Result<TransferResult, ServiceError> {
            unimplemented!()
        }
        async fn execute_cancellation(
            &self,
            _request: &CancellationRequest,
        ) -> Result<CancellationResult, ServiceError> {
            unimplemented!()
        }
        async fn execute_substitution(
            &self,
            _request: &SubstitutionRequest,
        ) -> Result<SubstitutionResult, ServiceError> {
            unimplemented!()
        }
    }

    // ── stub factory ─────────────────────────────────────────────────────
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ServiceFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &ServiceConfig,
        ) -> Result<Box<dyn RegistrationChangeService>, ServiceError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(StubService))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl ServiceFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }
        async fn create(
            &self,
            _config: &ServiceConfig,
        ) -> Result<Box<dyn RegistrationChangeService>, ServiceError> {
            Err(ServiceError::Connection("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn ServiceFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(backend: &str) -> ServiceConfig {
        ServiceConfig {
            backend: backend.to_string(),
            connection_string: ":memory:".to_string(),
        }
    }

    #[test]
    fn service_config_default_is_sqlite_memory() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.backend, "sqlite");
        assert_eq!(cfg.connection_string, ":memory:");
    }

    #[test]
    fn partial_service_table_keeps_defaults() {
        let cfg: ServiceConfig =
            serde_json::from_str(r#"{ "connection_string": "registrations.db" }"#).unwrap();
        assert_eq!(cfg.backend, "sqlite");
        assert_eq!(cfg.connection_string, "registrations.db");

        let cfg: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ServiceConfig::default());
    }

    #[test]
    fn backend_key_ignores_case_and_padding() {
        let cfg = ServiceConfig {
            backend: " SQLite ".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.backend_key(), "sqlite");
    }

    #[tokio::test]
    async fn create_matches_backend_regardless_of_case() {
        let mut reg = ServiceRegistry::new();
        let (sqlite, called) = stub_factory("sqlite");
        reg.register(sqlite);

        let result = reg.create(&config("SQLite")).await;

        assert!(result.is_ok(), "expected Ok, got {:#?}", result.err());
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_connection_string_never_reaches_the_factory() {
        let mut reg = ServiceRegistry::new();
        let (sqlite, called) = stub_factory("sqlite");
        reg.register(sqlite);
        let cfg = ServiceConfig {
            backend: "sqlite".to_string(),
            connection_string: "   ".to_string(),
        };

        match reg.create(&cfg).await {
            Err(ServiceError::Configuration(msg)) => assert!(msg.contains("connection string")),
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a service"),
        }
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn new_registry_has_no_backends() {
        assert!(ServiceRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = ServiceRegistry::new();
        let (f1, _) = stub_factory("sqlite");
        let (f2, _) = stub_factory("http");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_backends(), vec!["http", "sqlite"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = ServiceRegistry::new();
        let (old, _) = stub_factory("sqlite");
        let (new, _) = stub_factory("sqlite");
        reg.register(old);
        reg.register(new);
        assert_eq!(reg.available_backends(), vec!["sqlite"]);
    }

    #[tokio::test]
    async fn create_calls_matching_factory_only() {
        let mut reg = ServiceRegistry::new();
        let (sqlite, sqlite_called) = stub_factory("sqlite");
        let (http, http_called) = stub_factory("http");
        reg.register(sqlite);
        reg.register(http);

        let result = reg.create(&config("sqlite")).await;

        assert!(result.is_ok(), "expected Ok, got {:#?}", result.err());
        assert!(sqlite_called.load(Ordering::SeqCst));
        assert!(!http_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_names_requested_and_available() {
        let mut reg = ServiceRegistry::new();
        let (f, _) = stub_factory("sqlite");
        reg.register(f);

        match reg.create(&config("http")).await {
            Err(ServiceError::Configuration(msg)) => {
                assert!(msg.contains("http"), "error should name the requested backend");
                assert!(msg.contains("sqlite"), "error should list available backends");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a service"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = ServiceRegistry::new();
        reg.register(Box::new(FailingFactory));

        match reg.create(&config("failing")).await {
            Err(err) => assert_eq!(
                err,
                ServiceError::Connection("intentional failure".to_string())
            ),
            Ok(_) => panic!("expected the factory error"),
        }
    }
}
