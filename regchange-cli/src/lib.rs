//! Command-line shell for the registration change wizard.

pub mod cli;
pub mod config;
pub mod logging;
pub mod session;

use regchange_core::service::ServiceRegistry;
use regchange_db_sqlite::SqliteServiceFactory;

/// Registry with every backend this binary ships.
pub fn build_registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry.register(Box::new(SqliteServiceFactory));
    registry
}
