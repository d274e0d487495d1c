use std::path::PathBuf;

use async_trait::async_trait;

use regchange_core::service::{ServiceConfig, ServiceFactory};
use regchange_core::{RegistrationChangeService, ServiceError};

use crate::repository::SqliteRegistrationService;

/// Resolve the seeds directory at runtime.
///
/// Resolution order:
/// 1. **`REGCHANGE_SQLITE_SEEDS_DIR`** if set.
/// 2. **`./seeds`** if the directory exists in the current working directory.
/// 3. **Crate manifest dir**, `$CARGO_MANIFEST_DIR/seeds`.
fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("REGCHANGE_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// [`ServiceFactory`] for SQLite.
///
/// ```rust,no_run
/// use regchange_core::service::ServiceRegistry;
/// use regchange_db_sqlite::SqliteServiceFactory;
///
/// let mut registry = ServiceRegistry::new();
/// registry.register(Box::new(SqliteServiceFactory));
/// ```
pub struct SqliteServiceFactory;

#[async_trait]
impl ServiceFactory for SqliteServiceFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`, a bare
    /// file path (created if missing), a `sqlite:` URL, or `":memory:"`.
    /// Migrations and seed files are applied on every open; seeds only
    /// insert rows that are not there yet.
    async fn create(
        &self,
        config: &ServiceConfig,
    ) -> Result<Box<dyn RegistrationChangeService>, ServiceError> {
        let service = SqliteRegistrationService::new(&config.connection_string)
            .await
            .map_err(|e| ServiceError::Connection(format!("{e:#}")))?;
        service
            .run_migrations()
            .await
            .map_err(|e| ServiceError::Database(format!("{e:#}")))?;
        service
            .run_seeds(&seeds_dir())
            .await
            .map_err(|e| ServiceError::Database(format!("{e:#}")))?;
        Ok(Box::new(service))
    }
}
