//! SQLite backend for the registration change wizard.
//!
//! Serves registration data, program pricing and contact search from local
//! tables and records every executed change in `change_journal`.

mod decimal;
mod factory;
mod repository;

pub use factory::SqliteServiceFactory;
pub use repository::SqliteRegistrationService;
