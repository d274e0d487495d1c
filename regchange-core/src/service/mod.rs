pub mod collaborator;
pub mod factory;
pub mod fault;

pub use collaborator::{RegistrationChangeService, ServiceError};
pub use factory::{ServiceConfig, ServiceFactory, ServiceRegistry};
pub use fault::extract_fault_message;
