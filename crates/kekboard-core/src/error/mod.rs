//! Domain and capability errors

mod chat_error;
mod domain_error;

pub use chat_error::ChatError;
pub use domain_error::DomainError;
