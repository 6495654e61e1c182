//! Shared plumbing for the filial server: the HTTP error type, service
//! configuration, and the module trait.

pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use types::parse_id;
