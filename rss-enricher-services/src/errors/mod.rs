//! Error types for the service clients.

mod service_error;

pub use service_error::ServiceError;
