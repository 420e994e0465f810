//! API middleware components

pub mod auth;
pub mod logging;

pub use auth::BearerToken;
pub use logging::logging_middleware;
