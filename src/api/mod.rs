//! API layer - HTTP endpoints and middleware

pub mod diagnostics;
pub mod health;
pub mod keys;
pub mod middleware;
pub mod protected;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
