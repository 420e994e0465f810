//! Infrastructure layer - External service implementations

pub mod allow_list;
pub mod api_key;
pub mod logging;
