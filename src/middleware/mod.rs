pub mod auth;
pub mod logging;
pub mod role;

pub use auth::{jwt_auth_middleware, Principal};
pub use logging::log_requests;
pub use role::require_role;
