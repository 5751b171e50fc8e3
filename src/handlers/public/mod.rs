// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and the liveness probe.

pub mod auth;
pub mod health;

pub use auth::{login, register};
pub use health::health;
