// handlers/mod.rs - Three-tier handler layout
//
// Public (no auth) → Protected (JWT auth) → Elevated (JWT auth + admin role).
// The tier a handler lives in matches the route group it is mounted on in
// `app::routes`.

pub mod extract;

pub mod public;    // /api/register, /api/login, /health
pub mod protected; // listings and whoami
pub mod elevated;  // actor and film mutations

pub use extract::{ApiJson, ApiPath, ApiQuery};
