// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Read-only endpoints open to every authenticated role.

pub mod actors;
pub mod films;
pub mod whoami;

pub use actors::list_actors;
pub use films::list_films;
pub use whoami::whoami;
