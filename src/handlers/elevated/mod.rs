// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Every mutation of the catalogue. Mounted behind JWT authentication and
// the role gate.

pub mod actor;
pub mod film;
