pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod services;
pub mod validation;

#[cfg(test)]
pub mod testing;
