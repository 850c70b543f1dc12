//! # Profile Module
//!
//! Self-service user profile: fetch the account row and rename it.

pub mod handlers;
pub mod models;
pub mod routes;

#[cfg(test)]
mod tests;

pub use routes::profile_routes;
