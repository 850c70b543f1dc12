//! # Dashboard Module
//!
//! Read-only aggregation over the caller's links and their click log:
//! summary stats and country/device analytics. Individual aggregate
//! queries degrade to empty results instead of failing the response.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use routes::dashboard_routes;
