//! # Links Module
//!
//! Short-link management for the API:
//! - Paginated, filterable listing of a user's links
//! - Link creation with the anonymous-creator safety policy
//! - Owner-scoped partial updates and deletion

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::links_routes;
