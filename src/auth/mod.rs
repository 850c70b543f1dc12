//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - OAuth2 authorization-code flows (Google with PKCE, GitHub)
//! - Identity resolution (provider profile -> durable user)
//! - Access/refresh JWT issuance and cookie transport
//! - AuthedUser / MaybeUser extractors for protected and optional-auth routes

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use extractors::{AuthedUser, MaybeUser};
pub use models::User;
pub use routes::auth_routes;
