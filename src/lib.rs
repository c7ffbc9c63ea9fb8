//! Developer profile service
//!
//! A REST service for developer profiles (`/api/profile`) and the client
//! action layer that drives it.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod server;
pub mod store;
pub mod validation;
