//! Server crate for the wholesale recommendation service.
//!
//! This crate contains the recommendation engine (the immutable context
//! built at startup), its HTTP interface and the server configuration.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;

pub use config::ServerConfig;
pub use engine::RecommendationEngine;
pub use error::RecommendError;
pub use http::router;
