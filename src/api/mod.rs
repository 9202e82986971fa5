//! # API Layer
//!
//! External interfaces for the trade negotiation service.
//!
//! ## Protocols
//!
//! - **REST**: trade lifecycle and messenger dispatch operations
//!
//! ## Middleware
//!
//! - Authentication (bearer JWT producing an [`Actor`] request extension)
//!
//! [`Actor`]: crate::application::services::Actor

pub mod middleware;
pub mod rest;

pub use rest as rest_api;
