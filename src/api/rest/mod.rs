//! # REST API
//!
//! Axum handlers and routes for the trade negotiation endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
