//! # REST Routes
//!
//! Route definitions for REST API.
//!
//! This module defines the axum router with all REST API endpoints
//! organized by resource type. Everything under `/api/v1` except
//! `/health` sits behind the bearer JWT middleware.
//!
//! # Route Structure
//!
//! ```text
//! /api/v1
//! ├── /health                       GET    - Health check
//! ├── /trades                       POST   - Create trade
//! │   └── /{id}                     GET    - Get trade by ID
//! │       ├── /                     PUT    - Combined update
//! │       ├── /                     DELETE - Delete trade (admin)
//! │       ├── /accept               PUT    - Record consent
//! │       ├── /reject               PUT    - Decline
//! │       └── /submit               PUT    - Submit to the league
//! └── /messages/trades/{id}
//!     ├── /request                  POST   - Fan out proposal mail
//!     ├── /decline                  POST   - Fan out decline mail
//!     ├── /accept                   POST   - Notify the creator team
//!     └── /announce                 POST   - Post to the league channel
//! ```

use crate::api::middleware::auth::{AuthConfig, auth_middleware};
use crate::api::rest::handlers::{
    AppState, accept_trade, create_trade, delete_trade, get_trade, health_check,
    notify_accepted, notify_declined, notify_requested, notify_submitted, reject_trade,
    submit_trade, update_trade,
};
use axum::{Router, middleware::from_fn_with_state, routing::get, routing::post, routing::put};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the REST API router with all endpoints.
///
/// # Arguments
///
/// * `state` - Shared application state containing the use cases
/// * `auth` - JWT validation configuration for the auth middleware
///
/// # Returns
///
/// An axum Router configured with all REST endpoints and middleware.
pub fn create_router(state: Arc<AppState>, auth: Arc<AuthConfig>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1(auth))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn api_v1(auth: Arc<AuthConfig>) -> Router<Arc<AppState>> {
    // Trade routes
    let trade_routes = Router::new()
        .route("/", post(create_trade))
        .route(
            "/{id}",
            get(get_trade).put(update_trade).delete(delete_trade),
        )
        .route("/{id}/accept", put(accept_trade))
        .route("/{id}/reject", put(reject_trade))
        .route("/{id}/submit", put(submit_trade));

    // Messenger routes
    let message_routes = Router::new()
        .route("/trades/{id}/request", post(notify_requested))
        .route("/trades/{id}/decline", post(notify_declined))
        .route("/trades/{id}/accept", post(notify_accepted))
        .route("/trades/{id}/announce", post(notify_submitted));

    let protected = Router::new()
        .nest("/trades", trade_routes)
        .nest("/messages", message_routes)
        .layer(from_fn_with_state(auth, auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
}

/// Creates a minimal router for testing without tracing or CORS.
#[cfg(test)]
pub fn create_test_router(state: Arc<AppState>, auth: Arc<AuthConfig>) -> Router {
    Router::new().nest("/api/v1", api_v1(auth)).with_state(state)
}
