//! # REST Handlers
//!
//! Request handlers for REST endpoints.
//!
//! This module provides axum handlers for the trade lifecycle and the
//! messenger dispatch endpoints, plus the single place where
//! [`ApplicationError`] values are mapped to HTTP statuses.
//!
//! # Endpoints
//!
//! ## Trades
//! - `POST /api/v1/trades` - Create trade
//! - `GET /api/v1/trades/{id}` - Get trade by ID
//! - `PUT /api/v1/trades/{id}` - Combined update
//! - `DELETE /api/v1/trades/{id}` - Delete trade (admin)
//! - `PUT /api/v1/trades/{id}/accept` - Record one recipient's consent
//! - `PUT /api/v1/trades/{id}/reject` - Decline the trade
//! - `PUT /api/v1/trades/{id}/submit` - Submit the accepted trade
//!
//! ## Messenger
//! - `POST /api/v1/messages/trades/{id}/request` - Fan out proposal mail
//! - `POST /api/v1/messages/trades/{id}/decline` - Fan out decline mail
//! - `POST /api/v1/messages/trades/{id}/accept` - Notify the creator team
//! - `POST /api/v1/messages/trades/{id}/announce` - Post to the league channel

use crate::api::middleware::auth::AuthenticatedActor;
use crate::application::dto::{
    AcceptTradeRequest, CreateTradeRequest, DeclineDispatchRequest, DispatchAccepted,
    RejectTradeRequest, TradeResponse, UpdateTradeRequest,
};
use crate::application::error::ApplicationError;
use crate::application::services::NotificationDispatcher;
use crate::application::use_cases::{
    AcceptTradeUseCase, CreateTradeUseCase, DeleteTradeUseCase, GetTradeUseCase,
    RejectTradeUseCase, SubmitTradeUseCase, UpdateTradeUseCase,
};
use crate::domain::value_objects::TradeId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Create trade use case.
    pub create_trade: Arc<CreateTradeUseCase>,
    /// Get trade use case.
    pub get_trade: Arc<GetTradeUseCase>,
    /// Combined update use case.
    pub update_trade: Arc<UpdateTradeUseCase>,
    /// Accept use case.
    pub accept_trade: Arc<AcceptTradeUseCase>,
    /// Reject use case.
    pub reject_trade: Arc<RejectTradeUseCase>,
    /// Submit use case.
    pub submit_trade: Arc<SubmitTradeUseCase>,
    /// Delete use case.
    pub delete_trade: Arc<DeleteTradeUseCase>,
    /// Notification fan-out service.
    pub dispatcher: Arc<NotificationDispatcher>,
}

// ============================================================================
// Error Response
// ============================================================================

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<ApplicationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApplicationError) -> Self {
        let (status, code) = match &err {
            ApplicationError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApplicationError::BadRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApplicationError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApplicationError::DomainError(e) if e.is_authorization_error() => {
                (StatusCode::FORBIDDEN, "FORBIDDEN")
            }
            ApplicationError::DomainError(e) if e.is_state_error() => {
                (StatusCode::BAD_REQUEST, "INVALID_STATE")
            }
            ApplicationError::DomainError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApplicationError::HydrationError(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "HYDRATION_FAILED")
            }
            ApplicationError::RepositoryError(_)
            | ApplicationError::QueueError(_)
            | ApplicationError::EventPublishError(_)
            | ApplicationError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        (status, Json(ErrorResponse::new(code, err.to_string())))
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Trade Handlers
// ============================================================================

/// Create a new trade.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the request is invalid.
#[instrument(skip(state, request))]
pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Json(request): Json<CreateTradeRequest>,
) -> Result<(StatusCode, Json<TradeResponse>), HandlerError> {
    info!(owner_id = %actor.owner_id, "creating trade");

    let response = state.create_trade.execute(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get trade by ID.
///
/// # Errors
///
/// Returns `NOT_FOUND` if the trade does not exist.
/// Returns `VALIDATION_ERROR` if the ID is not a valid UUID.
#[instrument(skip(state))]
pub async fn get_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
) -> Result<Json<TradeResponse>, HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let response = state.get_trade.execute(&actor, trade_id).await?;
    Ok(Json(response))
}

/// Combined trade update: contents, advance to Requested, decline marker.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` for a disallowed target status and
/// `FORBIDDEN` for an unauthorized status advance.
#[instrument(skip(state, request))]
pub async fn update_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
    Json(request): Json<UpdateTradeRequest>,
) -> Result<Json<TradeResponse>, HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let response = state.update_trade.execute(&actor, trade_id, request).await?;
    Ok(Json(response))
}

/// Delete a trade (admin only).
///
/// # Errors
///
/// Returns `NOT_FOUND` if the trade does not exist and `FORBIDDEN` for
/// non-admin callers.
#[instrument(skip(state))]
pub async fn delete_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    state.delete_trade.execute(&actor, trade_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record one recipient's consent.
///
/// # Errors
///
/// Returns `INVALID_STATE` if the trade is not open for consent.
#[instrument(skip(state, request))]
pub async fn accept_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
    Json(request): Json<AcceptTradeRequest>,
) -> Result<Json<TradeResponse>, HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let response = state.accept_trade.execute(&actor, trade_id, request).await?;
    Ok(Json(response))
}

/// Decline the trade.
///
/// # Errors
///
/// Returns `INVALID_STATE` if the trade is not open for consent and
/// `FORBIDDEN` when the creator declines its own trade.
#[instrument(skip(state, request))]
pub async fn reject_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
    Json(request): Json<RejectTradeRequest>,
) -> Result<Json<TradeResponse>, HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let response = state.reject_trade.execute(&actor, trade_id, request).await?;
    Ok(Json(response))
}

/// Submit the fully accepted trade to the league.
///
/// # Errors
///
/// Returns `INVALID_STATE` if the trade is not Accepted.
#[instrument(skip(state))]
pub async fn submit_trade(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(id): Path<String>,
) -> Result<Json<TradeResponse>, HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let response = state.submit_trade.execute(&actor, trade_id).await?;
    Ok(Json(response))
}

// ============================================================================
// Messenger Handlers
// ============================================================================

/// Enqueue proposal notifications to every recipient team owner.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the trade is not in the Requested status.
#[instrument(skip(state))]
pub async fn notify_requested(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(_actor): AuthenticatedActor,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DispatchAccepted>), HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let enqueued = state.dispatcher.dispatch_requested(trade_id).await?;
    Ok(accepted(trade_id, enqueued))
}

/// Enqueue decline notifications to every participant owner except the
/// declining individual.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the trade is not in the Rejected status.
#[instrument(skip(state, request))]
pub async fn notify_declined(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(_actor): AuthenticatedActor,
    Path(id): Path<String>,
    Json(request): Json<DeclineDispatchRequest>,
) -> Result<(StatusCode, Json<DispatchAccepted>), HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let enqueued = state
        .dispatcher
        .dispatch_declined(trade_id, request.declined_by_owner)
        .await?;
    Ok(accepted(trade_id, enqueued))
}

/// Enqueue acceptance notifications to the creator team owners.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the trade is not in the Accepted status.
#[instrument(skip(state))]
pub async fn notify_accepted(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(_actor): AuthenticatedActor,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DispatchAccepted>), HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let enqueued = state.dispatcher.dispatch_accepted(trade_id).await?;
    Ok(accepted(trade_id, enqueued))
}

/// Enqueue the league-wide announcement for a submitted trade.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the trade is not in the Submitted status.
#[instrument(skip(state))]
pub async fn notify_submitted(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(_actor): AuthenticatedActor,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DispatchAccepted>), HandlerError> {
    let trade_id = parse_trade_id(&id)?;
    let enqueued = state.dispatcher.dispatch_submitted(trade_id).await?;
    Ok(accepted(trade_id, enqueued))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_trade_id(id: &str) -> Result<TradeId, HandlerError> {
    uuid::Uuid::parse_str(id).map(TradeId::new).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "VALIDATION_ERROR",
                format!("invalid trade id: {id}"),
            )),
        )
    })
}

fn accepted(trade_id: TradeId, enqueued: usize) -> (StatusCode, Json<DispatchAccepted>) {
    (StatusCode::ACCEPTED, Json(DispatchAccepted { trade_id, enqueued }))
}
