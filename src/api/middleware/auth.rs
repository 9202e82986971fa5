//! # Authentication Middleware
//!
//! Bearer JWT authentication for API endpoints.
//!
//! Validated tokens produce an [`Actor`] request extension that handlers
//! pull out with the [`AuthenticatedActor`] extractor. Identity
//! provisioning (issuing tokens, managing owners) is out of scope; only
//! token mechanics live here.
//!
//! # Token Structure
//!
//! JWT tokens must contain the following claims:
//! - `sub` - Subject (owner id, a UUID)
//! - `exp` - Expiration time
//! - `iat` - Issued at time
//! - `admin` - Platform admin flag (optional, defaults to false)
//!
//! # Usage
//!
//! ```ignore
//! use league_trades::api::middleware::auth::{AuthConfig, auth_middleware};
//!
//! let config = Arc::new(AuthConfig::new("secret-key"));
//! let app = Router::new()
//!     .route("/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(config, auth_middleware));
//! ```

use crate::application::services::Actor;
use crate::domain::value_objects::OwnerId;
use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// Configuration
// ============================================================================

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC-based JWT validation.
    pub secret: String,
}

impl AuthConfig {
    /// Creates a new auth config with the given secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

// ============================================================================
// JWT Claims
// ============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner id).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: u64,
    /// Issued at time (Unix timestamp).
    pub iat: u64,
    /// Platform admin flag.
    #[serde(default)]
    pub admin: bool,
}

impl Claims {
    /// Creates new claims for an owner subject.
    #[must_use]
    pub fn new(sub: impl Into<String>, exp: u64, iat: u64) -> Self {
        Self {
            sub: sub.into(),
            exp,
            iat,
            admin: false,
        }
    }

    /// Marks the subject as a platform admin.
    #[must_use]
    pub fn with_admin(mut self) -> Self {
        self.admin = true;
        self
    }

    /// Converts validated claims into the application-layer actor.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a valid owner UUID.
    pub fn to_actor(&self) -> Result<Actor, AuthError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidSubject)?;
        Ok(Actor {
            owner_id: OwnerId::new(id),
            admin: self.admin,
        })
    }
}

// ============================================================================
// Authentication Error
// ============================================================================

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing authentication credentials.
    #[error("missing authentication credentials")]
    MissingCredentials,

    /// Token validation failed.
    #[error("token validation failed: {0}")]
    ValidationFailed(String),

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Subject claim is not a valid owner id.
    #[error("token subject is not a valid owner id")]
    InvalidSubject,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let code = match &self {
            AuthError::MissingCredentials => "MISSING_CREDENTIALS",
            AuthError::ValidationFailed(_) => "VALIDATION_FAILED",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidSubject => "INVALID_SUBJECT",
        };

        let body = serde_json::json!({
            "code": code,
            "message": self.to_string(),
        });

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

// ============================================================================
// JWT Utilities
// ============================================================================

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}

/// Validates a JWT token and returns the claims.
///
/// # Errors
///
/// Returns an error if the token is invalid or validation fails.
pub fn validate_jwt(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let validation = Validation::default();
    let key = DecodingKey::from_secret(config.secret.as_bytes());

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::TokenExpired
            } else {
                AuthError::ValidationFailed(e.to_string())
            }
        })
}

/// Creates a JWT token from claims.
///
/// # Errors
///
/// Returns an error if token encoding fails.
pub fn create_jwt(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &key).map_err(|e| AuthError::ValidationFailed(e.to_string()))
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware function.
///
/// Validates the bearer token and inserts the resolved [`Actor`] as a
/// request extension.
///
/// # Errors
///
/// Returns an error response if authentication fails.
pub async fn auth_middleware(
    State(config): State<Arc<AuthConfig>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or(AuthError::MissingCredentials)?;

    let claims = validate_jwt(token, &config)?;
    let actor = claims.to_actor()?;
    debug!(owner_id = %actor.owner_id, admin = actor.admin, "request authenticated");

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

// ============================================================================
// Request Extension Extractor
// ============================================================================

/// Extractor for the authenticated actor from request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(pub Actor);

impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthenticatedActor)
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_test_config() -> AuthConfig {
        AuthConfig::new("test-secret-key-for-jwt-validation")
    }

    fn now_secs() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn claims_new() {
        let claims = Claims::new("user-1", 1000, 900);
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp, 1000);
        assert_eq!(claims.iat, 900);
        assert!(!claims.admin);
    }

    #[test]
    fn claims_with_admin() {
        let claims = Claims::new("user-1", 1000, 900).with_admin();
        assert!(claims.admin);
    }

    #[test]
    fn claims_to_actor_parses_owner_uuid() {
        let owner = OwnerId::new_v4();
        let now = now_secs();
        let claims = Claims::new(owner.to_string(), now + 3600, now).with_admin();

        let actor = claims.to_actor().unwrap();
        assert_eq!(actor.owner_id, owner);
        assert!(actor.admin);
    }

    #[test]
    fn claims_to_actor_rejects_non_uuid_subject() {
        let claims = Claims::new("not-a-uuid", 1000, 900);
        assert!(matches!(claims.to_actor(), Err(AuthError::InvalidSubject)));
    }

    #[test]
    fn extract_bearer_token_valid() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer xyz789"), Some("xyz789"));
    }

    #[test]
    fn extract_bearer_token_invalid() {
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }

    #[test]
    fn create_and_validate_jwt() {
        let config = create_test_config();
        let now = now_secs();
        let claims = Claims::new(OwnerId::new_v4().to_string(), now + 3600, now);

        let token = create_jwt(&claims, &config.secret).unwrap();
        assert!(!token.is_empty());

        let validated = validate_jwt(&token, &config).unwrap();
        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.admin, claims.admin);
    }

    #[test]
    fn validate_jwt_invalid_secret() {
        let config = create_test_config();
        let now = now_secs();
        let claims = Claims::new("user", now + 3600, now);

        let token = create_jwt(&claims, &config.secret).unwrap();

        let wrong_config = AuthConfig::new("wrong-secret");
        assert!(validate_jwt(&token, &wrong_config).is_err());
    }

    #[test]
    fn validate_jwt_expired() {
        let config = create_test_config();
        let now = now_secs();
        let expired = Claims::new("user", now - 100, now - 200);

        let token = create_jwt(&expired, &config.secret).unwrap();
        assert!(matches!(
            validate_jwt(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn auth_error_display() {
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "missing authentication credentials"
        );
        assert_eq!(AuthError::TokenExpired.to_string(), "token expired");
    }

    #[test]
    fn claims_deserialization_defaults_admin() {
        let json = r#"{"sub": "user-1", "exp": 1000, "iat": 900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(!claims.admin);
    }
}
