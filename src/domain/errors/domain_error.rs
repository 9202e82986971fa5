//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Invariant/validation errors
//! - **2000-2999**: State-machine errors
//! - **3000-3999**: Authorization errors
//!
//! # Examples
//!
//! ```
//! use league_trades::domain::errors::DomainError;
//!
//! let error = DomainError::MissingCreator;
//! assert_eq!(error.code(), 1001);
//! assert_eq!(error.category(), "invariant");
//! ```

use crate::domain::value_objects::{ParticipantId, TeamId, TradeStatus};
use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// Invariant violations abort the enclosing persistence transaction and map
/// to `400 Bad Request`; authorization errors map to `403 Forbidden`.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Invariant/validation errors |
/// | 2000-2999 | State-machine errors |
/// | 3000-3999 | Authorization errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Invariant/Validation Errors (1000-1999)
    // ========================================================================
    /// No participant carries the creator role.
    #[error("trade has no creator participant")]
    MissingCreator,

    /// More than one participant carries the creator role.
    #[error("trade has more than one creator participant")]
    MultipleCreators,

    /// No participant carries the recipient role.
    #[error("trade has no recipient participants")]
    NoRecipients,

    /// The trade carries no items.
    #[error("trade has no items")]
    NoItems,

    /// An item references a team that is not a participant of this trade.
    #[error("item references non-participant team {team}")]
    ItemTeamMismatch {
        /// The offending team reference.
        team: TeamId,
    },

    /// A newly created trade carries a status other than Draft or Requested.
    #[error("invalid initial status: {0}")]
    InvalidInitialStatus(TradeStatus),

    /// Generic validation error.
    #[error("validation error: {0}")]
    Validation(String),

    // ========================================================================
    // State-Machine Errors (2000-2999)
    // ========================================================================
    /// Invalid state transition attempted.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: TradeStatus,
        /// The attempted target status.
        to: TradeStatus,
    },

    /// Accept/reject called while the trade is not Requested or Pending.
    #[error("trade is not open for consent in status {0}")]
    NotOpenForConsent(TradeStatus),

    /// A participant attempted to consent twice.
    #[error("participant {0} has already accepted this trade")]
    AlreadyAccepted(ParticipantId),

    /// Submit called while the trade is not fully accepted.
    #[error("trade cannot be submitted from status {0}")]
    NotAccepted(TradeStatus),

    /// Contents/participants mutated outside of Draft.
    #[error("trade contents are immutable in status {0}")]
    NotEditable(TradeStatus),

    // ========================================================================
    // Authorization Errors (3000-3999)
    // ========================================================================
    /// The actor's team is not a participant of this trade.
    #[error("team {0} is not a participant of this trade")]
    NotAParticipant(TeamId),

    /// The action is reserved for the creator team's owners.
    #[error("only the creator team may perform this action")]
    NotCreator,

    /// The action is reserved for recipient team owners.
    #[error("only a recipient team may perform this action")]
    NotRecipient,

    /// The creator attempted to reject its own trade.
    #[error("the creator cannot reject its own trade")]
    CreatorCannotReject,

    /// The action requires platform-admin privileges.
    #[error("platform admin privileges required")]
    AdminRequired,
}

impl DomainError {
    /// Returns the numeric error code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Invariant errors (1000-1999)
            Self::MissingCreator => 1001,
            Self::MultipleCreators => 1002,
            Self::NoRecipients => 1003,
            Self::NoItems => 1004,
            Self::ItemTeamMismatch { .. } => 1005,
            Self::InvalidInitialStatus(_) => 1006,
            Self::Validation(_) => 1099,

            // State errors (2000-2999)
            Self::InvalidStatusTransition { .. } => 2001,
            Self::NotOpenForConsent(_) => 2002,
            Self::AlreadyAccepted(_) => 2003,
            Self::NotAccepted(_) => 2004,
            Self::NotEditable(_) => 2005,

            // Authorization errors (3000-3999)
            Self::NotAParticipant(_) => 3001,
            Self::NotCreator => 3002,
            Self::NotRecipient => 3003,
            Self::CreatorCannotReject => 3004,
            Self::AdminRequired => 3005,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "invariant",
            2000..=2999 => "state",
            3000..=3999 => "authorization",
            _ => "unknown",
        }
    }

    /// Returns true if this is an invariant/validation error.
    #[inline]
    #[must_use]
    pub const fn is_invariant_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a state-machine error.
    #[inline]
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }

    /// Returns true if this is an authorization error.
    #[inline]
    #[must_use]
    pub const fn is_authorization_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn invariant_errors_in_range() {
        let errors = [
            DomainError::MissingCreator,
            DomainError::MultipleCreators,
            DomainError::NoRecipients,
            DomainError::NoItems,
            DomainError::ItemTeamMismatch {
                team: TeamId::new_v4(),
            },
            DomainError::InvalidInitialStatus(TradeStatus::Accepted),
            DomainError::Validation("bad".to_string()),
        ];

        for error in errors {
            assert!(error.is_invariant_error(), "{error:?}");
            assert_eq!(error.category(), "invariant");
        }
    }

    #[test]
    fn state_errors_in_range() {
        let errors = [
            DomainError::InvalidStatusTransition {
                from: TradeStatus::Draft,
                to: TradeStatus::Submitted,
            },
            DomainError::NotOpenForConsent(TradeStatus::Draft),
            DomainError::AlreadyAccepted(ParticipantId::new_v4()),
            DomainError::NotAccepted(TradeStatus::Pending),
            DomainError::NotEditable(TradeStatus::Requested),
        ];

        for error in errors {
            assert!(error.is_state_error(), "{error:?}");
            assert_eq!(error.category(), "state");
        }
    }

    #[test]
    fn authorization_errors_in_range() {
        let errors = [
            DomainError::NotAParticipant(TeamId::new_v4()),
            DomainError::NotCreator,
            DomainError::NotRecipient,
            DomainError::CreatorCannotReject,
            DomainError::AdminRequired,
        ];

        for error in errors {
            assert!(error.is_authorization_error(), "{error:?}");
            assert_eq!(error.category(), "authorization");
        }
    }

    #[test]
    fn transition_error_display() {
        let error = DomainError::InvalidStatusTransition {
            from: TradeStatus::Draft,
            to: TradeStatus::Submitted,
        };
        assert_eq!(
            error.to_string(),
            "invalid status transition from DRAFT to SUBMITTED"
        );
    }
}
