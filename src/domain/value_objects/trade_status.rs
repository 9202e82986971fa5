//! # Trade Status
//!
//! Trade negotiation lifecycle state machine.
//!
//! This module provides the [`TradeStatus`] enum representing the lifecycle
//! of a multi-team trade proposal with enforced state transitions.
//!
//! # State Machine
//!
//! ```text
//! Draft → Requested ⇄ Pending → Accepted → Submitted
//!             ↓         ↓
//!             └─────────┴→ Rejected
//! ```
//!
//! `Draft` and `Requested` are both reachable directly at creation. Status
//! only ever advances forward or to `Rejected`; `Rejected` and `Submitted`
//! are absorbing.
//!
//! # Examples
//!
//! ```
//! use league_trades::domain::value_objects::TradeStatus;
//!
//! let status = TradeStatus::Requested;
//! assert!(status.can_transition_to(TradeStatus::Pending));
//! assert!(!status.can_transition_to(TradeStatus::Submitted));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade negotiation lifecycle state.
///
/// Represents the current state of a trade proposal. State transitions are
/// enforced via [`can_transition_to`](TradeStatus::can_transition_to); the
/// negotiation use cases are the only writers of this field.
///
/// # Terminal States
///
/// - [`Rejected`](TradeStatus::Rejected) - a recipient declined the trade
/// - [`Submitted`](TradeStatus::Submitted) - all parties consented and the
///   creator submitted the trade to the league
///
/// # Examples
///
/// ```
/// use league_trades::domain::value_objects::TradeStatus;
///
/// assert!(!TradeStatus::Pending.is_terminal());
/// assert!(TradeStatus::Submitted.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TradeStatus {
    /// Proposal under construction; contents may still be replaced.
    #[default]
    Draft = 0,

    /// Sent to the recipient teams; awaiting the first consent.
    Requested = 1,

    /// Some, but not all, recipient teams have consented.
    Pending = 2,

    /// Every recipient team has consented; awaiting creator submission.
    Accepted = 3,

    /// A recipient declined the trade (terminal).
    Rejected = 4,

    /// Submitted to the league for execution (terminal).
    Submitted = 5,
}

impl TradeStatus {
    /// Returns true if this is a terminal state.
    ///
    /// Terminal states cannot transition to any other state; the aggregate
    /// becomes immutable except for audit fields.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Submitted)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// Enforces the negotiation state machine:
    /// - Draft → Requested
    /// - Requested ⇄ Pending
    /// - Requested | Pending → Accepted, Rejected
    /// - Accepted → Submitted
    /// - Terminal states → (none)
    ///
    /// # Examples
    ///
    /// ```
    /// use league_trades::domain::value_objects::TradeStatus;
    ///
    /// assert!(TradeStatus::Draft.can_transition_to(TradeStatus::Requested));
    /// assert!(!TradeStatus::Draft.can_transition_to(TradeStatus::Accepted));
    /// assert!(!TradeStatus::Rejected.can_transition_to(TradeStatus::Requested));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Requested)
                | (Self::Requested, Self::Pending)
                | (Self::Requested, Self::Accepted)
                | (Self::Requested, Self::Rejected)
                | (Self::Pending, Self::Requested)
                | (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Accepted, Self::Submitted)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Draft => vec![Self::Requested],
            Self::Requested => vec![Self::Pending, Self::Accepted, Self::Rejected],
            Self::Pending => vec![Self::Requested, Self::Accepted, Self::Rejected],
            Self::Accepted => vec![Self::Submitted],
            Self::Rejected | Self::Submitted => vec![],
        }
    }

    /// Returns true if a trade in this state can still collect consent.
    ///
    /// Accept and reject are only valid while the trade is Requested or
    /// Pending.
    #[inline]
    #[must_use]
    pub const fn is_open_for_consent(&self) -> bool {
        matches!(self, Self::Requested | Self::Pending)
    }

    /// Returns true if trade contents may still be replaced wholesale.
    #[inline]
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if this is a valid status for a newly created trade.
    ///
    /// Non-admin actors may only create trades in Draft or Requested.
    #[inline]
    #[must_use]
    pub const fn is_valid_initial(&self) -> bool {
        matches!(self, Self::Draft | Self::Requested)
    }

    /// Returns the numeric value of this status.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Returns every status, in lifecycle order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Draft,
            Self::Requested,
            Self::Pending,
            Self::Accepted,
            Self::Rejected,
            Self::Submitted,
        ]
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Requested => "REQUESTED",
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Submitted => "SUBMITTED",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for TradeStatus {
    type Err = InvalidTradeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "REQUESTED" => Ok(Self::Requested),
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "REJECTED" => Ok(Self::Rejected),
            "SUBMITTED" => Ok(Self::Submitted),
            _ => Err(InvalidTradeStatusError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown trade status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTradeStatusError(pub String);

impl fmt::Display for InvalidTradeStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid trade status: {}", self.0)
    }
}

impl std::error::Error for InvalidTradeStatusError {}
