//! # Authorization
//!
//! Explicit capability check for trade actions.
//!
//! Authorization is a pure function over the actor, the trade, and the
//! intended action, unit-testable without HTTP. Route wiring never encodes a
//! permission rule; every rule lives here.
//!
//! A platform admin bypasses all trade-specific checks. Regular actors act
//! for exactly one team, resolved from their owner record before this check
//! runs.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::use_cases::RosterDirectory;
use crate::domain::entities::Trade;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{OwnerId, ParticipantId, TeamId, TradeStatus};

/// The authenticated caller, as produced by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The owner identity from the token's subject.
    pub owner_id: OwnerId,
    /// Platform admin flag from the token claims.
    pub admin: bool,
}

/// The caller resolved against the roster: the team it may act for.
///
/// Admins have no team of their own; `team_id` is `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    /// The team the actor owns, if any.
    pub team_id: Option<TeamId>,
    /// Platform admin flag.
    pub admin: bool,
}

impl ActorContext {
    /// Context for a team owner.
    #[must_use]
    pub const fn owner(team_id: TeamId) -> Self {
        Self {
            team_id: Some(team_id),
            admin: false,
        }
    }

    /// Context for a platform admin.
    #[must_use]
    pub const fn admin() -> Self {
        Self {
            team_id: None,
            admin: true,
        }
    }
}

/// The action an actor intends to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    /// Create a trade in the given initial status.
    Create(TradeStatus),
    /// Replace participants or items while the trade is a draft.
    EditContents,
    /// Advance the trade from Draft to Requested.
    AdvanceToRequested,
    /// Record one recipient team's consent.
    Accept,
    /// Decline the trade.
    Reject,
    /// Hand an accepted trade to the commissioner.
    Submit,
    /// Delete the trade.
    Delete,
}

/// Checks whether the actor may perform the action on the trade.
///
/// `trade` is `None` only for [`TradeAction::Create`].
///
/// # Errors
///
/// - [`DomainError::InvalidInitialStatus`] for a non-admin create outside
///   Draft/Requested
/// - [`DomainError::NotAParticipant`] when the actor's team is not bound to
///   the trade
/// - [`DomainError::NotCreator`], [`DomainError::NotRecipient`],
///   [`DomainError::CreatorCannotReject`], [`DomainError::AdminRequired`]
///   per the capability rules
pub fn authorize(
    actor: &ActorContext,
    trade: Option<&Trade>,
    action: TradeAction,
) -> DomainResult<()> {
    if actor.admin {
        return Ok(());
    }

    let team = actor
        .team_id
        .ok_or_else(|| DomainError::Validation("actor is not bound to a team".to_string()))?;

    match action {
        TradeAction::Create(status) => {
            if status.is_valid_initial() {
                Ok(())
            } else {
                Err(DomainError::InvalidInitialStatus(status))
            }
        }
        TradeAction::EditContents | TradeAction::AdvanceToRequested | TradeAction::Submit => {
            let trade = require_trade(trade)?;
            let participant = trade
                .participant_for_team(team)
                .ok_or(DomainError::NotAParticipant(team))?;
            if participant.role().is_creator() {
                Ok(())
            } else {
                Err(DomainError::NotCreator)
            }
        }
        TradeAction::Accept => {
            let trade = require_trade(trade)?;
            let participant = trade
                .participant_for_team(team)
                .ok_or(DomainError::NotAParticipant(team))?;
            if participant.role().is_recipient() {
                Ok(())
            } else {
                Err(DomainError::NotRecipient)
            }
        }
        TradeAction::Reject => {
            let trade = require_trade(trade)?;
            let participant = trade
                .participant_for_team(team)
                .ok_or(DomainError::NotAParticipant(team))?;
            if participant.role().is_creator() {
                Err(DomainError::CreatorCannotReject)
            } else {
                Ok(())
            }
        }
        TradeAction::Delete => Err(DomainError::AdminRequired),
    }
}

/// Resolves the participant the actor acts through on this trade.
///
/// Returns `None` for admins, who name the participant explicitly in the
/// request instead.
#[must_use]
pub fn acting_participant(actor: &ActorContext, trade: &Trade) -> Option<ParticipantId> {
    actor
        .team_id
        .and_then(|team| trade.participant_for_team(team))
        .map(|p| p.id())
}

/// Resolves an authenticated actor against the roster.
///
/// Admins skip the lookup; team owners must resolve to a known owner record
/// or the request is unauthorized.
///
/// # Errors
///
/// Returns `Unauthorized` for an unknown owner and `Repository` for lookup
/// failures.
pub async fn resolve_actor(
    directory: &dyn RosterDirectory,
    actor: &Actor,
) -> ApplicationResult<ActorContext> {
    if actor.admin {
        return Ok(ActorContext::admin());
    }
    let owner = directory
        .get_owner(actor.owner_id)
        .await
        .map_err(ApplicationError::repository)?
        .ok_or_else(|| {
            ApplicationError::unauthorized(format!("unknown owner {}", actor.owner_id))
        })?;
    Ok(ActorContext::owner(owner.team_id))
}

fn require_trade(trade: Option<&Trade>) -> DomainResult<&Trade> {
    trade.ok_or_else(|| DomainError::Validation("action requires an existing trade".to_string()))
}
