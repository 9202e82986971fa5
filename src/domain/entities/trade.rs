//! # Trade Aggregate
//!
//! Multi-team trade proposal with its negotiation state machine.
//!
//! The aggregate owns, by composition, a non-empty collection of
//! [`Participant`]s and a non-empty collection of [`TradeItem`]s.
//!
//! # Invariants
//!
//! - Exactly one participant has role `Creator`
//! - At least one participant has role `Recipient`
//! - Every item's sender and recipient team equals the team of some
//!   participant of the same trade
//! - Contents may be replaced wholesale only while the status is `Draft`
//! - Status advances monotonically through the state machine; `Rejected` and
//!   `Submitted` are absorbing
//!
//! # Examples
//!
//! ```
//! use league_trades::domain::entities::Trade;
//! use league_trades::domain::value_objects::{
//!     AssetKind, ParticipantRole, TeamId, TradeStatus,
//! };
//! use uuid::Uuid;
//!
//! let creator = TeamId::new_v4();
//! let recipient = TeamId::new_v4();
//!
//! let trade = Trade::builder(TradeStatus::Requested)
//!     .participant(creator, ParticipantRole::Creator)
//!     .participant(recipient, ParticipantRole::Recipient)
//!     .item(AssetKind::Player, Uuid::new_v4(), creator, recipient)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(trade.status(), TradeStatus::Requested);
//! ```

use crate::domain::entities::{Participant, TradeItem};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AssetKind, ParticipantId, ParticipantRole, TeamId, Timestamp, TradeId, TradeStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// A proposed multi-team exchange of players and draft picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier, immutable once created.
    id: TradeId,
    /// Current negotiation status.
    status: TradeStatus,
    /// Teams bound to this trade with their roles.
    participants: Vec<Participant>,
    /// Assets changing hands.
    items: Vec<TradeItem>,
    /// Ordered, duplicate-free participant ids that have consented.
    accepted_by: Vec<ParticipantId>,
    /// Set once every recipient team has consented.
    accepted_on: Option<Timestamp>,
    /// The participant that declined, if the trade was rejected.
    declined_by: Option<ParticipantId>,
    /// Free-form reason supplied with the decline.
    declined_reason: Option<String>,
    /// Version for optimistic locking.
    version: u64,
    /// When this trade was created.
    created_at: Timestamp,
    /// When this trade was last updated.
    updated_at: Timestamp,
}

impl Trade {
    /// Starts building a trade in the given initial status.
    #[must_use]
    pub fn builder(status: TradeStatus) -> TradeBuilder {
        TradeBuilder::new(status)
    }

    /// Reconstructs a trade from trusted storage, bypassing validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: TradeId,
        status: TradeStatus,
        participants: Vec<Participant>,
        items: Vec<TradeItem>,
        accepted_by: Vec<ParticipantId>,
        accepted_on: Option<Timestamp>,
        declined_by: Option<ParticipantId>,
        declined_reason: Option<String>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            status,
            participants,
            items,
            accepted_by,
            accepted_on,
            declined_by,
            declined_reason,
            version,
            created_at,
            updated_at,
        }
    }

    /// Validates the aggregate invariants.
    ///
    /// Called on construction, after the store re-reads a created trade, and
    /// after every content replacement.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: missing/duplicated creator,
    /// missing recipients, empty items, or an item referencing a
    /// non-participant team.
    pub fn validate(&self) -> DomainResult<()> {
        let creators = self
            .participants
            .iter()
            .filter(|p| p.role().is_creator())
            .count();
        if creators == 0 {
            return Err(DomainError::MissingCreator);
        }
        if creators > 1 {
            return Err(DomainError::MultipleCreators);
        }
        if !self.participants.iter().any(|p| p.role().is_recipient()) {
            return Err(DomainError::NoRecipients);
        }
        if self.items.is_empty() {
            return Err(DomainError::NoItems);
        }

        let teams: BTreeSet<TeamId> = self.participants.iter().map(|p| p.team_id()).collect();
        for item in &self.items {
            for team in [item.sender_team(), item.recipient_team()] {
                if !teams.contains(&team) {
                    return Err(DomainError::ItemTeamMismatch { team });
                }
            }
        }
        Ok(())
    }

    fn transition_to(&mut self, target: TradeStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    // ========== Accessors ==========

    /// Returns the trade id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TradeId {
        self.id
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> TradeStatus {
        self.status
    }

    /// Returns the participants.
    #[inline]
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns the items.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[TradeItem] {
        &self.items
    }

    /// Returns the participant ids that have consented, in acceptance order.
    #[inline]
    #[must_use]
    pub fn accepted_by(&self) -> &[ParticipantId] {
        &self.accepted_by
    }

    /// Returns when the trade became fully accepted, if it has.
    #[inline]
    #[must_use]
    pub fn accepted_on(&self) -> Option<Timestamp> {
        self.accepted_on
    }

    /// Returns the declining participant, if the trade was rejected.
    #[inline]
    #[must_use]
    pub fn declined_by(&self) -> Option<ParticipantId> {
        self.declined_by
    }

    /// Returns the decline reason, if any.
    #[inline]
    #[must_use]
    pub fn declined_reason(&self) -> Option<&str> {
        self.declined_reason.as_deref()
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when this trade was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this trade was last updated.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== Lookup Helpers ==========

    /// Returns the creator participant.
    ///
    /// Validated trades always have exactly one.
    #[must_use]
    pub fn creator(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.role().is_creator())
    }

    /// Returns an iterator over the recipient participants.
    pub fn recipients(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.role().is_recipient())
    }

    /// Returns the participant with the given id, if it belongs to this trade.
    #[must_use]
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    /// Returns this trade's participant for the given team, if any.
    #[must_use]
    pub fn participant_for_team(&self, team: TeamId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.team_id() == team)
    }

    /// Returns the distinct recipient teams.
    #[must_use]
    pub fn recipient_teams(&self) -> BTreeSet<TeamId> {
        self.recipients().map(|p| p.team_id()).collect()
    }

    /// Returns true if every distinct recipient team is represented in
    /// `accepted_by`.
    #[must_use]
    pub fn is_fully_accepted(&self) -> bool {
        let consented: BTreeSet<TeamId> = self
            .accepted_by
            .iter()
            .filter_map(|id| self.participant(*id))
            .map(|p| p.team_id())
            .collect();
        self.recipient_teams().is_subset(&consented)
    }

    // ========== State Transitions ==========

    /// Advances the trade from Draft to Requested.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStatusTransition`] from any other status.
    pub fn advance_to_requested(&mut self) -> DomainResult<()> {
        self.transition_to(TradeStatus::Requested)
    }

    /// Records one recipient participant's consent and recomputes the status.
    ///
    /// The resulting status is `Accepted` if every distinct recipient team is
    /// now represented in `accepted_by`, otherwise `Pending`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotOpenForConsent`] unless the status is Requested or
    ///   Pending
    /// - [`DomainError::Validation`] if the participant is not part of this
    ///   trade
    /// - [`DomainError::NotRecipient`] if the participant is the creator
    /// - [`DomainError::AlreadyAccepted`] on re-acceptance by a recorded
    ///   identity
    pub fn apply_acceptance(&mut self, participant_id: ParticipantId) -> DomainResult<()> {
        if !self.status.is_open_for_consent() {
            return Err(DomainError::NotOpenForConsent(self.status));
        }
        let participant = self.participant(participant_id).ok_or_else(|| {
            DomainError::Validation(format!(
                "participant {participant_id} is not part of this trade"
            ))
        })?;
        if !participant.role().is_recipient() {
            return Err(DomainError::NotRecipient);
        }
        if self.accepted_by.contains(&participant_id) {
            return Err(DomainError::AlreadyAccepted(participant_id));
        }

        self.accepted_by.push(participant_id);
        if self.is_fully_accepted() {
            self.accepted_on = Some(Timestamp::now());
            self.transition_to(TradeStatus::Accepted)
        } else if self.status == TradeStatus::Pending {
            // Already pending; record the consent without a status change.
            self.touch();
            Ok(())
        } else {
            self.transition_to(TradeStatus::Pending)
        }
    }

    /// Records a decline: sets the declined fields and moves to Rejected in
    /// one operation.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotOpenForConsent`] unless the status is Requested or
    ///   Pending
    /// - [`DomainError::Validation`] if the participant is not part of this
    ///   trade (the silent-ignore path for forged ids is the caller's
    ///   responsibility)
    pub fn apply_decline(
        &mut self,
        participant_id: ParticipantId,
        reason: Option<String>,
    ) -> DomainResult<()> {
        if !self.status.is_open_for_consent() {
            return Err(DomainError::NotOpenForConsent(self.status));
        }
        if self.participant(participant_id).is_none() {
            return Err(DomainError::Validation(format!(
                "participant {participant_id} is not part of this trade"
            )));
        }
        self.declined_by = Some(participant_id);
        self.declined_reason = reason;
        self.transition_to(TradeStatus::Rejected)
    }

    /// Moves a fully accepted trade to Submitted.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotAccepted`] from any status other than
    /// Accepted.
    pub fn apply_submission(&mut self) -> DomainResult<()> {
        if self.status != TradeStatus::Accepted {
            return Err(DomainError::NotAccepted(self.status));
        }
        self.transition_to(TradeStatus::Submitted)
    }

    /// Replaces participants and items wholesale.
    ///
    /// Permitted only while the trade is a draft; the replacement must itself
    /// satisfy the aggregate invariants or the trade is left untouched.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotEditable`] outside of Draft
    /// - Any invariant violation from [`Trade::validate`]
    pub fn replace_contents(
        &mut self,
        participants: Vec<Participant>,
        items: Vec<TradeItem>,
    ) -> DomainResult<()> {
        if !self.status.is_editable() {
            return Err(DomainError::NotEditable(self.status));
        }

        let candidate = Self {
            participants,
            items,
            ..self.clone()
        };
        candidate.validate()?;

        self.participants = candidate.participants;
        self.items = candidate.items;
        self.touch();
        Ok(())
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade({} {} participants={} items={})",
            self.id,
            self.status,
            self.participants.len(),
            self.items.len()
        )
    }
}

/// Builder assembling a trade and its children under one fresh trade id.
#[derive(Debug)]
pub struct TradeBuilder {
    id: TradeId,
    status: TradeStatus,
    participants: Vec<Participant>,
    items: Vec<TradeItem>,
}

impl TradeBuilder {
    fn new(status: TradeStatus) -> Self {
        Self {
            id: TradeId::new_v4(),
            status,
            participants: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Adds a participant for the given team and role.
    #[must_use]
    pub fn participant(mut self, team: TeamId, role: ParticipantRole) -> Self {
        self.participants
            .push(Participant::new(self.id, team, role));
        self
    }

    /// Adds an item moving an asset from `sender` to `recipient`.
    #[must_use]
    pub fn item(
        mut self,
        kind: AssetKind,
        entity_id: Uuid,
        sender: TeamId,
        recipient: TeamId,
    ) -> Self {
        self.items
            .push(TradeItem::new(self.id, kind, entity_id, sender, recipient));
        self
    }

    /// Validates the invariants and builds the trade.
    ///
    /// # Errors
    ///
    /// Returns the first violated aggregate invariant.
    pub fn build(self) -> DomainResult<Trade> {
        let now = Timestamp::now();
        let trade = Trade {
            id: self.id,
            status: self.status,
            participants: self.participants,
            items: self.items,
            accepted_by: Vec::new(),
            accepted_on: None,
            declined_by: None,
            declined_reason: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        trade.validate()?;
        Ok(trade)
    }
}
