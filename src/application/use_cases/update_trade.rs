//! # Update Trade Use Case
//!
//! The combined trade update: content replacement, the advance to
//! Requested, and decline-via-update in one request.
//!
//! Sections the actor may not apply are skipped silently while the rest of
//! the update proceeds. Two silent paths exist by design: content changes
//! outside Draft (or by a non-creator), and a `declined_by` naming a
//! participant of some other trade. Everything else fails loudly.

use crate::application::dto::trade_dto::{ItemSpec, ParticipantSpec, TradeResponse, UpdateTradeRequest};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::authorization::{Actor, TradeAction, authorize, resolve_actor};
use crate::application::use_cases::{EventPublisher, RosterDirectory, TradeStore};
use crate::domain::entities::{Participant, Trade, TradeItem};
use crate::domain::events::TradeEvent;
use crate::domain::value_objects::{ItemId, ParticipantId, TradeId, TradeStatus};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case for the combined trade update.
#[derive(Debug)]
pub struct UpdateTradeUseCase {
    store: Arc<dyn TradeStore>,
    directory: Arc<dyn RosterDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateTradeUseCase {
    /// Creates the use case with all dependencies.
    #[must_use]
    pub fn new(
        store: Arc<dyn TradeStore>,
        directory: Arc<dyn RosterDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            store,
            directory,
            event_publisher,
        }
    }

    /// Executes the combined update.
    ///
    /// Applied in order: contents, status advance, decline.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trade does not exist
    /// - A content replacement violates the aggregate invariants
    /// - The status section names anything but Requested, or the actor may
    ///   not advance
    /// - The decline names an own participant while the trade is not open
    ///   for consent
    pub async fn execute(
        &self,
        actor: &Actor,
        trade_id: TradeId,
        request: UpdateTradeRequest,
    ) -> ApplicationResult<TradeResponse> {
        let context = resolve_actor(self.directory.as_ref(), actor).await?;
        let mut current = self.store.get_trade_by_id(trade_id).await?;

        // 1. Content replacement: silent no-op outside Draft or for
        //    non-creators; the rest of the update still applies.
        if request.has_content_changes() {
            let permitted = current.status().is_editable()
                && authorize(&context, Some(&current), TradeAction::EditContents).is_ok();
            if permitted {
                current = self.apply_contents(&current, &request).await?;
            } else {
                debug!(trade_id = %trade_id, status = %current.status(), "skipping content changes");
            }
        }

        // 2. Status advance
        if let Some(target) = request.status
            && target != current.status()
        {
            if target != TradeStatus::Requested {
                return Err(ApplicationError::bad_request(format!(
                    "status: {target} cannot be set through update; use the dedicated endpoint"
                )));
            }
            authorize(&context, Some(&current), TradeAction::AdvanceToRequested)?;

            // Validate the transition on a copy before writing.
            let mut advanced = current.clone();
            advanced.advance_to_requested()?;

            current = self
                .store
                .update_status(trade_id, TradeStatus::Requested)
                .await?;
            self.publish(TradeEvent::requested(trade_id)).await;
        }

        // 3. Decline via update: foreign participant ids are ignored
        //    without a store write.
        if let Some(participant_id) = request.declined_by {
            if current.participant(participant_id).is_some() {
                current = self
                    .store
                    .update_declined_by(trade_id, participant_id, request.declined_reason.clone())
                    .await?;
                self.publish(TradeEvent::rejected(
                    trade_id,
                    participant_id,
                    request.declined_reason.clone(),
                ))
                .await;
            } else {
                debug!(trade_id = %trade_id, participant_id = %participant_id, "ignoring foreign declined_by");
            }
        }

        Ok(TradeResponse::from(&current))
    }

    /// Applies a wholesale content replacement as participant/item deltas.
    ///
    /// Existing rows whose values reappear in the request are kept under
    /// their current ids; only genuinely new and vanished rows travel in the
    /// deltas. The merged aggregate is validated up front so no partial
    /// write can leave the trade invalid.
    async fn apply_contents(
        &self,
        current: &Trade,
        request: &UpdateTradeRequest,
    ) -> ApplicationResult<Trade> {
        let (participants, add_participants, remove_participants) = match &request.participants {
            Some(specs) => diff_participants(current, specs),
            None => (current.participants().to_vec(), Vec::new(), Vec::new()),
        };
        let (items, add_items, remove_items) = match &request.items {
            Some(specs) => diff_items(current, specs),
            None => (current.items().to_vec(), Vec::new(), Vec::new()),
        };

        // Domain validation of the merged result before any store write.
        let mut merged = current.clone();
        merged.replace_contents(participants, items)?;

        let mut latest = current.clone();
        if !add_participants.is_empty() || !remove_participants.is_empty() {
            latest = self
                .store
                .update_participants(current.id(), add_participants, remove_participants)
                .await?;
        }
        if !add_items.is_empty() || !remove_items.is_empty() {
            latest = self
                .store
                .update_items(current.id(), add_items, remove_items)
                .await?;
        }
        Ok(latest)
    }

    async fn publish(&self, event: TradeEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            warn!(error = %e, "failed to publish trade event");
        }
    }
}

/// Computes the participant delta for a wholesale replacement.
///
/// Returns the merged participant list plus the add/remove delta.
fn diff_participants(
    current: &Trade,
    specs: &[ParticipantSpec],
) -> (Vec<Participant>, Vec<Participant>, Vec<ParticipantId>) {
    let mut kept: Vec<Participant> = Vec::new();
    let mut added: Vec<Participant> = Vec::new();
    let mut matched: Vec<ParticipantId> = Vec::new();

    for spec in specs {
        let existing = current.participants().iter().find(|p| {
            p.team_id() == spec.team_id && p.role() == spec.role && !matched.contains(&p.id())
        });
        match existing {
            Some(p) => {
                matched.push(p.id());
                kept.push(p.clone());
            }
            None => added.push(Participant::new(current.id(), spec.team_id, spec.role)),
        }
    }

    let removed: Vec<ParticipantId> = current
        .participants()
        .iter()
        .filter(|p| !matched.contains(&p.id()))
        .map(|p| p.id())
        .collect();

    let mut merged = kept;
    merged.extend(added.iter().cloned());
    (merged, added, removed)
}

/// Computes the item delta for a wholesale replacement.
fn diff_items(current: &Trade, specs: &[ItemSpec]) -> (Vec<TradeItem>, Vec<TradeItem>, Vec<ItemId>) {
    let mut kept: Vec<TradeItem> = Vec::new();
    let mut added: Vec<TradeItem> = Vec::new();
    let mut matched: Vec<ItemId> = Vec::new();

    for spec in specs {
        let existing = current.items().iter().find(|i| {
            i.asset_kind() == spec.asset_kind
                && i.entity_id() == spec.entity_id
                && i.sender_team() == spec.sender_team
                && i.recipient_team() == spec.recipient_team
                && !matched.contains(&i.id())
        });
        match existing {
            Some(i) => {
                matched.push(i.id());
                kept.push(i.clone());
            }
            None => added.push(TradeItem::new(
                current.id(),
                spec.asset_kind,
                spec.entity_id,
                spec.sender_team,
                spec.recipient_team,
            )),
        }
    }

    let removed: Vec<ItemId> = current
        .items()
        .iter()
        .filter(|i| !matched.contains(&i.id()))
        .map(|i| i.id())
        .collect();

    let mut merged = kept;
    merged.extend(added.iter().cloned());
    (merged, added, removed)
}
