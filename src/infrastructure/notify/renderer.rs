//! # Message Rendering
//!
//! Turns a hydrated trade snapshot into a subject and body for one
//! recipient.

use crate::application::services::queue::{NotificationKind, RecipientContext};
use crate::domain::entities::HydratedTrade;
use std::fmt;

/// A rendered notification ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Subject line (ignored by channel transports).
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// Port for rendering queued notifications.
pub trait MessageRenderer: Send + Sync + fmt::Debug {
    /// Renders one notification for one recipient.
    fn render(
        &self,
        kind: NotificationKind,
        trade: &HydratedTrade,
        recipient: &RecipientContext,
    ) -> RenderedMessage;
}

/// Plain-text reference renderer.
///
/// Produces a short subject and a body listing every asset changing hands,
/// greeting individual owners by display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    /// Creates the renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn asset_lines(trade: &HydratedTrade) -> String {
        trade
            .items
            .iter()
            .map(|entry| {
                format!(
                    "  - {} ({} -> {})",
                    entry.asset.label(),
                    entry.item.sender_team(),
                    entry.item.recipient_team()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn subject(kind: NotificationKind, trade: &HydratedTrade) -> String {
        let id = trade.trade.id();
        match kind {
            NotificationKind::TradeRequested => format!("Trade proposal {id}"),
            NotificationKind::TradeDeclined => format!("Trade {id} was declined"),
            NotificationKind::TradeAccepted => format!("Trade {id} was accepted"),
            NotificationKind::TradeSubmitted => format!("Trade {id} submitted to the league"),
        }
    }

    fn lede(kind: NotificationKind) -> &'static str {
        match kind {
            NotificationKind::TradeRequested => {
                "A trade has been proposed to your team. The following assets would change hands:"
            }
            NotificationKind::TradeDeclined => "A participating team declined this trade:",
            NotificationKind::TradeAccepted => {
                "Every recipient team has accepted your trade. You may now submit it:"
            }
            NotificationKind::TradeSubmitted => {
                "A trade has been submitted to the league for execution:"
            }
        }
    }
}

impl MessageRenderer for PlainTextRenderer {
    fn render(
        &self,
        kind: NotificationKind,
        trade: &HydratedTrade,
        recipient: &RecipientContext,
    ) -> RenderedMessage {
        let greeting = match recipient {
            RecipientContext::Owner { display_name, .. } => format!("Hi {display_name},\n\n"),
            RecipientContext::Channel { .. } => String::new(),
        };

        let mut body = format!(
            "{greeting}{}\n\n{}\n",
            Self::lede(kind),
            Self::asset_lines(trade)
        );
        if kind == NotificationKind::TradeDeclined
            && let Some(reason) = trade.trade.declined_reason()
        {
            body.push_str(&format!("\nReason: {reason}\n"));
        }

        RenderedMessage {
            subject: Self::subject(kind, trade),
            body,
        }
    }
}
