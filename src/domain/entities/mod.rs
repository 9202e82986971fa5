//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Trade`]: Multi-team trade proposal with its lifecycle state machine
//!
//! ## Entities
//!
//! - [`Participant`]: A team's role (creator or recipient) within one trade
//! - [`TradeItem`]: One traded asset with a sender and recipient team
//! - [`Player`], [`DraftPick`], [`Owner`]: Roster collaborator records
//! - [`HydratedTrade`]: Read-time projection with resolved asset details

pub mod hydrated;
pub mod item;
pub mod participant;
pub mod roster;
pub mod trade;

pub use hydrated::{AssetDetails, HydratedItem, HydratedTrade};
pub use item::TradeItem;
pub use participant::Participant;
pub use roster::{DraftPick, Owner, Player};
pub use trade::Trade;
