//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`TradeId`], [`ParticipantId`], [`ItemId`]: UUID-based trade identifiers
//! - [`TeamId`], [`OwnerId`], [`EventId`]: UUID-based league identifiers
//!
//! ## Domain Enums
//!
//! - [`ParticipantRole`]: Creator or Recipient within one trade
//! - [`AssetKind`]: Player or DraftPick item discriminant
//!
//! ## State Types
//!
//! - [`TradeStatus`]: Trade negotiation lifecycle state machine
//!
//! ## Time
//!
//! - [`Timestamp`]: UTC timestamp with millisecond precision

pub mod asset;
pub mod ids;
pub mod role;
pub mod timestamp;
pub mod trade_status;

pub use asset::{AssetKind, ParseAssetKindError};
pub use ids::{EventId, ItemId, OwnerId, ParticipantId, TeamId, TradeId};
pub use role::{ParseParticipantRoleError, ParticipantRole};
pub use timestamp::Timestamp;
pub use trade_status::{InvalidTradeStatusError, TradeStatus};
