//! # Domain Events
//!
//! Events emitted when a trade crosses a lifecycle milestone, consumed by the
//! audit trail and the notification dispatch pipeline.
//!
//! ## Trade Events
//!
//! - `TradeRequested`: Proposal sent to its recipients
//! - `TradeAccepted`: Every recipient team has consented
//! - `TradeRejected`: A recipient declined the proposal
//! - `TradeSubmitted`: Accepted trade handed to the commissioner

pub mod trade_events;

pub use trade_events::TradeEvent;
