//! # League Trades
//!
//! Multi-team trade negotiation engine for fantasy sports leagues: teams
//! propose trading players and draft picks, other teams consent, and
//! consenting parties receive asynchronous notifications (email, chat) as the
//! proposal moves through its lifecycle.
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Trade aggregate, participants, items,
//!   lifecycle state machine, and domain events
//! - **Application Layer** (`application`): Use cases, authorization,
//!   notification dispatch, and orchestration
//! - **Infrastructure Layer** (`infrastructure`): Trade store implementations,
//!   delivery queues, workers, and renderer/transport adapters
//! - **API Layer** (`api`): REST interface and authentication middleware
//!
//! ## Example
//!
//! ```rust,ignore
//! use league_trades::application::use_cases::AcceptTradeUseCase;
//!
//! // Record a recipient team's consent
//! let response = AcceptTradeUseCase::new(/* dependencies */)
//!     .execute(&actor, trade_id, request)
//!     .await?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
