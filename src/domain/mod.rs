//! # Domain Layer
//!
//! Core business logic following Domain-Driven Design principles.
//!
//! This layer contains:
//! - **Entities**: The [`entities::Trade`] aggregate with its participants
//!   and items, plus roster collaborator records
//! - **Value Objects**: Immutable types with validation (identifiers,
//!   [`value_objects::TradeStatus`], timestamps)
//! - **Events**: Domain events emitted on lifecycle transitions
//! - **Errors**: Domain-specific error types

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;
