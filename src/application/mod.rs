//! # Application Layer
//!
//! Use cases, DTOs, and application services for trade negotiation.
//!
//! This layer orchestrates domain objects without knowing how they are
//! stored, transported, or rendered; those concerns live behind the ports
//! defined alongside the use cases.

pub mod dto;
pub mod error;
pub mod services;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
