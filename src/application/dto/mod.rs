//! # Data Transfer Objects
//!
//! Request and response shapes decoupling the API layer from the domain.

pub mod trade_dto;

pub use trade_dto::{
    AcceptTradeRequest, CreateTradeRequest, DeclineDispatchRequest, DispatchAccepted,
    ItemSpec, ParticipantSpec, RejectTradeRequest, TradeResponse, UpdateTradeRequest,
};
