//! # Notification Collaborators
//!
//! Renderer and transport seams behind notification delivery.
//!
//! Workers own one renderer and one transport; the reference
//! implementations here are a plain-text renderer, a tracing-backed email
//! stub, and a chat webhook client.

pub mod renderer;
pub mod transport;

pub use renderer::{MessageRenderer, PlainTextRenderer, RenderedMessage};
pub use transport::{ChatWebhookTransport, LoggingEmailTransport, Transport};
