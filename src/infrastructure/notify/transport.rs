//! # Delivery Transports
//!
//! The seam between rendered messages and the outside world.
//!
//! Delivery is at-least-once, so transports must tolerate duplicate sends
//! for the same message id.

use crate::application::services::queue::RecipientContext;
use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use tracing::info;

/// Port for sending one rendered notification.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends a rendered message to the recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the caller nacks and the message
    /// is redelivered.
    async fn send(
        &self,
        recipient: &RecipientContext,
        subject: &str,
        body: &str,
    ) -> Result<(), String>;
}

/// Email transport stub that logs instead of sending.
///
/// Stands in for a real mail relay in tests and the default wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailTransport;

impl LoggingEmailTransport {
    /// Creates the transport.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LoggingEmailTransport {
    async fn send(
        &self,
        recipient: &RecipientContext,
        subject: &str,
        body: &str,
    ) -> Result<(), String> {
        info!(
            to = %recipient.address(),
            subject = %subject,
            bytes = body.len(),
            "email delivered"
        );
        Ok(())
    }
}

/// Chat transport posting to an incoming webhook.
#[derive(Debug, Clone)]
pub struct ChatWebhookTransport {
    client: reqwest::Client,
    webhook_url: String,
}

impl ChatWebhookTransport {
    /// Creates a transport posting to the given webhook URL.
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Transport for ChatWebhookTransport {
    async fn send(
        &self,
        recipient: &RecipientContext,
        _subject: &str,
        body: &str,
    ) -> Result<(), String> {
        let payload = json!({
            "channel": recipient.address(),
            "text": body,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("webhook request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("webhook returned {}", response.status()));
        }
        Ok(())
    }
}
