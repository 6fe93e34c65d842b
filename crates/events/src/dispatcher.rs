//! Notification dispatcher.
//!
//! The dispatcher owns the email mode as an explicit value. In development
//! mode subjects are tagged and, when a redirect address is configured, every
//! message goes to that address instead of the real recipient.

use std::sync::Arc;

use serde::Serialize;

use crate::delivery::{EmailMessage, Mailer};

/// Subject prefix applied in development mode.
const DEV_SUBJECT_PREFIX: &str = "[DEV]";

// ---------------------------------------------------------------------------
// EmailMode
// ---------------------------------------------------------------------------

/// Where outgoing email is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailMode {
    /// Deliver to the real recipient unchanged.
    Production,
    /// Tag subjects and optionally redirect every message to one inbox.
    Development { redirect_to: Option<String> },
}

impl EmailMode {
    /// Load the mode from `EMAIL_MODE` (`production` | `development`, default
    /// `development`) and `EMAIL_DEV_REDIRECT`.
    pub fn from_env() -> Self {
        let mode = std::env::var("EMAIL_MODE").unwrap_or_default();
        Self::parse(&mode, std::env::var("EMAIL_DEV_REDIRECT").ok())
    }

    /// Build a mode from its textual name. Anything but `production` is
    /// development, so a typo never sends real mail.
    pub fn parse(mode: &str, redirect_to: Option<String>) -> Self {
        if mode.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development {
                redirect_to: redirect_to.filter(|r| !r.trim().is_empty()),
            }
        }
    }

    /// Apply the mode to one message, returning the effective recipient and
    /// the message to send.
    pub fn route(&self, to: &str, message: &EmailMessage) -> (String, EmailMessage) {
        match self {
            Self::Production => (to.to_string(), message.clone()),
            Self::Development { redirect_to } => {
                let subject = format!("{DEV_SUBJECT_PREFIX} {}", message.subject);
                match redirect_to {
                    Some(redirect) => (
                        redirect.clone(),
                        EmailMessage {
                            subject,
                            text_body: format!(
                                "Original recipient: {to}\n\n{}",
                                message.text_body
                            ),
                        },
                    ),
                    None => (
                        to.to_string(),
                        EmailMessage {
                            subject,
                            text_body: message.text_body.clone(),
                        },
                    ),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DeliveryOutcome
// ---------------------------------------------------------------------------

/// Result of one delivery attempt, recorded on the entity that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub sent: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn sent(message_id: Option<String>) -> Self {
        Self {
            sent: true,
            message_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            sent: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationDispatcher
// ---------------------------------------------------------------------------

/// Sends email through a [`Mailer`] according to an [`EmailMode`].
#[derive(Clone)]
pub struct NotificationDispatcher {
    mailer: Arc<dyn Mailer>,
    mode: EmailMode,
}

impl NotificationDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, mode: EmailMode) -> Self {
        Self { mailer, mode }
    }

    pub fn mode(&self) -> &EmailMode {
        &self.mode
    }

    /// Deliver one message. Never fails: transport errors become a failed
    /// [`DeliveryOutcome`].
    pub async fn send(&self, to: &str, message: &EmailMessage) -> DeliveryOutcome {
        let (recipient, routed) = self.mode.route(to, message);

        match self.mailer.send(&recipient, &routed).await {
            Ok(message_id) => {
                tracing::info!(to = %recipient, subject = %routed.subject, "Email dispatched");
                DeliveryOutcome::sent(message_id)
            }
            Err(e) => {
                tracing::warn!(to = %recipient, error = %e, "Email dispatch failed");
                DeliveryOutcome::failed(e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
