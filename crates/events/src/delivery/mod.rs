//! Email transports.
//!
//! Every transport implements [`Mailer`]; the dispatcher never needs to know
//! which one it holds.

use async_trait::async_trait;

use self::email::EmailError;

pub mod email;
pub mod log;

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub text_body: String,
}

/// Sends one message to one recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `message` to `to`, returning the transport's message id when
    /// it has one.
    async fn send(&self, to: &str, message: &EmailMessage) -> Result<Option<String>, EmailError>;
}
