//! Log-only transport used when no SMTP relay is configured.

use async_trait::async_trait;

use super::email::EmailError;
use super::{EmailMessage, Mailer};

/// Writes each message to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, message: &EmailMessage) -> Result<Option<String>, EmailError> {
        tracing::info!(
            to,
            subject = %message.subject,
            body = %message.text_body,
            "SMTP not configured, email logged only"
        );
        Ok(None)
    }
}
