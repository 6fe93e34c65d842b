//! Follow-on work after a committed issuance: mint a confirmation and email
//! the link to the holder.
//!
//! Nothing here can fail the issuance. Errors are logged, and delivery
//! failures are recorded on the confirmation.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use workwear_core::confirmation::{confirmation_link, ProtocolType, SnapshotItem};
use workwear_core::error::CoreError;
use workwear_core::types::{DbId, Timestamp};
use workwear_db::models::confirmation::Confirmation;
use workwear_db::models::transaction::TransactionDetail;
use workwear_db::repositories::EmployeeRepo;
use workwear_events::templates::ConfirmationEmail;
use workwear_events::{DeliveryOutcome, NotificationDispatcher};

use super::ConfirmationEngine;
use crate::error::{AppError, AppResult};

/// What the caller of an issue or resend learns about the confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationSummary {
    pub confirmation_id: DbId,
    pub protocol_type: ProtocolType,
    pub expires_at: Timestamp,
    pub email_sent: bool,
    pub email_error: Option<String>,
    pub message_id: Option<String>,
}

impl ConfirmationSummary {
    fn new(confirmation: &Confirmation, protocol_type: ProtocolType, outcome: DeliveryOutcome) -> Self {
        Self {
            confirmation_id: confirmation.id,
            protocol_type,
            expires_at: confirmation.expires_at,
            email_sent: outcome.sent,
            email_error: outcome.error,
            message_id: outcome.message_id,
        }
    }
}

pub struct IssueWorkflow {
    pool: PgPool,
    confirmations: Arc<ConfirmationEngine>,
    dispatcher: NotificationDispatcher,
    public_base_url: String,
}

impl IssueWorkflow {
    pub fn new(
        pool: PgPool,
        confirmations: Arc<ConfirmationEngine>,
        dispatcher: NotificationDispatcher,
        public_base_url: String,
    ) -> Self {
        Self {
            pool,
            confirmations,
            dispatcher,
            public_base_url,
        }
    }

    /// Mint a confirmation over freshly issued transactions and send the link.
    ///
    /// Returns `None` when no confirmation could be created.
    pub async fn after_issue(&self, transactions: &[TransactionDetail]) -> Option<ConfirmationSummary> {
        let first = transactions.first()?;
        match self.mint_and_send(first, transactions).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(
                    employee_id = first.transaction.employee_id,
                    error = %e,
                    "Failed to create confirmation after issue",
                );
                None
            }
        }
    }

    /// Send the link of an open confirmation again.
    pub async fn resend(&self, confirmation_id: DbId) -> AppResult<ConfirmationSummary> {
        let confirmation = self.confirmations.find(confirmation_id).await?;
        if confirmation.confirmed {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Confirmation {confirmation_id} is already confirmed"
            ))));
        }
        if confirmation.is_expired_at(Utc::now()) {
            return Err(AppError::Core(CoreError::Expired(format!(
                "Confirmation {confirmation_id} expired at {}",
                confirmation.expires_at.format("%Y-%m-%d %H:%M UTC")
            ))));
        }

        let employee = EmployeeRepo::find_by_id(&self.pool, confirmation.employee_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Employee",
                id: confirmation.employee_id,
            }))?;

        let protocol_type = confirmation.protocol_type()?;
        let outcome = self
            .send_link(&confirmation, protocol_type, &employee.full_name(), &employee.email)
            .await?;

        tracing::info!(confirmation_id, sent = outcome.sent, "Confirmation email resent");
        Ok(ConfirmationSummary::new(&confirmation, protocol_type, outcome))
    }

    async fn mint_and_send(
        &self,
        holder: &TransactionDetail,
        transactions: &[TransactionDetail],
    ) -> AppResult<ConfirmationSummary> {
        let items = transactions
            .iter()
            .map(snapshot_item)
            .collect::<Result<Vec<_>, CoreError>>()?;
        let transaction_ids = transactions.iter().map(|t| t.transaction.id).collect();
        let protocol_type = ProtocolType::for_issue(transactions.len());

        let confirmation = self
            .confirmations
            .issue_confirmation(
                holder.transaction.employee_id,
                protocol_type,
                items,
                transaction_ids,
            )
            .await?;

        let outcome = self
            .send_link(
                &confirmation,
                protocol_type,
                &holder.employee_name(),
                &holder.employee_email,
            )
            .await?;

        Ok(ConfirmationSummary::new(&confirmation, protocol_type, outcome))
    }

    async fn send_link(
        &self,
        confirmation: &Confirmation,
        protocol_type: ProtocolType,
        employee_name: &str,
        employee_email: &str,
    ) -> AppResult<DeliveryOutcome> {
        let snapshot = confirmation.snapshot()?;
        let link = confirmation_link(&self.public_base_url, &confirmation.token);
        let message = ConfirmationEmail {
            employee_name,
            protocol_type,
            items: &snapshot.items,
            link: &link,
            expires_at: confirmation.expires_at,
        }
        .render();

        let outcome = self.dispatcher.send(employee_email, &message).await;
        self.confirmations
            .record_email_outcome(confirmation.id, &outcome)
            .await;
        Ok(outcome)
    }
}

/// Snapshot line for one issued transaction.
fn snapshot_item(detail: &TransactionDetail) -> Result<SnapshotItem, CoreError> {
    Ok(SnapshotItem {
        name: detail.clothing_type_name.clone(),
        size: detail.item_size.clone(),
        category: detail.item_category.parse()?,
        image_url: detail.clothing_type_image_url.clone(),
        quantity: 1,
    })
}
