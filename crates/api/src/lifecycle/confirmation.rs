//! Confirmation token engine.
//!
//! Mints confirmations over a set of committed transactions, accepts them by
//! token, and answers the question the protocol endpoints ask: has the holder
//! confirmed this issuance?

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use workwear_core::audit::{AuditAction, AuditChange, ConfirmationField};
use workwear_core::confirmation::{
    self, evaluate_confirm, ConfirmDecision, ItemsSnapshot, ProtocolType, SnapshotItem,
};
use workwear_core::error::CoreError;
use workwear_core::types::DbId;
use workwear_db::models::audit::{entity_types, CreateAuditLog};
use workwear_db::models::confirmation::{Confirmation, ConfirmationFilter, CreateConfirmation};
use workwear_db::models::transaction::TransactionDetail;
use workwear_db::repositories::{AuditRepo, ConfirmationRepo};
use workwear_events::DeliveryOutcome;

use crate::error::{AppError, AppResult};

/// Result of [`ConfirmationEngine::confirm`].
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmOutcome {
    pub confirmation: Confirmation,
    /// `false` when the token had already been confirmed earlier.
    pub newly_confirmed: bool,
}

pub struct ConfirmationEngine {
    pool: PgPool,
}

impl ConfirmationEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mint an unconfirmed confirmation valid for seven days.
    ///
    /// `items` is stored verbatim next to `transaction_ids`; it is never
    /// re-derived from live item data.
    pub async fn issue_confirmation(
        &self,
        employee_id: DbId,
        protocol_type: ProtocolType,
        items: Vec<SnapshotItem>,
        transaction_ids: Vec<DbId>,
    ) -> AppResult<Confirmation> {
        if transaction_ids.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "A confirmation must cover at least one transaction".into(),
            )));
        }

        let snapshot = ItemsSnapshot::new(items, transaction_ids);
        let created = ConfirmationRepo::create(
            &self.pool,
            &CreateConfirmation {
                token: confirmation::generate_token(),
                employee_id,
                protocol_type,
                items_json: snapshot.to_value()?,
                expires_at: confirmation::expires_at(Utc::now()),
            },
        )
        .await?;

        tracing::info!(
            confirmation_id = created.id,
            employee_id,
            protocol_type = %protocol_type,
            transactions = snapshot.transaction_ids.len(),
            "Confirmation issued",
        );
        Ok(created)
    }

    /// Record an email delivery attempt. Storage errors are logged, never returned.
    pub async fn record_email_outcome(&self, confirmation_id: DbId, outcome: &DeliveryOutcome) {
        if let Err(e) = ConfirmationRepo::record_email_outcome(
            &self.pool,
            confirmation_id,
            outcome.sent,
            outcome.error.as_deref(),
        )
        .await
        {
            tracing::error!(confirmation_id, error = %e, "Failed to record email outcome");
        }
    }

    /// Accept a confirmation by token.
    ///
    /// Confirming twice succeeds both times; only the first call changes state.
    pub async fn confirm(&self, token: &str) -> AppResult<ConfirmOutcome> {
        if !confirmation::is_well_formed_token(token) {
            return Err(AppError::Core(CoreError::UnknownToken));
        }

        let mut tx = self.pool.begin().await?;

        let current = ConfirmationRepo::lock_by_token(&mut *tx, token)
            .await?
            .ok_or(AppError::Core(CoreError::UnknownToken))?;

        if evaluate_confirm(current.confirmed, current.expires_at, Utc::now())?
            == ConfirmDecision::AlreadyConfirmed
        {
            return Ok(ConfirmOutcome {
                confirmation: current,
                newly_confirmed: false,
            });
        }

        let confirmed = ConfirmationRepo::mark_confirmed(&mut *tx, current.id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Internal(format!(
                    "Confirmation {} changed while locked",
                    current.id
                )))
            })?;

        AuditRepo::append(
            &mut *tx,
            &CreateAuditLog::new(entity_types::CONFIRMATION, confirmed.id, AuditAction::Confirm)
                .actor(confirmed.employee_id)
                .change(AuditChange::confirmation(
                    ConfirmationField::Confirmed,
                    Some(false),
                    Some(true),
                )),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            confirmation_id = confirmed.id,
            employee_id = confirmed.employee_id,
            "Confirmation accepted",
        );

        Ok(ConfirmOutcome {
            confirmation: confirmed,
            newly_confirmed: true,
        })
    }

    /// Remember where a rendered protocol for this confirmation was stored.
    pub async fn store_protocol_path(&self, confirmation_id: DbId, path: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let existing = ConfirmationRepo::find_by_id(&mut *tx, confirmation_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Confirmation",
                id: confirmation_id,
            }))?;
        ConfirmationRepo::set_protocol_file_path(&mut *tx, confirmation_id, path).await?;

        let entry = CreateAuditLog::new(
            entity_types::CONFIRMATION,
            confirmation_id,
            AuditAction::Update,
        )
        .change(AuditChange::confirmation(
            ConfirmationField::ProtocolFilePath,
            existing.protocol_file_path.as_deref(),
            Some(path),
        ));
        if !entry.changes.is_empty() {
            AuditRepo::append(&mut *tx, &entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The confirmed confirmation that unlocks the issue protocol of a
    /// transaction, or `ConfirmationRequired` naming the holder.
    ///
    /// The candidate found by the containment query is re-checked against
    /// its decoded snapshot with [`Confirmation::belongs_to`].
    pub async fn require_issue_confirmation(
        &self,
        transaction: &TransactionDetail,
    ) -> AppResult<Confirmation> {
        let transaction_id = transaction.transaction.id;
        ConfirmationRepo::find_confirmed_covering(
            &self.pool,
            transaction.transaction.employee_id,
            transaction_id,
        )
        .await?
        .filter(|c| c.belongs_to(transaction_id))
        .ok_or_else(|| {
            AppError::Core(CoreError::ConfirmationRequired {
                employee: format!(
                    "{} <{}>",
                    transaction.employee_name(),
                    transaction.employee_email
                ),
            })
        })
    }

    pub async fn find(&self, id: DbId) -> AppResult<Confirmation> {
        ConfirmationRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Confirmation",
                id,
            }))
    }

    pub async fn list(&self, filter: &ConfirmationFilter) -> AppResult<Vec<Confirmation>> {
        Ok(ConfirmationRepo::list(&self.pool, filter).await?)
    }
}
