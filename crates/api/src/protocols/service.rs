//! Protocol retrieval with the confirmation gate and the document cache.

use std::sync::Arc;

use sqlx::PgPool;
use workwear_core::confirmation::ProtocolType;
use workwear_core::error::CoreError;
use workwear_core::ledger;
use workwear_core::types::DbId;
use workwear_db::models::confirmation::Confirmation;
use workwear_db::models::transaction::TransactionDetail;
use workwear_db::repositories::{EmployeeRepo, TransactionRepo};

use super::storage::ProtocolStore;
use super::{ProtocolDocument, ProtocolKind, ProtocolRenderer, RenderedProtocol};
use crate::error::{AppError, AppResult};
use crate::lifecycle::ConfirmationEngine;

pub struct ProtocolService {
    pool: PgPool,
    renderer: Arc<dyn ProtocolRenderer>,
    store: ProtocolStore,
    confirmations: Arc<ConfirmationEngine>,
}

impl ProtocolService {
    pub fn new(
        pool: PgPool,
        renderer: Arc<dyn ProtocolRenderer>,
        store: ProtocolStore,
        confirmations: Arc<ConfirmationEngine>,
    ) -> Self {
        Self {
            pool,
            renderer,
            store,
            confirmations,
        }
    }

    /// Protocol for one transaction.
    ///
    /// An issue protocol requires a confirmed confirmation from the holder
    /// covering the transaction. A return protocol requires the transaction to
    /// be returned and has no confirmation gate.
    pub async fn transaction_protocol(
        &self,
        transaction_id: DbId,
        kind: ProtocolKind,
    ) -> AppResult<RenderedProtocol> {
        let detail = TransactionRepo::find_detail_by_id(&self.pool, transaction_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Transaction",
                id: transaction_id,
            }))?;

        let document = match kind {
            ProtocolKind::Issue => {
                self.confirmations.require_issue_confirmation(&detail).await?;
                ProtocolDocument::Issue
            }
            ProtocolKind::Return => {
                if !detail.transaction.is_returned() {
                    return Err(AppError::Core(CoreError::InvalidState(format!(
                        "Item {} has not been returned yet",
                        detail.item_internal_id
                    ))));
                }
                ProtocolDocument::Return
            }
        };

        let file_name = format!("{}-{transaction_id}", document.file_stem());
        self.render(document, &[detail], &file_name).await
    }

    /// One return protocol over several returned transactions.
    pub async fn bulk_return_protocol(&self, transaction_ids: &[DbId]) -> AppResult<RenderedProtocol> {
        ledger::validate_bulk_ids(transaction_ids, "transaction").map_err(CoreError::Validation)?;

        let rows = TransactionRepo::find_details_by_ids(&self.pool, transaction_ids).await?;
        if rows.len() != transaction_ids.len() {
            return Err(AppError::Core(CoreError::NotFoundMany {
                entity: "Transaction",
                expected: transaction_ids.len(),
                found: rows.len(),
            }));
        }

        let open: Vec<&str> = rows
            .iter()
            .filter(|r| !r.transaction.is_returned())
            .map(|r| r.item_internal_id.as_str())
            .collect();
        if !open.is_empty() {
            return Err(AppError::Core(CoreError::InvalidState(format!(
                "The following items have not been returned yet: {}",
                open.join(", ")
            ))));
        }

        let file_name = format!(
            "{}-{}",
            ProtocolDocument::BulkReturn.file_stem(),
            transaction_ids[0]
        );
        self.render(ProtocolDocument::BulkReturn, &rows, &file_name).await
    }

    /// Protocol of a confirmation, served from the cache when the stored
    /// file still exists and regenerated otherwise.
    pub async fn confirmation_protocol(&self, confirmation_id: DbId) -> AppResult<RenderedProtocol> {
        let confirmation = self.confirmations.find(confirmation_id).await?;

        if !confirmation.confirmed {
            let employee = EmployeeRepo::find_by_id(&self.pool, confirmation.employee_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Employee",
                    id: confirmation.employee_id,
                }))?;
            return Err(AppError::Core(CoreError::ConfirmationRequired {
                employee: employee.display_with_email(),
            }));
        }

        let file_name = confirmation_file_stem(&confirmation);
        if let Some(path) = confirmation.protocol_file_path.as_deref() {
            match self.store.load(path).await {
                Ok(Some(bytes)) => {
                    return Ok(RenderedProtocol {
                        bytes,
                        content_type: self.renderer.content_type(),
                        file_name: format!("{file_name}.{}", self.renderer.extension()),
                    });
                }
                Ok(None) => {
                    tracing::warn!(confirmation_id, path, "Cached protocol missing, regenerating");
                }
                Err(e) => {
                    tracing::warn!(confirmation_id, path, error = %e, "Cached protocol unreadable, regenerating");
                }
            }
        }

        let rendered = self.render_confirmation(&confirmation).await?;
        self.cache(&confirmation, &rendered).await;
        Ok(rendered)
    }

    /// Render and store the protocol of a freshly confirmed confirmation.
    /// Failures are logged only.
    pub async fn cache_after_confirm(&self, confirmation: &Confirmation) {
        match self.render_confirmation(confirmation).await {
            Ok(rendered) => self.cache(confirmation, &rendered).await,
            Err(e) => {
                tracing::warn!(
                    confirmation_id = confirmation.id,
                    error = %e,
                    "Failed to render protocol after confirmation",
                );
            }
        }
    }

    async fn render_confirmation(&self, confirmation: &Confirmation) -> AppResult<RenderedProtocol> {
        let snapshot = confirmation.snapshot()?;
        let rows = TransactionRepo::find_details_by_ids(&self.pool, &snapshot.transaction_ids).await?;
        let document = match confirmation.protocol_type()? {
            ProtocolType::Single => ProtocolDocument::Issue,
            ProtocolType::BulkIssue => ProtocolDocument::BulkIssue,
            ProtocolType::BulkReturn => ProtocolDocument::BulkReturn,
        };
        self.render(document, &rows, &confirmation_file_stem(confirmation))
            .await
    }

    async fn render(
        &self,
        document: ProtocolDocument,
        rows: &[TransactionDetail],
        file_stem: &str,
    ) -> AppResult<RenderedProtocol> {
        let bytes = self.renderer.render(document, rows).await?;
        Ok(RenderedProtocol {
            bytes,
            content_type: self.renderer.content_type(),
            file_name: format!("{file_stem}.{}", self.renderer.extension()),
        })
    }

    async fn cache(&self, confirmation: &Confirmation, rendered: &RenderedProtocol) {
        let path = match self.store.save(&rendered.file_name, &rendered.bytes).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(confirmation_id = confirmation.id, error = %e, "Failed to store protocol");
                return;
            }
        };
        if let Err(e) = self
            .confirmations
            .store_protocol_path(confirmation.id, &path)
            .await
        {
            tracing::error!(confirmation_id = confirmation.id, error = %e, "Failed to record protocol path");
        }
    }
}

fn confirmation_file_stem(confirmation: &Confirmation) -> String {
    format!("confirmation-{}", confirmation.id)
}
