//! Item administration: catalog entry, edits, retirement, loss, deletion.

use sqlx::PgPool;
use workwear_core::audit::{AuditAction, AuditChange, ItemField, TransactionField};
use workwear_core::error::CoreError;
use workwear_core::inventory::{ItemAction, ItemCategory, ItemStatus};
use workwear_core::ledger;
use workwear_core::types::DbId;
use workwear_db::models::audit::{entity_types, CreateAuditLog};
use workwear_db::models::clothing_item::{
    ClothingItem, CreateClothingItem, MarkLostRequest, RetireItemRequest, UpdateClothingItem,
};
use workwear_db::repositories::{AuditRepo, ClothingItemRepo, ClothingTypeRepo, TransactionRepo};

use super::{lock_item, require_employee, with_item_changes};
use crate::error::{AppError, AppResult};

/// Administrative operations on clothing items. Possession changes live in
/// [`IssuanceOrchestrator`](super::IssuanceOrchestrator).
pub struct InventoryCatalog {
    pool: PgPool,
}

impl InventoryCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add an AVAILABLE item with a generated internal id and QR token.
    pub async fn create_item(
        &self,
        input: &CreateClothingItem,
        actor_id: DbId,
    ) -> AppResult<ClothingItem> {
        let size = input.size.trim();
        if size.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Size must not be empty".into(),
            )));
        }
        require_owner_if_personalized(input.category, input.personalized_for_id)?;

        let mut tx = self.pool.begin().await?;

        ClothingTypeRepo::find_by_id(&mut *tx, input.clothing_type_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "ClothingType",
                id: input.clothing_type_id,
            }))?;
        if let Some(employee_id) = input.personalized_for_id {
            require_employee(&mut *tx, employee_id).await?;
        }

        let item = ClothingItemRepo::create(
            &mut *tx,
            &CreateClothingItem {
                size: size.to_string(),
                ..input.clone()
            },
        )
        .await?;

        AuditRepo::append(
            &mut *tx,
            &CreateAuditLog::new(entity_types::CLOTHING_ITEM, item.id, AuditAction::Create)
                .actor(actor_id)
                .change(AuditChange::item(
                    ItemField::Status,
                    None,
                    Some(&item.status),
                )),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(item_id = item.id, internal_id = %item.internal_id, "Item created");
        Ok(item)
    }

    /// Edit descriptive fields. Status and holder are untouched.
    pub async fn update_item(
        &self,
        id: DbId,
        input: &UpdateClothingItem,
        actor_id: DbId,
    ) -> AppResult<ClothingItem> {
        if input.size.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(AppError::Core(CoreError::Validation(
                "Size must not be empty".into(),
            )));
        }

        let mut tx = self.pool.begin().await?;

        let before = lock_item(&mut *tx, id).await?;
        let category = match input.category {
            Some(category) => category,
            None => before.category.parse::<ItemCategory>()?,
        };
        require_owner_if_personalized(
            category,
            input.personalized_for_id.or(before.personalized_for_id),
        )?;
        if let Some(type_id) = input.clothing_type_id {
            ClothingTypeRepo::find_by_id(&mut *tx, type_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "ClothingType",
                    id: type_id,
                }))?;
        }
        if let Some(employee_id) = input.personalized_for_id {
            require_employee(&mut *tx, employee_id).await?;
        }

        let after = ClothingItemRepo::update(&mut *tx, id, input)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "ClothingItem",
                id,
            }))?;

        let entry = with_item_changes(
            CreateAuditLog::new(entity_types::CLOTHING_ITEM, id, AuditAction::Update)
                .actor(actor_id),
            &before,
            &after,
        );
        if !entry.changes.is_empty() {
            AuditRepo::append(&mut *tx, &entry).await?;
        }

        tx.commit().await?;
        Ok(after)
    }

    /// Take an AVAILABLE item out of circulation for good.
    pub async fn retire_item(
        &self,
        id: DbId,
        input: &RetireItemRequest,
        actor_id: DbId,
    ) -> AppResult<ClothingItem> {
        let mut tx = self.pool.begin().await?;

        let before = lock_item(&mut *tx, id).await?;
        let status = before.status()?;
        if status.apply(ItemAction::Retire).is_none() {
            return Err(AppError::Core(CoreError::InvalidState(format!(
                "Item {} cannot be retired (current status: {status})",
                before.internal_id
            ))));
        }

        let reason = input.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let after = ClothingItemRepo::retire(&mut *tx, id, actor_id, reason).await?;

        AuditRepo::append(
            &mut *tx,
            &with_item_changes(
                CreateAuditLog::new(entity_types::CLOTHING_ITEM, id, AuditAction::Retire)
                    .actor(actor_id),
                &before,
                &after,
            ),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(item_id = id, internal_id = %after.internal_id, "Item retired");
        Ok(after)
    }

    /// Administrative override: the item is gone.
    ///
    /// The last holder stays on the item and an open transaction stays open
    /// with the loss noted, so the loss is attributable.
    pub async fn mark_item_lost(
        &self,
        id: DbId,
        input: &MarkLostRequest,
        actor_id: DbId,
    ) -> AppResult<ClothingItem> {
        let mut tx = self.pool.begin().await?;

        let open = match TransactionRepo::find_open_for_item(&mut *tx, id).await? {
            Some(found) => TransactionRepo::lock_by_ids(&mut *tx, &[found.id])
                .await?
                .into_iter()
                .find(|t| !t.is_returned()),
            None => None,
        };

        let before = lock_item(&mut *tx, id).await?;
        let status = before.status()?;
        if status.apply(ItemAction::MarkLost).is_none() {
            return Err(AppError::Core(CoreError::InvalidState(format!(
                "Item {} cannot be marked lost (current status: {status})",
                before.internal_id
            ))));
        }

        let after = ClothingItemRepo::set_possession(
            &mut *tx,
            id,
            ItemStatus::Lost,
            before.current_holder_id,
            None,
        )
        .await?;

        if let Some(transaction) = open {
            let notes = ledger::lost_notes(transaction.notes.as_deref(), input.notes.as_deref());
            if notes != transaction.notes {
                let updated =
                    TransactionRepo::update_notes(&mut *tx, transaction.id, notes.as_deref())
                        .await?;
                AuditRepo::append(
                    &mut *tx,
                    &CreateAuditLog::new(
                        entity_types::TRANSACTION,
                        transaction.id,
                        AuditAction::MarkLost,
                    )
                    .actor(actor_id)
                    .change(AuditChange::transaction(
                        TransactionField::Notes,
                        transaction.notes.as_deref(),
                        updated.notes.as_deref(),
                    )),
                )
                .await?;
            }
        }

        AuditRepo::append(
            &mut *tx,
            &with_item_changes(
                CreateAuditLog::new(entity_types::CLOTHING_ITEM, id, AuditAction::MarkLost)
                    .actor(actor_id),
                &before,
                &after,
            ),
        )
        .await?;

        tx.commit().await?;

        tracing::warn!(item_id = id, internal_id = %after.internal_id, "Item marked lost");
        Ok(after)
    }

    /// Permanently delete a RETIRED item that no transaction references.
    pub async fn delete_item(&self, id: DbId, actor_id: DbId) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let item = lock_item(&mut *tx, id).await?;
        if item.status()? != ItemStatus::Retired {
            return Err(AppError::Core(CoreError::InvalidState(format!(
                "Only retired items can be deleted; {} is {}",
                item.internal_id, item.status
            ))));
        }

        let references = ClothingItemRepo::count_transactions(&mut *tx, id).await?;
        if references > 0 {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Item {} is referenced by {references} transaction(s)",
                item.internal_id
            ))));
        }

        ClothingItemRepo::delete(&mut *tx, id).await?;
        AuditRepo::append(
            &mut *tx,
            &CreateAuditLog::new(entity_types::CLOTHING_ITEM, id, AuditAction::Delete)
                .actor(actor_id)
                .change(AuditChange::item(
                    ItemField::Status,
                    Some(&item.status),
                    None,
                )),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(item_id = id, internal_id = %item.internal_id, "Item deleted");
        Ok(())
    }
}

/// A PERSONALIZED item always names the employee it belongs to.
fn require_owner_if_personalized(category: ItemCategory, owner: Option<DbId>) -> AppResult<()> {
    if category == ItemCategory::Personalized && owner.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Personalized items require personalized_for_id".into(),
        )));
    }
    Ok(())
}
