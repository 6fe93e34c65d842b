//! Plain-text protocol backend.

use std::fmt::Write;

use async_trait::async_trait;
use chrono::Utc;
use workwear_core::error::CoreError;
use workwear_db::models::transaction::TransactionDetail;

use super::{ProtocolDocument, ProtocolRenderer};
use crate::error::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Renders protocols as UTF-8 text with signature lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextProtocolRenderer;

#[async_trait]
impl ProtocolRenderer for TextProtocolRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    async fn render(
        &self,
        document: ProtocolDocument,
        rows: &[TransactionDetail],
    ) -> AppResult<Vec<u8>> {
        let first = rows.first().ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "A protocol needs at least one transaction".into(),
            ))
        })?;
        render_text(document, first, rows)
            .map(String::into_bytes)
            .map_err(|e| AppError::InternalError(format!("Failed to render protocol: {e}")))
    }
}

fn render_text(
    document: ProtocolDocument,
    holder: &TransactionDetail,
    rows: &[TransactionDetail],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let title = document.title();
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.len()))?;
    writeln!(out)?;
    writeln!(
        out,
        "Employee:  {} <{}>",
        holder.employee_name(),
        holder.employee_email
    )?;
    writeln!(out, "Generated: {}", Utc::now().format(DATE_FORMAT))?;
    writeln!(out)?;

    for (n, row) in rows.iter().enumerate() {
        let t = &row.transaction;
        writeln!(
            out,
            "{:>3}. {}  {}  size {}  {}",
            n + 1,
            row.item_internal_id,
            row.clothing_type_name,
            row.item_size,
            row.item_category
        )?;
        writeln!(
            out,
            "     Issued {} by {} in condition {}",
            t.issued_at.format(DATE_FORMAT),
            row.issued_by_name,
            t.condition_on_issue
        )?;
        if document.is_return() {
            if let Some(returned_at) = t.returned_at {
                writeln!(
                    out,
                    "     Returned {} by {} in condition {}",
                    returned_at.format(DATE_FORMAT),
                    row.returned_by_name.as_deref().unwrap_or("-"),
                    t.condition_on_return.as_deref().unwrap_or("-")
                )?;
            }
        }
        if let Some(notes) = t.notes.as_deref() {
            for line in notes.lines() {
                writeln!(out, "     {line}")?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Items: {}", rows.len())?;
    writeln!(out)?;
    writeln!(out, "Employee signature:  ______________________")?;
    writeln!(out, "Warehouse signature: ______________________")?;
    Ok(out)
}
