//! Protocol documents: issue and return records rendered from ledger rows.
//!
//! Rendering sits behind [`ProtocolRenderer`] so the document format is a
//! deployment choice. [`text::TextProtocolRenderer`] is the built-in backend.

pub mod service;
pub mod storage;
pub mod text;

pub use service::ProtocolService;

use async_trait::async_trait;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use workwear_db::models::transaction::TransactionDetail;

use crate::error::AppResult;

/// Protocol kind requested for a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    Issue,
    Return,
}

/// Which document to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolDocument {
    Issue,
    BulkIssue,
    Return,
    BulkReturn,
}

impl ProtocolDocument {
    pub fn title(self) -> &'static str {
        match self {
            Self::Issue => "Workwear Issue Protocol",
            Self::BulkIssue => "Workwear Bulk Issue Protocol",
            Self::Return => "Workwear Return Protocol",
            Self::BulkReturn => "Workwear Bulk Return Protocol",
        }
    }

    /// Return documents describe closed transactions.
    pub fn is_return(self) -> bool {
        matches!(self, Self::Return | Self::BulkReturn)
    }

    /// Stem used in download file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Issue => "issue-protocol",
            Self::BulkIssue => "bulk-issue-protocol",
            Self::Return => "return-protocol",
            Self::BulkReturn => "bulk-return-protocol",
        }
    }
}

/// A rendered document ready to be served or stored.
#[derive(Debug, Clone)]
pub struct RenderedProtocol {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

impl IntoResponse for RenderedProtocol {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Document backend.
#[async_trait]
pub trait ProtocolRenderer: Send + Sync {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Render `document` over `rows`, in the order given.
    async fn render(
        &self,
        document: ProtocolDocument,
        rows: &[TransactionDetail],
    ) -> AppResult<Vec<u8>>;
}
