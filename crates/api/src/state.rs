use std::sync::Arc;

use workwear_events::{Mailer, NotificationDispatcher};

use crate::config::ServerConfig;
use crate::lifecycle::{ConfirmationEngine, InventoryCatalog, IssuanceOrchestrator, IssueWorkflow};
use crate::protocols::storage::ProtocolStore;
use crate::protocols::text::TextProtocolRenderer;
use crate::protocols::ProtocolService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: workwear_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Issue and return orchestration.
    pub issuance: Arc<IssuanceOrchestrator>,
    /// Item catalog edits: create, update, retire, mark lost, delete.
    pub catalog: Arc<InventoryCatalog>,
    /// Confirmation token engine.
    pub confirmations: Arc<ConfirmationEngine>,
    /// Post-issue confirmation and email workflow.
    pub workflow: Arc<IssueWorkflow>,
    /// Protocol document rendering and caching.
    pub protocols: Arc<ProtocolService>,
}

impl AppState {
    /// Wire every service against one pool and one outbound mailer.
    pub fn new(pool: workwear_db::DbPool, config: ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let confirmations = Arc::new(ConfirmationEngine::new(pool.clone()));
        let dispatcher = NotificationDispatcher::new(mailer, config.email_mode.clone());
        let workflow = Arc::new(IssueWorkflow::new(
            pool.clone(),
            Arc::clone(&confirmations),
            dispatcher,
            config.public_base_url.clone(),
        ));
        let protocols = Arc::new(ProtocolService::new(
            pool.clone(),
            Arc::new(TextProtocolRenderer),
            ProtocolStore::new(config.protocols.storage_dir.clone()),
            Arc::clone(&confirmations),
        ));

        Self {
            issuance: Arc::new(IssuanceOrchestrator::new(pool.clone())),
            catalog: Arc::new(InventoryCatalog::new(pool.clone())),
            confirmations,
            workflow,
            protocols,
            config: Arc::new(config),
            pool,
        }
    }
}
