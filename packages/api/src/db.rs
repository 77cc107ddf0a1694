// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::debug;

use curbside_identity::UserStorage;
use curbside_storage::StorageResult;
use curbside_trucks::TruckStorage;
use curbside_vendors::VendorStorage;
use curbside_workflow::{WorkflowEngine, WorkflowStorage};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub vendor_storage: Arc<VendorStorage>,
    pub truck_storage: Arc<TruckStorage>,
    pub workflow_storage: Arc<WorkflowStorage>,
    pub engine: Arc<WorkflowEngine>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_storage: Arc::new(UserStorage::new(pool.clone())),
            vendor_storage: Arc::new(VendorStorage::new(pool.clone())),
            truck_storage: Arc::new(TruckStorage::new(pool.clone())),
            workflow_storage: Arc::new(WorkflowStorage::new(pool.clone())),
            engine: Arc::new(WorkflowEngine::new(pool.clone())),
            pool,
        }
    }

    /// Initialize database state with default configuration
    pub async fn init() -> StorageResult<Self> {
        Self::init_with_path(None).await
    }

    /// Initialize database state with optional custom database path
    pub async fn init_with_path(database_path: Option<PathBuf>) -> StorageResult<Self> {
        let database_path = database_path.unwrap_or_else(curbside_core::database_file);

        debug!("Connecting to database: {}", database_path.display());
        let pool = curbside_storage::connect(&database_path).await?;

        Ok(Self::new(pool))
    }
}
