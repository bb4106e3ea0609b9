//! Application state shared by all handlers

use std::sync::Arc;

use crate::core::Config;
use crate::db::{self, MemoryStore, PgStore, Store};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Connect to PostgreSQL, run migrations and wrap the pool
    pub async fn connect(config: Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config).await?;
        Ok(Self::new(Arc::new(PgStore::new(pool)), config))
    }

    /// State backed by the in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Config::default())
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
