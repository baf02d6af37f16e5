//! In-memory implementation of EntityStore, for tests and ephemeral runs

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::{Collection, DomainResult, EntityStore};

#[derive(Default)]
pub struct MemoryEntityStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn get(&self, collection: Collection) -> DomainResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn put(&self, collection: Collection, records: Vec<Value>) -> DomainResult<()> {
        self.collections.write().await.insert(collection, records);
        Ok(())
    }
}
