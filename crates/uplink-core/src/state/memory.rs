// # Memory Ownership Store
//
// In-memory implementation of OwnershipStore. State is lost on exit, so a
// run after a restart behaves as if this agent never created anything —
// only useful for tests and dry runs, never for production deletes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::dns_query::RecordType;
use crate::traits::ownership_store::{OwnershipRecord, OwnershipStore, ownership_key};

/// In-memory ownership store
#[derive(Debug, Clone, Default)]
pub struct MemoryOwnershipStore {
    inner: Arc<RwLock<HashMap<String, OwnershipRecord>>>,
}

impl MemoryOwnershipStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ownership entries
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl OwnershipStore for MemoryOwnershipStore {
    async fn get(
        &self,
        record_type: RecordType,
        domain: &str,
    ) -> Result<Option<OwnershipRecord>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(&ownership_key(record_type, domain)).cloned())
    }

    async fn put(
        &self,
        record_type: RecordType,
        domain: &str,
        record: &OwnershipRecord,
    ) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(ownership_key(record_type, domain), record.clone());
        Ok(())
    }

    async fn remove(&self, record_type: RecordType, domain: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(&ownership_key(record_type, domain));
        Ok(())
    }
}
