use async_trait::async_trait;
use elector_core::{ElectorError, ElectorResult};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::{LeaderRecord, LeaseStore, VersionedRecord};

#[derive(Debug, Clone)]
struct StoredObject {
    record: Option<LeaderRecord>,
    version: u64,
}

/// In-memory lease store.
///
/// Behaves like a single control-plane object with a monotonically
/// increasing resource version. Clones share the same object, so several
/// elections pointed at clones of one store compete for the same lease.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeaseStore {
    object: Arc<RwLock<Option<StoredObject>>>,
}

impl InMemoryLeaseStore {
    /// Create an empty store; the election object does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose object already holds `record`.
    pub fn with_record(record: LeaderRecord) -> Self {
        let store = Self::new();
        store.put(record);
        store
    }

    /// Current record, if any.
    pub fn record(&self) -> Option<LeaderRecord> {
        self.object.read().as_ref().and_then(|o| o.record.clone())
    }

    /// Current resource version; 0 when the object does not exist.
    pub fn version(&self) -> u64 {
        self.object.read().as_ref().map_or(0, |o| o.version)
    }

    /// Unconditional write, as another participant would do it.
    pub fn put(&self, record: LeaderRecord) {
        let mut object = self.object.write();
        let version = object.as_ref().map_or(0, |o| o.version) + 1;
        *object = Some(StoredObject {
            record: Some(record),
            version,
        });
    }
}

#[async_trait]
impl LeaseStore for InMemoryLeaseStore {
    fn describe(&self) -> String {
        "memory/lease".to_string()
    }

    async fn get(&self) -> ElectorResult<Option<VersionedRecord>> {
        let object = self.object.read();
        Ok(object.as_ref().map(|o| VersionedRecord {
            record: o.record.clone(),
            version: o.version.to_string(),
        }))
    }

    async fn create(&self, record: &LeaderRecord) -> ElectorResult<()> {
        let mut object = self.object.write();
        if object.is_some() {
            return Err(ElectorError::conflict(self.describe()));
        }
        *object = Some(StoredObject {
            record: Some(record.clone()),
            version: 1,
        });
        Ok(())
    }

    async fn update(&self, record: &LeaderRecord, version: &str) -> ElectorResult<()> {
        let mut object = self.object.write();
        let stored = object
            .as_mut()
            .ok_or_else(|| ElectorError::control_plane("memory/lease not found"))?;

        if stored.version.to_string() != version {
            return Err(ElectorError::conflict(self.describe()));
        }

        stored.record = Some(record.clone());
        stored.version += 1;
        Ok(())
    }
}
