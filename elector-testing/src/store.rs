use async_trait::async_trait;
use elector_core::{ElectorError, ElectorResult};
use elector_lease::{InMemoryLeaseStore, LeaderRecord, LeaseStore, VersionedRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An [`InMemoryLeaseStore`] in front of a control plane that can go away.
///
/// While unavailable every call fails with a control-plane error and the
/// stored object is left untouched.
#[derive(Debug, Clone, Default)]
pub struct FailingLeaseStore {
    inner: InMemoryLeaseStore,
    unavailable: Arc<AtomicBool>,
}

impl FailingLeaseStore {
    pub fn new(inner: InMemoryLeaseStore) -> Self {
        Self {
            inner,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryLeaseStore {
        &self.inner
    }

    fn check(&self) -> ElectorResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ElectorError::control_plane("control plane unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LeaseStore for FailingLeaseStore {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    async fn get(&self) -> ElectorResult<Option<VersionedRecord>> {
        self.check()?;
        self.inner.get().await
    }

    async fn create(&self, record: &LeaderRecord) -> ElectorResult<()> {
        self.check()?;
        self.inner.create(record).await
    }

    async fn update(&self, record: &LeaderRecord, version: &str) -> ElectorResult<()> {
        self.check()?;
        self.inner.update(record, version).await
    }
}
