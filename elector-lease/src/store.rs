use crate::LeaderRecord;
use async_trait::async_trait;
use elector_core::ElectorResult;

/// Leader record read together with the object version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    /// `None` when the object exists without a parseable leader annotation.
    pub record: Option<LeaderRecord>,
    pub version: String,
}

/// Storage of the election's leader record in the control plane.
///
/// Writes are conditional: `create` fails when the object already exists and
/// `update` fails when the object changed since `version` was read. Both
/// report the lost race as [`ElectorError::Conflict`](elector_core::ElectorError::Conflict).
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Human-readable name of the backing object, used in logs.
    fn describe(&self) -> String;

    /// Read the current record.
    ///
    /// # Returns
    /// * `Ok(Some(record))` if the election object exists
    /// * `Ok(None)` if it does not exist yet
    /// * `Err(ElectorError)` if the read failed
    async fn get(&self) -> ElectorResult<Option<VersionedRecord>>;

    /// Create the election object holding `record`.
    async fn create(&self, record: &LeaderRecord) -> ElectorResult<()>;

    /// Replace the record, provided the object is still at `version`.
    async fn update(&self, record: &LeaderRecord, version: &str) -> ElectorResult<()>;
}
