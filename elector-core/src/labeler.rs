use crate::{ElectorResult, LabelPatch};
use async_trait::async_trait;

/// Applies label patches to the workload record of a participant.
///
/// Implementations send `patch` as-is; a failure is reported to the caller,
/// which decides whether it matters. Removing a label that is not present is
/// allowed to fail.
#[async_trait]
pub trait WorkloadLabeler: Send + Sync {
    /// Patch the pod named `pod`.
    ///
    /// # Returns
    /// * `Ok(())` if the control plane accepted the patch
    /// * `Err(ElectorError)` if the request failed or was rejected
    async fn apply(&self, pod: &str, patch: &LabelPatch) -> ElectorResult<()>;
}
