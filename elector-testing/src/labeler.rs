use async_trait::async_trait;
use elector_core::{ElectorError, ElectorResult, LabelPatch, WorkloadLabeler};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One patch as it would have been sent.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPatch {
    pub pod: String,
    pub patch: LabelPatch,
}

/// Records label patches. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingLabeler {
    applied: Arc<Mutex<Vec<AppliedPatch>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    /// While failing, patches are rejected and not recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn applied(&self) -> Vec<AppliedPatch> {
        self.applied.lock().clone()
    }

    pub fn adds(&self) -> usize {
        self.applied.lock().iter().filter(|a| a.patch.is_add()).count()
    }

    pub fn removes(&self) -> usize {
        self.applied.lock().iter().filter(|a| a.patch.is_remove()).count()
    }

    /// Whether the last patch applied to `pod` added the leader label.
    pub fn is_labelled(&self, pod: &str) -> bool {
        self.applied
            .lock()
            .iter()
            .rev()
            .find(|a| a.pod == pod)
            .is_some_and(|a| a.patch.is_add())
    }
}

#[async_trait]
impl WorkloadLabeler for RecordingLabeler {
    async fn apply(&self, pod: &str, patch: &LabelPatch) -> ElectorResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ElectorError::label_patch(pod, "injected failure"));
        }

        self.applied.lock().push(AppliedPatch {
            pod: pod.to_string(),
            patch: patch.clone(),
        });
        Ok(())
    }
}
