//! Test doubles for kube-elector.
//!
//! - [`RecordingLabeler`]: a [`WorkloadLabeler`](elector_core::WorkloadLabeler)
//!   that records patches instead of sending them
//! - [`FailingLeaseStore`]: an in-memory lease store whose control plane can
//!   be switched off
//! - [`wait_until`]: poll a condition with a deadline

pub mod labeler;
pub mod store;

pub use labeler::{AppliedPatch, RecordingLabeler};
pub use store::FailingLeaseStore;

use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Poll `condition` until it holds or `timeout` elapses. Returns whether it held.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(POLL_INTERVAL).await;
    }
}
