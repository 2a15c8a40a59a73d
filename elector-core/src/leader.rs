//! Observed-leader state shared between the reactor and the status surface.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The most recently reported leader. An empty name means no leader is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderData {
    pub name: String,
}

impl LeaderData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for LeaderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name)
    }
}

/// Process-wide cell holding the observed leader.
///
/// Cloning the handle shares the cell. The transition reactor is the only
/// writer; readers always see a whole [`LeaderData`], never a torn one.
///
/// # Examples
///
/// ```rust
/// use elector_core::ObservedLeader;
///
/// let leader = ObservedLeader::new();
/// assert!(leader.is_empty());
///
/// let reader = leader.clone();
/// leader.set("p1");
/// assert_eq!(reader.name(), "p1");
///
/// leader.clear();
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ObservedLeader {
    inner: Arc<ArcSwap<LeaderData>>,
}

impl ObservedLeader {
    /// Creates a cell in the "no known leader" state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(LeaderData::default())),
        }
    }

    /// Returns a snapshot of the current leader.
    pub fn get(&self) -> Arc<LeaderData> {
        self.inner.load_full()
    }

    pub fn name(&self) -> String {
        self.inner.load().name.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }

    /// Publishes a new leader name.
    pub fn set(&self, name: impl Into<String>) {
        self.inner.store(Arc::new(LeaderData::new(name)));
    }

    pub fn clear(&self) {
        self.set(String::new());
    }
}

impl Default for ObservedLeader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_data_json_shape() {
        let json = serde_json::to_string(&LeaderData::new("p1")).unwrap();
        assert_eq!(json, r#"{"name":"p1"}"#);

        let json = serde_json::to_string(&LeaderData::default()).unwrap();
        assert_eq!(json, r#"{"name":""}"#);
    }

    #[test]
    fn test_leader_data_display() {
        assert_eq!(LeaderData::new("p1").to_string(), "{p1}");
        assert_eq!(LeaderData::default().to_string(), "{}");
    }

    #[test]
    fn test_snapshot_is_stable_after_write() {
        let leader = ObservedLeader::new();
        leader.set("p1");

        let snapshot = leader.get();
        leader.set("p2");

        assert_eq!(snapshot.name, "p1");
        assert_eq!(leader.name(), "p2");
    }

    #[test]
    fn test_concurrent_readers_see_whole_values() {
        let leader = ObservedLeader::new();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let leader = leader.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let name = leader.name();
                        assert!(name.is_empty() || name == "alpha" || name == "beta");
                    }
                })
            })
            .collect();

        for i in 0..1000 {
            leader.set(if i % 2 == 0 { "alpha" } else { "beta" });
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
