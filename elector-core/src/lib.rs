//! # Elector Core
//!
//! Shared building blocks of the kube-elector leader-election sidecar.
//!
//! ## Components
//!
//! - **Identity**: [`ParticipantId`] and the immutable [`ElectionDescriptor`]
//! - **Observed leader**: the [`ObservedLeader`] cell written by the reactor
//!   and read by the HTTP status surface
//! - **Label patches**: [`LabelPatch`] documents applied to the local pod
//! - **Seams**: [`TransitionHandler`] (callback of an election) and
//!   [`WorkloadLabeler`] (pod patching)
//! - **Error Handling**: [`ElectorError`] and [`ElectorResult`]
//!
//! ## Example
//!
//! ```rust
//! use elector_core::{ElectionDescriptor, LabelPatch, ObservedLeader, ParticipantId};
//! use std::time::Duration;
//!
//! let me = ParticipantId::new("pod-a").unwrap();
//! let descriptor =
//!     ElectionDescriptor::new("my-election", "default", me.clone(), Duration::from_secs(10))
//!         .unwrap();
//!
//! let leader = ObservedLeader::new();
//! let new_leader = "pod-a";
//! let patch = LabelPatch::for_transition(descriptor.participant().is(new_leader));
//! assert!(patch.is_add());
//!
//! leader.set(new_leader);
//! assert_eq!(leader.name(), "pod-a");
//! ```

pub mod error;
pub mod labeler;
pub mod leader;
pub mod patch;
pub mod transition;
pub mod types;

pub use error::*;
pub use labeler::WorkloadLabeler;
pub use leader::{LeaderData, ObservedLeader};
pub use patch::{
    LabelPatch, PatchOperation, JSON_PATCH_CONTENT_TYPE, LEADER_LABEL_PATH, LEADER_LABEL_VALUE,
};
pub use transition::TransitionHandler;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let error = ElectorError::config("missing election");
        assert!(error.is_fatal());
        assert_eq!(error.to_string(), "Configuration error: missing election");

        let error = ElectorError::label_patch("p1", "not found");
        assert!(!error.is_fatal());
        assert_eq!(
            error.to_string(),
            "Label patch failed for pod p1: not found"
        );

        let error = ElectorError::conflict("endpoints/e1");
        assert!(error.is_conflict());
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_serialization_error_conversion() {
        let err = serde_json::from_str::<LeaderData>("not json").unwrap_err();
        let error: ElectorError = err.into();
        assert!(matches!(error, ElectorError::Serialization(_)));
    }
}
