//! JSON-patch documents applied to the participant's pod.

use serde::{Deserialize, Serialize};

/// Path of the label that marks the current leader pod.
pub const LEADER_LABEL_PATH: &str = "/metadata/labels/leader";

/// Value the leader label carries on the leading pod.
pub const LEADER_LABEL_VALUE: &str = "yes";

/// Content type of the patch request body.
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// A single RFC 6902 operation on the leader label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: String },
    Remove { path: String },
}

impl PatchOperation {
    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }
}

/// Ordered list of patch operations, serialized as a JSON array.
///
/// # Examples
///
/// ```rust
/// use elector_core::LabelPatch;
///
/// let body = serde_json::to_string(&LabelPatch::mark_leader()).unwrap();
/// assert_eq!(
///     body,
///     r#"[{"op":"add","path":"/metadata/labels/leader","value":"yes"}]"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelPatch(Vec<PatchOperation>);

impl LabelPatch {
    /// Adds the leader label.
    pub fn mark_leader() -> Self {
        Self(vec![PatchOperation::Add {
            path: LEADER_LABEL_PATH.to_string(),
            value: LEADER_LABEL_VALUE.to_string(),
        }])
    }

    /// Removes the leader label.
    pub fn clear_leader() -> Self {
        Self(vec![PatchOperation::Remove {
            path: LEADER_LABEL_PATH.to_string(),
        }])
    }

    /// Picks the patch for a transition as seen by the participant.
    pub fn for_transition(is_self: bool) -> Self {
        if is_self {
            Self::mark_leader()
        } else {
            Self::clear_leader()
        }
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    pub fn is_add(&self) -> bool {
        self.0.iter().all(PatchOperation::is_add)
    }

    pub fn is_remove(&self) -> bool {
        self.0.iter().all(PatchOperation::is_remove)
    }

    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_wire_format() {
        let body = serde_json::to_string(&LabelPatch::clear_leader()).unwrap();
        assert_eq!(body, r#"[{"op":"remove","path":"/metadata/labels/leader"}]"#);
    }

    #[test]
    fn test_for_transition() {
        assert!(LabelPatch::for_transition(true).is_add());
        assert!(LabelPatch::for_transition(false).is_remove());
        assert_eq!(LabelPatch::for_transition(true).operations().len(), 1);
    }

    #[test]
    fn test_parse_add() {
        let patch: LabelPatch = serde_json::from_str(
            r#"[{"op":"add","path":"/metadata/labels/leader","value":"yes"}]"#,
        )
        .unwrap();
        assert_eq!(patch, LabelPatch::mark_leader());
    }

    proptest::proptest! {
        #[test]
        fn prop_only_self_gets_the_label(leader in ".{0,12}") {
            let me = crate::ParticipantId::new("self-pod").unwrap();
            let patch = LabelPatch::for_transition(me.is(&leader));
            proptest::prop_assert_eq!(patch.is_add(), leader == "self-pod");
            proptest::prop_assert_eq!(patch.operations().len(), 1);
        }
    }
}
