//! # Core Types
//!
//! Identity and election descriptor types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::{ElectorError, ElectorResult};

/// Identity of this process within an election.
///
/// Compared against the reported leader identity to decide whether this
/// participant is the leader. Usually the pod name.
///
/// # Examples
///
/// ```rust
/// use elector_core::ParticipantId;
///
/// let id = ParticipantId::new("pod-a").unwrap();
/// assert!(id.is("pod-a"));
/// assert!(ParticipantId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a participant identity, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> ElectorResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ElectorError::config("--id cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `leader` names this participant.
    pub fn is(&self, leader: &str) -> bool {
        self.0 == leader
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Immutable description of the election this process takes part in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionDescriptor {
    name: String,
    namespace: String,
    participant: ParticipantId,
    ttl: Duration,
}

impl ElectionDescriptor {
    /// Creates a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ElectorError::Config`] when the election name or namespace
    /// is empty, or when `ttl` is zero.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        participant: ParticipantId,
        ttl: Duration,
    ) -> ElectorResult<Self> {
        let name = name.into();
        let namespace = namespace.into();

        if name.is_empty() {
            return Err(ElectorError::config("--election cannot be empty"));
        }
        if namespace.is_empty() {
            return Err(ElectorError::config("--election-namespace cannot be empty"));
        }
        if ttl.is_zero() {
            return Err(ElectorError::config("--ttl must be greater than zero"));
        }

        Ok(Self {
            name,
            namespace,
            participant,
            ttl,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Display for ElectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} as {} (ttl {:?})",
            self.namespace, self.name, self.participant, self.ttl
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant() -> ParticipantId {
        ParticipantId::new("p1").unwrap()
    }

    #[test]
    fn test_descriptor_accessors() {
        let descriptor =
            ElectionDescriptor::new("e1", "default", participant(), Duration::from_secs(10))
                .unwrap();

        assert_eq!(descriptor.name(), "e1");
        assert_eq!(descriptor.namespace(), "default");
        assert_eq!(descriptor.participant().as_str(), "p1");
        assert_eq!(descriptor.ttl(), Duration::from_secs(10));
    }

    #[test]
    fn test_descriptor_rejects_empty_name() {
        let result = ElectionDescriptor::new("", "default", participant(), Duration::from_secs(1));
        assert!(matches!(result, Err(ElectorError::Config { .. })));
    }

    #[test]
    fn test_descriptor_rejects_zero_ttl() {
        let result = ElectionDescriptor::new("e1", "default", participant(), Duration::ZERO);
        assert!(matches!(result, Err(ElectorError::Config { .. })));
    }

    #[test]
    fn test_participant_comparison() {
        let id = participant();
        assert!(id.is("p1"));
        assert!(!id.is("p2"));
        assert!(!id.is(""));
    }
}
