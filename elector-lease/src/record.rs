//! Leader record stored in the election object's annotation.

use chrono::{DateTime, Utc};
use elector_core::ElectorResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Annotation key holding the serialized [`LeaderRecord`].
pub const LEADER_ANNOTATION: &str = "control-plane.alpha.kubernetes.io/leader";

/// Lease held by the current leader.
///
/// A record with an empty `holder_identity` is free. A held record is
/// expired once `renew_time + lease_duration_seconds` lies in the past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderRecord {
    #[serde(default)]
    pub holder_identity: String,
    pub lease_duration_seconds: u64,
    pub acquire_time: DateTime<Utc>,
    pub renew_time: DateTime<Utc>,
    #[serde(default)]
    pub leader_transitions: u64,
}

impl LeaderRecord {
    /// A fresh record naming `holder`.
    pub fn acquire(holder: &str, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            holder_identity: holder.to_string(),
            lease_duration_seconds: lease_seconds(ttl),
            acquire_time: now,
            renew_time: now,
            leader_transitions: 0,
        }
    }

    /// The same lease, confirmed at `now`.
    pub fn renewed(&self, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            lease_duration_seconds: lease_seconds(ttl),
            renew_time: now,
            ..self.clone()
        }
    }

    /// This record taken over by `holder` after it became free or expired.
    pub fn taken_over(&self, holder: &str, ttl: Duration, now: DateTime<Utc>) -> Self {
        let leader_transitions = if self.holder_identity.is_empty() || self.holder_identity == holder
        {
            self.leader_transitions
        } else {
            self.leader_transitions + 1
        };

        Self {
            holder_identity: holder.to_string(),
            lease_duration_seconds: lease_seconds(ttl),
            acquire_time: now,
            renew_time: now,
            leader_transitions,
        }
    }

    /// This record surrendered by its holder.
    pub fn released(&self, now: DateTime<Utc>) -> Self {
        Self {
            holder_identity: String::new(),
            lease_duration_seconds: 1,
            renew_time: now,
            ..self.clone()
        }
    }

    pub fn is_held(&self) -> bool {
        !self.holder_identity.is_empty()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        let seconds = i64::try_from(self.lease_duration_seconds).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(seconds)
            .and_then(|lease| self.renew_time.checked_add_signed(lease))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() < now
    }

    pub fn to_annotation(&self) -> ElectorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_annotation(value: &str) -> ElectorResult<Self> {
        Ok(serde_json::from_str(value)?)
    }
}

/// Lease durations are whole seconds; anything shorter rounds up to one.
fn lease_seconds(ttl: Duration) -> u64 {
    let seconds = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    seconds.max(1)
}
