use async_trait::async_trait;

/// Receiver of leader-change events delivered by an election.
///
/// `leader` is the identity of the new leader, or the empty string when no
/// leader is known. An election awaits each call before delivering the next
/// one, so implementations never see overlapping invocations from it.
#[async_trait]
pub trait TransitionHandler: Send + Sync {
    async fn on_transition(&self, leader: &str);
}
