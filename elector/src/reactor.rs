//! Reacts to leader transitions.
//!
//! For every transition the reactor, in order:
//!
//! 1. patches the local pod, adding `leader=yes` when this participant
//!    leads and removing it otherwise,
//! 2. calls the webhook, if one is configured,
//! 3. publishes the new leader to the [`ObservedLeader`] cell.
//!
//! Failures of steps 1 and 2 are logged and never stop step 3. Transitions
//! are handled one at a time; a repeated transition is handled again.
//!
//! [`Reactor::shutdown`] cancels a transition that is still running, then
//! runs the final "no leader" transition under a deadline.

use async_trait::async_trait;
use elector_core::{LabelPatch, ObservedLeader, ParticipantId, TransitionHandler, WorkloadLabeler};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::webhook::{status_for, Webhook};

pub struct Reactor {
    participant: ParticipantId,
    labeler: Arc<dyn WorkloadLabeler>,
    webhook: Option<Webhook>,
    leader: ObservedLeader,
    /// Held for the duration of one transition.
    gate: Mutex<()>,
    /// Flipped once by `shutdown`; running and later transitions are dropped.
    closed: watch::Sender<bool>,
}

impl Reactor {
    pub fn new(
        participant: ParticipantId,
        labeler: Arc<dyn WorkloadLabeler>,
        webhook: Option<Webhook>,
    ) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            participant,
            labeler,
            webhook,
            leader: ObservedLeader::new(),
            gate: Mutex::new(()),
            closed,
        }
    }

    /// The cell this reactor publishes to.
    pub fn leader(&self) -> ObservedLeader {
        self.leader.clone()
    }

    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Handle one transition. `leader` is empty when nobody leads.
    pub async fn handle(&self, leader: &str) {
        let _gate = self.gate.lock().await;
        let mut closed = self.closed.subscribe();
        if *closed.borrow_and_update() {
            debug!("Ignoring transition to {:?} after shutdown", leader);
            return;
        }

        tokio::select! {
            _ = self.react(leader) => {}
            _ = closed.changed() => {
                debug!("Transition to {:?} cancelled by shutdown", leader);
            }
        }
    }

    /// Cancel any running transition, then remove the label and call the
    /// webhook for "no leader" within `deadline`. The cell is cleared however
    /// the side effects end. Calling this more than once has no further effect.
    pub async fn shutdown(&self, deadline: Duration) {
        if self.closed.send_replace(true) {
            return;
        }

        let _gate = self.gate.lock().await;
        if timeout(deadline, self.side_effects("")).await.is_err() {
            warn!("Final transition did not finish within {:?}", deadline);
        }

        info!("No leader for now");
        self.leader.clear();
    }

    async fn react(&self, leader: &str) {
        self.side_effects(leader).await;

        if leader.is_empty() {
            info!("No leader for now");
        } else {
            info!("{} is the leader", leader);
        }
        self.leader.set(leader);
    }

    async fn side_effects(&self, leader: &str) {
        let is_self = self.participant.is(leader);

        let patch = LabelPatch::for_transition(is_self);
        match self.labeler.apply(self.participant.as_str(), &patch).await {
            Ok(()) => info!("Pod {} labelled successfully", self.participant),
            Err(e) => warn!("Failed to patch pod {}: {}", self.participant, e),
        }

        if let Some(webhook) = &self.webhook {
            if let Err(e) = webhook.notify(status_for(is_self), leader).await {
                warn!("Leader webhook failed: {}", e);
            }
        }
    }
}

#[async_trait]
impl TransitionHandler for Reactor {
    async fn on_transition(&self, leader: &str) {
        self.handle(leader).await;
    }
}
