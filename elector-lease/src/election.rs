//! Lease election loop.

use chrono::{DateTime, Utc};
use elector_core::{ElectionDescriptor, ElectorError, ElectorResult, TransitionHandler};
use parking_lot::Mutex as StatsMutex;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{LeaderRecord, LeaseStore, VersionedRecord};

/// Shortest wait between two election rounds.
const MIN_RETRY_PERIOD: Duration = Duration::from_millis(50);

/// Statistics about election rounds
#[derive(Debug, Default, Clone)]
pub struct ElectionStats {
    pub ticks: u64,
    pub acquisitions: u64,
    pub renewals: u64,
    pub conflicts: u64,
    pub errors: u64,
    pub transitions_delivered: u64,
}

struct RoundState {
    /// Leader last delivered to the handler; empty when none.
    observed: String,
    last_renewed: Option<DateTime<Utc>>,
}

/// One participant's view of a lease election.
///
/// Each round reads the leader record and either renews it (this participant
/// holds it), reports the other holder, or tries to take the lease over
/// when it is free or expired. The handler is called, and awaited, only when
/// the observed leader identity changes.
pub struct Election<S: LeaseStore> {
    descriptor: ElectionDescriptor,
    store: Arc<S>,
    handler: Arc<dyn TransitionHandler>,
    retry_period: Duration,
    round: Mutex<RoundState>,
    holding: AtomicBool,
    released: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
    stats: StatsMutex<ElectionStats>,
}

impl<S: LeaseStore + 'static> Election<S> {
    /// Create an election handle. Nothing is sent to the store until
    /// [`run`](Self::run) or [`tick`](Self::tick) is called.
    pub fn new(
        descriptor: ElectionDescriptor,
        handler: Arc<dyn TransitionHandler>,
        store: Arc<S>,
    ) -> ElectorResult<Self> {
        if descriptor.ttl().is_zero() {
            return Err(ElectorError::election("lease TTL must be positive"));
        }

        let retry_period = (descriptor.ttl() / 4).max(MIN_RETRY_PERIOD);
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            descriptor,
            store,
            handler,
            retry_period,
            round: Mutex::new(RoundState {
                observed: String::new(),
                last_renewed: None,
            }),
            holding: AtomicBool::new(false),
            released: AtomicBool::new(false),
            shutdown_tx,
            stats: StatsMutex::new(ElectionStats::default()),
        })
    }

    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period.max(MIN_RETRY_PERIOD);
        self
    }

    pub fn descriptor(&self) -> &ElectionDescriptor {
        &self.descriptor
    }

    pub fn retry_period(&self) -> Duration {
        self.retry_period
    }

    /// Whether this participant currently holds the lease.
    pub fn is_leader(&self) -> bool {
        self.holding.load(Ordering::Acquire)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> ElectionStats {
        self.stats.lock().clone()
    }

    /// Run the election loop in a background task.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let election = Arc::clone(self);
        tokio::spawn(async move { election.run().await })
    }

    /// Run election rounds until [`release`](Self::release) is called.
    pub async fn run(&self) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        info!("Starting election {}", self.descriptor);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            if let Err(e) = self.tick().await {
                self.stats.lock().errors += 1;
                warn!("Election round on {} failed: {}", self.store.describe(), e);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.next_delay()) => {}
                _ = shutdown_rx.changed() => break,
            }
        }

        info!("Election loop for {} stopped", self.descriptor.name());
    }

    /// Perform a single election round.
    ///
    /// A round still running when [`release`](Self::release) is called is
    /// abandoned at its next await point, including a handler call.
    pub async fn tick(&self) -> ElectorResult<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut round = self.round.lock().await;
        if self.is_released() {
            return Ok(());
        }

        tokio::select! {
            result = self.run_round(&mut round) => result,
            _ = shutdown_rx.changed() => {
                debug!("Election round on {} abandoned by release", self.store.describe());
                Ok(())
            }
        }
    }

    async fn run_round(&self, round: &mut RoundState) -> ElectorResult<()> {
        self.stats.lock().ticks += 1;
        let now = Utc::now();

        let current = match self.store.get().await {
            Ok(current) => current,
            Err(e) => {
                self.check_lease_lost(round, now).await;
                return Err(e);
            }
        };

        match current {
            None => {
                let record = LeaderRecord::acquire(self.me(), self.descriptor.ttl(), now);
                let result = self.store.create(&record).await;
                self.after_acquire(round, result, now).await
            }
            Some(VersionedRecord { record, version }) => match record {
                Some(record) if record.holder_identity == self.me() => {
                    let renewed = record.renewed(self.descriptor.ttl(), now);
                    match self.store.update(&renewed, &version).await {
                        Ok(()) => {
                            self.stats.lock().renewals += 1;
                            round.last_renewed = Some(now);
                            self.holding.store(true, Ordering::Release);
                            debug!("Renewed lease on {}", self.store.describe());
                            self.deliver(round, self.me()).await;
                            Ok(())
                        }
                        Err(e) if e.is_conflict() => {
                            self.stats.lock().conflicts += 1;
                            debug!("Renewal on {} lost a race", self.store.describe());
                            Ok(())
                        }
                        Err(e) => {
                            self.check_lease_lost(round, now).await;
                            Err(e)
                        }
                    }
                }
                Some(record) if record.is_held() && !record.is_expired(now) => {
                    self.holding.store(false, Ordering::Release);
                    round.last_renewed = None;
                    self.deliver(round, &record.holder_identity).await;
                    Ok(())
                }
                previous => {
                    if !round.observed.is_empty() {
                        info!(
                            "Lease on {} expired or was released",
                            self.store.describe()
                        );
                        self.holding.store(false, Ordering::Release);
                        self.deliver(round, "").await;
                    }

                    let record = match previous {
                        Some(previous) => {
                            previous.taken_over(self.me(), self.descriptor.ttl(), now)
                        }
                        None => LeaderRecord::acquire(self.me(), self.descriptor.ttl(), now),
                    };
                    let result = self.store.update(&record, &version).await;
                    self.after_acquire(round, result, now).await
                }
            },
        }
    }

    /// Stop the loop and surrender the lease if this participant holds it.
    ///
    /// An in-flight round is abandoned rather than awaited. Only the first
    /// call does anything.
    pub async fn release(&self) -> ElectorResult<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.shutdown_tx.send_replace(true);

        let mut round = self.round.lock().await;
        self.holding.store(false, Ordering::Release);
        round.last_renewed = None;

        let Some(VersionedRecord {
            record: Some(record),
            version,
        }) = self.store.get().await?
        else {
            return Ok(());
        };

        if record.holder_identity != self.me() {
            debug!("Not holding {}, nothing to release", self.store.describe());
            return Ok(());
        }

        self.store
            .update(&record.released(Utc::now()), &version)
            .await?;
        info!("Released lease on {}", self.store.describe());
        Ok(())
    }

    fn me(&self) -> &str {
        self.descriptor.participant().as_str()
    }

    fn next_delay(&self) -> Duration {
        if self.is_leader() {
            return self.retry_period;
        }

        let jitter_ms = (self.retry_period.as_millis() / 10) as u64;
        let jitter = if jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=jitter_ms)
        } else {
            0
        };
        self.retry_period + Duration::from_millis(jitter)
    }

    async fn after_acquire(
        &self,
        round: &mut RoundState,
        result: ElectorResult<()>,
        now: DateTime<Utc>,
    ) -> ElectorResult<()> {
        match result {
            Ok(()) => {
                self.stats.lock().acquisitions += 1;
                round.last_renewed = Some(now);
                self.holding.store(true, Ordering::Release);
                info!(
                    "{} acquired lease on {}",
                    self.me(),
                    self.store.describe()
                );
                self.deliver(round, self.me()).await;
                Ok(())
            }
            Err(e) if e.is_conflict() => {
                self.stats.lock().conflicts += 1;
                debug!("Acquiring {} lost a race", self.store.describe());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Report "no leader" once our own lease has run out without a renewal.
    async fn check_lease_lost(&self, round: &mut RoundState, now: DateTime<Utc>) {
        if round.observed != self.me() {
            return;
        }

        let lost = match round.last_renewed {
            Some(renewed) => chrono::Duration::from_std(self.descriptor.ttl())
                .ok()
                .and_then(|ttl| renewed.checked_add_signed(ttl))
                .is_some_and(|deadline| deadline < now),
            None => true,
        };

        if lost {
            warn!(
                "Could not renew lease on {} within {:?}",
                self.store.describe(),
                self.descriptor.ttl()
            );
            self.holding.store(false, Ordering::Release);
            round.last_renewed = None;
            self.deliver(round, "").await;
        }
    }

    async fn deliver(&self, round: &mut RoundState, leader: &str) {
        if round.observed == leader {
            return;
        }

        if leader.is_empty() {
            info!("No leader for election {}", self.descriptor.name());
        } else {
            info!(
                "Leader of election {} is now {}",
                self.descriptor.name(),
                leader
            );
        }

        self.stats.lock().transitions_delivered += 1;
        self.handler.on_transition(leader).await;
        round.observed = leader.to_string();
    }
}
