//! Process lifecycle: start the election and status server, then tear
//! them down in order on a termination signal.

use elector_core::{ElectionDescriptor, ElectorError, ElectorResult, ObservedLeader, WorkloadLabeler};
use elector_lease::{Election, EndpointsLeaseStore, LeaseStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::ElectorConfig;
use crate::http::{StatusServer, StatusState};
use crate::labeler::KubePodLabeler;
use crate::reactor::Reactor;
use crate::webhook::Webhook;

/// Upper bound on each shutdown step.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(3);

struct HttpHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<ElectorResult<()>>,
}

/// A running elector.
pub struct Supervisor<S: LeaseStore + 'static> {
    reactor: Arc<Reactor>,
    election: Arc<Election<S>>,
    election_task: JoinHandle<()>,
    http: Option<HttpHandle>,
}

impl Supervisor<EndpointsLeaseStore> {
    /// Start against a Kubernetes cluster.
    pub async fn start(config: &ElectorConfig, client: kube::Client) -> ElectorResult<Self> {
        let descriptor = config.descriptor()?;
        let store = EndpointsLeaseStore::new(client.clone(), &descriptor);
        let labeler = Arc::new(KubePodLabeler::new(client, descriptor.namespace()));
        let webhook = config
            .webhook
            .clone()
            .map(|url| Webhook::new(url, config.webhook_timeout))
            .transpose()?;

        Self::with_parts(descriptor, store, labeler, webhook, config.http_addr).await
    }
}

impl<S: LeaseStore + 'static> Supervisor<S> {
    /// Start from explicit parts. The status server, when requested, is
    /// bound before the election begins so a bad address fails startup.
    pub async fn with_parts(
        descriptor: ElectionDescriptor,
        store: S,
        labeler: Arc<dyn WorkloadLabeler>,
        webhook: Option<Webhook>,
        http_addr: Option<SocketAddr>,
    ) -> ElectorResult<Self> {
        let reactor = Arc::new(Reactor::new(
            descriptor.participant().clone(),
            labeler,
            webhook,
        ));

        let server = match http_addr {
            Some(addr) => {
                let state = StatusState {
                    leader: reactor.leader(),
                    participant: descriptor.participant().clone(),
                };
                Some(StatusServer::bind(addr, state).await?)
            }
            None => None,
        };

        let election = Arc::new(Election::new(
            descriptor,
            reactor.clone(),
            Arc::new(store),
        )?);
        let election_task = election.spawn();

        let http = match server {
            Some(server) => {
                let addr = server.local_addr()?;
                let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
                let task = tokio::spawn(server.serve(async move {
                    let _ = shutdown_rx.await;
                }));
                Some(HttpHandle {
                    addr,
                    shutdown_tx,
                    task,
                })
            }
            None => None,
        };

        Ok(Self {
            reactor,
            election,
            election_task,
            http,
        })
    }

    pub fn leader(&self) -> ObservedLeader {
        self.reactor.leader()
    }

    /// Address the status server is listening on, if it runs.
    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http.as_ref().map(|http| http.addr)
    }

    pub fn election(&self) -> &Arc<Election<S>> {
        &self.election
    }

    /// Shut down: the final "no leader" transition, then the lease release,
    /// then the status server drain. Only a failed drain is an error.
    pub async fn shutdown(self) -> ElectorResult<()> {
        info!("Shutting down gracefully...");

        self.reactor.shutdown(SHUTDOWN_DEADLINE).await;

        match timeout(SHUTDOWN_DEADLINE, self.election.release()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Releasing the lease failed: {}", e),
            Err(_) => warn!("Releasing the lease timed out after {:?}", SHUTDOWN_DEADLINE),
        }
        self.election_task.abort();

        if let Some(http) = self.http {
            let _ = http.shutdown_tx.send(());
            match timeout(SHUTDOWN_DEADLINE, http.task).await {
                Ok(Ok(Ok(()))) => info!("Status server on {} stopped", http.addr),
                Ok(Ok(Err(e))) => {
                    return Err(ElectorError::shutdown(format!("status server: {}", e)))
                }
                Ok(Err(e)) => {
                    return Err(ElectorError::shutdown(format!(
                        "status server task failed: {}",
                        e
                    )))
                }
                Err(_) => {
                    return Err(ElectorError::shutdown(format!(
                        "status server did not drain within {:?}",
                        SHUTDOWN_DEADLINE
                    )))
                }
            }
        }

        info!("Graceful shutdown complete");
        Ok(())
    }
}

/// Termination signal listeners, registered before the elector starts so a
/// signal that arrives during startup is not lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: signal::unix::Signal,
    #[cfg(unix)]
    interrupt: signal::unix::Signal,
}

impl ShutdownSignal {
    #[cfg(unix)]
    pub fn install() -> ElectorResult<Self> {
        use tokio::signal::unix::{signal as listen, SignalKind};

        let terminate = listen(SignalKind::terminate())
            .map_err(|e| ElectorError::internal(format!("installing SIGTERM handler: {}", e)))?;
        let interrupt = listen(SignalKind::interrupt())
            .map_err(|e| ElectorError::internal(format!("installing SIGINT handler: {}", e)))?;
        Ok(Self {
            terminate,
            interrupt,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> ElectorResult<Self> {
        Ok(Self {})
    }

    /// Wait for SIGTERM or SIGINT (Ctrl+C elsewhere).
    #[cfg(unix)]
    pub async fn wait(mut self) -> ElectorResult<()> {
        tokio::select! {
            _ = self.terminate.recv() => {
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = self.interrupt.recv() => {
                info!("Received Ctrl+C, initiating graceful shutdown");
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub async fn wait(self) -> ElectorResult<()> {
        signal::ctrl_c()
            .await
            .map_err(|e| ElectorError::internal(format!("installing Ctrl+C handler: {}", e)))?;
        info!("Received Ctrl+C, initiating graceful shutdown");
        Ok(())
    }
}

/// Wait for Ctrl+C or, on unix, SIGTERM.
pub async fn wait_for_shutdown_signal() -> ElectorResult<()> {
    ShutdownSignal::install()?.wait().await
}
