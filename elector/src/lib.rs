//! # Elector
//!
//! A sidecar that takes part in a Kubernetes leader election on behalf of
//! its pod.
//!
//! On every leader change the sidecar labels its own pod with `leader=yes`
//! (or removes that label), optionally calls a webhook, and records the
//! leader so the HTTP status surface can report it.
//!
//! ## Key Components
//!
//! - **Supervisor**: starts the election and the status server and shuts
//!   them down in order
//! - **Reactor**: applies the side effects of a leader transition
//! - **ElectorConfig**: validated command-line configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use elector::{ShutdownSignal, Supervisor};
//! use elector_core::{ElectionDescriptor, ParticipantId};
//! use elector_lease::InMemoryLeaseStore;
//! use elector_testing::RecordingLabeler;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> elector_core::ElectorResult<()> {
//!     let me = ParticipantId::new("pod-a")?;
//!     let descriptor = ElectionDescriptor::new("example", "default", me, Duration::from_secs(10))?;
//!
//!     let signal = ShutdownSignal::install()?;
//!     let supervisor = Supervisor::with_parts(
//!         descriptor,
//!         InMemoryLeaseStore::new(),
//!         Arc::new(RecordingLabeler::new()),
//!         None,
//!         Some("127.0.0.1:8080".parse().unwrap()),
//!     )
//!     .await?;
//!
//!     signal.wait().await?;
//!     supervisor.shutdown().await
//! }
//! ```

pub mod client;
pub mod config;
pub mod http;
pub mod labeler;
pub mod logging;
pub mod reactor;
pub mod supervisor;
pub mod webhook;

pub use client::{make_client, CredentialSource};
pub use config::{Cli, ElectorConfig};
pub use http::{router, StatusServer, StatusState};
pub use labeler::KubePodLabeler;
pub use logging::LogFormat;
pub use reactor::Reactor;
pub use supervisor::{wait_for_shutdown_signal, ShutdownSignal, Supervisor, SHUTDOWN_DEADLINE};
pub use webhook::{Webhook, STATUS_LEADING, STATUS_OTHER_LEADER};
