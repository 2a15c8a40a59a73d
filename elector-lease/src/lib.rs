//! # Elector Lease
//!
//! TTL lease election for kube-elector participants.
//!
//! This crate provides:
//! - [`Election`]: the election loop that acquires, renews and releases the
//!   lease and reports leader changes to a [`TransitionHandler`]
//! - [`LeaderRecord`]: the lease as stored in the control plane
//! - [`LeaseStore`]: storage seam for the record, with the Kubernetes
//!   [`EndpointsLeaseStore`] and the [`InMemoryLeaseStore`] implementations
//!
//! The election does not interpret transitions; it only guarantees that
//! they are delivered one at a time, in the order they were observed.
//!
//! [`TransitionHandler`]: elector_core::TransitionHandler
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use elector_core::{ElectionDescriptor, ParticipantId, TransitionHandler};
//! use elector_lease::{Election, InMemoryLeaseStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct PrintLeader;
//!
//! #[async_trait]
//! impl TransitionHandler for PrintLeader {
//!     async fn on_transition(&self, leader: &str) {
//!         println!("leader is now {:?}", leader);
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let me = ParticipantId::new("pod-a").unwrap();
//! let descriptor =
//!     ElectionDescriptor::new("example", "default", me, Duration::from_secs(10)).unwrap();
//! let store = InMemoryLeaseStore::new();
//! let election = Election::new(descriptor, Arc::new(PrintLeader), Arc::new(store.clone())).unwrap();
//!
//! election.tick().await.unwrap();
//! assert!(election.is_leader());
//! assert_eq!(store.record().unwrap().holder_identity, "pod-a");
//!
//! election.release().await.unwrap();
//! assert!(!store.record().unwrap().is_held());
//! # });
//! ```

pub mod election;
pub mod in_memory;
pub mod kube_store;
pub mod record;
pub mod store;

pub use election::{Election, ElectionStats};
pub use in_memory::InMemoryLeaseStore;
pub use kube_store::EndpointsLeaseStore;
pub use record::{LeaderRecord, LEADER_ANNOTATION};
pub use store::{LeaseStore, VersionedRecord};
