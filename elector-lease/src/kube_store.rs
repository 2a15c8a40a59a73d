//! Lease store backed by an annotated `Endpoints` object.

use async_trait::async_trait;
use elector_core::{ElectionDescriptor, ElectorError, ElectorResult};
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::Client;
use std::collections::BTreeMap;
use tracing::warn;

use crate::{LeaderRecord, LeaseStore, VersionedRecord, LEADER_ANNOTATION};

const HTTP_CONFLICT: u16 = 409;

/// Keeps the leader record in the [`LEADER_ANNOTATION`] annotation of an
/// `Endpoints` object named after the election.
///
/// Updates are JSON merge patches that carry `metadata.resourceVersion`, so
/// the API server rejects them with 409 when the object moved on.
#[derive(Clone)]
pub struct EndpointsLeaseStore {
    api: Api<Endpoints>,
    name: String,
    namespace: String,
}

impl EndpointsLeaseStore {
    pub fn new(client: Client, descriptor: &ElectionDescriptor) -> Self {
        Self {
            api: Api::namespaced(client, descriptor.namespace()),
            name: descriptor.name().to_string(),
            namespace: descriptor.namespace().to_string(),
        }
    }

    fn map_error(&self, err: kube::Error) -> ElectorError {
        match err {
            kube::Error::Api(response) if response.code == HTTP_CONFLICT => {
                ElectorError::conflict(self.describe())
            }
            other => ElectorError::control_plane(format!("{}: {}", self.describe(), other)),
        }
    }

    fn parse_record(&self, endpoints: &Endpoints) -> Option<LeaderRecord> {
        let raw = endpoints
            .metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(LEADER_ANNOTATION))?;

        match LeaderRecord::from_annotation(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Ignoring unparseable leader annotation on {}: {}",
                    self.describe(),
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl LeaseStore for EndpointsLeaseStore {
    fn describe(&self) -> String {
        format!("endpoints/{}/{}", self.namespace, self.name)
    }

    async fn get(&self) -> ElectorResult<Option<VersionedRecord>> {
        let endpoints = self
            .api
            .get_opt(&self.name)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(endpoints.map(|endpoints| VersionedRecord {
            record: self.parse_record(&endpoints),
            version: endpoints.metadata.resource_version.clone().unwrap_or_default(),
        }))
    }

    async fn create(&self, record: &LeaderRecord) -> ElectorResult<()> {
        let mut annotations = BTreeMap::new();
        annotations.insert(LEADER_ANNOTATION.to_string(), record.to_annotation()?);

        let endpoints = Endpoints {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                annotations: Some(annotations),
                ..ObjectMeta::default()
            },
            ..Endpoints::default()
        };

        self.api
            .create(&PostParams::default(), &endpoints)
            .await
            .map(|_| ())
            .map_err(|e| self.map_error(e))
    }

    async fn update(&self, record: &LeaderRecord, version: &str) -> ElectorResult<()> {
        let mut annotations = serde_json::Map::new();
        annotations.insert(
            LEADER_ANNOTATION.to_string(),
            serde_json::Value::String(record.to_annotation()?),
        );

        let patch = serde_json::json!({
            "metadata": {
                "resourceVersion": version,
                "annotations": annotations,
            }
        });

        self.api
            .patch(&self.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map(|_| ())
            .map_err(|e| self.map_error(e))
    }
}
