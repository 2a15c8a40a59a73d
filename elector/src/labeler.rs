use async_trait::async_trait;
use elector_core::{ElectorError, ElectorResult, LabelPatch, WorkloadLabeler, JSON_PATCH_CONTENT_TYPE};
use k8s_openapi::api::core::v1::Pod;
use kube::Client;
use tracing::debug;

const HTTP_UNPROCESSABLE: u16 = 422;

/// Patches pods in one namespace through the Kubernetes API.
#[derive(Clone)]
pub struct KubePodLabeler {
    client: Client,
    namespace: String,
}

impl KubePodLabeler {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }
}

pub fn pod_path(namespace: &str, pod: &str) -> String {
    format!("/api/v1/namespaces/{}/pods/{}", namespace, pod)
}

#[async_trait]
impl WorkloadLabeler for KubePodLabeler {
    async fn apply(&self, pod: &str, patch: &LabelPatch) -> ElectorResult<()> {
        let request = http::Request::patch(pod_path(&self.namespace, pod))
            .header(http::header::CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(patch.to_vec()?)
            .map_err(|e| ElectorError::label_patch(pod, e.to_string()))?;

        match self.client.request::<Pod>(request).await {
            Ok(_) => Ok(()),
            // The API server rejects removing a path that does not exist.
            Err(kube::Error::Api(response))
                if response.code == HTTP_UNPROCESSABLE && patch.is_remove() =>
            {
                debug!("Pod {} has no leader label to remove", pod);
                Ok(())
            }
            Err(e) => Err(ElectorError::label_patch(pod, e.to_string())),
        }
    }
}
