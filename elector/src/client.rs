//! Kubernetes client construction.

use elector_core::{ElectorError, ElectorResult};
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::PathBuf;
use tracing::info;

/// Where the control-plane credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Service account token and CA mounted into the pod
    InCluster,
    /// A kubeconfig file; `None` uses the default lookup (`$KUBECONFIG`, `~/.kube/config`)
    Kubeconfig {
        path: Option<PathBuf>,
        context: Option<String>,
    },
}

/// Build an authenticated client. Any failure is fatal to the caller.
pub async fn make_client(source: &CredentialSource) -> ElectorResult<Client> {
    let config = client_config(source).await?;
    info!("Connecting to the control plane at {}", config.cluster_url);
    Client::try_from(config).map_err(|e| ElectorError::client(e.to_string()))
}

pub async fn client_config(source: &CredentialSource) -> ElectorResult<Config> {
    match source {
        CredentialSource::InCluster => Config::incluster()
            .map_err(|e| ElectorError::client(format!("in-cluster configuration: {}", e))),
        CredentialSource::Kubeconfig { path, context } => {
            let options = KubeConfigOptions {
                context: context.clone(),
                ..KubeConfigOptions::default()
            };

            match path {
                Some(path) => {
                    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                        ElectorError::client(format!("reading {}: {}", path.display(), e))
                    })?;
                    Config::from_custom_kubeconfig(kubeconfig, &options)
                        .await
                        .map_err(|e| ElectorError::client(format!("kubeconfig: {}", e)))
                }
                None => Config::from_kubeconfig(&options)
                    .await
                    .map_err(|e| ElectorError::client(format!("kubeconfig: {}", e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
clusters:
- name: local
  cluster:
    server: http://127.0.0.1:6443
contexts:
- name: local
  context:
    cluster: local
    user: local
    namespace: default
current-context: local
users:
- name: local
  user:
    token: secret
"#;

    fn kubeconfig_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KUBECONFIG.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_missing_kubeconfig_is_client_error() {
        let source = CredentialSource::Kubeconfig {
            path: Some(PathBuf::from("/nonexistent/kubeconfig")),
            context: None,
        };

        let err = make_client(&source).await.err().expect("expected an error");
        assert!(matches!(err, ElectorError::Client { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_kubeconfig_file_is_read() {
        let file = kubeconfig_file();
        let source = CredentialSource::Kubeconfig {
            path: Some(file.path().to_path_buf()),
            context: None,
        };

        let config = client_config(&source).await.unwrap();
        assert_eq!(config.cluster_url.host(), Some("127.0.0.1"));
        assert_eq!(config.cluster_url.port_u16(), Some(6443));
        assert_eq!(config.default_namespace, "default");
    }

    #[tokio::test]
    async fn test_unknown_context_is_client_error() {
        let file = kubeconfig_file();
        let source = CredentialSource::Kubeconfig {
            path: Some(file.path().to_path_buf()),
            context: Some("missing".to_string()),
        };

        let err = client_config(&source).await.unwrap_err();
        assert!(matches!(err, ElectorError::Client { .. }));
    }
}
