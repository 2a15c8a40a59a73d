use clap::Parser;
use elector_core::{ElectionDescriptor, ElectorError, ElectorResult, ParticipantId};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::client::CredentialSource;
use crate::logging::LogFormat;

/// Command-line flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "elector")]
#[command(version)]
#[command(about = "Take part in a leader election and report the leader")]
#[command(override_usage = "elector --election=<name> [OPTIONS]")]
pub struct Cli {
    /// The name of the election
    #[arg(long, default_value = "")]
    pub election: String,

    /// The id of this participant (defaults to $HOSTNAME)
    #[arg(long, default_value = "")]
    pub id: String,

    /// The Kubernetes namespace for this election
    #[arg(long = "election-namespace", default_value = "default")]
    pub election_namespace: String,

    /// The TTL for this election, e.g. 10s, 500ms, 1m30s
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub ttl: Duration,

    /// Use the service account credentials of the pod
    #[arg(
        long = "use-cluster-credentials",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub use_cluster_credentials: bool,

    /// Kubeconfig file to use when not using cluster credentials
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use when not using cluster credentials
    #[arg(long)]
    pub context: Option<String>,

    /// If non-empty, stand up a simple webserver that reports the leader state
    #[arg(long, default_value = "")]
    pub http: String,

    /// End point to call when the leader changes, with parameters status=LEADING|OTHERLEADER and leader
    #[arg(long = "webHook", default_value = "")]
    pub web_hook: String,

    /// Timeout of a single webhook call
    #[arg(long = "webhook-timeout", default_value = "10s", value_parser = humantime::parse_duration)]
    pub webhook_timeout: Duration,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Validated configuration of one elector process.
#[derive(Debug, Clone)]
pub struct ElectorConfig {
    pub election: String,
    pub participant: ParticipantId,
    pub namespace: String,
    pub ttl: Duration,
    pub credentials: CredentialSource,
    pub http_addr: Option<SocketAddr>,
    pub webhook: Option<Url>,
    pub webhook_timeout: Duration,
    pub log_format: LogFormat,
}

impl ElectorConfig {
    /// Resolve flags, falling back to the `HOSTNAME` environment variable
    /// for the participant id.
    pub fn from_env(cli: Cli) -> ElectorResult<Self> {
        Self::from_cli(cli, std::env::var("HOSTNAME").ok())
    }

    /// Resolve flags with an explicit hostname fallback.
    pub fn from_cli(cli: Cli, hostname: Option<String>) -> ElectorResult<Self> {
        let id = if cli.id.is_empty() {
            hostname.unwrap_or_default()
        } else {
            cli.id
        };
        let participant = ParticipantId::new(id)?;

        if cli.election.is_empty() {
            return Err(ElectorError::config("--election cannot be empty"));
        }
        if cli.ttl.is_zero() {
            return Err(ElectorError::config("--ttl must be greater than zero"));
        }

        let credentials = if cli.use_cluster_credentials {
            CredentialSource::InCluster
        } else {
            CredentialSource::Kubeconfig {
                path: cli.kubeconfig,
                context: cli.context,
            }
        };

        Ok(Self {
            election: cli.election,
            participant,
            namespace: cli.election_namespace,
            ttl: cli.ttl,
            credentials,
            http_addr: parse_http_addr(&cli.http)?,
            webhook: parse_webhook(&cli.web_hook)?,
            webhook_timeout: cli.webhook_timeout,
            log_format: cli.log_format,
        })
    }

    pub fn descriptor(&self) -> ElectorResult<ElectionDescriptor> {
        ElectionDescriptor::new(
            self.election.clone(),
            self.namespace.clone(),
            self.participant.clone(),
            self.ttl,
        )
    }
}

/// Parse an HTTP bind address. Empty disables the server; `:8080` binds
/// every interface.
pub fn parse_http_addr(value: &str) -> ElectorResult<Option<SocketAddr>> {
    if value.is_empty() {
        return Ok(None);
    }

    let candidate = if value.starts_with(':') {
        format!("0.0.0.0{}", value)
    } else {
        value.to_string()
    };

    candidate
        .to_socket_addrs()
        .map_err(|e| ElectorError::config(format!("invalid --http address {:?}: {}", value, e)))?
        .next()
        .map(Some)
        .ok_or_else(|| ElectorError::config(format!("--http address {:?} did not resolve", value)))
}

pub fn parse_webhook(value: &str) -> ElectorResult<Option<Url>> {
    if value.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(value)
        .map_err(|e| ElectorError::config(format!("invalid --webHook {:?}: {}", value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(ElectorError::config(format!(
            "--webHook must be an http(s) URL, got scheme {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("elector").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--election=e1", "--id=p1"]);
        let config = ElectorConfig::from_cli(cli, None).unwrap();

        assert_eq!(config.election, "e1");
        assert_eq!(config.participant.as_str(), "p1");
        assert_eq!(config.namespace, "default");
        assert_eq!(config.ttl, Duration::from_secs(10));
        assert_eq!(config.http_addr, None);
        assert_eq!(config.webhook, None);
        assert_eq!(config.webhook_timeout, Duration::from_secs(10));
        assert_eq!(
            config.credentials,
            CredentialSource::Kubeconfig {
                path: None,
                context: None
            }
        );
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "--election=e1",
            "--id=p1",
            "--election-namespace=ops",
            "--ttl=30s",
            "--use-cluster-credentials",
            "--http=:8080",
            "--webHook=http://wh/x",
        ]);
        let config = ElectorConfig::from_cli(cli, None).unwrap();

        assert_eq!(config.namespace, "ops");
        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(config.credentials, CredentialSource::InCluster);
        assert_eq!(config.http_addr, Some("0.0.0.0:8080".parse().unwrap()));
        assert_eq!(config.webhook.as_ref().unwrap().as_str(), "http://wh/x");

        let descriptor = config.descriptor().unwrap();
        assert_eq!(descriptor.name(), "e1");
        assert_eq!(descriptor.namespace(), "ops");
        assert_eq!(descriptor.ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_cluster_credentials_explicit_value() {
        let cli = parse(&["--election=e1", "--id=p1", "--use-cluster-credentials=false"]);
        assert!(!cli.use_cluster_credentials);

        let cli = parse(&["--election=e1", "--id=p1", "--use-cluster-credentials=true"]);
        assert!(cli.use_cluster_credentials);
    }

    #[test]
    fn test_hostname_fallback() {
        let cli = parse(&["--election=e1"]);
        let config = ElectorConfig::from_cli(cli, Some("hx".to_string())).unwrap();
        assert_eq!(config.participant.as_str(), "hx");

        let cli = parse(&["--election=e1", "--id=p1"]);
        let config = ElectorConfig::from_cli(cli, Some("hx".to_string())).unwrap();
        assert_eq!(config.participant.as_str(), "p1");
    }

    #[test]
    fn test_missing_identity_is_fatal() {
        let cli = parse(&["--election=e1"]);
        let err = ElectorConfig::from_cli(cli, None).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("--id"));

        let cli = parse(&["--election=e1"]);
        assert!(ElectorConfig::from_cli(cli, Some(String::new())).is_err());
    }

    #[test]
    fn test_missing_election_is_fatal() {
        let cli = parse(&["--id=p1"]);
        let err = ElectorConfig::from_cli(cli, None).unwrap_err();
        assert!(matches!(err, ElectorError::Config { .. }));
        assert!(err.to_string().contains("--election"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let cli = parse(&["--election=e1", "--id=p1", "--ttl=0s"]);
        assert!(ElectorConfig::from_cli(cli, None).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let result = Cli::try_parse_from(["elector", "--election=e1", "--bogus"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_flags() {
        let cli = parse(&["--election=e1", "--ttl=1m 30s", "--webhook-timeout=500ms"]);
        assert_eq!(cli.ttl, Duration::from_secs(90));
        assert_eq!(cli.webhook_timeout, Duration::from_millis(500));

        let cli = parse(&["--election=e1", "--ttl=2h"]);
        assert_eq!(cli.ttl, Duration::from_secs(7200));

        for bad in ["--ttl=10x", "--ttl=", "--ttl=-1s", "--webhook-timeout=soon"] {
            let result = Cli::try_parse_from(["elector", "--election=e1", bad]);
            assert!(result.is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_parse_http_addr() {
        assert_eq!(parse_http_addr("").unwrap(), None);
        assert_eq!(
            parse_http_addr("127.0.0.1:9000").unwrap(),
            Some("127.0.0.1:9000".parse().unwrap())
        );
        assert!(parse_http_addr("not an address").is_err());
    }

    #[test]
    fn test_parse_webhook() {
        assert_eq!(parse_webhook("").unwrap(), None);
        assert!(parse_webhook("http://hooks.local/leader").unwrap().is_some());
        assert!(parse_webhook("relative/path").is_err());
        assert!(parse_webhook("ftp://hooks.local/").is_err());
    }
}
