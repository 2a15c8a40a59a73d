//! Leader-change webhook.

use elector_core::{ElectorError, ElectorResult};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Status sent when this participant leads.
pub const STATUS_LEADING: &str = "LEADING";

/// Status sent when another participant leads, or nobody does.
pub const STATUS_OTHER_LEADER: &str = "OTHERLEADER";

pub fn status_for(is_self: bool) -> &'static str {
    if is_self {
        STATUS_LEADING
    } else {
        STATUS_OTHER_LEADER
    }
}

/// Calls `GET <url>?status=<status>&leader=<id>` on every transition.
#[derive(Debug, Clone)]
pub struct Webhook {
    client: reqwest::Client,
    url: Url,
}

impl Webhook {
    /// `timeout` bounds each call end to end.
    pub fn new(url: Url, timeout: Duration) -> ElectorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ElectorError::webhook(format!("building HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    /// The URL called for a transition. Existing query parameters are kept.
    pub fn url_for(&self, status: &str, leader: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("status", status)
            .append_pair("leader", leader);
        url
    }

    /// Call the webhook. The response body is read and discarded.
    pub async fn notify(&self, status: &str, leader: &str) -> ElectorResult<()> {
        let url = self.url_for(status, leader);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ElectorError::webhook(format!("GET {}: {}", url, e)))?;

        let code = response.status();
        if let Err(e) = response.bytes().await {
            debug!("Discarding webhook response body from {} failed: {}", url, e);
        }

        if !code.is_success() {
            return Err(ElectorError::webhook(format!("GET {} returned {}", url, code)));
        }

        debug!("Webhook {} answered {}", url, code);
        Ok(())
    }
}
