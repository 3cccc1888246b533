// # HTTP Public-IP Echo
//
// One-shot client for plaintext IP-echo services. Used when the selected
// uplink's whitelist entry carries `ip_type: public`: the interface address
// is then a private NAT address and only an external observer knows the
// address the A record should carry.
//
// Exactly one GET per call, explicit timeout, no caching — the agent runs
// once per invocation and a cached answer could hide an uplink change.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::time::Duration;

use uplink_core::traits::PublicIpEcho;
use uplink_core::{Error, Result};

/// Default echo endpoint; returns the caller's IPv4 address as plaintext.
/// Alternatives with the same contract: `https://api.ipify.org`,
/// `https://ipv4.icanhazip.com`.
pub const DEFAULT_ECHO_URL: &str = "https://v4.ident.me";

/// Default HTTP timeout for the echo request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Echo-service client
pub struct HttpIpEcho {
    url: String,
    client: reqwest::Client,
}

impl HttpIpEcho {
    /// Create a client for `url` with an explicit request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a client against [`DEFAULT_ECHO_URL`]
    pub fn default_endpoint() -> Result<Self> {
        Self::new(DEFAULT_ECHO_URL, DEFAULT_HTTP_TIMEOUT)
    }
}

#[async_trait]
impl PublicIpEcho for HttpIpEcho {
    async fn public_ipv4(&self) -> Result<Ipv4Addr> {
        tracing::debug!("Fetching public IPv4 from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("echo request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "echo service {} answered {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read echo response: {e}")))?;

        body.trim()
            .parse()
            .map_err(|_| Error::http(format!("echo service returned '{}', not an IPv4 address", body.trim())))
    }
}
