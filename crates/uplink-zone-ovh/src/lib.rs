// # OVH Zone API Client
//
// `ZoneApi` implementation over the OVH REST API:
//
// - Create record:  POST   `/domain/zone/:zone/record`
// - Update record:  PUT    `/domain/zone/:zone/record/:id`
// - Delete record:  DELETE `/domain/zone/:zone/record/:id`
// - Refresh zone:   POST   `/domain/zone/:zone/refresh`
//
// Every request carries the OVH signature headers: the signature is
// `$1$` + SHA-1 over `secret+consumer+METHOD+url+body+timestamp`, with the
// timestamp corrected by the drift against `/auth/time` (fetched once per
// client and cached).
//
// One HTTP request per operation, full error propagation, explicit
// timeout. Retry is the supervisor's job via the process exit contract.
//
// ## Security
//
// The application secret and consumer key never appear in logs; the Debug
// implementation redacts them.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;

use uplink_core::traits::{RecordType, ZoneApi};
use uplink_core::{Error, Result};

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials for the OVH API, as loaded from the secrets directory
#[derive(Clone)]
pub struct OvhCredentials {
    /// Endpoint name (`ovh-eu`, `ovh-ca`, `ovh-us`)
    pub endpoint: String,
    /// Application key (public identifier)
    pub application_key: String,
    /// Application secret
    pub application_secret: String,
    /// Consumer key granted to this application
    pub consumer_key: String,
}

impl OvhCredentials {
    /// Base URL for the configured endpoint name
    pub fn base_url(&self) -> Result<&'static str> {
        match self.endpoint.as_str() {
            "ovh-eu" => Ok("https://eu.api.ovh.com/1.0"),
            "ovh-ca" => Ok("https://ca.api.ovh.com/1.0"),
            "ovh-us" => Ok("https://api.us.ovhcloud.com/1.0"),
            other => Err(Error::config(format!("unknown OVH endpoint '{other}'"))),
        }
    }
}

impl std::fmt::Debug for OvhCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhCredentials")
            .field("endpoint", &self.endpoint)
            .field("application_key", &self.application_key)
            .field("application_secret", &"<REDACTED>")
            .field("consumer_key", &"<REDACTED>")
            .finish()
    }
}

/// OVH `ZoneApi` client
pub struct OvhZoneApi {
    credentials: OvhCredentials,
    base_url: String,
    client: reqwest::Client,
    /// Cached drift between the OVH clock and ours, filled on first use
    time_delta: Mutex<Option<i64>>,
}

impl std::fmt::Debug for OvhZoneApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhZoneApi")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl OvhZoneApi {
    /// Create a client with an explicit request timeout
    pub fn new(credentials: OvhCredentials, timeout: Duration) -> Result<Self> {
        let base_url = credentials.base_url()?.to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::zone_api(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            credentials,
            base_url,
            client,
            time_delta: Mutex::new(None),
        })
    }

    /// Create a client with the default timeout
    pub fn with_default_timeout(credentials: OvhCredentials) -> Result<Self> {
        Self::new(credentials, DEFAULT_HTTP_TIMEOUT)
    }

    /// Drift against the OVH clock, fetched once via `/auth/time`
    async fn time_delta(&self) -> Result<i64> {
        let mut cached = self.time_delta.lock().await;
        if let Some(delta) = *cached {
            return Ok(delta);
        }

        let url = format!("{}/auth/time", self.base_url);
        let server_time: i64 = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::zone_api(format!("cannot reach {url}: {e}")))?
            .text()
            .await
            .map_err(|e| Error::zone_api(format!("cannot read {url}: {e}")))?
            .trim()
            .parse()
            .map_err(|e| Error::zone_api(format!("unexpected {url} response: {e}")))?;

        let delta = server_time - chrono::Utc::now().timestamp();
        *cached = Some(delta);
        Ok(delta)
    }

    /// Issue one signed request and return the decoded JSON body
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let body_text = match &body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };
        let timestamp = (chrono::Utc::now().timestamp() + self.time_delta().await?).to_string();
        let signature = build_signature(
            &self.credentials.application_secret,
            &self.credentials.consumer_key,
            method.as_str(),
            &url,
            &body_text,
            &timestamp,
        );

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Ovh-Application", &self.credentials.application_key)
            .header("X-Ovh-Consumer", &self.credentials.consumer_key)
            .header("X-Ovh-Timestamp", &timestamp)
            .header("X-Ovh-Signature", &signature);
        if body.is_some() {
            request = request
                .header("Content-Type", "application/json")
                .body(body_text);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::zone_api(format!("{method} {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(match status.as_u16() {
                401 | 403 => Error::zone_api(format!(
                    "authentication failed ({status}): check the OVH credentials and their permissions"
                )),
                404 => Error::zone_api(format!("{method} {url} answered 404: {error_text}")),
                _ => Error::zone_api(format!("{method} {url} answered {status}: {error_text}")),
            });
        }

        // DELETE and refresh answer "null"; tolerate an empty body too
        let text = response
            .text()
            .await
            .map_err(|e| Error::zone_api(format!("cannot read {url} response: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| Error::zone_api(format!("cannot parse {url} response: {e}")))
    }
}

/// Compute the OVH request signature:
/// `$1$` + SHA-1 hex over `secret+consumer+METHOD+url+body+timestamp`
fn build_signature(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: &str,
) -> String {
    use sha1::{Digest, Sha1};

    let payload = format!("{application_secret}+{consumer_key}+{method}+{url}+{body}+{timestamp}");
    format!("$1${}", hex::encode(Sha1::digest(payload.as_bytes())))
}

/// Extract the record id from a create response; OVH answers a number
fn extract_record_id(response: &Value) -> Option<String> {
    match &response["id"] {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl ZoneApi for OvhZoneApi {
    async fn create_record(
        &self,
        root_domain: &str,
        record_type: RecordType,
        sub_domain: &str,
        target: &str,
        ttl: u32,
    ) -> Result<Option<String>> {
        let response = self
            .call(
                Method::POST,
                &format!("/domain/zone/{root_domain}/record"),
                Some(serde_json::json!({
                    "fieldType": record_type.as_str(),
                    "subDomain": sub_domain,
                    "target": target,
                    "ttl": ttl,
                })),
            )
            .await?;
        Ok(extract_record_id(&response))
    }

    async fn update_record(
        &self,
        root_domain: &str,
        record_id: &str,
        sub_domain: &str,
        target: &str,
    ) -> Result<()> {
        self.call(
            Method::PUT,
            &format!("/domain/zone/{root_domain}/record/{record_id}"),
            Some(serde_json::json!({
                "subDomain": sub_domain,
                "target": target,
            })),
        )
        .await?;
        Ok(())
    }

    async fn delete_record(&self, root_domain: &str, record_id: &str) -> Result<()> {
        self.call(
            Method::DELETE,
            &format!("/domain/zone/{root_domain}/record/{record_id}"),
            None,
        )
        .await?;
        Ok(())
    }

    async fn refresh_zone(&self, root_domain: &str) -> Result<()> {
        self.call(
            Method::POST,
            &format!("/domain/zone/{root_domain}/refresh"),
            None,
        )
        .await?;
        Ok(())
    }
}
