//! Error types for the uplink DDNS agent
//!
//! Every error carries a retry classification. A supervising process decides
//! whether to re-run the agent based on that classification alone, so the
//! mapping must stay explicit: transient network-settling conditions are
//! `Retryable`, everything an operator has to fix is `Fatal`.

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// How a failure should be surfaced to the supervising process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Likely transient (interface/network still settling); re-run later
    Retryable,
    /// Will not self-resolve; requires operator intervention
    Fatal,
}

/// Core error type for the uplink DDNS agent
#[derive(Error, Debug)]
pub enum Error {
    /// The network path is not ready yet (empty route table, gateway probe
    /// failed, ARP entry not populated)
    #[error("network not ready: {0}")]
    NetworkNotReady(String),

    /// No whitelist entry matched the observed routers or Wi-Fi association
    #[error("no router matches the whitelist")]
    NoRouterMatch,

    /// The target domain does not fit the sub.root-domain pattern
    #[error("cannot parse '{0}' domain")]
    MalformedDomain(String),

    /// IPv6 is enabled but the selected interface has no usable address
    #[error(
        "cannot find a valid IPv6 address on '{interface}' - you should deactivate IPv6 in the configuration"
    )]
    NoUsableIpv6 {
        /// Interface that was inspected
        interface: String,
    },

    /// A DNS64-synthesized AAAA answer was found while the AAAA record is
    /// desired absent; deleting it would break IPv6-only clients
    #[error(
        "you must activate IPv6 in the configuration or disable IPv6 at the mobile network level"
    )]
    Dns64Detected,

    /// A delete was requested for a record this agent never created
    #[error("no ownership entry for {key}, you must delete this record manually")]
    OwnershipMissing {
        /// The `(record type, domain)` key that was looked up
        key: String,
    },

    /// The zone API create response did not include a record id
    #[error("cannot get record id from response")]
    MissingRecordId,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Zone API errors
    #[error("zone API error: {0}")]
    ZoneApi(String),

    /// Recursive resolver errors (transport-level, not "name not found")
    #[error("resolver error: {0}")]
    Resolver(String),

    /// HTTP client errors (public IP echo, reachability probe)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Ownership store errors
    #[error("ownership store error: {0}")]
    OwnershipStore(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a retryable "network not ready" error
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NetworkNotReady(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a zone API error
    pub fn zone_api(msg: impl Into<String>) -> Self {
        Self::ZoneApi(msg.into())
    }

    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an ownership store error
    pub fn ownership_store(msg: impl Into<String>) -> Self {
        Self::OwnershipStore(msg.into())
    }

    /// Classify this error for the process exit contract.
    ///
    /// Anything without an explicit transient cause is treated as fatal:
    /// misclassifying a persistent misconfiguration as retryable would make
    /// the supervisor loop on it forever.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::NetworkNotReady(_) => RetryClass::Retryable,
            _ => RetryClass::Fatal,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_is_retryable() {
        let err = Error::not_ready("ping 192.168.1.1 failed");
        assert_eq!(err.retry_class(), RetryClass::Retryable);
    }

    #[test]
    fn test_selection_and_zone_errors_are_fatal() {
        assert_eq!(Error::NoRouterMatch.retry_class(), RetryClass::Fatal);
        assert_eq!(
            Error::MalformedDomain("bad".into()).retry_class(),
            RetryClass::Fatal
        );
        assert_eq!(Error::Dns64Detected.retry_class(), RetryClass::Fatal);
        assert_eq!(Error::MissingRecordId.retry_class(), RetryClass::Fatal);
        assert_eq!(
            Error::OwnershipMissing {
                key: "A_home.example.net".into()
            }
            .retry_class(),
            RetryClass::Fatal
        );
    }

    #[test]
    fn test_unclassified_errors_default_to_fatal() {
        assert_eq!(
            Error::zone_api("500 from provider").retry_class(),
            RetryClass::Fatal
        );
        assert_eq!(
            Error::resolver("connection refused").retry_class(),
            RetryClass::Fatal
        );
        assert_eq!(
            Error::http("timed out").retry_class(),
            RetryClass::Fatal
        );
    }
}
