// # Public IP Echo Trait
//
// One blocking HTTP GET against an echo service that returns the caller's
// public IPv4 address as plaintext. Used for uplinks whose whitelist entry
// has `ip_type: public` (typically a NATed cellular/router path).
//
// ## Implementations
//
// - reqwest-based: `uplink-ip-http` crate
// - In-memory fake: `tests/common`

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public IPv4 discovery via an echo service
#[async_trait]
pub trait PublicIpEcho: Send + Sync {
    /// Fetch the public IPv4 address.
    ///
    /// Implementations perform exactly one request with an explicit
    /// timeout and parse the trimmed plaintext body.
    async fn public_ipv4(&self) -> Result<Ipv4Addr, crate::Error>;
}
