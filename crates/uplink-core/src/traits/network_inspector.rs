// # Network Inspector Trait
//
// Read-only view of the OS network state the selection policy needs:
// default routes, neighbor (ARP) entries, interface addresses, and the
// current Wi-Fi association.
//
// ## Implementations
//
// - Linux procfs/ioctl: `uplink-net-linux` crate
// - In-memory fake: `tests/common` (drives the selection contract tests)
//
// Kernel tables are read as instantaneous snapshots with no locking. Races
// against a settling network surface as retryable errors, never as blocking
// or polling inside an implementation.

use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr};

/// One default-route path, as read from the kernel routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCandidate {
    /// Interface name (e.g., "wlan0")
    pub iface: String,
    /// Gateway address, already decoded from the kernel's little-endian
    /// hex encoding
    pub gateway: Ipv4Addr,
    /// Route metric; lower is preferred
    pub metric: u32,
}

/// Current wireless association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiAssociation {
    /// Associated interface (e.g., "wlan0")
    pub iface: String,
    /// Network name
    pub ssid: String,
}

/// Trait for OS network-state inspection
///
/// All methods are one-shot snapshot reads. Implementations must not cache
/// between calls: the whole point of the probe + neighbor sequence is to
/// observe the table *after* the probe refreshed it.
#[async_trait]
pub trait NetworkInspector: Send + Sync {
    /// List default-route candidates, ordered ascending by metric.
    ///
    /// Only rows whose destination is the wildcard address are returned.
    /// An empty list is a valid answer (the caller classifies it as a
    /// retryable condition).
    async fn default_routes(&self) -> Result<Vec<InterfaceCandidate>, crate::Error>;

    /// Send one probe packet to `gateway` over `iface`.
    ///
    /// The probe's only purpose is to force the kernel to (re)populate its
    /// neighbor entry for the gateway before [`Self::neighbor_lookup`].
    /// A failed probe means the path is not ready.
    async fn probe_gateway(&self, gateway: Ipv4Addr, iface: &str) -> Result<(), crate::Error>;

    /// Look up the hardware address for `(addr, iface)` in the neighbor
    /// table. `None` means the entry is not (yet) populated.
    async fn neighbor_lookup(
        &self,
        addr: Ipv4Addr,
        iface: &str,
    ) -> Result<Option<String>, crate::Error>;

    /// IPv4 address currently assigned to `iface`
    async fn interface_ipv4(&self, iface: &str) -> Result<Ipv4Addr, crate::Error>;

    /// All IPv6 addresses configured on `iface`, link-local included
    /// (the address resolver does the scope filtering)
    async fn interface_ipv6(&self, iface: &str) -> Result<Vec<Ipv6Addr>, crate::Error>;

    /// Current Wi-Fi association, if any
    async fn wifi_association(&self) -> Result<Option<WifiAssociation>, crate::Error>;
}
