//! Capability traits for the uplink DDNS agent
//!
//! Each trait isolates one external dependency of the engine:
//! - [`NetworkInspector`]: kernel routing/ARP/address state and Wi-Fi
//!   association (Linux implementation in `uplink-net-linux`)
//! - [`PublicIpEcho`]: the public IPv4 echo service (`uplink-ip-http`)
//! - [`DnsQuery`]: recursive DNS resolution (`uplink-dns-hickory`)
//! - [`ZoneApi`]: the authoritative zone provider (`uplink-zone-ovh`)
//! - [`OwnershipStore`]: locally persisted record ownership (`crate::state`)
//!
//! Every trait has an in-memory test double under `tests/common`.

pub mod dns_query;
pub mod ip_echo;
pub mod network_inspector;
pub mod ownership_store;
pub mod zone_api;

pub use dns_query::{DnsQuery, RecordType, ResolveAnswer};
pub use ip_echo::PublicIpEcho;
pub use network_inspector::{InterfaceCandidate, NetworkInspector, WifiAssociation};
pub use ownership_store::{OwnershipRecord, OwnershipStore};
pub use zone_api::ZoneApi;
