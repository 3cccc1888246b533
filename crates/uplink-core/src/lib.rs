// # uplink-core
//
// Core library for the uplink-aware DDNS agent.
//
// ## Architecture Overview
//
// On each invocation the agent:
// - identifies the active uplink from kernel routing/ARP state and the
//   current Wi-Fi association, against an operator whitelist (`selector`)
// - resolves the uplink's IPv4/IPv6 addresses per the matched entry's
//   policy (`resolve`)
// - converges the managed domain's A and AAAA records with the minimal
//   create/update/delete against the zone API (`zone`), tracking record
//   ownership locally (`state`)
//
// ## Design Principles
//
// 1. **Capability traits at the seams**: OS inspection, DNS resolution,
//    the zone API, the IP echo service, and ownership persistence are all
//    substitutable (`traits`); every engine path is testable with
//    in-memory fakes.
// 2. **Single-shot, strictly sequential**: no background work, no internal
//    retries. Failures are classified retryable or fatal and the external
//    supervisor decides whether to re-run.
// 3. **Ownership over zone content**: only a locally persisted ownership
//    entry authorizes a delete; what the zone currently serves never does.

pub mod agent;
pub mod config;
pub mod domain;
pub mod error;
pub mod resolve;
pub mod selector;
pub mod state;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use agent::{RunOutcome, UplinkAgent};
pub use config::{AgentConfig, IpScope, WhitelistEntry};
pub use error::{Error, Result, RetryClass};
pub use resolve::DesiredRecord;
pub use selector::SelectedUplink;
pub use state::{FileOwnershipStore, MemoryOwnershipStore};
pub use traits::{
    DnsQuery, InterfaceCandidate, NetworkInspector, OwnershipRecord, OwnershipStore, PublicIpEcho,
    RecordType, ResolveAnswer, WifiAssociation, ZoneApi,
};
pub use zone::ZoneSynchronizer;
