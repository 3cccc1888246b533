// # DNS Query Trait
//
// Recursive resolution of the managed domain, used to decide whether the
// zone needs a mutation at all.
//
// ## Implementations
//
// - hickory-resolver: `uplink-dns-hickory` crate
// - In-memory fake: `tests/common`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// DNS record types managed by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
}

impl RecordType {
    /// Wire-format name, as used in zone API calls and ownership keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a recursive query
///
/// `Missing` folds together "no such name" and "no such record type":
/// the reconciliation table treats both as "not currently resolvable".
/// Transport failures are errors, not answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveAnswer {
    /// The name resolved; values are in canonical string form
    Records(Vec<String>),
    /// NXDOMAIN or no answer for this record type
    Missing,
}

/// Trait for recursive DNS resolution
#[async_trait]
pub trait DnsQuery: Send + Sync {
    /// Resolve `(domain, record_type)` against the recursive resolver.
    ///
    /// # Returns
    ///
    /// - `Ok(ResolveAnswer::Records(values))`: current answers
    /// - `Ok(ResolveAnswer::Missing)`: name or record type does not exist
    /// - `Err(Error)`: transport or server failure
    async fn resolve(
        &self,
        domain: &str,
        record_type: RecordType,
    ) -> Result<ResolveAnswer, crate::Error>;
}
