// # Ownership Store Trait
//
// Locally persisted proof that this agent created a given DNS record.
//
// ## Purpose
//
// Zone content alone never decides deletability: a record that resolves but
// has no local ownership entry may belong to someone else, and the agent
// refuses to touch it. The *existence* of the `(record type, domain)` key
// is the authoritative signal; the stored id is what update-by-id and
// delete-by-id calls use.
//
// ## Implementations
//
// - File-based (one file per key): `crate::state::FileOwnershipStore`
// - In-memory: `crate::state::MemoryOwnershipStore`

use async_trait::async_trait;

use super::dns_query::RecordType;

/// Ownership entry for one managed record
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OwnershipRecord {
    /// Provider-assigned record id
    pub record_id: String,
    /// When this agent created the record
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl OwnershipRecord {
    /// Create a new ownership entry stamped with the current time
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Canonical store key for `(record type, domain)`, e.g. `A_home.example.net`
pub fn ownership_key(record_type: RecordType, domain: &str) -> String {
    format!("{}_{}", record_type.as_str(), domain)
}

/// Trait for ownership persistence
///
/// Single-writer by contract: the agent must not run concurrently against
/// the same store and domain. This is a documented external invariant, not
/// something implementations enforce.
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Fetch the ownership entry for `(record_type, domain)`, if present
    async fn get(
        &self,
        record_type: RecordType,
        domain: &str,
    ) -> Result<Option<OwnershipRecord>, crate::Error>;

    /// Persist an ownership entry, replacing any previous one
    async fn put(
        &self,
        record_type: RecordType,
        domain: &str,
        record: &OwnershipRecord,
    ) -> Result<(), crate::Error>;

    /// Remove the ownership entry. Removing a missing entry is not an error.
    async fn remove(&self, record_type: RecordType, domain: &str) -> Result<(), crate::Error>;
}
