// # Zone API Trait
//
// The authoritative DNS provider's record-management interface. The engine
// drives it with the minimal create/update/delete needed to converge, and
// refreshes the zone after every mutation.
//
// ## Implementations
//
// - OVH: `uplink-zone-ovh` crate
// - In-memory fake: `tests/common` (counts mutations for the idempotency
//   contract)
//
// Implementations are single-shot API calls with full error propagation.
// Retry is owned by the external supervisor via the process exit contract,
// never by a ZoneApi implementation.

use async_trait::async_trait;

use super::dns_query::RecordType;

/// Trait for authoritative zone providers
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Create a record in `root_domain`.
    ///
    /// # Parameters
    ///
    /// - `root_domain`: the zone (e.g., "example.net")
    /// - `record_type`: A or AAAA
    /// - `sub_domain`: the sub-label (e.g., "home")
    /// - `target`: record value
    /// - `ttl`: record TTL in seconds
    ///
    /// # Returns
    ///
    /// The provider-assigned record id, or `None` if the provider's
    /// response did not carry one (the engine turns that into a fatal
    /// error — without the id the record could never be updated or
    /// deleted again).
    async fn create_record(
        &self,
        root_domain: &str,
        record_type: RecordType,
        sub_domain: &str,
        target: &str,
        ttl: u32,
    ) -> Result<Option<String>, crate::Error>;

    /// Update an existing record by id with a new target value
    async fn update_record(
        &self,
        root_domain: &str,
        record_id: &str,
        sub_domain: &str,
        target: &str,
    ) -> Result<(), crate::Error>;

    /// Delete a record by id
    async fn delete_record(&self, root_domain: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Ask the provider to regenerate and publish the zone
    async fn refresh_zone(&self, root_domain: &str) -> Result<(), crate::Error>;
}
