//! Zone reconciliation
//!
//! Converges one DNS record towards its desired state with the minimal
//! create/update/delete against the zone API.
//!
//! ## Decision table
//!
//! | Desired | Resolution        | force | Action  |
//! |---------|-------------------|-------|---------|
//! | present | value present     | false | no-op   |
//! | present | value present     | true  | upsert  |
//! | present | value absent      | any   | upsert  |
//! | present | not resolvable    | any   | upsert  |
//! | absent  | NAT64 AAAA answer | any   | fatal   |
//! | absent  | resolves          | any   | delete  |
//! | absent  | not resolvable    | any   | no-op   |
//!
//! Upsert updates by id when an ownership entry exists, creates (and
//! persists the new id) otherwise. Delete refuses to run without an
//! ownership entry: this agent never removes records it did not create.
//! Every mutation is followed by a zone refresh.

use tracing::info;

use crate::config::RECORD_TTL_SECS;
use crate::domain::split_domain;
use crate::error::{Error, Result};
use crate::resolve::DesiredRecord;
use crate::traits::ownership_store::ownership_key;
use crate::traits::{DnsQuery, OwnershipRecord, OwnershipStore, RecordType, ResolveAnswer, ZoneApi};

/// NAT64 well-known prefix; a synthesized AAAA answer starts with this
const DNS64_PREFIX: &str = "64:ff9b";

/// Drives the create/update/delete state machine for one record at a time
pub struct ZoneSynchronizer<'a> {
    dns: &'a dyn DnsQuery,
    zone: &'a dyn ZoneApi,
    ownership: &'a dyn OwnershipStore,
    force: bool,
}

impl<'a> ZoneSynchronizer<'a> {
    /// Create a synchronizer over the given collaborators.
    ///
    /// `force` re-issues the upsert even when resolution already carries
    /// the desired value (used after zone-side edits the resolver cache
    /// may still hide).
    pub fn new(
        dns: &'a dyn DnsQuery,
        zone: &'a dyn ZoneApi,
        ownership: &'a dyn OwnershipStore,
        force: bool,
    ) -> Self {
        Self {
            dns,
            zone,
            ownership,
            force,
        }
    }

    /// Converge `domain`'s record of `record.record_type` to `record`.
    ///
    /// The steps for one record (resolve → decide → mutate → refresh) run
    /// to completion before the caller moves to the next record.
    pub async fn reconcile(&self, record: &DesiredRecord, domain: &str) -> Result<()> {
        let (root_domain, sub_domain) = split_domain(domain)?;
        let record_type = record.record_type;

        match self.dns.resolve(domain, record_type).await? {
            ResolveAnswer::Records(values) => {
                info!("{domain} {record_type} resolves {}", values.join(","));
                match &record.target {
                    Some(target) => {
                        if values.iter().any(|v| v == target) && !self.force {
                            info!("{domain} {record_type} up to date");
                            Ok(())
                        } else {
                            self.upsert(&root_domain, &sub_domain, domain, record_type, target)
                                .await
                        }
                    }
                    None if record_type == RecordType::Aaaa && has_dns64(&values) => {
                        // A synthesized answer means the network fabricates
                        // AAAA records for this name; deleting ours would
                        // not make it unresolvable.
                        Err(Error::Dns64Detected)
                    }
                    None => self.delete(&root_domain, domain, record_type).await,
                }
            }
            ResolveAnswer::Missing => match &record.target {
                Some(target) => {
                    info!("{domain} {record_type} not found");
                    self.upsert(&root_domain, &sub_domain, domain, record_type, target)
                        .await
                }
                None => {
                    info!("{domain} {record_type} already absent");
                    Ok(())
                }
            },
        }
    }

    async fn upsert(
        &self,
        root_domain: &str,
        sub_domain: &str,
        domain: &str,
        record_type: RecordType,
        target: &str,
    ) -> Result<()> {
        if let Some(owned) = self.ownership.get(record_type, domain).await? {
            info!("Update {record_type} record for {domain} to {target}");
            self.zone
                .update_record(root_domain, &owned.record_id, sub_domain, target)
                .await?;
        } else {
            info!("Add {record_type} record for {domain} to {target}");
            let record_id = self
                .zone
                .create_record(root_domain, record_type, sub_domain, target, RECORD_TTL_SECS)
                .await?
                .ok_or(Error::MissingRecordId)?;
            self.ownership
                .put(record_type, domain, &OwnershipRecord::new(record_id))
                .await?;
        }
        self.refresh(root_domain).await
    }

    async fn delete(&self, root_domain: &str, domain: &str, record_type: RecordType) -> Result<()> {
        let owned = self
            .ownership
            .get(record_type, domain)
            .await?
            .ok_or_else(|| Error::OwnershipMissing {
                key: ownership_key(record_type, domain),
            })?;
        info!("Delete {record_type} record for {domain}");
        self.zone.delete_record(root_domain, &owned.record_id).await?;
        self.ownership.remove(record_type, domain).await?;
        self.refresh(root_domain).await
    }

    async fn refresh(&self, root_domain: &str) -> Result<()> {
        info!("Refresh zone");
        self.zone.refresh_zone(root_domain).await
    }
}

fn has_dns64(values: &[String]) -> bool {
    values.iter().any(|v| v.starts_with(DNS64_PREFIX))
}
