//! Run orchestration
//!
//! One invocation = one pass through the pipeline:
//!
//! ```text
//! NetworkInspector ──► identify_uplink ──► SelectedUplink
//!                                              │
//!                         resolve_records ◄────┘
//!                               │
//!                      [A record, AAAA record]
//!                               │
//!                  ZoneSynchronizer::reconcile (per record)
//!                               │
//!                    Zone API / ownership store
//! ```
//!
//! Execution is strictly sequential: every external call completes before
//! the next begins, and each record's resolve → decide → mutate → refresh
//! steps finish before the other record is touched. The outcome is a typed
//! value; mapping it to a process exit status is the binary's job alone.

use tracing::info;

use crate::config::WhitelistEntry;
use crate::error::{Result, RetryClass};
use crate::resolve::resolve_records;
use crate::selector::identify_uplink;
use crate::traits::{DnsQuery, NetworkInspector, OwnershipStore, PublicIpEcho, ZoneApi};
use crate::zone::ZoneSynchronizer;

/// Outcome of one agent run, for the supervisor's retry decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All records converged
    Success,
    /// Transient condition; the supervisor may re-run later
    Retryable(String),
    /// Operator intervention required; retrying will not help
    Fatal(String),
}

impl RunOutcome {
    /// Classify a run result via the error taxonomy
    pub fn from_result(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => match e.retry_class() {
                RetryClass::Retryable => Self::Retryable(e.to_string()),
                RetryClass::Fatal => Self::Fatal(e.to_string()),
            },
        }
    }
}

/// The DDNS agent: selection, resolution, and reconciliation over
/// substitutable collaborators
pub struct UplinkAgent {
    inspector: Box<dyn NetworkInspector>,
    echo: Box<dyn PublicIpEcho>,
    dns: Box<dyn DnsQuery>,
    zone: Box<dyn ZoneApi>,
    ownership: Box<dyn OwnershipStore>,
}

impl UplinkAgent {
    /// Assemble an agent from its collaborators
    pub fn new(
        inspector: Box<dyn NetworkInspector>,
        echo: Box<dyn PublicIpEcho>,
        dns: Box<dyn DnsQuery>,
        zone: Box<dyn ZoneApi>,
        ownership: Box<dyn OwnershipStore>,
    ) -> Self {
        Self {
            inspector,
            echo,
            dns,
            zone,
            ownership,
        }
    }

    /// Run one reconciliation pass for `domain`.
    ///
    /// Fails fast: the first error aborts the run (retry is delegated to
    /// the external supervisor, never attempted within an invocation).
    pub async fn run(
        &self,
        whitelist: &[WhitelistEntry],
        domain: &str,
        force: bool,
    ) -> Result<()> {
        let uplink = identify_uplink(self.inspector.as_ref(), whitelist).await?;
        info!("Using interface {}", uplink.iface);

        let records =
            resolve_records(self.inspector.as_ref(), self.echo.as_ref(), &uplink).await?;

        let synchronizer = ZoneSynchronizer::new(
            self.dns.as_ref(),
            self.zone.as_ref(),
            self.ownership.as_ref(),
            force,
        );
        for record in &records {
            synchronizer.reconcile(record, domain).await?;
        }
        Ok(())
    }

    /// Run and fold the result into a [`RunOutcome`]
    pub async fn run_outcome(
        &self,
        whitelist: &[WhitelistEntry],
        domain: &str,
        force: bool,
    ) -> RunOutcome {
        RunOutcome::from_result(self.run(whitelist, domain, force).await)
    }
}
