// # Hickory DNS Query
//
// Recursive resolution over `hickory-resolver`, answering the one question
// the reconciliation engine asks: what does `(domain, record type)`
// currently resolve to?
//
// "No such name" and "no such record type" both fold into
// `ResolveAnswer::Missing` — the decision table treats them identically —
// while transport and server failures propagate as errors (the engine has
// no safe default for those).

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::RecordType as WireRecordType;

use uplink_core::traits::{DnsQuery, RecordType, ResolveAnswer};
use uplink_core::{Error, Result};

/// `DnsQuery` implementation over a tokio hickory resolver
pub struct HickoryDnsQuery {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsQuery {
    /// Build from `/etc/resolv.conf`, so the query goes through the same
    /// recursive path the rest of the host uses
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| Error::resolver(format!("cannot read system resolver config: {e}")))?;
        Ok(Self { resolver })
    }

    /// Build against the default public configuration; fallback for hosts
    /// without a usable `/etc/resolv.conf`
    pub fn with_defaults() -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }
}

fn wire_type(record_type: RecordType) -> WireRecordType {
    match record_type {
        RecordType::A => WireRecordType::A,
        RecordType::Aaaa => WireRecordType::AAAA,
    }
}

#[async_trait]
impl DnsQuery for HickoryDnsQuery {
    async fn resolve(&self, domain: &str, record_type: RecordType) -> Result<ResolveAnswer> {
        match self.resolver.lookup(domain, wire_type(record_type)).await {
            Ok(lookup) => Ok(ResolveAnswer::Records(
                lookup.iter().map(|rdata| rdata.to_string()).collect(),
            )),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    tracing::debug!(
                        "{domain} {record_type} has no records (response code {response_code})"
                    );
                    Ok(ResolveAnswer::Missing)
                }
                _ => Err(Error::resolver(format!(
                    "lookup {domain} {record_type} failed: {e}"
                ))),
            },
        }
    }
}
