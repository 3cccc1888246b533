//! Address resolution for the selected uplink
//!
//! Produces exactly two [`DesiredRecord`]s per run — one A, one AAAA — from
//! the selected uplink's whitelist flags:
//!
//! - IPv4, `ip_type: public`: one HTTP GET against the echo service
//! - IPv4, `ip_type: private`: the interface's assigned address
//! - IPv6: first non-link-local address on the interface; none is a fatal
//!   condition (the operator should disable IPv6 for this uplink)
//!
//! A disabled family yields a record with no target. The AAAA record keeps
//! its type even when absent so a later reconciliation can still delete a
//! stale record.

use std::net::Ipv6Addr;

use tracing::info;

use crate::config::IpScope;
use crate::error::{Error, Result};
use crate::selector::SelectedUplink;
use crate::traits::{NetworkInspector, PublicIpEcho, RecordType};

/// Target DNS state for one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecord {
    /// Record type; fixed per slot (A, AAAA) regardless of presence
    pub record_type: RecordType,
    /// Desired value; `None` means the record should not exist
    pub target: Option<String>,
}

impl DesiredRecord {
    /// Whether the record is desired present
    pub fn present(&self) -> bool {
        self.target.is_some()
    }
}

/// Build the desired A and AAAA records for the selected uplink
pub async fn resolve_records(
    inspector: &dyn NetworkInspector,
    echo: &dyn PublicIpEcho,
    uplink: &SelectedUplink,
) -> Result<[DesiredRecord; 2]> {
    let a_record = if uplink.entry.ipv4 {
        let ipv4 = match uplink.entry.ip_type {
            IpScope::Public => echo.public_ipv4().await?,
            IpScope::Private => inspector.interface_ipv4(&uplink.iface).await?,
        };
        info!("IPv4: {ipv4}");
        DesiredRecord {
            record_type: RecordType::A,
            target: Some(ipv4.to_string()),
        }
    } else {
        DesiredRecord {
            record_type: RecordType::A,
            target: None,
        }
    };

    let aaaa_record = if uplink.entry.ipv6 {
        let addrs = inspector.interface_ipv6(&uplink.iface).await?;
        let ipv6 = first_global(&addrs).ok_or_else(|| Error::NoUsableIpv6 {
            interface: uplink.iface.clone(),
        })?;
        info!("IPv6: {ipv6}");
        DesiredRecord {
            record_type: RecordType::Aaaa,
            target: Some(ipv6.to_string()),
        }
    } else {
        DesiredRecord {
            record_type: RecordType::Aaaa,
            target: None,
        }
    };

    Ok([a_record, aaaa_record])
}

/// First address that is not link-local, in kernel table order
fn first_global(addrs: &[Ipv6Addr]) -> Option<Ipv6Addr> {
    addrs.iter().copied().find(|a| !is_link_local(*a))
}

/// `fe80::/16` check, mirroring the kernel table's textual `fe80` prefix
fn is_link_local(addr: Ipv6Addr) -> bool {
    addr.segments()[0] == 0xfe80
}
