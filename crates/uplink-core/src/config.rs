//! Configuration types for the uplink DDNS agent
//!
//! The operator describes every uplink the device may use as a
//! [`WhitelistEntry`]. Entries are matched in the order they appear in the
//! file: the first entry that matches the current Wi-Fi association or a
//! resolved default-route gateway wins.

use serde::{Deserialize, Serialize};

/// TTL applied to records created by this agent, in seconds
pub const RECORD_TTL_SECS: u32 = 60;

/// Top-level agent configuration (typically loaded from a YAML file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Known uplinks, in matching-priority order
    #[serde(default)]
    pub router_whitelist: Vec<WhitelistEntry>,
}

impl AgentConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.router_whitelist.is_empty() {
            return Err(crate::Error::config("router whitelist is empty"));
        }
        for (i, entry) in self.router_whitelist.iter().enumerate() {
            if entry.ssid.is_none() && entry.mac.is_none() {
                return Err(crate::Error::config(format!(
                    "whitelist entry {i} has neither an SSID nor a MAC address"
                )));
            }
        }
        Ok(())
    }
}

/// One operator-known uplink and its address-resolution policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Wi-Fi network name; matching the current association selects this
    /// entry immediately
    #[serde(default)]
    pub ssid: Option<String>,

    /// Gateway hardware address, lowercase colon-separated
    #[serde(default)]
    pub mac: Option<String>,

    /// Preferred interface name, used as a tie-break when several
    /// candidates share the gateway MAC
    #[serde(default)]
    pub iface: Option<String>,

    /// Where the IPv4 address comes from (local interface or public echo)
    #[serde(default)]
    pub ip_type: IpScope,

    /// Manage the A record for this uplink
    #[serde(default = "default_true")]
    pub ipv4: bool,

    /// Manage the AAAA record for this uplink
    #[serde(default)]
    pub ipv6: bool,
}

impl Default for WhitelistEntry {
    fn default() -> Self {
        Self {
            ssid: None,
            mac: None,
            iface: None,
            ip_type: IpScope::default(),
            ipv4: true,
            ipv6: false,
        }
    }
}

/// Address scope of an uplink
///
/// `Private` reads the address assigned to the selected interface;
/// `Public` asks an external echo service, for uplinks behind NAT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpScope {
    /// Interface-local address
    #[default]
    Private,
    /// Address as seen from the internet
    Public,
}

fn default_true() -> bool {
    true
}
