//! Uplink selection
//!
//! Turns ambiguous, racy OS state into exactly one chosen uplink:
//!
//! 1. Read the default-route candidates (already ordered by metric).
//! 2. For each candidate, probe the gateway over that specific interface to
//!    force a neighbor-cache refresh, then read back its hardware address.
//! 3. Read the current Wi-Fi association, if any.
//! 4. Evaluate the whitelist in its configured order; the first entry that
//!    matches wins.
//!
//! Matching is an ordered pair of rules per entry, not route preference:
//! an SSID match against the current association short-circuits (the Wi-Fi
//! interface does not need a default route yet), otherwise the entry's
//! hardware address is compared against every resolved candidate, with the
//! entry's configured interface name as a tie-break.

use tracing::info;

use crate::config::WhitelistEntry;
use crate::error::{Error, Result};
use crate::traits::{NetworkInspector, WifiAssociation};

/// One default-route path with its gateway hardware address resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterInfo {
    /// Interface name
    pub iface: String,
    /// Gateway address
    pub gateway: std::net::Ipv4Addr,
    /// Gateway hardware address, as read from the neighbor table
    pub mac: String,
}

/// The chosen active path; drives all downstream address resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUplink {
    /// Interface bound to the selection (the associated Wi-Fi interface
    /// for an SSID match, the matching candidate's interface otherwise)
    pub iface: String,
    /// The whitelist entry that matched
    pub entry: WhitelistEntry,
}

/// Identify the active uplink from live OS state.
///
/// Probe and neighbor-lookup failures are surfaced as retryable: the path
/// may simply not be ready yet and the supervisor re-runs the agent.
/// Exhausting the whitelist without a match is fatal — no amount of
/// retrying fixes a router the operator never declared.
pub async fn identify_uplink(
    inspector: &dyn NetworkInspector,
    whitelist: &[WhitelistEntry],
) -> Result<SelectedUplink> {
    let routes = inspector.default_routes().await?;
    if routes.is_empty() {
        return Err(Error::not_ready("no default route found"));
    }

    let mut routers = Vec::with_capacity(routes.len());
    for candidate in &routes {
        inspector
            .probe_gateway(candidate.gateway, &candidate.iface)
            .await?;
        let mac = inspector
            .neighbor_lookup(candidate.gateway, &candidate.iface)
            .await?
            .ok_or_else(|| {
                Error::not_ready(format!(
                    "cannot get MAC address for {} using {} interface",
                    candidate.gateway, candidate.iface
                ))
            })?;
        info!(
            "Interface {} - router IP {} - router MAC {}",
            candidate.iface, candidate.gateway, mac
        );
        routers.push(RouterInfo {
            iface: candidate.iface.clone(),
            gateway: candidate.gateway,
            mac,
        });
    }

    let wifi = inspector.wifi_association().await?;
    if let Some(assoc) = &wifi {
        info!(
            "Connected to Wi-Fi network '{}' with '{}'",
            assoc.ssid, assoc.iface
        );
    }

    select_entry(whitelist, wifi.as_ref(), &routers)
}

/// Evaluate the whitelist against observed state. First entry wins.
///
/// Pure so the precedence policy can be tested without an inspector.
pub fn select_entry(
    whitelist: &[WhitelistEntry],
    wifi: Option<&WifiAssociation>,
    routers: &[RouterInfo],
) -> Result<SelectedUplink> {
    for entry in whitelist {
        if let Some(selected) = match_entry(entry, wifi, routers) {
            return Ok(selected);
        }
    }
    Err(Error::NoRouterMatch)
}

/// Apply the two match rules of one entry, in order
fn match_entry(
    entry: &WhitelistEntry,
    wifi: Option<&WifiAssociation>,
    routers: &[RouterInfo],
) -> Option<SelectedUplink> {
    // Rule 1: current Wi-Fi association by SSID. Binds to the associated
    // interface even when that interface holds no default route.
    if let (Some(want), Some(assoc)) = (entry.ssid.as_deref(), wifi)
        && want == assoc.ssid
    {
        info!("Wi-Fi network '{}' is matching config", assoc.ssid);
        return Some(SelectedUplink {
            iface: assoc.iface.clone(),
            entry: entry.clone(),
        });
    }

    // Rule 2: gateway hardware address, against every resolved candidate.
    // The entry's configured interface name breaks ties; otherwise the
    // first matching candidate (best metric) is used.
    if let Some(want_mac) = entry.mac.as_deref() {
        let matching: Vec<&RouterInfo> = routers
            .iter()
            .filter(|r| r.mac.eq_ignore_ascii_case(want_mac))
            .collect();
        if let Some(first) = matching.first() {
            let chosen = matching
                .iter()
                .find(|r| entry.iface.as_deref() == Some(r.iface.as_str()))
                .unwrap_or(first);
            return Some(SelectedUplink {
                iface: chosen.iface.clone(),
                entry: entry.clone(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(iface: &str, gateway: &str, mac: &str) -> RouterInfo {
        RouterInfo {
            iface: iface.to_string(),
            gateway: gateway.parse().unwrap(),
            mac: mac.to_string(),
        }
    }

    fn mac_entry(mac: &str) -> WhitelistEntry {
        WhitelistEntry {
            mac: Some(mac.to_string()),
            ..WhitelistEntry::default()
        }
    }

    #[test]
    fn test_mac_match_beats_route_preference() {
        // Scenario: two default routes, metrics 10 and 100; only the
        // metric-100 gateway's MAC is whitelisted. Whitelist membership,
        // not route metric, decides.
        let routers = vec![
            router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa"),
            router("wwan0", "192.168.8.1", "bb:bb:bb:bb:bb:bb"),
        ];
        let whitelist = vec![mac_entry("bb:bb:bb:bb:bb:bb")];

        let selected = select_entry(&whitelist, None, &routers).unwrap();
        assert_eq!(selected.iface, "wwan0");
    }

    #[test]
    fn test_ssid_short_circuit_without_route_candidate() {
        // Scenario: associated to "HomeNet" on wlan0, but wlan0 holds no
        // default route. The SSID rule still selects it.
        let routers = vec![router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa")];
        let whitelist = vec![WhitelistEntry {
            ssid: Some("HomeNet".to_string()),
            ..WhitelistEntry::default()
        }];
        let wifi = WifiAssociation {
            iface: "wlan0".to_string(),
            ssid: "HomeNet".to_string(),
        };

        let selected = select_entry(&whitelist, Some(&wifi), &routers).unwrap();
        assert_eq!(selected.iface, "wlan0");
    }

    #[test]
    fn test_first_whitelist_entry_wins() {
        // Both entries match a candidate; configuration order decides.
        let routers = vec![
            router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa"),
            router("wlan0", "192.168.2.1", "bb:bb:bb:bb:bb:bb"),
        ];
        let whitelist = vec![
            mac_entry("bb:bb:bb:bb:bb:bb"),
            mac_entry("aa:aa:aa:aa:aa:aa"),
        ];

        let selected = select_entry(&whitelist, None, &routers).unwrap();
        assert_eq!(selected.iface, "wlan0");
    }

    #[test]
    fn test_ssid_rule_precedes_mac_rule_within_entry() {
        // The entry matches by both SSID and MAC; the SSID rule binds the
        // selection to the Wi-Fi interface, not the candidate's.
        let routers = vec![router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa")];
        let whitelist = vec![WhitelistEntry {
            ssid: Some("HomeNet".to_string()),
            mac: Some("aa:aa:aa:aa:aa:aa".to_string()),
            ..WhitelistEntry::default()
        }];
        let wifi = WifiAssociation {
            iface: "wlan0".to_string(),
            ssid: "HomeNet".to_string(),
        };

        let selected = select_entry(&whitelist, Some(&wifi), &routers).unwrap();
        assert_eq!(selected.iface, "wlan0");
    }

    #[test]
    fn test_iface_tie_break_among_matching_candidates() {
        // Two candidates share the gateway MAC (e.g. bridge + wireless of
        // the same router); the configured interface name picks one.
        let routers = vec![
            router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa"),
            router("wlan0", "192.168.1.1", "aa:aa:aa:aa:aa:aa"),
        ];
        let mut entry = mac_entry("aa:aa:aa:aa:aa:aa");
        entry.iface = Some("wlan0".to_string());

        let selected = select_entry(&[entry], None, &routers).unwrap();
        assert_eq!(selected.iface, "wlan0");
    }

    #[test]
    fn test_iface_mismatch_defaults_to_first_candidate() {
        let routers = vec![
            router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa"),
            router("wlan0", "192.168.1.1", "aa:aa:aa:aa:aa:aa"),
        ];
        let mut entry = mac_entry("aa:aa:aa:aa:aa:aa");
        entry.iface = Some("br0".to_string());

        let selected = select_entry(&[entry], None, &routers).unwrap();
        assert_eq!(selected.iface, "eth0");
    }

    #[test]
    fn test_no_match_is_fatal() {
        let routers = vec![router("eth0", "192.168.1.1", "aa:aa:aa:aa:aa:aa")];
        let whitelist = vec![mac_entry("cc:cc:cc:cc:cc:cc")];

        let err = select_entry(&whitelist, None, &routers).unwrap_err();
        assert!(matches!(err, Error::NoRouterMatch));
        assert_eq!(err.retry_class(), crate::error::RetryClass::Fatal);
    }

    #[test]
    fn test_mac_comparison_ignores_case() {
        let routers = vec![router("eth0", "192.168.1.1", "AA:BB:CC:DD:EE:FF")];
        let whitelist = vec![mac_entry("aa:bb:cc:dd:ee:ff")];

        assert!(select_entry(&whitelist, None, &routers).is_ok());
    }
}
