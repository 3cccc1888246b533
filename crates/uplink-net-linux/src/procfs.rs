//! Parsers for the kernel's fixed-format network pseudo-files
//!
//! All functions here are pure: they take file contents (or one command
//! output line) and return decoded values, so every format quirk is unit
//! tested without touching `/proc`.

use std::net::{Ipv4Addr, Ipv6Addr};

use uplink_core::traits::InterfaceCandidate;

/// Destination value marking a default route in `/proc/net/route`
const WORLD_IP: &str = "00000000";

/// Parse `/proc/net/route` into default-route candidates, ascending by
/// metric.
///
/// Row layout (whitespace-separated): `Iface Destination Gateway Flags
/// RefCnt Use Metric Mask ...`. Only rows whose destination equals the
/// wildcard `00000000` qualify. Rows that fail to decode are skipped —
/// the table is racy by nature and a half-written row must not sink the
/// whole read.
pub fn parse_default_routes(content: &str) -> Vec<InterfaceCandidate> {
    let mut routes: Vec<InterfaceCandidate> = content
        .lines()
        .skip(1) // header
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 7 || fields[1] != WORLD_IP {
                return None;
            }
            Some(InterfaceCandidate {
                iface: fields[0].to_string(),
                gateway: decode_le_hex_ipv4(fields[2])?,
                metric: fields[6].parse().ok()?,
            })
        })
        .collect();
    routes.sort_by_key(|r| r.metric);
    routes
}

/// Decode the kernel's little-endian hex IPv4 encoding
/// (`0102A8C0` → `192.168.2.1`)
pub fn decode_le_hex_ipv4(hex: &str) -> Option<Ipv4Addr> {
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Ipv4Addr::from(value.to_le_bytes()))
}

/// Find the hardware address for `(addr, iface)` in `/proc/net/arp`.
///
/// Row layout: `IP address, HW type, Flags, HW address, Mask, Device`.
pub fn parse_neighbor(content: &str, addr: Ipv4Addr, iface: &str) -> Option<String> {
    let addr = addr.to_string();
    content.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        (fields.len() >= 6 && fields[0] == addr && fields[5] == iface)
            .then(|| fields[3].to_string())
    })
}

/// List the IPv6 addresses configured on `iface` per `/proc/net/if_inet6`.
///
/// Row layout: `address-digest ifindex prefixlen scope flags devname`.
/// The 32-hex-char digest is the address in network order; parsing it as a
/// big-endian `u128` yields the canonical form for free.
pub fn parse_if_inet6(content: &str, iface: &str) -> Vec<Ipv6Addr> {
    content
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 6 || fields[5] != iface || fields[0].len() != 32 {
                return None;
            }
            let value = u128::from_str_radix(fields[0], 16).ok()?;
            Some(Ipv6Addr::from(value))
        })
        .collect()
}

/// Parse an `iwgetid` output line (`wlan0    ESSID:"HomeNet"`) into
/// `(iface, ssid)`
pub fn parse_iwgetid_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_end();
    let iface = line.split_whitespace().next()?;
    let rest = line.strip_suffix('"')?;
    let (_, ssid) = rest.split_once("ESSID:\"")?;
    if iface.is_empty() || ssid.is_empty() {
        return None;
    }
    Some((iface.to_string(), ssid.to_string()))
}
