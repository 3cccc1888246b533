//! Contract tests: uplink identification against live-shaped OS state
//!
//! Drives `identify_uplink` through the `NetworkInspector` fake, covering
//! the retryable conditions (route table empty, probe failure, ARP not
//! populated) and the whitelist precedence scenarios end to end.

mod common;

use common::*;
use uplink_core::config::WhitelistEntry;
use uplink_core::error::{Error, RetryClass};
use uplink_core::selector::identify_uplink;

fn mac_entry(mac: &str) -> WhitelistEntry {
    WhitelistEntry {
        mac: Some(mac.to_string()),
        ..WhitelistEntry::default()
    }
}

fn ssid_entry(ssid: &str) -> WhitelistEntry {
    WhitelistEntry {
        ssid: Some(ssid.to_string()),
        ..WhitelistEntry::default()
    }
}

#[tokio::test]
async fn empty_route_table_is_retryable() {
    let inspector = FakeInspector::new();
    let whitelist = vec![mac_entry("aa:aa:aa:aa:aa:aa")];

    let err = identify_uplink(&inspector, &whitelist).await.unwrap_err();
    assert_eq!(err.retry_class(), RetryClass::Retryable);
}

#[tokio::test]
async fn probe_failure_is_retryable() {
    let inspector = FakeInspector::new();
    inspector
        .add_route("eth0", "192.168.1.1", 100)
        .set_unreachable("192.168.1.1", "eth0");
    let whitelist = vec![mac_entry("aa:aa:aa:aa:aa:aa")];

    let err = identify_uplink(&inspector, &whitelist).await.unwrap_err();
    assert_eq!(err.retry_class(), RetryClass::Retryable);
}

#[tokio::test]
async fn unpopulated_arp_entry_is_retryable() {
    // Probe succeeds but the neighbor table has no entry yet
    let inspector = FakeInspector::new();
    inspector.add_route("eth0", "192.168.1.1", 100);
    let whitelist = vec![mac_entry("aa:aa:aa:aa:aa:aa")];

    let err = identify_uplink(&inspector, &whitelist).await.unwrap_err();
    assert_eq!(err.retry_class(), RetryClass::Retryable);
}

#[tokio::test]
async fn whitelist_mac_decides_over_route_metric() {
    // Two default routes; only the metric-100 gateway is whitelisted.
    let inspector = FakeInspector::new();
    inspector
        .add_route("eth0", "192.168.1.1", 10)
        .add_neighbor("192.168.1.1", "eth0", "aa:aa:aa:aa:aa:aa")
        .add_route("wwan0", "192.168.8.1", 100)
        .add_neighbor("192.168.8.1", "wwan0", "bb:bb:bb:bb:bb:bb");
    let whitelist = vec![mac_entry("bb:bb:bb:bb:bb:bb")];

    let selected = identify_uplink(&inspector, &whitelist).await.unwrap();
    assert_eq!(selected.iface, "wwan0");
}

#[tokio::test]
async fn ssid_match_selects_wifi_interface_without_route() {
    // wlan0 is associated but holds no default route; eth0 does.
    let inspector = FakeInspector::new();
    inspector
        .add_route("eth0", "192.168.1.1", 10)
        .add_neighbor("192.168.1.1", "eth0", "aa:aa:aa:aa:aa:aa")
        .set_wifi("wlan0", "HomeNet");
    let whitelist = vec![ssid_entry("HomeNet")];

    let selected = identify_uplink(&inspector, &whitelist).await.unwrap();
    assert_eq!(selected.iface, "wlan0");
}

#[tokio::test]
async fn exhausted_whitelist_is_fatal() {
    let inspector = FakeInspector::new();
    inspector
        .add_route("eth0", "192.168.1.1", 10)
        .add_neighbor("192.168.1.1", "eth0", "aa:aa:aa:aa:aa:aa");
    let whitelist = vec![mac_entry("cc:cc:cc:cc:cc:cc"), ssid_entry("ElseNet")];

    let err = identify_uplink(&inspector, &whitelist).await.unwrap_err();
    assert!(matches!(err, Error::NoRouterMatch));
    assert_eq!(err.retry_class(), RetryClass::Fatal);
}

#[tokio::test]
async fn whitelist_order_beats_candidate_order() {
    // Both candidates are whitelisted; the first whitelist entry wins even
    // though its candidate has the worse metric.
    let inspector = FakeInspector::new();
    inspector
        .add_route("eth0", "192.168.1.1", 10)
        .add_neighbor("192.168.1.1", "eth0", "aa:aa:aa:aa:aa:aa")
        .add_route("wlan0", "192.168.2.1", 600)
        .add_neighbor("192.168.2.1", "wlan0", "bb:bb:bb:bb:bb:bb");
    let whitelist = vec![
        mac_entry("bb:bb:bb:bb:bb:bb"),
        mac_entry("aa:aa:aa:aa:aa:aa"),
    ];

    let selected = identify_uplink(&inspector, &whitelist).await.unwrap();
    assert_eq!(selected.iface, "wlan0");
}
