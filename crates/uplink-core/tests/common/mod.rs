//! Test doubles for the engine contract tests
//!
//! Every capability trait gets an in-memory fake. The fakes are `Clone`
//! with shared interior state, so a test can keep a handle for assertions
//! while handing a clone to the agent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use uplink_core::error::{Error, Result};
use uplink_core::traits::{
    DnsQuery, InterfaceCandidate, NetworkInspector, PublicIpEcho, RecordType, ResolveAnswer,
    WifiAssociation, ZoneApi,
};

/// Scripted network state for selection and resolution tests
#[derive(Clone, Default)]
pub struct FakeInspector {
    inner: Arc<Mutex<FakeInspectorState>>,
}

#[derive(Default)]
struct FakeInspectorState {
    routes: Vec<InterfaceCandidate>,
    /// (gateway, iface) → MAC; missing key = ARP not populated
    neighbors: HashMap<(Ipv4Addr, String), String>,
    /// (gateway, iface) pairs whose probe fails
    unreachable: Vec<(Ipv4Addr, String)>,
    wifi: Option<WifiAssociation>,
    ipv4: HashMap<String, Ipv4Addr>,
    ipv6: HashMap<String, Vec<Ipv6Addr>>,
}

impl FakeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(&self, iface: &str, gateway: &str, metric: u32) -> &Self {
        self.inner.lock().unwrap().routes.push(InterfaceCandidate {
            iface: iface.to_string(),
            gateway: gateway.parse().unwrap(),
            metric,
        });
        self
    }

    pub fn add_neighbor(&self, gateway: &str, iface: &str, mac: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .neighbors
            .insert((gateway.parse().unwrap(), iface.to_string()), mac.to_string());
        self
    }

    pub fn set_unreachable(&self, gateway: &str, iface: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .unreachable
            .push((gateway.parse().unwrap(), iface.to_string()));
        self
    }

    pub fn set_wifi(&self, iface: &str, ssid: &str) -> &Self {
        self.inner.lock().unwrap().wifi = Some(WifiAssociation {
            iface: iface.to_string(),
            ssid: ssid.to_string(),
        });
        self
    }

    pub fn set_ipv4(&self, iface: &str, addr: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .ipv4
            .insert(iface.to_string(), addr.parse().unwrap());
        self
    }

    pub fn set_ipv6(&self, iface: &str, addrs: &[&str]) -> &Self {
        self.inner.lock().unwrap().ipv6.insert(
            iface.to_string(),
            addrs.iter().map(|a| a.parse().unwrap()).collect(),
        );
        self
    }
}

#[async_trait]
impl NetworkInspector for FakeInspector {
    async fn default_routes(&self) -> Result<Vec<InterfaceCandidate>> {
        let mut routes = self.inner.lock().unwrap().routes.clone();
        routes.sort_by_key(|r| r.metric);
        Ok(routes)
    }

    async fn probe_gateway(&self, gateway: Ipv4Addr, iface: &str) -> Result<()> {
        let state = self.inner.lock().unwrap();
        if state
            .unreachable
            .contains(&(gateway, iface.to_string()))
        {
            return Err(Error::not_ready(format!(
                "ping {gateway} via {iface} failed"
            )));
        }
        Ok(())
    }

    async fn neighbor_lookup(&self, addr: Ipv4Addr, iface: &str) -> Result<Option<String>> {
        let state = self.inner.lock().unwrap();
        Ok(state.neighbors.get(&(addr, iface.to_string())).cloned())
    }

    async fn interface_ipv4(&self, iface: &str) -> Result<Ipv4Addr> {
        let state = self.inner.lock().unwrap();
        state
            .ipv4
            .get(iface)
            .copied()
            .ok_or_else(|| Error::Other(format!("no IPv4 on {iface}")))
    }

    async fn interface_ipv6(&self, iface: &str) -> Result<Vec<Ipv6Addr>> {
        let state = self.inner.lock().unwrap();
        Ok(state.ipv6.get(iface).cloned().unwrap_or_default())
    }

    async fn wifi_association(&self) -> Result<Option<WifiAssociation>> {
        Ok(self.inner.lock().unwrap().wifi.clone())
    }
}

/// Echo service returning a fixed public address
#[derive(Clone)]
pub struct FakeEcho {
    pub addr: Ipv4Addr,
}

impl FakeEcho {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.parse().unwrap(),
        }
    }
}

#[async_trait]
impl PublicIpEcho for FakeEcho {
    async fn public_ipv4(&self) -> Result<Ipv4Addr> {
        Ok(self.addr)
    }
}

/// Scripted recursive resolver; unknown names answer `Missing`
#[derive(Clone, Default)]
pub struct FakeDns {
    answers: Arc<Mutex<HashMap<(String, RecordType), ResolveAnswer>>>,
}

impl FakeDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_answer(&self, domain: &str, record_type: RecordType, values: &[&str]) -> &Self {
        self.answers.lock().unwrap().insert(
            (domain.to_string(), record_type),
            ResolveAnswer::Records(values.iter().map(|v| v.to_string()).collect()),
        );
        self
    }

    pub fn clear_answer(&self, domain: &str, record_type: RecordType) -> &Self {
        self.answers
            .lock()
            .unwrap()
            .remove(&(domain.to_string(), record_type));
        self
    }
}

#[async_trait]
impl DnsQuery for FakeDns {
    async fn resolve(&self, domain: &str, record_type: RecordType) -> Result<ResolveAnswer> {
        let answers = self.answers.lock().unwrap();
        Ok(answers
            .get(&(domain.to_string(), record_type))
            .cloned()
            .unwrap_or(ResolveAnswer::Missing))
    }
}

/// Zone API fake that counts every call and records mutations
#[derive(Clone)]
pub struct CountingZoneApi {
    create_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    /// Human-readable log of mutations, in order
    log: Arc<Mutex<Vec<String>>>,
    /// Id returned by create; `None` simulates a broken provider response
    next_id: Arc<Mutex<Option<String>>>,
    id_counter: Arc<AtomicUsize>,
}

impl CountingZoneApi {
    pub fn new() -> Self {
        Self {
            create_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            log: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(Some("id".to_string()))),
            id_counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make create responses carry no record id
    pub fn without_record_ids(self) -> Self {
        *self.next_id.lock().unwrap() = None;
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.create_calls() + self.update_calls() + self.delete_calls()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZoneApi for CountingZoneApi {
    async fn create_record(
        &self,
        root_domain: &str,
        record_type: RecordType,
        sub_domain: &str,
        target: &str,
        ttl: u32,
    ) -> Result<Option<String>> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!(
            "create {record_type} {sub_domain}.{root_domain} -> {target} (ttl {ttl})"
        ));
        Ok(self.next_id.lock().unwrap().as_ref().map(|prefix| {
            let n = self.id_counter.fetch_add(1, Ordering::SeqCst);
            format!("{prefix}-{n}")
        }))
    }

    async fn update_record(
        &self,
        root_domain: &str,
        record_id: &str,
        sub_domain: &str,
        target: &str,
    ) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!(
            "update {record_id} {sub_domain}.{root_domain} -> {target}"
        ));
        Ok(())
    }

    async fn delete_record(&self, root_domain: &str, record_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(format!("delete {record_id} in {root_domain}"));
        Ok(())
    }

    async fn refresh_zone(&self, root_domain: &str) -> Result<()> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(format!("refresh {root_domain}"));
        Ok(())
    }
}
