// # Linux Network Inspector
//
// Concrete `NetworkInspector` for Linux-like kernels:
//
// - default routes from `/proc/net/route`
// - neighbor (ARP) entries from `/proc/net/arp`, refreshed by a one-shot
//   `ping` over the candidate interface
// - interface IPv4 via the `SIOCGIFADDR` ioctl
// - interface IPv6 from `/proc/net/if_inet6`
// - Wi-Fi association via `iwgetid`
//
// All kernel tables are read as instantaneous snapshots. The probe and the
// Wi-Fi query shell out (`ping` is setuid and `iwgetid` wraps the wireless
// ioctls); both run under an explicit timeout.
//
// ## Platform Support
//
// The inspector itself only compiles on Linux. The `procfs` parsers are
// portable and unit-tested everywhere.

pub mod procfs;

#[cfg(target_os = "linux")]
pub use linux::LinuxNetworkInspector;

#[cfg(target_os = "linux")]
mod linux {
    use async_trait::async_trait;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::process::Stdio;
    use std::time::Duration;
    use tokio::process::Command;
    use tracing::info;

    use uplink_core::traits::{InterfaceCandidate, NetworkInspector, WifiAssociation};
    use uplink_core::{Error, Result};

    use crate::procfs;

    const PROC_ROUTE: &str = "/proc/net/route";
    const PROC_ARP: &str = "/proc/net/arp";
    const PROC_IF_INET6: &str = "/proc/net/if_inet6";

    /// Default timeout for the gateway probe and the association query
    const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

    /// Linux `NetworkInspector` over procfs, ioctl and a probe subprocess
    #[derive(Debug, Clone)]
    pub struct LinuxNetworkInspector {
        command_timeout: Duration,
    }

    impl LinuxNetworkInspector {
        /// Create an inspector with an explicit subprocess timeout
        pub fn new(command_timeout: Duration) -> Self {
            Self { command_timeout }
        }

        async fn read_table(&self, path: &str) -> Result<String> {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Other(format!("failed to read {path}: {e}")))
        }
    }

    impl Default for LinuxNetworkInspector {
        fn default() -> Self {
            Self::new(DEFAULT_COMMAND_TIMEOUT)
        }
    }

    #[async_trait]
    impl NetworkInspector for LinuxNetworkInspector {
        async fn default_routes(&self) -> Result<Vec<InterfaceCandidate>> {
            let table = self.read_table(PROC_ROUTE).await?;
            Ok(procfs::parse_default_routes(&table))
        }

        async fn probe_gateway(&self, gateway: Ipv4Addr, iface: &str) -> Result<()> {
            info!("Ping {gateway} with {iface} interface");
            let status = tokio::time::timeout(
                self.command_timeout,
                Command::new("ping")
                    .args(["-q", "-c", "1", "-I", iface])
                    .arg(gateway.to_string())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status(),
            )
            .await
            .map_err(|_| Error::not_ready(format!("ping {gateway} timed out")))?
            .map_err(|e| Error::Other(format!("failed to spawn ping: {e}")))?;

            if !status.success() {
                return Err(Error::not_ready(format!("ping {gateway} failed")));
            }
            Ok(())
        }

        async fn neighbor_lookup(&self, addr: Ipv4Addr, iface: &str) -> Result<Option<String>> {
            let table = self.read_table(PROC_ARP).await?;
            Ok(procfs::parse_neighbor(&table, addr, iface))
        }

        async fn interface_ipv4(&self, iface: &str) -> Result<Ipv4Addr> {
            ioctl_interface_ipv4(iface)
                .map_err(|e| Error::Other(format!("cannot get IPv4 address of {iface}: {e}")))
        }

        async fn interface_ipv6(&self, iface: &str) -> Result<Vec<Ipv6Addr>> {
            let table = self.read_table(PROC_IF_INET6).await?;
            Ok(procfs::parse_if_inet6(&table, iface))
        }

        async fn wifi_association(&self) -> Result<Option<WifiAssociation>> {
            let output = tokio::time::timeout(
                self.command_timeout,
                Command::new("iwgetid").stderr(Stdio::null()).output(),
            )
            .await;

            let output = match output {
                Ok(Ok(output)) if output.status.success() => output,
                // No wireless extensions, no association, or no iwgetid at
                // all: none of these block a wired run.
                _ => {
                    info!("iwgetid command failed");
                    return Ok(None);
                }
            };

            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(stdout
                .lines()
                .next()
                .and_then(procfs::parse_iwgetid_line)
                .map(|(iface, ssid)| WifiAssociation { iface, ssid }))
        }
    }

    /// `SIOCGIFADDR` query for the address bound to `iface`
    fn ioctl_interface_ipv4(iface: &str) -> std::io::Result<Ipv4Addr> {
        use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

        if iface.is_empty() || iface.len() >= libc::IFNAMSIZ {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid interface name '{iface}'"),
            ));
        }

        unsafe {
            let raw = libc::socket(libc::AF_INET, libc::SOCK_DGRAM, 0);
            if raw < 0 {
                return Err(std::io::Error::last_os_error());
            }
            // OwnedFd closes the socket on every exit path below
            let fd = OwnedFd::from_raw_fd(raw);

            let mut req: libc::ifreq = std::mem::zeroed();
            for (dst, src) in req.ifr_name.iter_mut().zip(iface.as_bytes()) {
                *dst = *src as libc::c_char;
            }

            // request type differs between glibc (c_ulong) and musl (c_int)
            if libc::ioctl(fd.as_raw_fd(), libc::SIOCGIFADDR as _, &mut req) < 0 {
                return Err(std::io::Error::last_os_error());
            }

            let addr = &req.ifr_ifru.ifru_addr as *const libc::sockaddr as *const libc::sockaddr_in;
            // s_addr is in network byte order
            Ok(Ipv4Addr::from(u32::from_be((*addr).sin_addr.s_addr)))
        }
    }
}
