//! # Network Helpers
//!
//! Local address discovery used for the startup banner, so other devices on
//! the LAN know which URL to open.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Public resolver used only as a routing target; no datagram is ever sent.
const PROBE_TARGET: &str = "8.8.8.8:80";

/// Determine the IPv4 address of the interface that routes to the outside world.
///
/// Connecting a UDP socket only asks the kernel to pick a route, which fixes
/// the local address without any traffic. Falls back to `127.0.0.1` when the
/// machine has no route (offline, sandboxed, ...).
pub fn local_ip() -> IpAddr {
    probe_local_ip().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn probe_local_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(PROBE_TARGET)?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_is_ipv4() {
        // Either a routed interface or the loopback fallback
        assert!(local_ip().is_ipv4());
    }
}
