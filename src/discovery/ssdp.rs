//! SSDP search for Roku devices
//!
//! Sends an `M-SEARCH` for the `roku:ecp` search target to the SSDP multicast
//! group and collects unicast responses until the timeout elapses.
//!
//! Each response carries a `LOCATION` header pointing at the device's ECP base
//! URL (e.g. `http://192.168.1.134:8060/`) and a `USN` identifying the device.

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::Instant;

use crate::{Error, Result};

/// SSDP multicast group
pub const SSDP_ADDR: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

/// Search target advertised by Roku ECP servers
pub const SEARCH_TARGET: &str = "roku:ecp";

/// A device that answered the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// ECP base URL from the `LOCATION` header
    pub location: String,
    /// Unique service name, if the device sent one
    pub usn: Option<String>,
}

/// Build the `M-SEARCH` request
#[must_use]
pub fn search_request(mx_secs: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {SSDP_ADDR}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         ST: {SEARCH_TARGET}\r\n\
         MX: {mx_secs}\r\n\
         \r\n"
    )
}

/// Parse a search response, returning `None` for anything that isn't a Roku
/// ECP answer
#[must_use]
pub fn parse_response(response: &str) -> Option<DiscoveredDevice> {
    let mut lines = response.lines();
    let status = lines.next()?;
    if !status.starts_with("HTTP/1.1 200") {
        return None;
    }

    let mut location = None;
    let mut usn = None;
    let mut st = None;

    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "location" => location = Some(value.to_string()),
            "usn" => usn = Some(value.to_string()),
            "st" => st = Some(value.to_string()),
            _ => {}
        }
    }

    // Some firmware omits ST; only reject an explicit mismatch
    if st.is_some_and(|st| !st.eq_ignore_ascii_case(SEARCH_TARGET)) {
        return None;
    }

    Some(DiscoveredDevice {
        location: location.filter(|l| !l.is_empty())?,
        usn,
    })
}

/// Search the local network for Roku devices
///
/// # Errors
///
/// Returns error if the UDP socket cannot be opened or the search cannot be sent
pub async fn discover(timeout: Duration) -> Result<Vec<DiscoveredDevice>> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
        .await
        .map_err(|e| Error::Discovery(format!("failed to bind SSDP socket: {e}")))?;

    let mx = timeout.as_secs().clamp(1, 5);
    socket
        .send_to(search_request(mx).as_bytes(), SSDP_ADDR)
        .await
        .map_err(|e| Error::Discovery(format!("failed to send M-SEARCH: {e}")))?;

    tracing::debug!(?timeout, "SSDP search sent");

    let deadline = Instant::now() + timeout;
    let mut seen = HashSet::new();
    let mut devices = Vec::new();
    let mut buf = [0u8; 2048];

    loop {
        let received = tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await;
        let (len, from) = match received {
            Err(_) => break,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "SSDP receive failed");
                break;
            }
            Ok(Ok(r)) => r,
        };

        let text = String::from_utf8_lossy(&buf[..len]);
        let Some(device) = parse_response(&text) else {
            tracing::trace!(%from, "ignoring non-Roku SSDP response");
            continue;
        };

        if seen.insert(device.location.clone()) {
            tracing::info!(%from, location = %device.location, "discovered Roku device");
            devices.push(device);
        }
    }

    Ok(devices)
}
