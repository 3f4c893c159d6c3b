//! Client-side host discovery.

use std::net::SocketAddr;

use banter_protocol::{DiscoveryAnnouncement, PROTOCOL_VERSION};
use tokio::net::UdpSocket;

use crate::{DiscoveryConfig, DiscoveryError};

/// Listens for host announcements and resolves with the first valid one.
///
/// Resolves at most once; the listener socket is released when this
/// returns, whether with a host or with
/// [`DiscoveryError::Timeout`]. Announcements that are malformed, carry a
/// foreign protocol version, or announce port 0 are skipped silently (debug
/// logged) — a LAN full of incompatible hosts looks the same as an empty
/// one.
pub async fn discover_host(
    config: &DiscoveryConfig,
) -> Result<SocketAddr, DiscoveryError> {
    let socket = UdpSocket::bind(("0.0.0.0", config.port))
        .await
        .map_err(DiscoveryError::Socket)?;
    tracing::debug!(
        port = config.port,
        timeout = ?config.timeout,
        "listening for host announcements"
    );

    match tokio::time::timeout(config.timeout, scan(&socket)).await {
        Ok(found) => found,
        Err(_elapsed) => {
            tracing::info!(timeout = ?config.timeout, "discovery timed out");
            Err(DiscoveryError::Timeout(config.timeout))
        }
    }
}

/// Reads datagrams until one is a valid, version-matching announcement.
async fn scan(socket: &UdpSocket) -> Result<SocketAddr, DiscoveryError> {
    let mut buf = [0u8; 512];
    loop {
        let (len, src) = socket
            .recv_from(&mut buf)
            .await
            .map_err(DiscoveryError::Socket)?;

        let announcement: DiscoveryAnnouncement =
            match serde_json::from_slice(&buf[..len]) {
                Ok(announcement) => announcement,
                Err(e) => {
                    tracing::debug!(%src, error = %e, "ignoring malformed datagram");
                    continue;
                }
            };

        if announcement.protocol_version != PROTOCOL_VERSION {
            tracing::debug!(
                %src,
                version = announcement.protocol_version,
                "ignoring announcement with foreign protocol version"
            );
            continue;
        }
        if announcement.host_port == 0 {
            tracing::debug!(%src, "ignoring announcement with zero port");
            continue;
        }

        let addr = announcement.socket_addr(src);
        tracing::info!(%addr, "discovered host");
        return Ok(addr);
    }
}
