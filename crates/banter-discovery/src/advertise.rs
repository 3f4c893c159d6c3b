//! Host-side announcement broadcasting.

use std::net::SocketAddr;

use banter_protocol::DiscoveryAnnouncement;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::DiscoveryConfig;

/// Periodically broadcasts a [`DiscoveryAnnouncement`] while a host is
/// accepting players.
///
/// `start` is idempotent and `stop` is a no-op when not advertising, so the
/// façade can drive this from UI actions without tracking extra state.
/// Dropping the advertiser stops it.
pub struct Advertiser {
    config: DiscoveryConfig,
    announcement: DiscoveryAnnouncement,
    handle: Option<JoinHandle<()>>,
}

impl Advertiser {
    /// Creates an advertiser for the given announcement. Does not start
    /// broadcasting yet.
    pub fn new(
        config: DiscoveryConfig,
        announcement: DiscoveryAnnouncement,
    ) -> Self {
        Self {
            config,
            announcement,
            handle: None,
        }
    }

    /// Begins periodic broadcasting. Calling while already advertising is
    /// a no-op.
    pub fn start(&mut self) {
        if self.is_advertising() {
            tracing::debug!("already advertising");
            return;
        }
        let config = self.config.clone();
        let announcement = self.announcement.clone();
        tracing::info!(
            port = config.port,
            host_port = announcement.host_port,
            "started advertising"
        );
        self.handle = Some(tokio::spawn(announce_loop(config, announcement)));
    }

    /// Halts broadcasting. Safe to call when not advertising.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("stopped advertising");
        }
    }

    /// Whether the announce loop is currently running.
    pub fn is_advertising(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Advertiser {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sends the announcement to the broadcast address once per interval until
/// aborted. Send failures are logged and the loop keeps going; only a bind
/// failure ends it.
async fn announce_loop(
    config: DiscoveryConfig,
    announcement: DiscoveryAnnouncement,
) {
    let socket = match broadcast_socket().await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::warn!(error = %e, "advertiser failed to bind socket");
            return;
        }
    };
    let payload = match serde_json::to_vec(&announcement) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "advertiser failed to encode announcement");
            return;
        }
    };
    let target = SocketAddr::new(config.broadcast_addr, config.port);

    let mut interval = tokio::time::interval(config.announce_interval);
    loop {
        interval.tick().await;
        if let Err(e) = socket.send_to(&payload, target).await {
            tracing::warn!(error = %e, %target, "announcement send failed");
        } else {
            tracing::trace!(%target, "sent announcement");
        }
    }
}

/// Binds an ephemeral UDP socket with broadcast enabled.
///
/// Broadcast permission must be set before the socket is handed to tokio,
/// so this goes through a std socket first.
async fn broadcast_socket() -> std::io::Result<UdpSocket> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0")?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    UdpSocket::from_std(socket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn test_advertiser() -> Advertiser {
        let config = DiscoveryConfig {
            port: 48999,
            broadcast_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            ..DiscoveryConfig::default()
        };
        let announcement =
            DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 7777);
        Advertiser::new(config, announcement)
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let mut advertiser = test_advertiser();
        advertiser.start();
        advertiser.start();
        assert!(advertiser.is_advertising());
        advertiser.stop();
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let mut advertiser = test_advertiser();
        assert!(!advertiser.is_advertising());
        advertiser.stop();
        assert!(!advertiser.is_advertising());
    }

    #[tokio::test]
    async fn test_stop_then_restart() {
        let mut advertiser = test_advertiser();
        advertiser.start();
        advertiser.stop();
        assert!(!advertiser.is_advertising());
        advertiser.start();
        assert!(advertiser.is_advertising());
        advertiser.stop();
    }
}
