//! Integration tests for discovery over real loopback sockets.
//!
//! Each test uses its own UDP port so they can run concurrently. The
//! broadcast address is pointed at loopback, which is exactly how a
//! deployment would differ from a test: only the config changes.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use banter_discovery::{Advertiser, DiscoveryConfig, DiscoveryError, discover_host};
use banter_protocol::DiscoveryAnnouncement;

fn loopback_config(port: u16, timeout: Duration) -> DiscoveryConfig {
    DiscoveryConfig {
        port,
        broadcast_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        announce_interval: Duration::from_millis(50),
        timeout,
    }
}

/// Helper: fires the given datagram at the discovery port until aborted.
fn spawn_sender(port: u16, payload: Vec<u8>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let socket = tokio::net::UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("sender should bind");
        loop {
            let _ = socket.send_to(&payload, ("127.0.0.1", port)).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
}

#[tokio::test]
async fn test_discover_finds_advertising_host() {
    let config = loopback_config(48711, Duration::from_secs(5));

    let announcement =
        DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 7777);
    let mut advertiser = Advertiser::new(config.clone(), announcement);
    advertiser.start();

    let addr = discover_host(&config).await.expect("should find the host");

    // Unspecified announced address resolves against the datagram source.
    assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(addr.port(), 7777);

    advertiser.stop();
}

#[tokio::test]
async fn test_discover_uses_announced_address_when_specified() {
    let config = loopback_config(48712, Duration::from_secs(5));

    let announcement =
        DiscoveryAnnouncement::new("10.1.2.3".parse().unwrap(), 9999);
    let sender = spawn_sender(48712, serde_json::to_vec(&announcement).unwrap());

    let addr = discover_host(&config).await.expect("should find the host");
    assert_eq!(addr, "10.1.2.3:9999".parse().unwrap());

    sender.abort();
}

#[tokio::test]
async fn test_discover_times_out_when_no_host() {
    // The 2-second bounded window from the discovery contract: nobody is
    // advertising on this port, so the attempt must end in Timeout and
    // never resolve an address.
    let timeout = Duration::from_secs(2);
    let config = loopback_config(48713, timeout);

    let started = std::time::Instant::now();
    let result = discover_host(&config).await;

    match result {
        Err(DiscoveryError::Timeout(reported)) => {
            assert_eq!(reported, timeout);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(started.elapsed() >= timeout);
}

#[tokio::test]
async fn test_discover_ignores_foreign_protocol_version() {
    let config = loopback_config(48714, Duration::from_millis(400));

    let mut announcement =
        DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 7777);
    announcement.protocol_version = 99;
    let sender = spawn_sender(48714, serde_json::to_vec(&announcement).unwrap());

    let result = discover_host(&config).await;
    assert!(
        matches!(result, Err(DiscoveryError::Timeout(_))),
        "foreign-version announcements must not resolve discovery"
    );

    sender.abort();
}

#[tokio::test]
async fn test_discover_ignores_zero_port_announcement() {
    let config = loopback_config(48715, Duration::from_millis(400));

    let announcement =
        DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
    let sender = spawn_sender(48715, serde_json::to_vec(&announcement).unwrap());

    let result = discover_host(&config).await;
    assert!(matches!(result, Err(DiscoveryError::Timeout(_))));

    sender.abort();
}

#[tokio::test]
async fn test_discover_skips_garbage_then_resolves() {
    let config = loopback_config(48716, Duration::from_secs(5));

    let garbage_sender = spawn_sender(48716, b"definitely not json".to_vec());
    let announcement =
        DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 7777);
    let valid_sender = spawn_sender(48716, serde_json::to_vec(&announcement).unwrap());

    let addr = discover_host(&config).await.expect("should find the host");
    assert_eq!(addr.port(), 7777);

    garbage_sender.abort();
    valid_sender.abort();
}

#[tokio::test]
async fn test_retry_after_timeout_finds_late_host() {
    // A timed-out attempt releases its socket; a fresh attempt on the same
    // port must be able to bind again and succeed once a host shows up.
    let config = loopback_config(48717, Duration::from_millis(300));

    let result = discover_host(&config).await;
    assert!(matches!(result, Err(DiscoveryError::Timeout(_))));

    let announcement =
        DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 7777);
    let mut advertiser = Advertiser::new(config.clone(), announcement);
    advertiser.start();

    let retry = loopback_config(48717, Duration::from_secs(5));
    let addr = discover_host(&retry).await.expect("retry should find the host");
    assert_eq!(addr.port(), 7777);

    advertiser.stop();
}
