//! Discovery configuration.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Well-known UDP port hosts announce on and clients listen on.
pub const DEFAULT_DISCOVERY_PORT: u16 = 47777;

/// How often an advertising host sends its announcement.
pub const DEFAULT_ANNOUNCE_INTERVAL: Duration = Duration::from_secs(1);

/// How long [`discover_host`](crate::discover_host) waits before giving up.
///
/// Discovery is always bounded; there is no unbounded-scan mode.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration shared by the advertiser and the listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// UDP port announcements are sent to and received on.
    pub port: u16,

    /// Address announcements are sent to. The default is the limited
    /// broadcast address; tests point it at loopback.
    pub broadcast_addr: IpAddr,

    /// Interval between announcements while advertising.
    pub announce_interval: Duration,

    /// Bounded window a discovery attempt waits for a valid announcement.
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_DISCOVERY_PORT,
            broadcast_addr: IpAddr::V4(Ipv4Addr::BROADCAST),
            announce_interval: DEFAULT_ANNOUNCE_INTERVAL,
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_config_default() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.port, DEFAULT_DISCOVERY_PORT);
        assert_eq!(config.broadcast_addr, IpAddr::V4(Ipv4Addr::BROADCAST));
        assert_eq!(config.announce_interval, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
