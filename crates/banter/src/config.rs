//! Configuration for a chat endpoint.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use banter_discovery::DiscoveryConfig;
use serde::{Deserialize, Serialize};

/// Default TCP port for the session listener.
pub const DEFAULT_SESSION_PORT: u16 = 7777;

/// Default window for the host to confirm a registration after the
/// connection is up.
pub const DEFAULT_REGISTRATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for one [`ChatApp`](crate::ChatApp).
///
/// The defaults work for a typical LAN: a well-known session port,
/// broadcast discovery, and generous timeouts. Tests narrow the
/// discovery side to loopback and let the OS pick session ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// TCP port the session listener binds when hosting. Use 0 to let
    /// the OS pick a free port; the discovery announcement always
    /// carries the real one.
    pub session_port: u16,

    /// Interface the session listener binds when hosting.
    pub bind_ip: IpAddr,

    /// LAN discovery settings, used for advertising when hosting and
    /// for listening when joining.
    pub discovery: DiscoveryConfig,

    /// How long to wait for the host to confirm our registration once
    /// the connection is established.
    pub registration_timeout: Duration,
}

impl ChatConfig {
    /// The listener bind address as `ip:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_ip, self.session_port)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_port: DEFAULT_SESSION_PORT,
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            discovery: DiscoveryConfig::default(),
            registration_timeout: DEFAULT_REGISTRATION_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.session_port, 7777);
        assert_eq!(config.bind_ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.registration_timeout, Duration::from_secs(5));
        assert_eq!(config.bind_addr(), "0.0.0.0:7777");
    }
}
