use std::env;
use std::time::Duration;

use crate::network::Network;

/// Default pause before re-reading after a network switch (milliseconds)
pub const NETWORK_SETTLE_DELAY_MS: u64 = 1000;

/// Default pause before re-reading after a transfer is submitted (milliseconds)
pub const TRANSFER_REFRESH_DELAY_MS: u64 = 2000;

/// Default number of recent transactions fetched per refresh
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Session timing and read configuration
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub network_settle_delay_ms: u64,
    pub transfer_refresh_delay_ms: u64,
    pub history_limit: usize,
    pub request_timeout_secs: u64,
    /// Network used by providers that need an initial one (e.g. watch-only)
    pub default_network: Network,
}

impl SessionConfig {
    /// Defaults overlaid with `APTOS_NETWORK`, `APTOS_HISTORY_LIMIT` and
    /// `APTOS_HTTP_TIMEOUT_SECS` when set. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(network) = env::var("APTOS_NETWORK").ok().and_then(|v| Network::from_name(&v)) {
            config.default_network = network;
        }
        if let Some(limit) = env::var("APTOS_HISTORY_LIMIT")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
        {
            config.history_limit = limit;
        }
        if let Some(secs) = env::var("APTOS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            config.request_timeout_secs = secs;
        }

        config
    }

    pub fn network_settle_delay(&self) -> Duration {
        Duration::from_millis(self.network_settle_delay_ms)
    }

    pub fn transfer_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.transfer_refresh_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network_settle_delay_ms: NETWORK_SETTLE_DELAY_MS,
            transfer_refresh_delay_ms: TRANSFER_REFRESH_DELAY_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            request_timeout_secs: 10,
            default_network: Network::Testnet,
        }
    }
}
