use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::NetworkInfo;

/// The networks a session can be pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    pub fn config(self) -> &'static NetworkConfig {
        match self {
            Network::Mainnet => &NETWORKS[0],
            Network::Testnet => &NETWORKS[1],
            Network::Devnet => &NETWORKS[2],
        }
    }

    /// Parse a network name as used in config and by wallet providers
    pub fn from_name(name: &str) -> Option<Self> {
        find_network_by_name(name).map(|n| n.network)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().name)
    }
}

/// A predefined Aptos network with display name, chain ID and full-node REST endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    pub name: &'static str,
    pub chain_id: u8,
    pub url: &'static str,
}

impl NetworkConfig {
    pub const fn new(network: Network, name: &'static str, chain_id: u8, url: &'static str) -> Self {
        Self {
            network,
            name,
            chain_id,
            url,
        }
    }

    /// The shape wallet providers expect for `change_network`
    pub fn to_info(&self) -> NetworkInfo {
        NetworkInfo {
            name: self.name.to_string(),
            chain_id: self.chain_id.to_string(),
            url: self.url.to_string(),
        }
    }

    /// Explorer query value for this network (`?network=...`)
    pub fn explorer_param(&self) -> &'static str {
        match self.network {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        }
    }

    /// Get the full URL to view a transaction on the explorer
    pub fn tx_explorer_url(&self, tx_hash: &str) -> String {
        format!("{}/txn/{}?network={}", EXPLORER_URL, tx_hash, self.explorer_param())
    }

    /// Get the full URL to view an account on the explorer
    pub fn account_explorer_url(&self, address: &str) -> String {
        format!("{}/account/{}?network={}", EXPLORER_URL, address, self.explorer_param())
    }
}

const EXPLORER_URL: &str = "https://explorer.aptoslabs.com";

/// The fixed set of supported networks.
/// Devnet is reset periodically and its chain ID changes with each reset, so
/// lookups by name take precedence over lookups by chain ID.
pub const NETWORKS: &[NetworkConfig] = &[
    NetworkConfig::new(Network::Mainnet, "Mainnet", 1, "https://fullnode.mainnet.aptoslabs.com/v1"),
    NetworkConfig::new(Network::Testnet, "Testnet", 2, "https://fullnode.testnet.aptoslabs.com/v1"),
    NetworkConfig::new(Network::Devnet, "Devnet", 174, "https://fullnode.devnet.aptoslabs.com/v1"),
];

/// Find a network by name, ignoring case
pub fn find_network_by_name(name: &str) -> Option<&'static NetworkConfig> {
    let name = name.trim();
    NETWORKS.iter().find(|n| n.name.eq_ignore_ascii_case(name))
}

/// Find a network by chain ID
pub fn find_network_by_chain_id(chain_id: u8) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Match a provider-reported network against the supported set.
/// Name wins over chain ID; returns None for networks outside the set.
pub fn resolve_network(info: &NetworkInfo) -> Option<&'static NetworkConfig> {
    find_network_by_name(&info.name).or_else(|| {
        info.chain_id
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(find_network_by_chain_id)
    })
}
