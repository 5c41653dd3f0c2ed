//! Wallet provider capability.
//!
//! The session never talks to a wallet directly: everything goes through the
//! `WalletProvider` trait, so a browser extension bridge, a hardware signer or
//! the read-only `WatchOnlyWallet` below can back the same session.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

use crate::network::Network;
use crate::types::{AccountInfo, EntryFunctionPayload, NetworkInfo, PendingTransaction};

/// Errors a wallet provider can report. The message is shown to the user as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The user declined the request in the wallet
    #[error("{0}")]
    Rejected(String),
    /// The provider cannot perform this operation
    #[error("{0}")]
    Unsupported(String),
    /// Any other provider-side failure
    #[error("{0}")]
    Provider(String),
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Start the connect flow. May prompt the user out-of-band.
    async fn connect(&self) -> Result<AccountInfo, WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;

    async fn is_connected(&self) -> Result<bool, WalletError>;

    /// Current account, without prompting
    async fn account(&self) -> Result<AccountInfo, WalletError>;

    /// Current network, without prompting
    async fn network(&self) -> Result<NetworkInfo, WalletError>;

    async fn change_network(&self, network: &NetworkInfo) -> Result<(), WalletError>;

    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, WalletError>;
}

/// A provider that "connects" to a fixed address without holding keys.
/// Lets a session track balance and history for any account; submitting
/// transactions is refused.
pub struct WatchOnlyWallet {
    account: AccountInfo,
    state: Mutex<WatchState>,
}

struct WatchState {
    connected: bool,
    network: Network,
}

impl WatchOnlyWallet {
    /// Create a watch-only wallet for `address` (hex, with or without `0x`).
    pub fn new(address: &str, network: Network) -> anyhow::Result<Self> {
        let address = normalize_address(address)?;
        Ok(Self {
            account: AccountInfo {
                address,
                public_key: String::new(),
            },
            state: Mutex::new(WatchState {
                connected: false,
                network,
            }),
        })
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut WatchState) -> T) -> Result<T, WalletError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| WalletError::Provider("Watch-only wallet state poisoned".to_string()))?;
        Ok(f(&mut state))
    }
}

/// Validate a hex account address and return it lowercase with a `0x` prefix
pub fn normalize_address(address: &str) -> anyhow::Result<String> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 64 {
        anyhow::bail!("Invalid account address '{}'", trimmed);
    }
    // hex::decode needs an even number of digits
    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    hex::decode(&padded).map_err(|e| anyhow::anyhow!("Invalid account address '{}': {}", trimmed, e))?;
    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

#[async_trait]
impl WalletProvider for WatchOnlyWallet {
    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        self.with_state(|s| s.connected = true)?;
        info!("Watch-only wallet connected to {}", self.account.address);
        Ok(self.account.clone())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.with_state(|s| s.connected = false)
    }

    async fn is_connected(&self) -> Result<bool, WalletError> {
        self.with_state(|s| s.connected)
    }

    async fn account(&self) -> Result<AccountInfo, WalletError> {
        Ok(self.account.clone())
    }

    async fn network(&self) -> Result<NetworkInfo, WalletError> {
        self.with_state(|s| s.network.config().to_info())
    }

    async fn change_network(&self, network: &NetworkInfo) -> Result<(), WalletError> {
        let target = Network::from_name(&network.name)
            .ok_or_else(|| WalletError::Unsupported(format!("Unknown network '{}'", network.name)))?;
        self.with_state(|s| s.network = target)
    }

    async fn sign_and_submit_transaction(
        &self,
        _payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, WalletError> {
        Err(WalletError::Unsupported(
            "Watch-only wallet cannot sign transactions".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("0xABC").unwrap(), "0xabc");
        assert_eq!(normalize_address("1").unwrap(), "0x1");
        assert!(normalize_address("0x").is_err());
        assert!(normalize_address("0xzz").is_err());
        assert!(normalize_address(&format!("0x{}", "a".repeat(65))).is_err());
    }

    #[tokio::test]
    async fn test_watch_only_connect_disconnect() {
        let wallet = WatchOnlyWallet::new("0xabc", Network::Testnet).unwrap();
        assert!(!wallet.is_connected().await.unwrap());

        let account = assert_ok!(wallet.connect().await);
        assert_eq!(account.address, "0xabc");
        assert!(wallet.is_connected().await.unwrap());

        assert_ok!(wallet.disconnect().await);
        assert!(!wallet.is_connected().await.unwrap());
    }

    #[tokio::test]
    async fn test_watch_only_change_network() {
        let wallet = WatchOnlyWallet::new("0x1", Network::Mainnet).unwrap();
        assert_ok!(wallet.change_network(&Network::Devnet.config().to_info()).await);
        assert_eq!(wallet.network().await.unwrap().name, "Devnet");
    }

    #[tokio::test]
    async fn test_watch_only_rejects_unknown_network() {
        let wallet = WatchOnlyWallet::new("0x1", Network::Mainnet).unwrap();
        let unknown = NetworkInfo {
            name: "Localnet".to_string(),
            chain_id: "4".to_string(),
            url: "http://127.0.0.1:8080/v1".to_string(),
        };
        assert_err!(wallet.change_network(&unknown).await);
        assert_eq!(wallet.network().await.unwrap().name, "Mainnet");
    }

    #[tokio::test]
    async fn test_watch_only_cannot_sign() {
        let wallet = WatchOnlyWallet::new("0x1", Network::Mainnet).unwrap();
        let payload = EntryFunctionPayload::coin_transfer("0x2", 1);
        let err = wallet.sign_and_submit_transaction(&payload).await.unwrap_err();
        assert!(matches!(err, WalletError::Unsupported(_)));
    }
}
