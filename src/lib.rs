//! Aptos wallet session.
//!
//! Tracks a wallet provider connection, keeps the connected account's balance
//! and recent transactions in sync with the active network, and forwards
//! native coin transfers to the provider for signing.
//!
//! ## Module Structure
//!
//! - `session` - `WalletSession`: connect, disconnect, restore, provider events
//! - `reader` - `ChainReader`: balance and history reads with stale-result dropping
//! - `switcher` - `NetworkSwitcher`: network changes with a settling delay
//! - `transfer` - `TransferSubmitter`: transfer form and submission
//! - `state` - observable `SessionState` behind a watch channel
//! - `wallet` / `rest` - the two external capabilities
//! - `units`, `network`, `history`, `config`, `notifications` - supporting pieces
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use aptos_connect::{config::SessionConfig, network::Network, rest::RestClient};
//! use aptos_connect::{session::WalletSession, wallet::WatchOnlyWallet};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = SessionConfig::default();
//! let wallet = Arc::new(WatchOnlyWallet::new("0x1", Network::Mainnet)?);
//! let api = Arc::new(RestClient::new(config.request_timeout())?);
//! let session = WalletSession::new(Some(wallet), api, config);
//! session.connect().await?;
//! session.subscribe().wait_for(|s| !s.is_loading()).await?;
//! println!("{}", session.state().balance);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod network;
pub mod notifications;
pub mod reader;
pub mod rest;
pub mod session;
pub mod state;
pub mod switcher;
pub mod transfer;
pub mod types;
pub mod units;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use error::SessionError;
pub use session::WalletSession;
pub use state::{ConnectionStatus, SessionState};
