//! Observable session state.
//!
//! All session data lives in a single `SessionState` value behind a
//! `tokio::sync::watch` channel. Components mutate it through `SessionStore`
//! and renderers subscribe to changes instead of polling globals.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;

use crate::network::{Network, NetworkConfig};
use crate::notifications::{NotificationEntry, MAX_NOTIFICATIONS};
use crate::types::{AccountInfo, TransactionRecord};
use crate::units;

/// Balance shown when the balance read fails or nothing has been read yet
pub const ZERO_BALANCE: &str = "0";

/// Connection status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No wallet provider in this environment; nothing can be connected
    NotInstalled,
    Disconnected,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            ConnectionStatus::NotInstalled => "Wallet not installed",
            ConnectionStatus::Disconnected => "Not connected",
            ConnectionStatus::Connected => "Connected",
        }
    }
}

/// The (address, network) pair a read was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadTag {
    pub address: String,
    pub network: Network,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: ConnectionStatus,
    pub account: Option<AccountInfo>,
    /// None while disconnected, or when the provider is on a network outside the supported set
    pub network: Option<Network>,
    /// Display-denomination balance string
    pub balance: String,
    pub transactions: Vec<TransactionRecord>,
    pub balance_loading: bool,
    pub transactions_loading: bool,
    pub connecting: bool,
    pub switching: bool,
    /// Last error from a user-initiated operation
    pub error: Option<String>,
    pub notifications: VecDeque<NotificationEntry>,
}

impl SessionState {
    pub fn new(installed: bool) -> Self {
        Self {
            status: if installed {
                ConnectionStatus::Disconnected
            } else {
                ConnectionStatus::NotInstalled
            },
            account: None,
            network: None,
            balance: ZERO_BALANCE.to_string(),
            transactions: Vec::new(),
            balance_loading: false,
            transactions_loading: false,
            connecting: false,
            switching: false,
            error: None,
            notifications: VecDeque::new(),
        }
    }

    pub fn network_config(&self) -> Option<&'static NetworkConfig> {
        self.network.map(Network::config)
    }

    /// The pair reads are currently valid for, if the session can read at all
    pub fn read_tag(&self) -> Option<ReadTag> {
        match (&self.account, self.network) {
            (Some(account), Some(network)) if self.status.is_connected() => Some(ReadTag {
                address: account.address.clone(),
                network,
            }),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.balance_loading || self.transactions_loading
    }

    /// Connected address in `0x1234...abcd` form
    pub fn short_address(&self) -> Option<String> {
        self.account.as_ref().map(|a| units::truncate_address(&a.address))
    }

    /// Drop account, network and everything read for them
    pub(crate) fn clear_connection(&mut self) {
        if self.status != ConnectionStatus::NotInstalled {
            self.status = ConnectionStatus::Disconnected;
        }
        self.account = None;
        self.network = None;
        self.clear_reads();
    }

    /// Drop everything read for the previous (address, network)
    pub(crate) fn clear_reads(&mut self) {
        self.balance = ZERO_BALANCE.to_string();
        self.transactions.clear();
        self.balance_loading = false;
        self.transactions_loading = false;
    }

    pub(crate) fn notify(&mut self, entry: NotificationEntry) {
        self.notifications.push_back(entry);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
    }
}

/// Shared handle to the session state
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new(initial: SessionState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Read a value out of the current state without cloning all of it
    pub fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        f(&self.tx.borrow())
    }

    /// Mutate the state and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(f);
    }

    /// Mutate the state only if `f` returns true; subscribers are notified
    /// only in that case. Returns whether the update was applied.
    pub fn update_if(&self, f: impl FnOnce(&mut SessionState) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_state() -> SessionState {
        let mut state = SessionState::new(true);
        state.status = ConnectionStatus::Connected;
        state.account = Some(AccountInfo {
            address: "0xabc".to_string(),
            public_key: "0xdef".to_string(),
        });
        state.network = Some(Network::Testnet);
        state.balance = "1.00000000".to_string();
        state
    }

    #[test]
    fn test_new_state_installed() {
        let state = SessionState::new(true);
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert_eq!(state.balance, ZERO_BALANCE);
        assert!(state.read_tag().is_none());
    }

    #[test]
    fn test_new_state_not_installed() {
        let state = SessionState::new(false);
        assert_eq!(state.status, ConnectionStatus::NotInstalled);
        assert_eq!(state.status.display_text(), "Wallet not installed");
    }

    #[test]
    fn test_read_tag_when_connected() {
        let tag = connected_state().read_tag().unwrap();
        assert_eq!(tag.address, "0xabc");
        assert_eq!(tag.network, Network::Testnet);
    }

    #[test]
    fn test_read_tag_requires_known_network() {
        let mut state = connected_state();
        state.network = None;
        assert!(state.read_tag().is_none());
    }

    #[test]
    fn test_clear_connection() {
        let mut state = connected_state();
        state.transactions_loading = true;
        state.clear_connection();
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert!(state.account.is_none());
        assert!(state.network.is_none());
        assert_eq!(state.balance, ZERO_BALANCE);
        assert!(state.transactions.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_notify_is_bounded() {
        let mut state = SessionState::new(true);
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            state.notify(NotificationEntry::info(format!("n{}", i)));
        }
        assert_eq!(state.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(state.notifications.front().unwrap().message, "n5");
    }

    #[tokio::test]
    async fn test_store_update_notifies_subscribers() {
        let store = SessionStore::new(SessionState::new(true));
        let mut rx = store.subscribe();
        store.update(|s| s.balance = "2.00000000".to_string());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().balance, "2.00000000");
        assert_eq!(store.read(|s| s.balance.clone()), "2.00000000");
    }

    #[tokio::test]
    async fn test_store_update_if_skips_when_false() {
        let store = SessionStore::new(SessionState::new(true));
        let mut rx = store.subscribe();
        assert!(!store.update_if(|_| false));
        assert!(!rx.has_changed().unwrap());
        assert!(store.update_if(|s| {
            s.error = Some("boom".to_string());
            true
        }));
        assert_eq!(rx.borrow_and_update().error.as_deref(), Some("boom"));
    }
}
