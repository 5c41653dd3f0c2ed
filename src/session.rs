//! Wallet session: connection lifecycle against a `WalletProvider` and the
//! refreshes that follow every change of account or network.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::network::{resolve_network, Network};
use crate::notifications::NotificationEntry;
use crate::reader::ChainReader;
use crate::rest::ReadApi;
use crate::state::{ConnectionStatus, SessionState, SessionStore};
use crate::types::{AccountInfo, NetworkInfo};
use crate::units;
use crate::wallet::{WalletError, WalletProvider};

/// A single wallet session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WalletSession {
    wallet: Option<Arc<dyn WalletProvider>>,
    reader: ChainReader,
    store: SessionStore,
    config: SessionConfig,
}

impl WalletSession {
    /// `wallet` is the provider detected in this environment, if any.
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        api: Arc<dyn ReadApi>,
        config: SessionConfig,
    ) -> Self {
        let store = SessionStore::new(SessionState::new(wallet.is_some()));
        let reader = ChainReader::new(api, config.history_limit);
        Self {
            wallet,
            reader,
            store,
            config,
        }
    }

    pub fn check_installed(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn reader(&self) -> &ChainReader {
        &self.reader
    }

    pub(crate) fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    pub(crate) fn wallet(&self) -> Result<&Arc<dyn WalletProvider>, SessionError> {
        self.wallet.as_ref().ok_or(SessionError::NotInstalled)
    }

    pub fn clear_error(&self) {
        self.store.update_if(|s| s.error.take().is_some());
    }

    /// Restore a session the provider already has, without prompting.
    /// Any failure is logged and leaves the session disconnected.
    pub async fn check_existing_connection(&self) -> Option<AccountInfo> {
        let wallet = self.wallet.as_ref()?;
        match restore(wallet.as_ref()).await {
            Ok(Some((account, network))) => {
                info!("Restored wallet session for {}", account.address);
                self.apply_connection(account.clone(), &network);
                Some(account)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Could not restore wallet session: {}", e);
                None
            }
        }
    }

    /// Run the provider's connect flow
    pub async fn connect(&self) -> Result<AccountInfo, SessionError> {
        let wallet = self.wallet()?.clone();
        self.store.update(|s| {
            s.connecting = true;
            s.error = None;
        });

        let result = async {
            let account = wallet.connect().await?;
            let network = wallet.network().await?;
            Ok::<_, WalletError>((account, network))
        }
        .await;

        match result {
            Ok((account, network)) => {
                info!("Wallet connected: {} on {}", account.address, network.name);
                self.apply_connection(account.clone(), &network);
                self.store.update(|s| {
                    s.connecting = false;
                    s.notify(NotificationEntry::success(format!(
                        "Connected {}",
                        units::truncate_address(&account.address)
                    )));
                });
                Ok(account)
            }
            Err(e) => {
                let err = SessionError::connection(e);
                warn!("{}", err);
                self.store.update(|s| {
                    s.connecting = false;
                    s.clear_connection();
                    s.error = Some(err.to_string());
                    s.notify(NotificationEntry::error(err.to_string()));
                });
                Err(err)
            }
        }
    }

    /// Disconnect from the provider. Local state is cleared even when the
    /// provider call fails.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let wallet = self.wallet()?.clone();
        let result = wallet.disconnect().await.map_err(SessionError::connection);

        self.store.update(|s| {
            s.clear_connection();
            match &result {
                Ok(()) => {
                    s.error = None;
                    s.notify(NotificationEntry::info("Wallet disconnected"));
                }
                Err(e) => {
                    s.error = Some(e.to_string());
                    s.notify(NotificationEntry::error(e.to_string()));
                }
            }
        });

        match &result {
            Ok(()) => info!("Wallet disconnected"),
            Err(e) => warn!("{} (local session cleared)", e),
        }
        result
    }

    /// The provider switched accounts on its own. `None` means it no longer
    /// exposes an account, which is treated as a disconnect.
    ///
    /// Spawns the follow-up refresh, so it must be called within a Tokio runtime.
    pub fn handle_account_changed(&self, account: Option<AccountInfo>) {
        let Some(account) = account else {
            self.handle_provider_disconnected();
            return;
        };
        let changed = self.store.update_if(|s| {
            if !s.status.is_connected() || s.account.as_ref() == Some(&account) {
                return false;
            }
            s.account = Some(account.clone());
            s.clear_reads();
            true
        });
        if changed {
            info!("Wallet account changed to {}", account.address);
            self.trigger_refresh();
        }
    }

    /// The provider switched networks on its own.
    ///
    /// Spawns the follow-up refresh, so it must be called within a Tokio runtime.
    pub fn handle_network_changed(&self, network: NetworkInfo) {
        let resolved = resolve_network(&network).map(|n| n.network);
        let changed = self.store.update_if(|s| {
            if !s.status.is_connected() || s.network == resolved {
                return false;
            }
            s.network = resolved;
            s.clear_reads();
            true
        });
        if changed {
            info!("Wallet network changed to {}", network.name);
            self.trigger_refresh();
        }
    }

    /// The provider ended the session on its own
    pub fn handle_provider_disconnected(&self) {
        let was_connected = self.store.update_if(|s| {
            if !s.status.is_connected() {
                return false;
            }
            s.clear_connection();
            s.notify(NotificationEntry::info("Wallet disconnected"));
            true
        });
        if was_connected {
            info!("Wallet disconnected by provider");
        }
    }

    /// Re-read balance and transactions now and wait for both
    pub async fn refresh(&self) {
        self.reader.refresh(&self.store).await;
    }

    pub async fn refresh_balance(&self) -> bool {
        self.reader.refresh_balance(&self.store).await
    }

    pub async fn refresh_transactions(&self) -> bool {
        self.reader.refresh_transactions(&self.store).await
    }

    /// Start a balance read and a transaction read in the background.
    /// Loading flags are raised before this returns.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn trigger_refresh(&self) {
        let readable = self.store.update_if(|s| {
            if s.read_tag().is_none() {
                return false;
            }
            s.balance_loading = true;
            s.transactions_loading = true;
            true
        });
        if !readable {
            debug!("Nothing to refresh: no connected account on a supported network");
            return;
        }

        let balance = self.clone();
        tokio::spawn(async move {
            balance.refresh_balance().await;
        });
        let transactions = self.clone();
        tokio::spawn(async move {
            transactions.refresh_transactions().await;
        });
    }

    /// Refresh after `delay`, giving the provider and node time to settle.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn schedule_refresh(&self, delay: Duration) {
        let session = self.clone();
        debug!("Refresh scheduled in {:?}", delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.refresh().await;
        });
    }

    fn apply_connection(&self, account: AccountInfo, network: &NetworkInfo) {
        let resolved = resolve_network(network).map(|n| n.network);
        if resolved.is_none() {
            warn!(
                "Wallet is on unsupported network '{}' (chain {}); balance and history unavailable",
                network.name, network.chain_id
            );
        }
        self.store.update(|s| {
            s.status = ConnectionStatus::Connected;
            s.account = Some(account);
            s.network = resolved;
            s.clear_reads();
        });
        self.trigger_refresh();
    }

    /// Move the session to `network`, but only if it is still connected to
    /// `account`. Returns false when the session has moved on.
    pub(crate) fn set_network(&self, account: &AccountInfo, network: Network) -> bool {
        self.store.update_if(|s| {
            if !s.status.is_connected() || s.account.as_ref() != Some(account) {
                return false;
            }
            s.network = Some(network);
            s.clear_reads();
            true
        })
    }
}

async fn restore(
    wallet: &dyn WalletProvider,
) -> Result<Option<(AccountInfo, NetworkInfo)>, WalletError> {
    if !wallet.is_connected().await? {
        return Ok(None);
    }
    let account = wallet.account().await?;
    let network = wallet.network().await?;
    Ok(Some((account, network)))
}
