//! Balance and transaction history reads for the connected account.
//!
//! Reads are background work: failures never reach `SessionState::error`.
//! A failed balance read shows as zero, a failed history read keeps the
//! previous list. Every read is tagged with the (address, network) it was
//! issued for, and its result is dropped if the session has moved on by the
//! time it resolves.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::network::NetworkConfig;
use crate::rest::ReadApi;
use crate::state::{ReadTag, SessionState, SessionStore, ZERO_BALANCE};
use crate::types::TransactionRecord;
use crate::units;

#[derive(Clone)]
pub struct ChainReader {
    api: Arc<dyn ReadApi>,
    history_limit: usize,
}

impl ChainReader {
    pub fn new(api: Arc<dyn ReadApi>, history_limit: usize) -> Self {
        Self { api, history_limit }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Display balance for `address`, or `"0"` if it cannot be read
    pub async fn fetch_balance(&self, address: &str, network: &NetworkConfig) -> String {
        let value = match self.api.coin_balance(network.url, address).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Balance read for {} on {} failed: {}", address, network.name, e);
                return ZERO_BALANCE.to_string();
            }
        };
        match units::format_coin_value(&value) {
            Ok(balance) => balance,
            Err(e) => {
                warn!("Balance for {} on {} unparsable: {}", address, network.name, e);
                ZERO_BALANCE.to_string()
            }
        }
    }

    /// Most recent transactions for `address`, bounded by the history limit
    pub async fn fetch_transactions(
        &self,
        address: &str,
        network: &NetworkConfig,
    ) -> anyhow::Result<Vec<TransactionRecord>> {
        let mut records = self
            .api
            .account_transactions(network.url, address, self.history_limit)
            .await?;
        records.truncate(self.history_limit);
        Ok(records)
    }

    /// Read the balance for the session's current account and store it.
    /// Returns false if there was nothing to read or the result went stale.
    pub async fn refresh_balance(&self, store: &SessionStore) -> bool {
        let Some(tag) = begin_read(store, |s| s.balance_loading = true) else {
            return false;
        };

        let balance = self.fetch_balance(&tag.address, tag.network.config()).await;

        let applied = store.update_if(|s| {
            if s.read_tag().as_ref() != Some(&tag) {
                return false;
            }
            s.balance = balance;
            s.balance_loading = false;
            true
        });
        if !applied {
            debug!("Dropped stale balance for {} on {}", tag.address, tag.network);
        }
        applied
    }

    /// Read recent transactions for the session's current account and store them.
    /// On failure the previous list is kept.
    pub async fn refresh_transactions(&self, store: &SessionStore) -> bool {
        let Some(tag) = begin_read(store, |s| s.transactions_loading = true) else {
            return false;
        };

        let result = self.fetch_transactions(&tag.address, tag.network.config()).await;
        if let Err(e) = &result {
            warn!(
                "Transaction read for {} on {} failed: {}",
                tag.address, tag.network, e
            );
        }

        let applied = store.update_if(|s| {
            if s.read_tag().as_ref() != Some(&tag) {
                return false;
            }
            if let Ok(records) = result {
                s.transactions = records;
            }
            s.transactions_loading = false;
            true
        });
        if !applied {
            debug!("Dropped stale transactions for {} on {}", tag.address, tag.network);
        }
        applied
    }

    /// Refresh balance and transactions concurrently
    pub async fn refresh(&self, store: &SessionStore) {
        tokio::join!(self.refresh_balance(store), self.refresh_transactions(store));
    }
}

/// Tag a read with the current (address, network) and mark it loading
fn begin_read(store: &SessionStore, mark: impl FnOnce(&mut SessionState)) -> Option<ReadTag> {
    let mut tag = None;
    store.update_if(|s| {
        tag = s.read_tag();
        if tag.is_some() {
            mark(s);
            true
        } else {
            false
        }
    });
    tag
}
