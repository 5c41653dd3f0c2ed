//! In-memory wallet and read API used by the unit tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::network::Network;
use crate::rest::ReadApi;
use crate::types::{AccountInfo, EntryFunctionPayload, NetworkInfo, PendingTransaction, TransactionRecord};
use crate::wallet::{WalletError, WalletProvider};

pub const ADDRESS: &str = "0xabc";
pub const PUBLIC_KEY: &str = "0xdef";

pub fn account(address: &str) -> AccountInfo {
    AccountInfo {
        address: address.to_string(),
        public_key: PUBLIC_KEY.to_string(),
    }
}

pub fn record(hash: &str) -> TransactionRecord {
    TransactionRecord {
        hash: hash.to_string(),
        gas_used: "10".to_string(),
        success: true,
        timestamp: "1700000000000000".to_string(),
        kind: "user_transaction".to_string(),
        payload: None,
    }
}

pub struct FakeWallet {
    pub account: Mutex<AccountInfo>,
    pub network: Mutex<NetworkInfo>,
    pub connected: AtomicBool,
    pub connect_error: Mutex<Option<WalletError>>,
    pub account_error: Mutex<Option<WalletError>>,
    pub disconnect_error: Mutex<Option<WalletError>>,
    pub change_network_error: Mutex<Option<WalletError>>,
    pub submit_error: Mutex<Option<WalletError>>,
    pub change_network_calls: AtomicUsize,
    pub submitted: Mutex<Vec<EntryFunctionPayload>>,
    network_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeWallet {
    pub fn new(network: Network) -> Arc<Self> {
        Arc::new(Self {
            account: Mutex::new(account(ADDRESS)),
            network: Mutex::new(network.config().to_info()),
            connected: AtomicBool::new(false),
            connect_error: Mutex::new(None),
            account_error: Mutex::new(None),
            disconnect_error: Mutex::new(None),
            change_network_error: Mutex::new(None),
            submit_error: Mutex::new(None),
            change_network_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            network_gate: Mutex::new(None),
        })
    }

    pub fn fail(slot: &Mutex<Option<WalletError>>, message: &str) {
        *slot.lock().unwrap() = Some(WalletError::Provider(message.to_string()));
    }

    /// Make `change_network` wait until `release_network_change` is called
    pub fn hold_network_change(&self) {
        *self.network_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_network_change(&self) {
        if let Some(gate) = self.network_gate.lock().unwrap().take() {
            gate.add_permits(1);
        }
    }

    fn check(slot: &Mutex<Option<WalletError>>) -> Result<(), WalletError> {
        match slot.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn connect(&self) -> Result<AccountInfo, WalletError> {
        Self::check(&self.connect_error)?;
        self.connected.store(true, Ordering::SeqCst);
        Ok(self.account.lock().unwrap().clone())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Self::check(&self.disconnect_error)?;
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> Result<bool, WalletError> {
        Ok(self.connected.load(Ordering::SeqCst))
    }

    async fn account(&self) -> Result<AccountInfo, WalletError> {
        Self::check(&self.account_error)?;
        Ok(self.account.lock().unwrap().clone())
    }

    async fn network(&self) -> Result<NetworkInfo, WalletError> {
        Ok(self.network.lock().unwrap().clone())
    }

    async fn change_network(&self, network: &NetworkInfo) -> Result<(), WalletError> {
        self.change_network_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.network_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        Self::check(&self.change_network_error)?;
        *self.network.lock().unwrap() = network.clone();
        Ok(())
    }

    async fn sign_and_submit_transaction(
        &self,
        payload: &EntryFunctionPayload,
    ) -> Result<PendingTransaction, WalletError> {
        Self::check(&self.submit_error)?;
        self.submitted.lock().unwrap().push(payload.clone());
        Ok(PendingTransaction {
            hash: "0x9f3a0b5c7d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f70".to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeReadApi {
    pub balances: Mutex<HashMap<String, String>>,
    pub transactions: Mutex<HashMap<String, Vec<TransactionRecord>>>,
    pub fail_balance: AtomicBool,
    pub fail_transactions: AtomicBool,
    pub balance_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,
    pub last_limit: AtomicUsize,
    pub base_urls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeReadApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_balance(&self, address: &str, octas: &str) {
        self.balances.lock().unwrap().insert(address.to_string(), octas.to_string());
    }

    pub fn set_transactions(&self, address: &str, records: Vec<TransactionRecord>) {
        self.transactions.lock().unwrap().insert(address.to_string(), records);
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent read wait until `release` is called
    pub fn hold(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    async fn wait_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
    }
}

#[async_trait]
impl ReadApi for FakeReadApi {
    async fn coin_balance(&self, base_url: &str, address: &str) -> Result<String> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.base_urls.lock().unwrap().push(base_url.to_string());
        self.wait_gate().await;
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(anyhow!("GET balance returned 404 Not Found"));
        }
        self.balances
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| anyhow!("resource_not_found"))
    }

    async fn account_transactions(
        &self,
        base_url: &str,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        self.base_urls.lock().unwrap().push(base_url.to_string());
        self.wait_gate().await;
        if self.fail_transactions.load(Ordering::SeqCst) {
            return Err(anyhow!("GET transactions returned 500 Internal Server Error"));
        }
        let mut records = self
            .transactions
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default();
        records.truncate(limit);
        Ok(records)
    }
}
