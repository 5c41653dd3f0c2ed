//! Read-only access to the full-node REST API.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::types::{TransactionRecord, COIN_STORE_RESOURCE};

/// Read side of a network. `base_url` is the network's REST root, e.g.
/// `https://fullnode.testnet.aptoslabs.com/v1`.
#[async_trait]
pub trait ReadApi: Send + Sync {
    /// Native coin balance in octas, as the integer string the API returns
    async fn coin_balance(&self, base_url: &str, address: &str) -> Result<String>;

    /// Most recent transactions sent by `address`, newest first as returned by the API
    async fn account_transactions(
        &self,
        base_url: &str,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>>;
}

/// `ReadApi` over HTTP
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        debug!("GET {}", url);
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {}", url, status));
        }
        Ok(resp.json::<Value>().await?)
    }
}

#[async_trait]
impl ReadApi for RestClient {
    async fn coin_balance(&self, base_url: &str, address: &str) -> Result<String> {
        let url = resource_url(base_url, address, COIN_STORE_RESOURCE)?;
        let body = self.get_json(url).await?;
        coin_value(&body)
    }

    async fn account_transactions(
        &self,
        base_url: &str,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>> {
        let url = transactions_url(base_url, address, limit)?;
        let body = self.get_json(url).await?;
        Ok(serde_json::from_value(body)?)
    }
}

fn account_url(base_url: &str, address: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Invalid REST base URL '{}'", base_url))?
        .pop_if_empty()
        .push("accounts")
        .push(address);
    Ok(url)
}

/// `{base}/accounts/{address}/resource/{resource_type}`
pub fn resource_url(base_url: &str, address: &str, resource_type: &str) -> Result<Url> {
    let mut url = account_url(base_url, address)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Invalid REST base URL '{}'", base_url))?
        .push("resource")
        .push(resource_type);
    Ok(url)
}

/// `{base}/accounts/{address}/transactions?limit={limit}`
pub fn transactions_url(base_url: &str, address: &str, limit: usize) -> Result<Url> {
    let mut url = account_url(base_url, address)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Invalid REST base URL '{}'", base_url))?
        .push("transactions");
    url.query_pairs_mut().append_pair("limit", &limit.to_string());
    Ok(url)
}

/// Pull `coin.value` out of a CoinStore resource. The REST API wraps the
/// resource as `{ "type": ..., "data": { "coin": { "value": ... } } }`; the bare
/// `{ "coin": { "value": ... } }` form is accepted too.
pub fn coin_value(body: &Value) -> Result<String> {
    body.pointer("/data/coin/value")
        .or_else(|| body.pointer("/coin/value"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("CoinStore response has no coin value"))
}
