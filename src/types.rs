//! Common types shared across modules.

use serde::{Deserialize, Serialize};

/// Native coin type tag
pub const APTOS_COIN_TYPE: &str = "0x1::aptos_coin::AptosCoin";

/// Entry function used for native coin transfers
pub const COIN_TRANSFER_FUNCTION: &str = "0x1::coin::transfer";

/// Resource holding an account's native coin balance
pub const COIN_STORE_RESOURCE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// Account returned by the wallet provider on connect or restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// Network as reported by (or sent to) the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    #[serde(rename = "chainId")]
    pub chain_id: String,
    pub url: String,
}

/// Transaction handle returned by the provider after sign-and-submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

/// A committed transaction as listed by `/accounts/{address}/transactions`.
/// Fields are kept verbatim from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    #[serde(default)]
    pub gas_used: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl TransactionRecord {
    /// Entry function called by this transaction, if any
    pub fn function(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("function"))
            .and_then(|f| f.as_str())
    }

    pub fn gas_used_units(&self) -> u64 {
        self.gas_used.parse().unwrap_or(0)
    }
}

/// Payload handed to the wallet provider for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

impl EntryFunctionPayload {
    /// Native coin transfer of `octas` to `recipient`
    pub fn coin_transfer(recipient: &str, octas: u64) -> Self {
        Self {
            kind: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: COIN_TRANSFER_FUNCTION.to_string(),
            type_arguments: vec![APTOS_COIN_TYPE.to_string()],
            arguments: vec![recipient.to_string(), octas.to_string()],
        }
    }
}
