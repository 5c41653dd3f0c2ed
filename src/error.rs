use thiserror::Error;

use crate::wallet::WalletError;

/// Errors surfaced to the user by session operations.
///
/// Background reads never produce these; they degrade to defaults and log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Wallet is not installed")]
    NotInstalled,
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Network switch failed: {0}")]
    NetworkSwitch(String),
    #[error("Transaction failed: {0}")]
    Submission(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("A transaction is already being submitted")]
    Busy,
}

impl SessionError {
    pub(crate) fn connection(err: WalletError) -> Self {
        SessionError::Connection(err.to_string())
    }

    pub(crate) fn network_switch(err: WalletError) -> Self {
        SessionError::NetworkSwitch(err.to_string())
    }

    pub(crate) fn submission(err: WalletError) -> Self {
        SessionError::Submission(err.to_string())
    }
}
