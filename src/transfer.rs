//! Native coin transfers signed and submitted by the wallet provider.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::SessionError;
use crate::notifications::NotificationEntry;
use crate::session::WalletSession;
use crate::types::EntryFunctionPayload;
use crate::units;

/// Recipient/amount form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub recipient: String,
    /// Amount in APT as typed by the user
    pub amount: String,
    pub sending: bool,
}

/// Build the transfer payload for a recipient and a display amount.
/// Only emptiness and amount syntax are checked; the provider and the chain
/// validate everything else.
pub fn build_transfer_payload(recipient: &str, amount: &str) -> Result<EntryFunctionPayload, SessionError> {
    let recipient = recipient.trim();
    if recipient.is_empty() || amount.trim().is_empty() {
        return Err(SessionError::InvalidInput(
            "Recipient and amount are required".to_string(),
        ));
    }
    let octas = units::parse_apt(amount).map_err(|e| SessionError::InvalidInput(e.to_string()))?;
    Ok(EntryFunctionPayload::coin_transfer(recipient, octas))
}

/// Submits transfers from the connected account.
#[derive(Clone)]
pub struct TransferSubmitter {
    session: WalletSession,
    form: Arc<Mutex<TransferForm>>,
    refresh_delay: Duration,
}

impl TransferSubmitter {
    pub fn new(session: WalletSession) -> Self {
        let refresh_delay = session.config().transfer_refresh_delay();
        Self {
            session,
            form: Arc::new(Mutex::new(TransferForm::default())),
            refresh_delay,
        }
    }

    fn form_mut(&self) -> MutexGuard<'_, TransferForm> {
        // The form holds plain strings; a panic mid-edit leaves nothing inconsistent
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn form(&self) -> TransferForm {
        self.form_mut().clone()
    }

    pub fn set_recipient(&self, recipient: impl Into<String>) {
        self.form_mut().recipient = recipient.into();
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        self.form_mut().amount = amount.into();
    }

    pub fn is_sending(&self) -> bool {
        self.form_mut().sending
    }

    /// Submit the transfer currently in the form and return its hash.
    ///
    /// On success the form is cleared and a refresh is scheduled; on failure
    /// the inputs are kept so the user can retry.
    pub async fn submit(&self) -> Result<String, SessionError> {
        let wallet = self.session.wallet()?.clone();
        if !self.session.state().status.is_connected() {
            return Err(SessionError::NotConnected);
        }

        let payload = {
            let mut form = self.form_mut();
            if form.sending {
                return Err(SessionError::Busy);
            }
            let payload = build_transfer_payload(&form.recipient, &form.amount)?;
            form.sending = true;
            payload
        };

        let store = self.session.store();
        store.update(|s| s.error = None);
        info!(
            "Submitting transfer of {} octas to {}",
            payload.arguments[1], payload.arguments[0]
        );

        let result = wallet.sign_and_submit_transaction(&payload).await;

        match result {
            Ok(pending) => {
                {
                    let mut form = self.form_mut();
                    form.recipient.clear();
                    form.amount.clear();
                    form.sending = false;
                }
                let explorer = store.read(|s| s.network_config().map(|n| n.tx_explorer_url(&pending.hash)));
                info!("Transfer submitted: {}", pending.hash);
                store.update(|s| {
                    let mut message = format!("Transaction submitted: {}", units::truncate_hash(&pending.hash));
                    if let Some(url) = &explorer {
                        message.push_str(&format!(" ({})", url));
                    }
                    s.notify(NotificationEntry::success(message));
                });
                self.session.schedule_refresh(self.refresh_delay);
                Ok(pending.hash)
            }
            Err(e) => {
                self.form_mut().sending = false;
                let err = SessionError::submission(e);
                warn!("{}", err);
                store.update(|s| {
                    s.error = Some(err.to_string());
                    s.notify(NotificationEntry::error(err.to_string()));
                });
                Err(err)
            }
        }
    }
}
