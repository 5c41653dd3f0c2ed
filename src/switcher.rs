use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::network::Network;
use crate::notifications::NotificationEntry;
use crate::session::WalletSession;
use crate::state::ConnectionStatus;

/// Moves the connected wallet to another network.
#[derive(Clone)]
pub struct NetworkSwitcher {
    session: WalletSession,
    settle_delay: Duration,
}

impl NetworkSwitcher {
    pub fn new(session: WalletSession) -> Self {
        let settle_delay = session.config().network_settle_delay();
        Self {
            session,
            settle_delay,
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Ask the provider to switch to `target`.
    ///
    /// On success the session's network changes immediately and balance and
    /// history are re-read once the settling delay has passed. On failure
    /// the previous network stays active. If the session is disconnected or
    /// changes account while the provider is switching, the result is
    /// discarded and `NotConnected` is returned.
    pub async fn switch_network(&self, target: Network) -> Result<(), SessionError> {
        let wallet = self.session.wallet()?.clone();
        let store = self.session.store();
        let connected = store.read(|s| match (&s.status, &s.account) {
            (ConnectionStatus::Connected, Some(account)) => Some((account.clone(), s.network)),
            _ => None,
        });
        let Some((account, current)) = connected else {
            return Err(SessionError::NotConnected);
        };

        if current == Some(target) {
            info!("Already on {}, refreshing", target);
            self.session.schedule_refresh(self.settle_delay);
            return Ok(());
        }

        store.update(|s| {
            s.switching = true;
            s.error = None;
        });

        match wallet.change_network(&target.config().to_info()).await {
            Ok(()) => {
                if !self.session.set_network(&account, target) {
                    debug!(
                        "Session changed while switching to {}, discarding the switch",
                        target
                    );
                    store.update(|s| s.switching = false);
                    return Err(SessionError::NotConnected);
                }
                info!("Switched network to {}", target);
                store.update(|s| {
                    s.switching = false;
                    s.notify(NotificationEntry::success(format!("Switched to {}", target)));
                });
                self.session.schedule_refresh(self.settle_delay);
                Ok(())
            }
            Err(e) => {
                let err = SessionError::network_switch(e);
                warn!("{}", err);
                store.update(|s| {
                    s.switching = false;
                    s.error = Some(err.to_string());
                    s.notify(NotificationEntry::error(err.to_string()));
                });
                Err(err)
            }
        }
    }
}
