use anyhow::{anyhow, Result};
use aptos_connect::{
    config::SessionConfig,
    history,
    rest::RestClient,
    session::WalletSession,
    units,
    wallet::WatchOnlyWallet,
};
use std::env;
use std::fs::File;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Watch-only session: connects to `APTOS_WATCH_ADDRESS` on `APTOS_NETWORK`,
/// prints its balance and recent transactions, and optionally writes the
/// history to the CSV file named by `APTOS_EXPORT_CSV`.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SessionConfig::from_env();
    let address = env::var("APTOS_WATCH_ADDRESS")
        .map_err(|_| anyhow!("APTOS_WATCH_ADDRESS must be set to the account to watch"))?;

    let wallet = Arc::new(WatchOnlyWallet::new(&address, config.default_network)?);
    let api = Arc::new(RestClient::new(config.request_timeout())?);
    let session = WalletSession::new(Some(wallet), api, config);

    // connect starts the balance and history reads; wait for them to land
    let account = session.connect().await?;
    session
        .subscribe()
        .wait_for(|s| !s.is_loading())
        .await
        .map_err(|_| anyhow!("Session closed before the first refresh finished"))?;

    let state = session.state();
    let network = state
        .network_config()
        .ok_or_else(|| anyhow!("Wallet is on an unsupported network"))?;
    println!("{} on {}", account.address, network.name);
    println!("Balance: {} APT", state.balance);
    println!("{}", history::summarize(&state.transactions).summary());
    for tx in &state.transactions {
        println!(
            "  {}  {}  {}  {}",
            units::format_timestamp(&tx.timestamp),
            units::truncate_hash(&tx.hash),
            if tx.success { "ok    " } else { "failed" },
            tx.function().unwrap_or(&tx.kind)
        );
    }
    println!("Explorer: {}", network.account_explorer_url(&account.address));

    if let Ok(path) = env::var("APTOS_EXPORT_CSV") {
        history::write_csv(&state.transactions, File::create(&path)?)?;
        info!("Exported {} transactions to {}", state.transactions.len(), path);
    }

    session.disconnect().await?;
    Ok(())
}
