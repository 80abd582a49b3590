//! Token swap terminal using the Jupiter Aggregator
//! High-level architecture:
//! - Quotes via the Jupiter quote API, debounced on input
//! - Swap transactions built by the Jupiter swap API
//! - Signing with a local keypair wallet
//! - Submission and confirmation via Solana RPC

mod app;
mod assets;
mod cli;
mod config;
mod debounce;
mod error;
mod executor;
mod network;
mod panel;
mod quoter;
mod swap_client;
mod wallet;

#[cfg(test)]
mod testing;

use anyhow::Result;
use app::SwapApp;
use config::SwapConfig;
use executor::SwapExecutor;
use network::SolanaNetwork;
use quoter::QuoteFetcher;
use std::sync::Arc;
use structopt::StructOpt;
use swap_client::{SwapApi, SwapClient};
use tokio::signal;
use wallet::KeypairWallet;

#[derive(StructOpt, Debug)]
#[structopt(name = "token_swap")]
struct Cli {
    /// Path to config file
    #[structopt(short, long, default_value = "swap.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::from_args();
    let cfg = SwapConfig::from_file(&args.config)?;

    let wallet = Arc::new(match &cfg.wallet_keypair {
        Some(secret) => KeypairWallet::from_base58(secret)?,
        None => {
            log::warn!("No wallet_keypair configured; quotes only");
            KeypairWallet::empty()
        }
    });
    let api: Arc<dyn SwapApi> = Arc::new(SwapClient::new(cfg.jupiter_api_url.clone()));
    let network = Arc::new(SolanaNetwork::new(cfg.rpc_url.clone(), cfg.confirm_timeout()));

    let fetcher = QuoteFetcher::new(api.clone(), cfg.slippage_bps());
    let executor = SwapExecutor::new(
        api,
        wallet.clone(),
        network,
        cfg.max_retries(),
        cfg.explorer_url().to_string(),
    );
    let app = Arc::new(SwapApp::new(fetcher, executor, cfg.debounce()));

    tokio::select! {
        res = cli::run(app, wallet) => res?,
        _ = signal::ctrl_c() => {
            log::info!("Shutdown signal received");
        }
    }
    Ok(())
}
