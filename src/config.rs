use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct SwapConfig {
    /// Base URL of the Jupiter quote API, e.g. `https://quote-api.jup.ag/v6`
    pub jupiter_api_url: String,
    pub rpc_url: String,
    /// Base58 secret key. Without it the wallet starts disconnected.
    #[serde(default)]
    pub wallet_keypair: Option<String>,
    /// Allowed slippage in basis points (1 bp = 0.01%). Defaults to 50 (0.5%)
    #[serde(default)]
    pub slippage_bps: Option<u16>,
    /// Quiet period after the last amount change before quoting. Defaults to 500ms
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    /// Passed straight through to `sendTransaction`. Defaults to 2
    #[serde(default)]
    pub max_retries: Option<usize>,
    /// Max seconds to wait for tx confirmation. Defaults to 60s
    #[serde(default)]
    pub tx_confirm_secs: Option<u64>,
    #[serde(default)]
    pub explorer_url: Option<String>,
}

impl SwapConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config '{}': {}", path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content).map_err(|e| anyhow!(e))?;
        if cfg.jupiter_api_url.trim().is_empty() {
            return Err(anyhow!("jupiter_api_url must not be empty"));
        }
        if cfg.rpc_url.trim().is_empty() {
            return Err(anyhow!("rpc_url must not be empty"));
        }
        Ok(cfg)
    }

    pub fn slippage_bps(&self) -> u16 {
        self.slippage_bps.unwrap_or(50)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(500))
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries.unwrap_or(2)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.tx_confirm_secs.unwrap_or(60))
    }

    pub fn explorer_url(&self) -> &str {
        self.explorer_url
            .as_deref()
            .unwrap_or("https://solscan.io/tx")
            .trim_end_matches('/')
    }
}
