use crate::error::SwapError;
use crate::network::{Network, SendOptions};
use crate::swap_client::{Quote, SwapApi};
use crate::wallet::Wallet;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use solana_sdk::{signature::Signature, transaction::VersionedTransaction};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SwapReceipt {
    pub signature: Signature,
    pub explorer_url: String,
    pub confirmed_at: DateTime<Utc>,
}

/// Build, sign, submit and confirm a swap for a retained quote.
///
/// Nothing is retried here; `max_retries` only reaches the RPC node.
pub struct SwapExecutor {
    api: Arc<dyn SwapApi>,
    wallet: Arc<dyn Wallet>,
    network: Arc<dyn Network>,
    send_options: SendOptions,
    explorer_url: String,
}

pub fn decode_transaction(encoded: &str) -> Result<VersionedTransaction, SwapError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SwapError::Decode(e.to_string()))?;
    bincode::deserialize(&bytes).map_err(|e| SwapError::Decode(e.to_string()))
}

impl SwapExecutor {
    pub fn new(
        api: Arc<dyn SwapApi>,
        wallet: Arc<dyn Wallet>,
        network: Arc<dyn Network>,
        max_retries: usize,
        explorer_url: String,
    ) -> Self {
        Self {
            api,
            wallet,
            network,
            send_options: SendOptions {
                skip_preflight: true,
                max_retries,
            },
            explorer_url,
        }
    }

    pub async fn execute(&self, quote: &Quote) -> Result<SwapReceipt, SwapError> {
        if !self.wallet.is_connected() || !self.wallet.can_sign() {
            return Err(SwapError::WalletUnavailable);
        }
        let user = self
            .wallet
            .public_key()
            .ok_or(SwapError::WalletUnavailable)?;

        let encoded = self
            .api
            .swap_transaction(quote, &user.to_string(), true)
            .await?;
        let transaction = decode_transaction(&encoded)?;

        let signed = self.wallet.sign_transaction(transaction).await?;
        let signature = self
            .network
            .send_transaction(&signed, self.send_options)
            .await?;
        log::info!("Submitted {}, waiting for confirmation", signature);

        let blockhash = self.network.latest_blockhash().await?;
        log::debug!(
            "Confirming {} against {} (valid until height {})",
            signature,
            blockhash.blockhash,
            blockhash.last_valid_block_height
        );
        self.network
            .confirm_transaction(&signature, &blockhash)
            .await?;

        Ok(SwapReceipt {
            signature,
            explorer_url: format!("{}/{}", self.explorer_url, signature),
            confirmed_at: Utc::now(),
        })
    }
}
