use crate::error::NetworkError;
use async_trait::async_trait;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::VersionedTransaction,
};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub max_retries: usize,
}

/// Reference point the confirmation loop checks expiry against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockhashInfo {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Network: Send + Sync {
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, NetworkError>;

    async fn latest_blockhash(&self) -> Result<BlockhashInfo, NetworkError>;

    /// Resolves once `signature` reaches `confirmed` commitment.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
    ) -> Result<(), NetworkError>;
}

#[derive(Debug, PartialEq, Eq)]
enum Confirmation {
    Confirmed,
    Failed(String),
    Expired,
    Pending,
}

fn check_confirmation(
    status: Option<Result<(), String>>,
    block_height: Option<u64>,
    last_valid_block_height: u64,
) -> Confirmation {
    match (status, block_height) {
        (Some(Ok(())), _) => Confirmation::Confirmed,
        (Some(Err(reason)), _) => Confirmation::Failed(reason),
        (None, Some(height)) if height > last_valid_block_height => Confirmation::Expired,
        (None, _) => Confirmation::Pending,
    }
}

pub struct SolanaNetwork {
    rpc: RpcClient,
    poll_interval: Duration,
    timeout: Duration,
}

impl SolanaNetwork {
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        Self::with_client(RpcClient::new(rpc_url), Duration::from_millis(500), timeout)
    }

    pub fn with_client(rpc: RpcClient, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            rpc,
            poll_interval,
            timeout,
        }
    }

    fn commitment() -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }
}

#[async_trait]
impl Network for SolanaNetwork {
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, NetworkError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            max_retries: Some(options.max_retries),
            ..RpcSendTransactionConfig::default()
        };
        self.rpc
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| NetworkError::Rpc(e.to_string()))
    }

    async fn latest_blockhash(&self) -> Result<BlockhashInfo, NetworkError> {
        let (blockhash, last_valid_block_height) = self
            .rpc
            .get_latest_blockhash_with_commitment(Self::commitment())
            .await
            .map_err(|e| NetworkError::Rpc(e.to_string()))?;
        Ok(BlockhashInfo {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
    ) -> Result<(), NetworkError> {
        let start = Instant::now();
        loop {
            if start.elapsed() >= self.timeout {
                return Err(NetworkError::Timeout(signature.to_string()));
            }

            // Transient RPC errors keep the loop going until timeout.
            let status = match self
                .rpc
                .get_signature_status_with_commitment(signature, Self::commitment())
                .await
            {
                Ok(status) => status.map(|res| res.map_err(|e| e.to_string())),
                Err(e) => {
                    log::warn!("Signature status for {} unavailable: {}", signature, e);
                    None
                }
            };
            // An unknown height never expires the transaction; only the timeout can.
            let block_height = if status.is_none() {
                match self
                    .rpc
                    .get_block_height_with_commitment(Self::commitment())
                    .await
                {
                    Ok(height) => Some(height),
                    Err(e) => {
                        log::warn!(
                            "Block height unavailable while confirming {}: {}",
                            signature,
                            e
                        );
                        None
                    }
                }
            } else {
                None
            };

            match check_confirmation(status, block_height, blockhash.last_valid_block_height) {
                Confirmation::Confirmed => return Ok(()),
                Confirmation::Failed(reason) => {
                    return Err(NetworkError::TransactionFailed {
                        signature: signature.to_string(),
                        reason,
                    })
                }
                Confirmation::Expired => {
                    return Err(NetworkError::BlockhashExpired(signature.to_string()))
                }
                Confirmation::Pending => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}
