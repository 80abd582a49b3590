//! Fixtures shared by the mocked API, wallet and network tests.

use crate::error::{ApiError, NetworkError};
use crate::network::{BlockhashInfo, MockNetwork, Network, SendOptions};
use crate::swap_client::{Quote, QuoteRequest, SwapApi};
use crate::wallet::MockWallet;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::VersionedTransaction,
};
use std::time::Duration;

/// An unsigned v0 transaction with `payer` as fee payer and only signer.
pub fn unsigned_transaction(payer: &Pubkey) -> VersionedTransaction {
    let ix = Instruction::new_with_bytes(
        Pubkey::new_unique(),
        &[1],
        vec![AccountMeta::new(*payer, true)],
    );
    let message = v0::Message::try_compile(payer, &[ix], &[], Hash::default()).unwrap();
    VersionedTransaction {
        signatures: vec![Signature::default()],
        message: VersionedMessage::V0(message),
    }
}

/// [`unsigned_transaction`] encoded the way `/swap` returns it.
pub fn unsigned_swap_transaction(payer: &Pubkey) -> String {
    STANDARD.encode(bincode::serialize(&unsigned_transaction(payer)).unwrap())
}

/// A connected wallet with a fresh keypair that expects `signs` signatures.
pub fn signing_wallet(signs: usize) -> (MockWallet, Pubkey) {
    let keypair = Keypair::new();
    let pubkey = keypair.pubkey();
    let mut wallet = MockWallet::new();
    wallet.expect_is_connected().return_const(true);
    wallet.expect_can_sign().return_const(true);
    wallet.expect_public_key().return_const(Some(pubkey));
    wallet
        .expect_sign_transaction()
        .times(signs)
        .returning(move |tx| Ok(VersionedTransaction::try_new(tx.message, &[&keypair]).unwrap()));
    (wallet, pubkey)
}

/// A wallet that reports itself disconnected and must never be asked to sign.
pub fn disconnected_wallet() -> MockWallet {
    let mut wallet = MockWallet::new();
    wallet.expect_is_connected().return_const(false);
    wallet.expect_can_sign().return_const(true);
    wallet.expect_public_key().return_const(None);
    wallet.expect_sign_transaction().never();
    wallet
}

pub fn blockhash() -> BlockhashInfo {
    BlockhashInfo {
        blockhash: Hash::default(),
        last_valid_block_height: 100,
    }
}

/// A node that accepts and confirms exactly `swaps` transactions with the
/// executor's send options.
pub fn confirming_network(swaps: usize) -> MockNetwork {
    let mut network = MockNetwork::new();
    network
        .expect_send_transaction()
        .withf(|_, options| {
            *options
                == SendOptions {
                    skip_preflight: true,
                    max_retries: 2,
                }
        })
        .times(swaps)
        .returning(|tx, _| Ok(tx.signatures[0]));
    network
        .expect_latest_blockhash()
        .times(swaps)
        .returning(|| Ok(blockhash()));
    network
        .expect_confirm_transaction()
        .withf(|_, info| *info == blockhash())
        .times(swaps)
        .returning(|_, _| Ok(()));
    network
}

/// A node that must not see any transaction.
pub fn idle_network() -> MockNetwork {
    let mut network = MockNetwork::new();
    network.expect_send_transaction().never();
    network.expect_latest_blockhash().never();
    network.expect_confirm_transaction().never();
    network
}

/// Holds quote requests and transaction submissions for `delay` before
/// handing them to `inner`.
pub struct Delayed<T> {
    pub inner: T,
    pub delay: Duration,
}

#[async_trait]
impl<T: SwapApi> SwapApi for Delayed<T> {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, ApiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.quote(request).await
    }

    async fn swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &str,
        wrap_and_unwrap_sol: bool,
    ) -> Result<String, ApiError> {
        self.inner
            .swap_transaction(quote, user_public_key, wrap_and_unwrap_sol)
            .await
    }
}

#[async_trait]
impl<T: Network> Network for Delayed<T> {
    async fn send_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, NetworkError> {
        tokio::time::sleep(self.delay).await;
        self.inner.send_transaction(transaction, options).await
    }

    async fn latest_blockhash(&self) -> Result<BlockhashInfo, NetworkError> {
        self.inner.latest_blockhash().await
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        blockhash: &BlockhashInfo,
    ) -> Result<(), NetworkError> {
        self.inner.confirm_transaction(signature, blockhash).await
    }
}
