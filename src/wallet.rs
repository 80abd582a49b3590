use crate::error::WalletError;
use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Wallet session as the panel sees it. The session is owned elsewhere;
/// the panel only reads its state and asks it to sign.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Wallet: Send + Sync {
    fn is_connected(&self) -> bool;

    fn public_key(&self) -> Option<Pubkey>;

    fn can_sign(&self) -> bool;

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError>;
}

/// Wallet backed by a local keypair, connected on demand.
pub struct KeypairWallet {
    keypair: Option<Arc<Keypair>>,
    connected: AtomicBool,
}

impl KeypairWallet {
    /// Loads a base58 encoded secret key. The wallet starts connected.
    pub fn from_base58(secret: &str) -> Result<Self> {
        let bytes = bs58::decode(secret.trim()).into_vec()?;
        let keypair = Keypair::try_from(bytes.as_slice())?;
        Ok(Self::from_keypair(keypair))
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Some(Arc::new(keypair)),
            connected: AtomicBool::new(true),
        }
    }

    /// A wallet with no key material; it can never connect.
    pub fn empty() -> Self {
        Self {
            keypair: None,
            connected: AtomicBool::new(false),
        }
    }

    pub fn connect(&self) -> bool {
        let ok = self.keypair.is_some();
        self.connected.store(ok, Ordering::SeqCst);
        ok
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn public_key(&self) -> Option<Pubkey> {
        if !self.is_connected() {
            return None;
        }
        self.keypair.as_ref().map(|kp| kp.pubkey())
    }

    fn can_sign(&self) -> bool {
        self.keypair.is_some()
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError> {
        let keypair = match (&self.keypair, self.is_connected()) {
            (Some(kp), true) => kp.clone(),
            _ => return Err(WalletError::NotConnected),
        };
        let payer = transaction.message.static_account_keys().first().copied();
        if payer != Some(keypair.pubkey()) {
            log::warn!("Refusing to sign a transaction paid by {:?}", payer);
            return Err(WalletError::Rejected);
        }
        VersionedTransaction::try_new(transaction.message, &[&*keypair])
            .map_err(|e| WalletError::Signer(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::unsigned_transaction;

    #[test]
    fn base58_secret_round_trips_to_the_same_key() {
        let keypair = Keypair::new();
        let secret = bs58::encode(keypair.to_bytes()).into_string();
        let wallet = KeypairWallet::from_base58(&secret).unwrap();
        assert_eq!(wallet.public_key(), Some(keypair.pubkey()));
    }

    #[test]
    fn garbage_secret_is_rejected() {
        assert!(KeypairWallet::from_base58("not-a-key").is_err());
        let short = bs58::encode([7u8; 32]).into_string();
        assert!(KeypairWallet::from_base58(&short).is_err());
    }

    #[test]
    fn disconnect_hides_the_public_key() {
        let wallet = KeypairWallet::from_keypair(Keypair::new());
        wallet.disconnect();
        assert!(!wallet.is_connected());
        assert!(wallet.public_key().is_none());
        assert!(wallet.connect());
        assert!(wallet.public_key().is_some());
    }

    #[test]
    fn empty_wallet_cannot_connect() {
        let wallet = KeypairWallet::empty();
        assert!(!wallet.connect());
        assert!(!wallet.can_sign());
    }

    #[tokio::test]
    async fn signs_as_fee_payer() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let wallet = KeypairWallet::from_keypair(keypair);

        let signed = wallet.sign_transaction(unsigned_transaction(&payer)).await.unwrap();
        assert_eq!(signed.signatures.len(), 1);
        assert!(signed.verify_with_results().iter().all(|ok| *ok));
    }

    #[tokio::test]
    async fn refuses_to_sign_while_disconnected() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let wallet = KeypairWallet::from_keypair(keypair);
        wallet.disconnect();

        let result = wallet.sign_transaction(unsigned_transaction(&payer)).await;
        assert!(matches!(result, Err(WalletError::NotConnected)));
    }

    #[tokio::test]
    async fn refuses_a_transaction_paid_by_someone_else() {
        let wallet = KeypairWallet::from_keypair(Keypair::new());

        let result = wallet
            .sign_transaction(unsigned_transaction(&Pubkey::new_unique()))
            .await;
        assert!(matches!(result, Err(WalletError::Rejected)));
    }
}
