use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response has no usable outAmount")]
    MissingOutAmount,
    #[error("response has no swapTransaction")]
    MissingTransaction,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("signing rejected")]
    Rejected,
    #[error("signing failed: {0}")]
    Signer(String),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },
    #[error("blockhash expired before {0} was confirmed")]
    BlockhashExpired(String),
    #[error("transaction {0} not confirmed within timeout")]
    Timeout(String),
}

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("source and destination are both {0}")]
    SameAsset(&'static str),
    #[error("wallet is not connected or does not support signing transactions")]
    WalletUnavailable,
    #[error("no quote to execute")]
    MissingQuote,
    #[error("a swap is already in progress")]
    Busy,
    #[error("failed to decode swap transaction: {0}")]
    Decode(String),
    #[error("quote api: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}
