use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A quote as returned by the Jupiter quote endpoint.
///
/// The body is kept verbatim because the swap endpoint wants it back
/// unchanged; only `outAmount` is read.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    raw: Value,
    out_amount: u64,
}

impl Quote {
    pub fn from_value(raw: Value) -> Result<Self, ApiError> {
        let out_amount = match raw.get("outAmount") {
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(Value::Number(n)) => n.as_u64(),
            _ => None,
        }
        .ok_or(ApiError::MissingOutAmount)?;
        Ok(Self { raw, out_amount })
    }

    /// Output amount in base units of the destination token.
    pub fn out_amount(&self) -> u64 {
        self.out_amount
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Input amount in base units.
    pub amount: u64,
    pub slippage_bps: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwapRequest<'a> {
    quote_response: &'a Value,
    user_public_key: String,
    wrap_and_unwrap_sol: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    #[serde(default)]
    swap_transaction: Option<String>,
}

/// The two Jupiter calls the panel needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapApi: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, ApiError>;

    /// Returns the base64 encoded unsigned transaction for `quote`.
    async fn swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &str,
        wrap_and_unwrap_sol: bool,
    ) -> Result<String, ApiError>;
}

/// HTTP client for the Jupiter v6 swap API (hosted or self-hosted).
#[derive(Clone)]
pub struct SwapClient {
    base_url: String,
    http: Client,
}

impl SwapClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl SwapApi for SwapClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, ApiError> {
        log::debug!(
            "Quote request: {} {} -> {} ({} bps)",
            request.amount,
            request.input_mint,
            request.output_mint,
            request.slippage_bps
        );
        let response = self
            .http
            .get(self.endpoint("quote"))
            .query(request)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        let raw: Value =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;
        Quote::from_value(raw)
    }

    async fn swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &str,
        wrap_and_unwrap_sol: bool,
    ) -> Result<String, ApiError> {
        let request = SwapRequest {
            quote_response: quote.raw(),
            user_public_key: user_public_key.to_string(),
            wrap_and_unwrap_sol,
        };
        log::debug!("Swap transaction request for user {}", user_public_key);
        let response = self
            .http
            .post(self.endpoint("swap"))
            .json(&request)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        let parsed: SwapResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))?;
        parsed
            .swap_transaction
            .filter(|tx| !tx.is_empty())
            .ok_or(ApiError::MissingTransaction)
    }
}
