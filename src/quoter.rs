use crate::assets::Asset;
use crate::error::SwapError;
use crate::swap_client::{Quote, QuoteRequest, SwapApi};
use std::sync::Arc;

/// Turns a human-unit amount into a Jupiter quote for a token pair.
pub struct QuoteFetcher {
    api: Arc<dyn SwapApi>,
    slippage_bps: u16,
}

impl QuoteFetcher {
    pub fn new(api: Arc<dyn SwapApi>, slippage_bps: u16) -> Self {
        Self { api, slippage_bps }
    }

    /// Validates the inputs and builds the query. No request is made.
    pub fn prepare(
        &self,
        from: &Asset,
        to: &Asset,
        amount: f64,
    ) -> Result<QuoteRequest, SwapError> {
        if from.mint == to.mint {
            return Err(SwapError::SameAsset(from.symbol));
        }
        let amount_base = from
            .to_base_units(amount)
            .ok_or(SwapError::InvalidAmount(amount))?;
        Ok(QuoteRequest {
            input_mint: from.mint.to_string(),
            output_mint: to.mint.to_string(),
            amount: amount_base,
            slippage_bps: self.slippage_bps,
        })
    }

    pub async fn fetch_request(&self, request: &QuoteRequest) -> Result<Quote, SwapError> {
        let quote = self.api.quote(request).await?;
        log::debug!(
            "Quote {} {} -> {} {}",
            request.amount,
            request.input_mint,
            quote.out_amount(),
            request.output_mint
        );
        Ok(quote)
    }
}
