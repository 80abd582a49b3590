use crate::assets::{Asset, ASSETS};
use crate::error::SwapError;
use crate::swap_client::Quote;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Quoting,
    Submitting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Quoting => "quoting",
            Phase::Submitting => "submitting",
        };
        f.write_str(label)
    }
}

/// UI state of the swap form: selected tokens, amounts, the retained quote
/// and the loading flags.
///
/// Every input change bumps `generation`; a quote is only applied if it was
/// requested for the current generation.
#[derive(Debug, Clone)]
pub struct SwapPanel {
    from_asset: &'static Asset,
    to_asset: &'static Asset,
    from_amount: f64,
    to_amount: f64,
    quote: Option<Quote>,
    quotes_in_flight: usize,
    submitting: bool,
    generation: u64,
}

/// What a swap needs from the panel once the action is accepted.
#[derive(Debug, Clone)]
pub struct SwapTicket {
    pub quote: Quote,
    pub from_asset: &'static Asset,
    pub to_asset: &'static Asset,
    pub from_amount: f64,
}

impl Default for SwapPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SwapPanel {
    pub fn new() -> Self {
        Self {
            from_asset: &ASSETS[0],
            to_asset: &ASSETS[1],
            from_amount: 0.0,
            to_amount: 0.0,
            quote: None,
            quotes_in_flight: 0,
            submitting: false,
            generation: 0,
        }
    }

    pub fn from_asset(&self) -> &'static Asset {
        self.from_asset
    }

    pub fn to_asset(&self) -> &'static Asset {
        self.to_asset
    }

    pub fn from_amount(&self) -> f64 {
        self.from_amount
    }

    pub fn to_amount(&self) -> f64 {
        self.to_amount
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if self.quotes_in_flight > 0 {
            Phase::Quoting
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() != Phase::Idle
    }

    pub fn same_asset(&self) -> bool {
        self.from_asset.mint == self.to_asset.mint
    }

    /// Whether the swap action is enabled.
    pub fn can_swap(&self) -> bool {
        !self.same_asset() && !self.is_loading()
    }

    /// Drops the retained quote along with the old amount.
    pub fn set_from_amount(&mut self, amount: f64) -> u64 {
        self.from_amount = amount;
        self.quote = None;
        self.bump()
    }

    pub fn select_from(&mut self, asset: &'static Asset) -> u64 {
        self.from_asset = asset;
        self.quote = None;
        self.bump()
    }

    pub fn select_to(&mut self, asset: &'static Asset) -> u64 {
        self.to_asset = asset;
        self.quote = None;
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn begin_quote(&mut self) {
        self.quotes_in_flight += 1;
    }

    pub fn finish_quote(&mut self) {
        self.quotes_in_flight = self.quotes_in_flight.saturating_sub(1);
    }

    /// Stores `quote` and refreshes the destination amount, unless the
    /// inputs changed since `generation`.
    pub fn apply_quote(&mut self, generation: u64, quote: Quote) -> bool {
        if generation != self.generation {
            return false;
        }
        self.to_amount = self.to_asset.from_base_units(quote.out_amount());
        self.quote = Some(quote);
        true
    }

    /// Moves to `Submitting` if the swap action is enabled and a quote is
    /// retained.
    pub fn begin_swap(&mut self) -> Result<SwapTicket, SwapError> {
        if self.same_asset() {
            return Err(SwapError::SameAsset(self.from_asset.symbol));
        }
        if self.is_loading() {
            return Err(SwapError::Busy);
        }
        let quote = self.quote.clone().ok_or(SwapError::MissingQuote)?;
        self.submitting = true;
        Ok(SwapTicket {
            quote,
            from_asset: self.from_asset,
            to_asset: self.to_asset,
            from_amount: self.from_amount,
        })
    }

    pub fn finish_swap(&mut self) {
        self.submitting = false;
    }
}
