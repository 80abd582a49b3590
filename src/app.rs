use crate::assets::Asset;
use crate::debounce::Debouncer;
use crate::error::SwapError;
use crate::executor::{SwapExecutor, SwapReceipt};
use crate::panel::SwapPanel;
use crate::quoter::QuoteFetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// The swap form: panel state plus the debounced quote and swap actions.
///
/// Errors from quoting and swapping end here. They are logged and the
/// loading flags are cleared; the panel is otherwise left as it was.
pub struct SwapApp {
    panel: Arc<Mutex<SwapPanel>>,
    fetcher: Arc<QuoteFetcher>,
    executor: SwapExecutor,
    debouncer: Debouncer,
}

impl SwapApp {
    pub fn new(fetcher: QuoteFetcher, executor: SwapExecutor, debounce: Duration) -> Self {
        Self {
            panel: Arc::new(Mutex::new(SwapPanel::new())),
            fetcher: Arc::new(fetcher),
            executor,
            debouncer: Debouncer::new(debounce),
        }
    }

    pub async fn snapshot(&self) -> SwapPanel {
        self.panel.lock().await.clone()
    }

    pub async fn set_from_amount(&self, amount: f64) {
        self.panel.lock().await.set_from_amount(amount);
        self.schedule_quote();
    }

    pub async fn select_from(&self, asset: &'static Asset) {
        self.panel.lock().await.select_from(asset);
        self.schedule_quote();
    }

    pub async fn select_to(&self, asset: &'static Asset) {
        self.panel.lock().await.select_to(asset);
        self.schedule_quote();
    }

    fn schedule_quote(&self) {
        let panel = self.panel.clone();
        let fetcher = self.fetcher.clone();
        self.debouncer
            .call(move || async move { refresh_quote(panel, fetcher).await });
    }

    /// Quotes the current inputs now, bypassing the debounce timer.
    pub async fn refresh_quote(&self) {
        self.debouncer.cancel();
        refresh_quote(self.panel.clone(), self.fetcher.clone()).await;
    }

    pub async fn swap(&self) -> Result<SwapReceipt, SwapError> {
        let ticket = self.panel.lock().await.begin_swap();
        let ticket = match ticket {
            Ok(ticket) => ticket,
            Err(e) => {
                log::warn!("Swap not started: {}", e);
                return Err(e);
            }
        };
        log::info!(
            "Swapping {} {} for ~{} {}",
            ticket.from_amount,
            ticket.from_asset.symbol,
            ticket.to_asset.from_base_units(ticket.quote.out_amount()),
            ticket.to_asset.symbol
        );

        let result = self.executor.execute(&ticket.quote).await;
        self.panel.lock().await.finish_swap();

        match &result {
            Ok(receipt) => log::info!("{}", receipt.explorer_url),
            Err(SwapError::WalletUnavailable) => {
                log::error!("Wallet is not connected or does not support signing transactions")
            }
            Err(e) => log::error!("Error signing or sending the transaction: {}", e),
        }
        result
    }
}

async fn refresh_quote(panel: Arc<Mutex<SwapPanel>>, fetcher: Arc<QuoteFetcher>) {
    let (generation, request) = {
        let mut state = panel.lock().await;
        match fetcher.prepare(state.from_asset(), state.to_asset(), state.from_amount()) {
            Ok(request) => {
                state.begin_quote();
                (state.generation(), request)
            }
            Err(e) => {
                log::error!("Quote skipped: {}", e);
                return;
            }
        }
    };

    let result = fetcher.fetch_request(&request).await;

    let mut state = panel.lock().await;
    state.finish_quote();
    match result {
        Ok(quote) => {
            if state.apply_quote(generation, quote) {
                log::info!(
                    "Quote: {} {} -> {} {}",
                    state.from_amount(),
                    state.from_asset().symbol,
                    state.to_amount(),
                    state.to_asset().symbol
                );
            } else {
                log::debug!("Dropped quote for outdated inputs (generation {})", generation);
            }
        }
        Err(e) => log::error!("Quote abandoned: {}", e),
    }
}
