// Catalog loading state for one screen: Idle -> Loading -> Ready | Failed.
use crate::api::CatalogSource;
use crate::model::{ApiError, Category, Product};
use futures::future::{AbortHandle, abortable};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Result of one fetch, tagged with the ticket it was started under.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: u64,
    pub result: Result<Vec<Product>, ApiError>,
}

/// Owns the catalog snapshot of a view. Starting a load aborts the one in flight;
/// outcomes for superseded tickets, or delivered after `close`, are discarded.
pub struct CatalogLoader {
    state: LoadState,
    catalog: Option<Arc<Vec<Product>>>,
    ticket: u64,
    in_flight: Option<AbortHandle>,
    closed: bool,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            catalog: None,
            ticket: 0,
            in_flight: None,
            closed: false,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Last successfully loaded catalog. Kept across failed reloads.
    pub fn catalog(&self) -> Option<Arc<Vec<Product>>> {
        self.catalog.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Marks a new load as started and returns its ticket, superseding any earlier one.
    pub fn begin(&mut self) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            debug!("Aborting catalog fetch #{}", self.ticket);
            handle.abort();
        }
        self.ticket += 1;
        self.state = LoadState::Loading;
        self.ticket
    }

    /// Spawns a fetch on the runtime; its outcome is delivered through `outcomes`.
    pub fn start(
        &mut self,
        source: Arc<dyn CatalogSource>,
        category: Option<Category>,
        outcomes: UnboundedSender<LoadOutcome>,
    ) -> u64 {
        if self.closed {
            return self.ticket;
        }
        let ticket = self.begin();
        let (fetch, handle) = abortable(async move { source.fetch_products(category).await });
        self.in_flight = Some(handle);

        tokio::spawn(async move {
            match fetch.await {
                Ok(result) => {
                    let _ = outcomes.send(LoadOutcome { ticket, result });
                }
                Err(_) => debug!("Catalog fetch #{} aborted", ticket),
            }
        });

        info!("Catalog fetch #{} started", ticket);
        ticket
    }

    /// Applies an outcome. Returns false when it was stale and ignored.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if self.closed || outcome.ticket != self.ticket || !self.is_loading() {
            debug!("Discarding stale catalog outcome #{}", outcome.ticket);
            return false;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(products) => {
                info!("Catalog #{} ready with {} products", outcome.ticket, products.len());
                self.catalog = Some(Arc::new(products));
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Catalog #{} failed: {}", outcome.ticket, e);
                self.state = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    /// Tears the view down: aborts the in-flight fetch and ignores anything later.
    pub fn close(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
