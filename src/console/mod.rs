pub mod command_handler;
pub mod listener;
pub mod render;

use crate::analyzer::{Matcher, MatcherImpl};
use crate::api::CatalogSource;
use crate::loader::{CatalogLoader, LoadOutcome, LoadState};
use crate::model::{Category, Product};
use crate::session::AppContext;
use render::{Palette, render_matches};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

/// Interactive lookup screen: a category tab, the device being explored and
/// the catalog snapshot it is matched against.
pub struct Console {
    pub ctx: AppContext,
    pub matcher: MatcherImpl,
    pub loader: CatalogLoader,
    pub category: Category,
    pub target: Option<String>,
    pub pending_search: Option<String>,
    pub last_devices: Vec<String>,
    pub last_products: Vec<Product>,
    pub start_time: Instant,
    color: bool,
    source: Arc<dyn CatalogSource>,
    outcomes: UnboundedSender<LoadOutcome>,
    out: Box<dyn Write + Send>,
}

impl Console {
    pub fn new(
        ctx: AppContext,
        source: Arc<dyn CatalogSource>,
        out: Box<dyn Write + Send>,
        color: bool,
    ) -> (Self, UnboundedReceiver<LoadOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let matcher = MatcherImpl::new(ctx.config.matcher.clone());
        let category = ctx.config.default_category();
        let console = Self {
            ctx,
            matcher,
            loader: CatalogLoader::new(),
            category,
            target: None,
            pending_search: None,
            last_devices: Vec::new(),
            last_products: Vec::new(),
            start_time: Instant::now(),
            color,
            source,
            outcomes,
            out,
        };
        (console, receiver)
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.ctx.theme(), self.color)
    }

    pub fn say(&mut self, text: &str) {
        let text = text.trim_end_matches('\n');
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!("Console write failed: {}", e);
        }
    }

    /// Starts a fresh catalog fetch, superseding any fetch in flight.
    pub fn refresh(&mut self) {
        let ticket = self.loader.start(self.source.clone(), None, self.outcomes.clone());
        info!("Refresh requested (#{})", ticket);
    }

    /// Runs `device` through the matcher, deferring until a catalog is available.
    pub fn search(&mut self, device: &str) {
        let device = device.trim().to_string();
        self.target = Some(device.clone());

        if self.loader.catalog().is_some() && !self.loader.is_loading() {
            self.show_matches(&device);
            return;
        }

        self.pending_search = Some(device);
        if self.loader.is_loading() {
            self.say("⏳ Catalog is loading; the search will run once it arrives.");
        } else {
            self.say("⏳ Loading catalog...");
            self.refresh();
        }
    }

    fn show_matches(&mut self, device: &str) {
        let Some(catalog) = self.loader.catalog() else {
            return;
        };
        let result = self.matcher.compute_matches(&catalog, device, self.category);
        let rendered = render_matches(&result, device, self.category, &self.palette());
        self.last_devices = rendered.devices;
        self.say(&rendered.text);
    }

    /// Applies a fetch outcome and runs any search that was waiting on it.
    pub fn on_outcome(&mut self, outcome: LoadOutcome) {
        if !self.loader.apply(outcome) {
            return;
        }

        match self.loader.state().clone() {
            LoadState::Ready => {
                let count = self.loader.catalog().map(|c| c.len()).unwrap_or(0);
                self.say(&format!("✅ Catalog loaded ({} products).", count));
            }
            LoadState::Failed(message) => {
                self.say(&format!("⚠️  {}", message));
                if self.loader.catalog().is_some() {
                    self.say("Showing results from the last loaded catalog. Use /refresh to retry.");
                }
            }
            LoadState::Idle | LoadState::Loading => {}
        }

        if let Some(device) = self.pending_search.take() {
            if self.loader.catalog().is_some() {
                self.show_matches(&device);
            }
        }
    }

    /// Tears the screen down; late fetch results are dropped.
    pub fn close(&mut self) {
        self.loader.close();
        self.pending_search = None;
        info!("Console closed after {:?}", self.start_time.elapsed());
    }
}
