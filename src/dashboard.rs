//! Dashboard application state
//!
//! Owns the coin store, the detail modal, the theme toggle and the timer
//! handles, and publishes a [`DashboardView`] that front ends draw from.
//!
//! ```text
//! start() / auto-refresh tick
//!     ↓
//! MarketDataProvider::fetch_top_coins
//!     ↓
//! CoinStore::replace  →  render_list  →  watch channel (DashboardView)
//!                                             ↑
//! on_search_input → Debouncer → filter_by_name ┘
//! ```

use crate::{
    config::DashboardConfig,
    constants::DETAIL_FETCH_FAILED_MESSAGE,
    debounce::Debouncer,
    error::DashboardError,
    modal::{ClickTarget, CloseTrigger, DetailModal, ModalState, ModalUpdate},
    prefs::PreferenceStore,
    provider::MarketDataProvider,
    render::{render_list, CoinListView},
    store::CoinStore,
    theme::ThemeToggle,
    types::{CoinSummary, DashboardEvent, Theme},
};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything a front end needs to draw the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub list: CoinListView,
    pub modal: ModalState,
    pub theme: Theme,
    /// Label of the theme control
    pub theme_label: String,
    /// Local time of the last successful refresh
    pub last_updated: Option<DateTime<Local>>,
    /// Filter the current list was rendered with (empty when unfiltered)
    pub search_term: String,
    /// Blocking message the user has to acknowledge
    pub notification: Option<String>,
    /// Incremented on every list render
    pub revision: u64,
}

/// Result of a refresh that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The store now holds this many coins
    Refreshed(usize),
    /// A newer refresh started before this one finished
    Superseded,
}

struct DashboardInner {
    provider: Arc<dyn MarketDataProvider>,
    store: CoinStore,
    modal: DetailModal,
    theme: Mutex<ThemeToggle>,
    view_tx: watch::Sender<DashboardView>,
    events_tx: broadcast::Sender<DashboardEvent>,
    refresh_generation: tokio::sync::Mutex<u64>,
}

pub struct Dashboard {
    inner: Arc<DashboardInner>,
    config: DashboardConfig,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    debouncer: Debouncer,
}

impl Dashboard {
    /// Creates a dashboard; the theme preference is read here, once
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        preferences: Arc<dyn PreferenceStore>,
        config: DashboardConfig,
    ) -> Self {
        let theme = ThemeToggle::load(preferences);
        let view = DashboardView {
            list: CoinListView::Loading,
            modal: ModalState::Closed,
            theme: theme.theme(),
            theme_label: theme.label().to_string(),
            last_updated: None,
            search_term: String::new(),
            notification: None,
            revision: 0,
        };
        let (view_tx, _) = watch::channel(view);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let inner = Arc::new(DashboardInner {
            modal: DetailModal::new(provider.clone()),
            provider,
            store: CoinStore::new(),
            theme: Mutex::new(theme),
            view_tx,
            events_tx,
            refresh_generation: tokio::sync::Mutex::new(0),
        });

        Self {
            inner,
            debouncer: Debouncer::new(config.debounce_window),
            config,
            refresh_task: Mutex::new(None),
        }
    }

    /// Startup sequence: one refresh, then the auto-refresh timer
    pub async fn start(&self) {
        tracing::info!(
            provider = self.inner.provider.provider_name(),
            refresh_interval_secs = self.config.refresh_interval.as_secs(),
            "Starting coin dashboard"
        );

        // failure is already rendered and logged by refresh
        let _ = self.refresh().await;
        self.start_auto_refresh(self.config.refresh_interval);
    }

    /// Fetches the top coins and re-renders the unfiltered list
    pub async fn refresh(&self) -> Result<RefreshOutcome, DashboardError> {
        self.inner.refresh().await
    }

    /// Re-runs [`Dashboard::refresh`] every `interval`
    ///
    /// Replaces any running timer, so at most one is ever active. The first
    /// tick fires one interval from now.
    pub fn start_auto_refresh(&self, interval: Duration) {
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                // failure is already rendered and logged by refresh
                let _ = inner.refresh().await;
            }
        });

        let mut task = self.refresh_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = task.replace(handle) {
            previous.abort();
            tracing::debug!("Replaced auto-refresh timer");
        }
        tracing::info!(interval_secs = interval.as_secs(), "Auto-refresh scheduled");
    }

    pub fn stop_auto_refresh(&self) {
        let mut task = self.refresh_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = task.take() {
            previous.abort();
            tracing::info!("Auto-refresh stopped");
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        let task = self.refresh_task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Debounced search: only the last term of a burst is applied
    pub fn on_search_input(&self, raw_term: &str) {
        let inner = self.inner.clone();
        let term = raw_term.to_string();
        self.debouncer.call(async move {
            inner.apply_search(&term).await;
        });
    }

    /// Filters the store by `raw_term` and re-renders, without debouncing
    pub async fn apply_search(&self, raw_term: &str) -> usize {
        self.inner.apply_search(raw_term).await
    }

    /// Opens the detail modal for `coin_id`
    ///
    /// On failure a blocking notification is raised and the modal stays
    /// closed. No retry.
    pub async fn open_detail(&self, coin_id: &str) -> Result<ModalUpdate, DashboardError> {
        let result = self.inner.modal.open(coin_id).await;

        match &result {
            Ok(ModalUpdate::Opened) => {
                self.inner.sync_modal().await;
                self.inner.emit(DashboardEvent::detail_opened(coin_id));
            }
            Ok(ModalUpdate::Superseded) => {}
            Err(e) => {
                tracing::warn!(coin_id, error = %e, "Failed to fetch coin detail");
                self.inner.view_tx.send_modify(|view| {
                    view.notification = Some(DETAIL_FETCH_FAILED_MESSAGE.to_string());
                });
                self.inner
                    .emit(DashboardEvent::detail_fetch_failed(coin_id, e.to_string()));
            }
        }

        result
    }

    pub async fn close_detail(&self, trigger: CloseTrigger) -> bool {
        let closed = self.inner.modal.close(trigger).await;
        self.inner.after_close(closed).await;
        closed
    }

    pub async fn handle_key(&self, key: &str) -> bool {
        let closed = self.inner.modal.handle_key(key).await;
        self.inner.after_close(closed).await;
        closed
    }

    pub async fn handle_click(&self, target: ClickTarget) -> bool {
        let closed = self.inner.modal.handle_click(target).await;
        self.inner.after_close(closed).await;
        closed
    }

    /// Clears the blocking notification
    pub fn dismiss_notification(&self) {
        self.inner.view_tx.send_modify(|view| view.notification = None);
    }

    /// Flips the theme and persists it
    pub fn toggle_theme(&self) -> Theme {
        let (theme, label) = {
            let mut toggle = self.inner.theme.lock().unwrap_or_else(|e| e.into_inner());
            let theme = toggle.toggle();
            (theme, toggle.label())
        };

        self.inner.view_tx.send_modify(|view| {
            view.theme = theme;
            view.theme_label = label.to_string();
        });
        self.inner.emit(DashboardEvent::theme_changed(theme));
        theme
    }

    /// Current view snapshot
    pub fn view(&self) -> DashboardView {
        self.inner.view_tx.borrow().clone()
    }

    /// Receiver notified on every view change
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.inner.view_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Snapshot of the coin store
    pub async fn coins(&self) -> Vec<CoinSummary> {
        self.inner.store.coins().await
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop_auto_refresh();
    }
}

impl DashboardInner {
    async fn refresh(&self) -> Result<RefreshOutcome, DashboardError> {
        let generation = {
            let mut current = self.refresh_generation.lock().await;
            *current += 1;
            *current
        };

        self.publish_list(CoinListView::Loading, "");
        let result = self.provider.fetch_top_coins().await;

        let current = self.refresh_generation.lock().await;
        if *current != generation {
            tracing::debug!(generation, latest = *current, "Discarding superseded refresh");
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(coins) => {
                self.store.replace(coins).await;
                let coins = self.store.coins().await;
                let now = Local::now();

                self.view_tx.send_modify(|view| {
                    view.list = render_list(&coins);
                    view.search_term.clear();
                    view.last_updated = Some(now);
                    view.revision += 1;
                });
                tracing::info!(count = coins.len(), "Coin list refreshed");
                self.emit(DashboardEvent::list_refreshed(coins.len()));

                Ok(RefreshOutcome::Refreshed(coins.len()))
            }
            Err(e) => {
                // Store is left as is; the view shows only the error
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "Failed to fetch coin list"
                );
                self.publish_list(CoinListView::fetch_failed(), "");
                self.emit(DashboardEvent::list_fetch_failed(e.to_string()));

                Err(DashboardError::ListFetchFailed(e))
            }
        }
    }

    async fn apply_search(&self, raw_term: &str) -> usize {
        let term = raw_term.to_lowercase();
        let matches = self.store.filter_by_name(&term).await;
        let count = matches.len();

        tracing::debug!(term = %term, matches = count, "Applied search filter");
        self.publish_list(render_list(&matches), &term);
        count
    }

    /// Replaces the list view in one step
    fn publish_list(&self, list: CoinListView, search_term: &str) {
        self.view_tx.send_modify(|view| {
            view.list = list;
            view.search_term = search_term.to_string();
            view.revision += 1;
        });
    }

    async fn sync_modal(&self) {
        let modal = self.modal.state().await;
        self.view_tx.send_modify(|view| view.modal = modal);
    }

    async fn after_close(&self, closed: bool) {
        self.sync_modal().await;
        if closed {
            self.emit(DashboardEvent::modal_closed());
        }
    }

    fn emit(&self, event: DashboardEvent) {
        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }
}
