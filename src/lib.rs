//! # Coin Dashboard
//!
//! Core of a cryptocurrency market dashboard backed by the CoinGecko REST API.
//! Fetches the top coins, keeps them in memory, renders a searchable list of
//! cards, and shows per-coin detail in a modal. The only persisted state is the
//! light/dark theme preference.
//!
//! The library never draws anything itself. It publishes a [`DashboardView`]
//! through a watch channel and front ends render from that.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_dashboard::{Dashboard, DashboardConfig, CoinGeckoProvider, MemoryPreferenceStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::from_env();
//! let provider = Arc::new(CoinGeckoProvider::with_config(&config)?);
//! let dashboard = Dashboard::new(provider, Arc::new(MemoryPreferenceStore::new()), config);
//!
//! // Initial refresh, then every 30 seconds
//! dashboard.start().await;
//!
//! for card in dashboard.view().list.cards() {
//!     println!("{} ({}): {} {}", card.name, card.symbol, card.price, card.change);
//! }
//!
//! dashboard.on_search_input("bit");
//! dashboard.open_detail("bitcoin").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use coin_dashboard::{Dashboard, DashboardError};
//!
//! # async fn example(dashboard: Dashboard) {
//! match dashboard.refresh().await {
//!     Ok(outcome) => println!("{:?}", outcome),
//!     Err(DashboardError::ListFetchFailed(e)) => {
//!         // The list now shows "Failed to fetch data."; the store is unchanged
//!         eprintln!("refresh failed: {}", e)
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod metrics;
pub mod modal;
pub mod prefs;
pub mod provider;
pub mod providers;
pub mod render;
pub mod store;
pub mod theme;
pub mod types;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardView, RefreshOutcome};
pub use error::{DashboardError, PreferenceError, ProviderError};
pub use metrics::{Endpoint, FetchMetrics};
pub use modal::{ClickTarget, CloseTrigger, ModalState, ModalUpdate};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use provider::MarketDataProvider;
pub use providers::CoinGeckoProvider;
pub use render::{ChangeDirection, CoinCard, CoinDetailView, CoinListView};
pub use types::{CoinDetail, CoinSummary, DashboardEvent, Theme};
