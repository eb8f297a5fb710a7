//! Constants for the coin dashboard
//!
//! Defaults for every tunable live here. `DashboardConfig` starts from these
//! values and lets the environment or the command line override a few of them.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint listing coins by market cap
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// CoinGecko endpoint prefix for a single coin
pub const COINGECKO_COIN_ENDPOINT: &str = "/coins";

/// Quote currency for every price shown
pub const VS_CURRENCY: &str = "usd";

/// Number of coins fetched per refresh (single page only)
pub const PAGE_SIZE: u32 = 50;

/// How often the list is re-fetched (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 30;

/// Quiet window for search input (in milliseconds)
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Preference key holding the theme
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// Directory name under the user config dir
pub const PREFERENCES_DIR: &str = "coin-dashboard";

/// File holding persisted preferences
pub const PREFERENCES_FILE: &str = "preferences.json";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-dashboard/0.1.0";

/// Placeholder shown while the list is being fetched
pub const LOADING_MESSAGE: &str = "Loading data...";

/// Placeholder shown when there is nothing to list
pub const NO_RESULTS_MESSAGE: &str = "No coins found.";

/// Inline message shown in place of the list when a refresh fails
pub const LIST_FETCH_FAILED_MESSAGE: &str = "Failed to fetch data.";

/// Blocking notification raised when a detail fetch fails
pub const DETAIL_FETCH_FAILED_MESSAGE: &str = "Failed to fetch coin details.";
