//! Types for the coin dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Lightweight per-coin record used for the list view
///
/// Deserializes directly from one element of the `/coins/markets` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSummary {
    /// CoinGecko id (e.g. "bitcoin")
    pub id: String,

    /// Display name (e.g. "Bitcoin")
    pub name: String,

    /// Ticker symbol as returned by the API (lower case)
    pub symbol: String,

    /// Thumbnail URL
    #[serde(default)]
    pub image: String,

    /// Price in USD
    #[serde(default, deserialize_with = "null_as_zero")]
    pub current_price: f64,

    /// Market cap in USD
    #[serde(default, deserialize_with = "null_as_zero")]
    pub market_cap: f64,

    /// 24h price change percentage
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

impl CoinSummary {
    /// Creates a summary with the given price fields and an empty image
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        current_price: f64,
        market_cap: f64,
        price_change_percentage_24h: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price,
            market_cap,
            price_change_percentage_24h,
        }
    }
}

/// Extended per-coin record used for the modal view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,

    /// Large image variant
    pub image: String,

    /// Price in USD
    pub current_price: f64,

    /// Market cap in USD
    pub market_cap: f64,

    /// 24h traded volume in USD
    pub total_volume: f64,

    /// 24h price change percentage
    pub price_change_percentage_24h: Option<f64>,

    /// Coins in circulation
    pub circulating_supply: Option<f64>,
}

/// UI theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses the persisted string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// The other theme
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard events for subscribers (logging, front ends)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// The coin list was replaced
    ListRefreshed {
        id: Uuid,
        coin_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A refresh failed; the list shows an inline error
    ListFetchFailed {
        id: Uuid,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The detail modal now shows a coin
    DetailOpened {
        id: Uuid,
        coin_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A detail fetch failed; a blocking notification was raised
    DetailFetchFailed {
        id: Uuid,
        coin_id: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The detail modal was hidden
    ModalClosed { id: Uuid, timestamp: DateTime<Utc> },

    /// The theme was toggled
    ThemeChanged {
        id: Uuid,
        theme: Theme,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    pub fn list_refreshed(coin_count: usize) -> Self {
        Self::ListRefreshed {
            id: Uuid::new_v4(),
            coin_count,
            timestamp: Utc::now(),
        }
    }

    pub fn list_fetch_failed(error_message: impl Into<String>) -> Self {
        Self::ListFetchFailed {
            id: Uuid::new_v4(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn detail_opened(coin_id: &str) -> Self {
        Self::DetailOpened {
            id: Uuid::new_v4(),
            coin_id: coin_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn detail_fetch_failed(coin_id: &str, error_message: impl Into<String>) -> Self {
        Self::DetailFetchFailed {
            id: Uuid::new_v4(),
            coin_id: coin_id.to_string(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn modal_closed() -> Self {
        Self::ModalClosed {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }

    pub fn theme_changed(theme: Theme) -> Self {
        Self::ThemeChanged {
            id: Uuid::new_v4(),
            theme,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            DashboardEvent::ListRefreshed { id, .. }
            | DashboardEvent::ListFetchFailed { id, .. }
            | DashboardEvent::DetailOpened { id, .. }
            | DashboardEvent::DetailFetchFailed { id, .. }
            | DashboardEvent::ModalClosed { id, .. }
            | DashboardEvent::ThemeChanged { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::ListRefreshed { .. } => "LIST_REFRESHED",
            DashboardEvent::ListFetchFailed { .. } => "LIST_FETCH_FAILED",
            DashboardEvent::DetailOpened { .. } => "DETAIL_OPENED",
            DashboardEvent::DetailFetchFailed { .. } => "DETAIL_FETCH_FAILED",
            DashboardEvent::ModalClosed { .. } => "MODAL_CLOSED",
            DashboardEvent::ThemeChanged { .. } => "THEME_CHANGED",
        }
    }
}

impl std::fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardEvent::ListRefreshed { coin_count, .. } => {
                write!(f, "List refreshed: {} coins", coin_count)
            }
            DashboardEvent::ListFetchFailed { error_message, .. } => {
                write!(f, "List fetch failed: {}", error_message)
            }
            DashboardEvent::DetailOpened { coin_id, .. } => {
                write!(f, "Detail opened for {}", coin_id)
            }
            DashboardEvent::DetailFetchFailed {
                coin_id,
                error_message,
                ..
            } => write!(f, "Detail fetch failed for {}: {}", coin_id, error_message),
            DashboardEvent::ModalClosed { .. } => write!(f, "Modal closed"),
            DashboardEvent::ThemeChanged { theme, .. } => write!(f, "Theme changed to {}", theme),
        }
    }
}

/// Treats an explicit JSON `null` as zero
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_summary_from_markets_json() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 67012.5,
            "market_cap": 1320000000000,
            "market_cap_rank": 1,
            "price_change_percentage_24h": -1.23
        }"#;

        let coin: CoinSummary = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.symbol, "btc");
        assert_eq!(coin.current_price, 67012.5);
        assert_eq!(coin.market_cap, 1_320_000_000_000.0);
        assert_eq!(coin.price_change_percentage_24h, Some(-1.23));
    }

    #[test]
    fn test_coin_summary_null_fields() {
        let json = r#"{
            "id": "newcoin",
            "symbol": "new",
            "name": "New Coin",
            "image": "",
            "current_price": null,
            "market_cap": null,
            "price_change_percentage_24h": null
        }"#;

        let coin: CoinSummary = serde_json::from_str(json).unwrap();
        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap, 0.0);
        assert_eq!(coin.price_change_percentage_24h, None);
    }

    #[test]
    fn test_theme_round_trip_strings() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_event_type_names() {
        let event = DashboardEvent::detail_fetch_failed("bitcoin", "boom");
        assert_eq!(event.event_type(), "DETAIL_FETCH_FAILED");
        assert_eq!(event.to_string(), "Detail fetch failed for bitcoin: boom");
    }
}
