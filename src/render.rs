//! View model rendering
//!
//! Turns coin records into display-ready cards and detail panels. Nothing here
//! touches a terminal or any other output; front ends consume the view types.

use crate::{
    constants::{LIST_FETCH_FAILED_MESSAGE, LOADING_MESSAGE, NO_RESULTS_MESSAGE},
    types::{CoinDetail, CoinSummary},
};
use serde::Serialize;

/// Sign tag of a 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Positive,
    Negative,
}

impl ChangeDirection {
    /// Zero and unknown changes count as positive
    pub fn of(change: Option<f64>) -> Self {
        match change {
            Some(value) if value < 0.0 => ChangeDirection::Negative,
            _ => ChangeDirection::Positive,
        }
    }

    pub fn as_class(&self) -> &'static str {
        match self {
            ChangeDirection::Positive => "positive",
            ChangeDirection::Negative => "negative",
        }
    }
}

/// One card in the coin list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinCard {
    /// Coin id to request the detail modal with
    pub id: String,
    pub name: String,
    /// Upper-cased ticker
    pub symbol: String,
    pub image: String,
    /// e.g. "$67,012.5"
    pub price: String,
    /// e.g. "$1,320,000,000,000"
    pub market_cap: String,
    /// e.g. "-1.23%"
    pub change: String,
    pub direction: ChangeDirection,
}

/// What the list area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum CoinListView {
    /// A fetch is in progress
    Loading,
    /// At least one coin
    Cards(Vec<CoinCard>),
    /// Single placeholder for an empty sequence
    NoResults,
    /// Inline message replacing the list after a failed refresh
    Error(String),
}

impl CoinListView {
    /// Inline error view for a failed refresh
    pub fn fetch_failed() -> Self {
        CoinListView::Error(LIST_FETCH_FAILED_MESSAGE.to_string())
    }

    /// Number of visual items: cards, or one placeholder
    pub fn item_count(&self) -> usize {
        match self {
            CoinListView::Cards(cards) => cards.len(),
            _ => 1,
        }
    }

    pub fn cards(&self) -> &[CoinCard] {
        match self {
            CoinListView::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// Placeholder text, if the view is not a list of cards
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            CoinListView::Loading => Some(LOADING_MESSAGE),
            CoinListView::NoResults => Some(NO_RESULTS_MESSAGE),
            CoinListView::Error(message) => Some(message),
            CoinListView::Cards(_) => None,
        }
    }
}

/// Content of the detail modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinDetailView {
    pub id: String,
    /// "Bitcoin (BTC)"
    pub title: String,
    pub image: String,
    pub current_price: String,
    pub market_cap: String,
    pub total_volume: String,
    pub change: String,
    pub direction: ChangeDirection,
    pub circulating_supply: String,
}

/// Rebuilds the whole list view for `coins`
pub fn render_list(coins: &[CoinSummary]) -> CoinListView {
    if coins.is_empty() {
        return CoinListView::NoResults;
    }

    CoinListView::Cards(coins.iter().map(render_card).collect())
}

pub fn render_card(coin: &CoinSummary) -> CoinCard {
    CoinCard {
        id: coin.id.clone(),
        name: coin.name.clone(),
        symbol: coin.symbol.to_uppercase(),
        image: coin.image.clone(),
        price: format_usd(coin.current_price),
        market_cap: format_usd(coin.market_cap),
        change: format_change(coin.price_change_percentage_24h),
        direction: ChangeDirection::of(coin.price_change_percentage_24h),
    }
}

pub fn render_detail(detail: &CoinDetail) -> CoinDetailView {
    CoinDetailView {
        id: detail.id.clone(),
        title: format!("{} ({})", detail.name, detail.symbol.to_uppercase()),
        image: detail.image.clone(),
        current_price: format_usd(detail.current_price),
        market_cap: format_usd(detail.market_cap),
        total_volume: format_usd(detail.total_volume),
        change: format_change(detail.price_change_percentage_24h),
        direction: ChangeDirection::of(detail.price_change_percentage_24h),
        circulating_supply: detail
            .circulating_supply
            .map(format_grouped)
            .unwrap_or_else(|| "n/a".to_string()),
    }
}

/// "$" followed by the grouped amount
pub fn format_usd(value: f64) -> String {
    format!("${}", format_grouped(value))
}

/// Percentage with two decimals, e.g. "-1.23%"
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(value) => format!("{:.2}%", value),
        None => "n/a".to_string(),
    }
}

/// Groups thousands with commas and keeps at most three fraction digits
///
/// `1234567.891` → `"1,234,567.891"`, `2.5` → `"2.5"`, `0.00012` → `"0"`.
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{sample_coins, sample_detail};

    #[test]
    fn test_card_count_matches_coin_count() {
        let coins = sample_coins();
        let view = render_list(&coins);
        assert_eq!(view.item_count(), coins.len());
        assert_eq!(view.cards().len(), 2);
    }

    #[test]
    fn test_empty_renders_single_placeholder() {
        let view = render_list(&[]);
        assert_eq!(view, CoinListView::NoResults);
        assert_eq!(view.item_count(), 1);
        assert_eq!(view.placeholder(), Some("No coins found."));
    }

    #[test]
    fn test_negative_change_card() {
        let coin = CoinSummary::new("btc", "Bitcoin", "btc", 67012.5, 1_320_000_000_000.0, Some(-1.23));
        let card = render_card(&coin);

        assert_eq!(card.direction, ChangeDirection::Negative);
        assert_eq!(card.direction.as_class(), "negative");
        assert_eq!(card.change, "-1.23%");
        assert_eq!(card.symbol, "BTC");
        assert_eq!(card.price, "$67,012.5");
        assert_eq!(card.market_cap, "$1,320,000,000,000");
    }

    #[test]
    fn test_zero_change_is_positive() {
        let coin = CoinSummary::new("usdt", "Tether", "usdt", 1.0, 110_000_000_000.0, Some(0.0));
        let card = render_card(&coin);
        assert_eq!(card.direction, ChangeDirection::Positive);
        assert_eq!(card.change, "0.00%");
    }

    #[test]
    fn test_missing_change() {
        let coin = CoinSummary::new("new", "New Coin", "new", 0.5, 0.0, None);
        let card = render_card(&coin);
        assert_eq!(card.direction, ChangeDirection::Positive);
        assert_eq!(card.change, "n/a");
        assert_eq!(card.market_cap, "$0");
    }

    #[test]
    fn test_change_rounds_to_two_decimals() {
        assert_eq!(format_change(Some(2.5)), "2.50%");
        assert_eq!(format_change(Some(3.14159)), "3.14%");
        assert_eq!(format_change(Some(-0.126)), "-0.13%");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234567.891), "1,234,567.891");
        assert_eq!(format_grouped(0.00012), "0");
        assert_eq!(format_grouped(0.1234), "0.123");
        assert_eq!(format_grouped(-1500.25), "-1,500.25");
    }

    #[test]
    fn test_render_detail() {
        let view = render_detail(&sample_detail("bitcoin", "Bitcoin", "btc"));
        assert_eq!(view.title, "Bitcoin (BTC)");
        assert_eq!(view.current_price, "$1,000");
        assert_eq!(view.total_volume, "$50,000");
        assert_eq!(view.change, "0.50%");
        assert_eq!(view.circulating_supply, "19,000,000");
    }
}
