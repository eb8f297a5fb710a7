//! In-memory coin store

use crate::types::CoinSummary;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Last-fetched list of coins, in API order
///
/// The list is only ever replaced as a whole. Filtering reads a snapshot and
/// never writes back.
pub struct CoinStore {
    coins: RwLock<Vec<CoinSummary>>,
}

impl CoinStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            coins: RwLock::new(Vec::new()),
        }
    }

    /// Replaces the whole list
    ///
    /// Keeps API order. If an id appears more than once the first occurrence
    /// wins.
    pub async fn replace(&self, coins: Vec<CoinSummary>) {
        let mut seen = HashSet::with_capacity(coins.len());
        let unique: Vec<CoinSummary> = coins
            .into_iter()
            .filter(|coin| seen.insert(coin.id.clone()))
            .collect();

        let mut slot = self.coins.write().await;
        tracing::debug!(previous = slot.len(), current = unique.len(), "Replaced coin store");
        *slot = unique;
    }

    /// Snapshot of every coin
    pub async fn coins(&self) -> Vec<CoinSummary> {
        self.coins.read().await.clone()
    }

    /// Coins whose name or symbol contains `term`, ignoring case
    pub async fn filter_by_name(&self, term: &str) -> Vec<CoinSummary> {
        filter_by_name(&self.coins.read().await, term)
    }

    pub async fn len(&self) -> usize {
        self.coins.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.coins.read().await.is_empty()
    }
}

impl Default for CoinStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive substring match against each coin's name
///
/// The ticker symbol is matched too, so "BTC" finds Bitcoin. An empty term
/// matches everything.
pub fn filter_by_name(coins: &[CoinSummary], term: &str) -> Vec<CoinSummary> {
    let term = term.to_lowercase();
    coins
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&term) || coin.symbol.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::sample_coins;

    #[test]
    fn test_filter_is_case_insensitive() {
        let coins = sample_coins();

        let matches = filter_by_name(&coins, "BITCOIN");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "bitcoin");

        assert_eq!(filter_by_name(&coins, "eReUm").len(), 1);
    }

    #[test]
    fn test_filter_btc_finds_bitcoin_only() {
        let coins = sample_coins();
        let matches = filter_by_name(&coins, "BTC");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Bitcoin");
        assert!(filter_by_name(&coins, "doge").is_empty());
    }

    #[test]
    fn test_empty_term_matches_all_in_order() {
        let coins = sample_coins();
        let matches = filter_by_name(&coins, "");
        assert_eq!(matches, coins);
    }

    #[tokio::test]
    async fn test_replace_dedups_by_id() {
        let store = CoinStore::new();
        let mut coins = sample_coins();
        let mut dup = coins[0].clone();
        dup.name = "Bitcoin Again".to_string();
        coins.push(dup);

        store.replace(coins).await;

        let stored = store.coins().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "Bitcoin");
        assert_eq!(stored[1].id, "ethereum");
    }

    #[tokio::test]
    async fn test_filter_does_not_mutate_store() {
        let store = CoinStore::new();
        store.replace(sample_coins()).await;

        let matches = store.filter_by_name("ether").await;
        assert_eq!(matches.len(), 1);
        assert_eq!(store.len().await, 2);
    }
}
