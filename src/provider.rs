//! Provider abstraction for fetching market data from external APIs

use crate::{
    error::ProviderError,
    types::{CoinDetail, CoinSummary},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Both calls are single requests. Implementations do not retry and report
/// every failure as [`ProviderError::NetworkFailure`].
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the top coins ordered by market cap, descending
    async fn fetch_top_coins(&self) -> Result<Vec<CoinSummary>, ProviderError>;

    /// Fetches extended data for one coin
    ///
    /// # Arguments
    /// * `id` - The provider's coin id (e.g. "bitcoin")
    async fn fetch_coin_detail(&self, id: &str) -> Result<CoinDetail, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
