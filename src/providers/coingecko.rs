//! CoinGecko market data provider implementation

use crate::{
    config::DashboardConfig,
    constants::{
        COINGECKO_COIN_ENDPOINT, COINGECKO_MARKETS_ENDPOINT, PAGE_SIZE, USER_AGENT, VS_CURRENCY,
    },
    error::ProviderError,
    metrics::{Endpoint, FetchMetrics, MetricsCollector},
    provider::MarketDataProvider,
    types::{CoinDetail, CoinSummary},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// CoinGecko `/coins/{id}` response, reduced to what the modal shows
#[derive(Debug, Deserialize)]
struct CoinGeckoDetailResponse {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    image: CoinGeckoImage,
    market_data: CoinGeckoMarketData,
}

#[derive(Debug, Default, Deserialize)]
struct CoinGeckoImage {
    #[serde(default)]
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoMarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
    #[serde(default)]
    market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    circulating_supply: Option<f64>,
}

impl From<CoinGeckoDetailResponse> for CoinDetail {
    fn from(response: CoinGeckoDetailResponse) -> Self {
        let usd = |map: &HashMap<String, f64>| map.get(VS_CURRENCY).copied().unwrap_or_default();
        let market = &response.market_data;

        CoinDetail {
            current_price: usd(&market.current_price),
            market_cap: usd(&market.market_cap),
            total_volume: usd(&market.total_volume),
            price_change_percentage_24h: market.price_change_percentage_24h,
            circulating_supply: market.circulating_supply,
            image: response.image.large.unwrap_or_default(),
            id: response.id,
            name: response.name,
            symbol: response.symbol,
        }
    }
}

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    metrics: Arc<MetricsCollector>,
}

impl CoinGeckoProvider {
    /// Creates a provider for the public API with no request timeout
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(&DashboardConfig::default())
    }

    /// Creates a provider from the dashboard configuration
    pub fn with_config(config: &DashboardConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    /// Builds the URL listing the top coins
    pub fn markets_url(&self) -> String {
        format!(
            "{}{}?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url, COINGECKO_MARKETS_ENDPOINT, VS_CURRENCY, PAGE_SIZE
        )
    }

    /// Builds the URL for one coin's detail
    pub fn coin_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, COINGECKO_COIN_ENDPOINT, id)
    }

    /// Gets latency and success metrics for one endpoint
    pub async fn metrics(&self, endpoint: Endpoint) -> FetchMetrics {
        self.metrics.get_metrics(endpoint).await
    }

    /// Issues a GET and decodes the JSON body, recording the outcome
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
    ) -> Result<T, ProviderError> {
        let start = Instant::now();
        let result = self.request(url).await;
        self.metrics
            .record_request(endpoint, start.elapsed(), result.is_ok())
            .await;

        if let Err(e) = &result {
            tracing::debug!(
                endpoint = endpoint.as_str(),
                latency_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "CoinGecko request failed"
            );
        }
        result
    }

    async fn request<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        tracing::debug!(url, "Fetching from CoinGecko");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::network_failure(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::network_failure(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, response_text
            ))
        })
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_top_coins(&self) -> Result<Vec<CoinSummary>, ProviderError> {
        let url = self.markets_url();
        let coins: Vec<CoinSummary> = self.get_json(Endpoint::Markets, &url).await?;

        tracing::debug!(count = coins.len(), "Fetched top coins from CoinGecko");
        Ok(coins)
    }

    async fn fetch_coin_detail(&self, id: &str) -> Result<CoinDetail, ProviderError> {
        let url = self.coin_url(id);
        let response: CoinGeckoDetailResponse = self.get_json(Endpoint::CoinDetail, &url).await?;

        tracing::debug!(coin_id = id, "Fetched coin detail from CoinGecko");
        Ok(response.into())
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
