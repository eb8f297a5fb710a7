//! Fetch metrics collection and reporting
//!
//! Tracks latency percentiles and success rates per API endpoint.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep per endpoint
const MAX_SAMPLES: usize = 100;

/// Market data endpoints the dashboard calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// Top coins by market cap
    Markets,
    /// Single coin detail
    CoinDetail,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Markets => "markets",
            Endpoint::CoinDetail => "coin_detail",
        }
    }
}

/// Metrics for a single endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FetchMetrics {
    pub endpoint: Endpoint,
    /// 50th percentile latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of requests tracked
    pub total_requests: u64,
    /// Number of failed requests
    pub failed_requests: u64,
}

impl FetchMetrics {
    /// Creates metrics with no data
    pub fn empty(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_requests: 0,
            failed_requests: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct EndpointWindow {
    samples: VecDeque<LatencySample>,
    total_requests: u64,
    failed_requests: u64,
}

/// Collects and computes metrics per endpoint
#[derive(Debug, Default)]
pub struct MetricsCollector {
    windows: RwLock<HashMap<Endpoint, EndpointWindow>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request with its duration and success status
    pub async fn record_request(&self, endpoint: Endpoint, duration: Duration, success: bool) {
        let mut windows = self.windows.write().await;
        let window = windows.entry(endpoint).or_default();

        window.total_requests += 1;
        if !success {
            window.failed_requests += 1;
        }

        if window.samples.len() >= MAX_SAMPLES {
            window.samples.pop_front();
        }
        window.samples.push_back(LatencySample {
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        });
    }

    /// Computes current metrics for one endpoint
    pub async fn get_metrics(&self, endpoint: Endpoint) -> FetchMetrics {
        let windows = self.windows.read().await;
        let Some(window) = windows.get(&endpoint) else {
            return FetchMetrics::empty(endpoint);
        };

        // Percentiles over successful requests only
        let mut latencies: Vec<f64> = window
            .samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let success_rate = if window.total_requests > 0 {
            (window.total_requests - window.failed_requests) as f64 / window.total_requests as f64
        } else {
            1.0
        };

        FetchMetrics {
            endpoint,
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate,
            total_requests: window.total_requests,
            failed_requests: window.failed_requests,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}
