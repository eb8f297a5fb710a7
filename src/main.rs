//! Terminal front end for the coin dashboard
//!
//! Redraws whenever the dashboard view changes and maps stdin commands onto
//! dashboard operations.

use anyhow::Context;
use clap::Parser;
use coin_dashboard::{
    ClickTarget, CloseTrigger, CoinGeckoProvider, CoinListView, Dashboard, DashboardConfig,
    DashboardView, Endpoint, FilePreferenceStore, MemoryPreferenceStore, ModalState, PreferenceStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "commands: search <term> | open <id> | close | esc | backdrop | theme | refresh | ok | help | quit";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Market data API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Search debounce window in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Preferences file (defaults to the user config directory)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Print each view as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> DashboardConfig {
        let mut config = DashboardConfig::from_env();
        if let Some(url) = &self.api_url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_window = Duration::from_millis(ms);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        config
    }

    fn preferences(&self) -> Arc<dyn PreferenceStore> {
        if let Some(path) = &self.prefs {
            return Arc::new(FilePreferenceStore::new(path));
        }
        match FilePreferenceStore::open_default() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "Theme preference will not be persisted");
                Arc::new(MemoryPreferenceStore::new())
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coin_dashboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    let provider = Arc::new(
        CoinGeckoProvider::with_config(&config).context("Failed to build HTTP client")?,
    );
    let dashboard = Dashboard::new(provider.clone(), args.preferences(), config);

    let mut views = dashboard.subscribe();
    let json = args.json;
    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            if json {
                match serde_json::to_string(&view) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "Failed to encode view"),
                }
            } else {
                println!("{}", draw(&view));
            }
        }
    });

    println!("{HELP}");
    dashboard.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
        let argument = argument.trim();

        match command {
            "" => {}
            "search" | "/" => dashboard.on_search_input(argument),
            "open" if !argument.is_empty() => {
                // failure is shown as a notification in the view
                let _ = dashboard.open_detail(argument).await;
            }
            "close" => {
                dashboard.close_detail(CloseTrigger::CloseButton).await;
            }
            "esc" => {
                dashboard.handle_key("Escape").await;
            }
            "backdrop" => {
                dashboard.handle_click(ClickTarget::Backdrop).await;
            }
            "theme" => {
                dashboard.toggle_theme();
            }
            "refresh" => {
                let _ = dashboard.refresh().await;
            }
            "ok" => dashboard.dismiss_notification(),
            "quit" | "exit" => break,
            _ => println!("{HELP}"),
        }
    }

    dashboard.stop_auto_refresh();
    printer.abort();

    for endpoint in [Endpoint::Markets, Endpoint::CoinDetail] {
        let metrics = provider.metrics(endpoint).await;
        tracing::info!(
            endpoint = endpoint.as_str(),
            total_requests = metrics.total_requests,
            failed_requests = metrics.failed_requests,
            latency_p50_ms = metrics.latency_p50_ms,
            latency_p99_ms = metrics.latency_p99_ms,
            "Session fetch metrics"
        );
    }
    Ok(())
}

fn draw(view: &DashboardView) -> String {
    let mut out = String::new();

    let updated = view
        .last_updated
        .map(|t| format!("Last updated: {}", t.format("%H:%M:%S")))
        .unwrap_or_default();
    out.push_str(&format!(
        "=== Coins [{}] {}  ({})\n",
        view.theme, updated, view.theme_label
    ));
    if !view.search_term.is_empty() {
        out.push_str(&format!("search: {}\n", view.search_term));
    }

    match &view.list {
        CoinListView::Cards(cards) => {
            for card in cards {
                out.push_str(&format!(
                    "{:<16} {:<12} {:<8} {:>18} {:>22} {:>9} {}\n",
                    card.id,
                    card.name,
                    card.symbol,
                    card.price,
                    card.market_cap,
                    card.change,
                    card.direction.as_class()
                ));
            }
        }
        other => {
            if let Some(message) = other.placeholder() {
                out.push_str(message);
                out.push('\n');
            }
        }
    }

    if let ModalState::Open { view: detail, .. } = &view.modal {
        out.push_str(&format!(
            "--- {} ---\nCurrent Price: {}\nMarket Cap: {}\nTotal Volume: {}\n24h Change: {}\nCirculating Supply: {}\n",
            detail.title,
            detail.current_price,
            detail.market_cap,
            detail.total_volume,
            detail.change,
            detail.circulating_supply
        ));
    }

    if let Some(notification) = &view.notification {
        out.push_str(&format!("!!! {} (type `ok` to dismiss)\n", notification));
    }

    out
}
