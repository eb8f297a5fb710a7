//! Coin detail modal
//!
//! Two states, `Closed` and `Open(coin_id)`. Opening while open replaces the
//! content. Every open and every close advances a generation counter; a fetch
//! that completes after its generation was superseded is dropped, so the modal
//! always reflects the most recent request rather than the slowest response.

use crate::{
    error::DashboardError,
    provider::MarketDataProvider,
    render::{render_detail, CoinDetailView},
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModalState {
    Closed,
    Open {
        coin_id: String,
        view: CoinDetailView,
    },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }

    pub fn coin_id(&self) -> Option<&str> {
        match self {
            ModalState::Open { coin_id, .. } => Some(coin_id),
            ModalState::Closed => None,
        }
    }
}

/// Ways the modal gets dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    OutsideClick,
    EscapeKey,
}

/// Where a click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the modal content
    Backdrop,
    /// Anywhere inside the modal content
    Content,
}

/// Result of an open request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalUpdate {
    /// The modal now shows the requested coin
    Opened,
    /// A newer open or a close arrived first; the response was dropped
    Superseded,
}

pub struct DetailModal {
    provider: Arc<dyn MarketDataProvider>,
    state: RwLock<ModalState>,
    generation: AtomicU64,
}

impl DetailModal {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            state: RwLock::new(ModalState::Closed),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn state(&self) -> ModalState {
        self.state.read().await.clone()
    }

    /// Fetches detail for `coin_id` and shows it
    ///
    /// On failure the state is left as it was; a closed modal stays closed.
    /// A failure for a superseded request is dropped like a success would be.
    pub async fn open(&self, coin_id: &str) -> Result<ModalUpdate, DashboardError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(coin_id, generation, "Fetching coin detail");

        let result = self.provider.fetch_coin_detail(coin_id).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(coin_id, generation, "Discarding superseded coin detail");
            return Ok(ModalUpdate::Superseded);
        }

        let detail = result.map_err(|e| DashboardError::detail_fetch_failed(coin_id, e))?;
        *state = ModalState::Open {
            coin_id: coin_id.to_string(),
            view: render_detail(&detail),
        };
        Ok(ModalUpdate::Opened)
    }

    /// Hides the modal and drops any in-flight open
    ///
    /// Returns whether the modal was open.
    pub async fn close(&self, trigger: CloseTrigger) -> bool {
        let mut state = self.state.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);

        let was_open = state.is_open();
        *state = ModalState::Closed;
        if was_open {
            tracing::debug!(?trigger, "Closed detail modal");
        }
        was_open
    }

    /// Escape closes; other keys are ignored
    pub async fn handle_key(&self, key: &str) -> bool {
        if key == "Escape" {
            self.close(CloseTrigger::EscapeKey).await
        } else {
            false
        }
    }

    /// Clicks on the backdrop close; clicks inside the content do not
    pub async fn handle_click(&self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop => self.close(CloseTrigger::OutsideClick).await,
            ClickTarget::Content => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::mock::{sample_detail, MockProvider};
    use std::time::Duration;

    fn modal_with(mock: MockProvider) -> (Arc<MockProvider>, DetailModal) {
        let mock = Arc::new(mock);
        let modal = DetailModal::new(mock.clone());
        (mock, modal)
    }

    #[tokio::test]
    async fn test_open_shows_detail() {
        let mock = MockProvider::new();
        mock.set_detail(sample_detail("bitcoin", "Bitcoin", "btc"));
        let (_, modal) = modal_with(mock);

        assert_eq!(modal.open("bitcoin").await.unwrap(), ModalUpdate::Opened);

        let state = modal.state().await;
        assert_eq!(state.coin_id(), Some("bitcoin"));
        match state {
            ModalState::Open { view, .. } => assert_eq!(view.title, "Bitcoin (BTC)"),
            ModalState::Closed => panic!("modal should be open"),
        }
    }

    #[tokio::test]
    async fn test_failed_open_stays_closed() {
        let mock = MockProvider::new();
        mock.set_detail_error("bitcoin", ProviderError::network_failure("offline"));
        let (_, modal) = modal_with(mock);

        let err = modal.open("bitcoin").await.unwrap_err();
        assert!(matches!(err, DashboardError::DetailFetchFailed { ref id, .. } if id == "bitcoin"));
        assert_eq!(modal.state().await, ModalState::Closed);
    }

    #[tokio::test]
    async fn test_reopen_replaces_content() {
        let mock = MockProvider::new();
        mock.set_detail(sample_detail("bitcoin", "Bitcoin", "btc"));
        mock.set_detail(sample_detail("ethereum", "Ethereum", "eth"));
        let (_, modal) = modal_with(mock);

        modal.open("bitcoin").await.unwrap();
        modal.open("ethereum").await.unwrap();
        assert_eq!(modal.state().await.coin_id(), Some("ethereum"));
    }

    /// Two opens race: bitcoin is requested first but answers last. Without
    /// ordering the slower response would win; the generation check keeps the
    /// most recently requested coin instead.
    #[tokio::test(start_paused = true)]
    async fn test_latest_request_wins_race() {
        let mock = MockProvider::new();
        mock.set_detail(sample_detail("bitcoin", "Bitcoin", "btc"));
        mock.set_detail(sample_detail("ethereum", "Ethereum", "eth"));
        mock.set_detail_delay("bitcoin", Duration::from_millis(500));
        mock.set_detail_delay("ethereum", Duration::from_millis(100));
        let (mock, modal) = modal_with(mock);

        let (first, second) = tokio::join!(modal.open("bitcoin"), modal.open("ethereum"));

        assert_eq!(first.unwrap(), ModalUpdate::Superseded);
        assert_eq!(second.unwrap(), ModalUpdate::Opened);
        assert_eq!(modal.state().await.coin_id(), Some("ethereum"));
        assert_eq!(mock.detail_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_request_wins_when_it_also_finishes_last() {
        let mock = MockProvider::new();
        mock.set_detail(sample_detail("bitcoin", "Bitcoin", "btc"));
        mock.set_detail(sample_detail("ethereum", "Ethereum", "eth"));
        mock.set_detail_delay("bitcoin", Duration::from_millis(100));
        mock.set_detail_delay("ethereum", Duration::from_millis(500));
        let (_, modal) = modal_with(mock);

        let (first, second) = tokio::join!(modal.open("bitcoin"), modal.open("ethereum"));

        assert_eq!(first.unwrap(), ModalUpdate::Superseded);
        assert_eq!(second.unwrap(), ModalUpdate::Opened);
        assert_eq!(modal.state().await.coin_id(), Some("ethereum"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_fetch_keeps_modal_closed() {
        let mock = MockProvider::new();
        mock.set_detail(sample_detail("bitcoin", "Bitcoin", "btc"));
        mock.set_detail_delay("bitcoin", Duration::from_millis(200));
        let (_, modal) = modal_with(mock);

        let close = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            modal.close(CloseTrigger::CloseButton).await
        };
        let (opened, was_open) = tokio::join!(modal.open("bitcoin"), close);

        assert_eq!(opened.unwrap(), ModalUpdate::Superseded);
        assert!(!was_open);
        assert_eq!(modal.state().await, ModalState::Closed);
    }

    #[tokio::test]
    async fn test_close_triggers() {
        let mock = MockProvider::new();
        mock.set_detail(sample_detail("bitcoin", "Bitcoin", "btc"));
        let (_, modal) = modal_with(mock);

        modal.open("bitcoin").await.unwrap();
        assert!(!modal.handle_key("Enter").await);
        assert!(!modal.handle_click(ClickTarget::Content).await);
        assert!(modal.state().await.is_open());
        assert!(modal.handle_key("Escape").await);
        assert!(!modal.state().await.is_open());

        modal.open("bitcoin").await.unwrap();
        assert!(modal.handle_click(ClickTarget::Backdrop).await);

        modal.open("bitcoin").await.unwrap();
        assert!(modal.close(CloseTrigger::CloseButton).await);
        assert!(!modal.close(CloseTrigger::CloseButton).await);
    }
}
