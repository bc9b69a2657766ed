//! The single market fetch of a session, tied to the lifetime of its view.

use crate::market::{Asset, MarketSource};
use anyhow::anyhow;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub type FetchOutcome = anyhow::Result<Vec<Asset>>;

/// Handle to the in-flight fetch.
///
/// Dropping the handle cancels the request, so a view that goes away never
/// receives (or writes) a late result.
pub struct MarketFetch {
    token: CancellationToken,
    rx: Option<oneshot::Receiver<FetchOutcome>>,
}

impl MarketFetch {
    /// Issues the request on the tokio runtime.
    pub fn spawn(source: Arc<dyn MarketSource>) -> Self {
        let token = CancellationToken::new();
        let (tx, rx) = oneshot::channel();

        let task_token = token.clone();
        tokio::spawn(async move {
            let start = Instant::now();
            info!("Fetching market listing");

            tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    info!("Market fetch cancelled before completion");
                }
                outcome = source.fetch_markets() => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    match &outcome {
                        Ok(assets) => info!(count = assets.len(), elapsed_ms, "Market fetch finished"),
                        Err(_) => warn!(elapsed_ms, "Market fetch failed"),
                    }
                    // The receiver is gone if the view was torn down meanwhile
                    if tx.send(outcome).is_err() {
                        info!("Market fetch finished after its view closed; dropping result");
                    }
                }
            }
        });

        Self {
            token,
            rx: Some(rx),
        }
    }

    /// Non-blocking poll used by the view loop. Yields the outcome once.
    ///
    /// Once cancelled, the fetch yields nothing, even if a result had already
    /// arrived.
    pub fn try_take(&mut self) -> Option<FetchOutcome> {
        if self.token.is_cancelled() {
            self.rx = None;
            return None;
        }
        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.rx = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.rx = None;
                Some(Err(anyhow!("market fetch ended without a result")))
            }
        }
    }

    /// Waits for the outcome; used where nothing else needs the thread.
    /// `None` means the fetch was cancelled.
    pub async fn wait(mut self) -> Option<FetchOutcome> {
        let rx = self.rx.take()?;
        if self.token.is_cancelled() {
            return None;
        }
        match rx.await {
            Ok(outcome) => Some(outcome),
            Err(_) if self.token.is_cancelled() => None,
            Err(_) => Some(Err(anyhow!("market fetch ended without a result"))),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for MarketFetch {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::fixtures::btc_eth;
    use crate::state::{DashboardState, LoadPhase};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct Ready;

    #[async_trait]
    impl MarketSource for Ready {
        async fn fetch_markets(&self) -> anyhow::Result<Vec<Asset>> {
            Ok(btc_eth())
        }
    }

    struct Failing;

    #[async_trait]
    impl MarketSource for Failing {
        async fn fetch_markets(&self) -> anyhow::Result<Vec<Asset>> {
            Err(anyhow!("dns error"))
        }
    }

    /// Never completes; flags when its future is dropped.
    struct Hanging {
        dropped: Arc<AtomicBool>,
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl MarketSource for Hanging {
        async fn fetch_markets(&self) -> anyhow::Result<Vec<Asset>> {
            let _guard = SetOnDrop(self.dropped.clone());
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[tokio::test]
    async fn wait_yields_listing() {
        let fetch = MarketFetch::spawn(Arc::new(Ready));
        let assets = fetch.wait().await.unwrap().unwrap();
        assert_eq!(assets.len(), 2);
    }

    #[tokio::test]
    async fn try_take_yields_exactly_once() {
        let mut fetch = MarketFetch::spawn(Arc::new(Failing));

        let outcome = loop {
            if let Some(outcome) = fetch.try_take() {
                break outcome;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        };
        assert!(outcome.is_err());
        assert!(fetch.try_take().is_none());
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels_the_request() {
        let dropped = Arc::new(AtomicBool::new(false));
        let fetch = MarketFetch::spawn(Arc::new(Hanging {
            dropped: dropped.clone(),
        }));

        // Let the task reach the pending point
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!dropped.load(Ordering::SeqCst));

        drop(fetch);
        tokio::time::timeout(Duration::from_secs(1), async {
            while !dropped.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("in-flight request should be dropped on cancel");
    }

    #[tokio::test]
    async fn cancelled_fetch_reports_no_listing() {
        let fetch = MarketFetch::spawn(Arc::new(Hanging {
            dropped: Arc::new(AtomicBool::new(false)),
        }));
        fetch.cancel();

        assert!(fetch.wait().await.is_none());
    }

    #[tokio::test]
    async fn cancelled_fetch_leaves_state_loading() {
        let mut fetch = MarketFetch::spawn(Arc::new(Hanging {
            dropped: Arc::new(AtomicBool::new(false)),
        }));
        let mut state = DashboardState::default();

        fetch.cancel();
        for _ in 0..10 {
            if let Some(outcome) = fetch.try_take() {
                state.apply_fetch(outcome);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(state.phase(), LoadPhase::Loading);
        assert!(state.assets().is_empty());
    }

    #[tokio::test]
    async fn result_arriving_before_cancel_is_discarded() {
        let mut fetch = MarketFetch::spawn(Arc::new(Ready));
        // Let the listing land in the channel
        tokio::time::sleep(Duration::from_millis(20)).await;

        fetch.cancel();
        assert!(fetch.try_take().is_none());
    }
}
