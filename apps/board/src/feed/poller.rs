//! Refresh poller: periodically re-fetches the feed and relayouts on change.
//!
//! The fetch happens outside the board lock. Comparison, replacement, and the relayout
//! happen under it, so a refresh that lands mid-layout waits for the running pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::board::BoardHandle;
use crate::errors::AppError;
use crate::feed::FeedSource;

/// Fetches once and applies the result if it differs from the current data.
///
/// Returns whether the board data changed.
pub async fn check_for_updates(
    feed: &dyn FeedSource,
    board: &BoardHandle,
) -> Result<bool, AppError> {
    let cards = feed.fetch().await?;

    let mut guard = board.clone().lock_owned().await;
    if !guard.replace_data(cards) {
        return Ok(false);
    }
    tokio::task::spawn_blocking(move || guard.relayout())
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in refresh relayout: {e}"))
        })??;
    Ok(true)
}

/// Initial load: fetch and lay out once. Failures are logged; the board stays empty.
pub async fn load_initial(feed: &dyn FeedSource, board: &BoardHandle) -> bool {
    match check_for_updates(feed, board).await {
        Ok(_) => {
            info!("Initial board data loaded");
            true
        }
        Err(e) => {
            warn!(error = %e, "Initial feed load failed; board stays empty until a refresh succeeds");
            false
        }
    }
}

/// Spawns the periodic refresh task. The first check runs one `period` after spawn.
pub fn spawn_poller(
    feed: Arc<dyn FeedSource>,
    board: BoardHandle,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match check_for_updates(feed.as_ref(), &board).await {
                Ok(true) => info!("Feed changed; board relaid out"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Feed refresh failed; keeping current data"),
            }
        }
    })
}
