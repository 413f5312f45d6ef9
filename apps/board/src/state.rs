use std::sync::Arc;

use crate::board::BoardHandle;
use crate::config::Config;
use crate::feed::FeedSource;
use crate::layout::ResizeDebouncer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable feed source. Default: `FeedClient` against `FEED_URL`.
    pub feed: Arc<dyn FeedSource>,
    /// Current data, viewport, and layout engine behind one lock.
    pub board: BoardHandle,
    /// Coalesces viewport reports from display clients into relayouts.
    pub resize: Arc<ResizeDebouncer>,
}
