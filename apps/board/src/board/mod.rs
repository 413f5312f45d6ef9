//! Board state: the current feed data, the viewport, and the layout engine.
//!
//! All of it sits behind one `tokio::sync::Mutex`. A relayout holds the lock for the whole
//! pass (inside `spawn_blocking`), so feed refreshes and viewport changes queue behind a
//! running pass instead of interleaving with it.

pub mod handlers;

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::feed::models::FeedCard;
use crate::layout::{LayoutEngine, LayoutState, SimulatedSurface};
use crate::models::card::{cards_from_feed, Card};
use crate::models::viewport::Viewport;

pub type BoardHandle = Arc<Mutex<Board>>;

pub struct Board {
    data: Option<Vec<FeedCard>>,
    viewport: Viewport,
    engine: LayoutEngine<SimulatedSurface>,
    layout: Option<LayoutState>,
    viewport_tx: watch::Sender<Viewport>,
}

impl Board {
    pub fn new(surface: SimulatedSurface, viewport: Viewport) -> Self {
        let (viewport_tx, _) = watch::channel(viewport);
        Self {
            data: None,
            viewport,
            engine: LayoutEngine::new(surface),
            layout: None,
            viewport_tx,
        }
    }

    pub fn into_handle(self) -> BoardHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn data(&self) -> Option<&[FeedCard]> {
        self.data.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.viewport_tx.send_replace(viewport);
    }

    /// Follows the board's viewport, however it was changed.
    pub fn watch_viewport(&self) -> watch::Receiver<Viewport> {
        self.viewport_tx.subscribe()
    }

    pub fn layout(&self) -> Option<&LayoutState> {
        self.layout.as_ref()
    }

    pub fn engine(&self) -> &LayoutEngine<SimulatedSurface> {
        &self.engine
    }

    /// Cards in input order, derived fresh from the stored feed data.
    pub fn cards(&self) -> Vec<Card> {
        self.data.as_deref().map(cards_from_feed).unwrap_or_default()
    }

    /// Cards in the display order of `layout`'s plan.
    pub fn display_cards(&self, layout: &LayoutState) -> Vec<Card> {
        let cards = self.cards();
        layout
            .plan
            .placements
            .iter()
            .filter_map(|p| cards.get(p.source_index).cloned())
            .collect()
    }

    /// Replaces the current data if it differs structurally. Returns true if replaced.
    ///
    /// The stored layout is dropped with the old data; a stored layout always describes
    /// the current cards.
    pub fn replace_data(&mut self, data: Vec<FeedCard>) -> bool {
        if self.data.as_ref() == Some(&data) {
            return false;
        }
        info!(cards = data.len(), "Board data updated");
        self.data = Some(data);
        self.layout = None;
        true
    }

    /// Runs a layout pass for the current data and viewport and stores the result.
    pub fn relayout(&mut self) -> Result<LayoutState, AppError> {
        if self.data.is_none() {
            return Err(AppError::NoData);
        }
        let cards = self.cards();
        let state = self.engine.relayout(&cards, self.viewport);
        self.store(state.clone());
        Ok(state)
    }

    /// Keeps the newest pass only.
    fn store(&mut self, state: LayoutState) {
        match &self.layout {
            Some(current) if current.generation >= state.generation => {
                debug!(
                    stale = state.generation,
                    current = current.generation,
                    "Discarding superseded layout"
                );
            }
            Some(current) if current.same_presentation(&state) => {
                debug!(generation = state.generation, "Relayout left the presentation unchanged");
                self.layout = Some(state);
            }
            _ => self.layout = Some(state),
        }
    }
}

/// Runs `f` then a relayout on the blocking pool while holding the board lock.
///
/// `f` can adjust the board (viewport, data) first; it runs under the same lock, so no
/// other pass can observe the intermediate state.
pub async fn relayout_with<F>(board: &BoardHandle, f: F) -> Result<LayoutState, AppError>
where
    F: FnOnce(&mut Board) + Send + 'static,
{
    let mut guard = board.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || {
        f(&mut *guard);
        guard.relayout()
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in relayout: {e}")))?
}

/// Applies a settled viewport report.
///
/// A report within tolerance of the board's current viewport (same orientation, at most
/// 1px per dimension) is skipped. Any other report moves the board and relays out if
/// data has loaded. Returns the new layout, or `None` when nothing was laid out.
pub async fn resize_to(
    board: &BoardHandle,
    viewport: Viewport,
) -> Result<Option<LayoutState>, AppError> {
    let mut guard = board.clone().lock_owned().await;
    if !viewport.differs_from(&guard.viewport()) {
        debug!(
            width = viewport.width,
            height = viewport.height,
            "Viewport within tolerance of the board; skipping relayout"
        );
        return Ok(None);
    }
    guard.set_viewport(viewport);
    if guard.data().is_none() {
        return Ok(None);
    }
    tokio::task::spawn_blocking(move || guard.relayout())
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resize: {e}")))?
        .map(Some)
}

/// The current layout with its cards in display order, read under one guard.
///
/// Lays out on demand when data exists but no pass has run for it yet.
pub async fn snapshot(board: &BoardHandle) -> Result<(LayoutState, Vec<Card>), AppError> {
    let mut guard = board.clone().lock_owned().await;
    if guard.data().is_none() {
        return Err(AppError::NoData);
    }
    if let Some(layout) = guard.layout().cloned() {
        let cards = guard.display_cards(&layout);
        return Ok((layout, cards));
    }
    tokio::task::spawn_blocking(move || {
        let layout = guard.relayout()?;
        let cards = guard.display_cards(&layout);
        Ok::<_, AppError>((layout, cards))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in snapshot: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::models::{FeedCardType, FeedItem};
    use crate::layout::orchestrator::SizeSource;

    fn feed(rows: usize) -> Vec<FeedCard> {
        vec![FeedCard {
            title: "חול".to_string(),
            card_type: FeedCardType::Schedule,
            items: Some(
                (0..rows)
                    .map(|i| FeedItem {
                        label: format!("מנחה {i}"),
                        value: "13:30".to_string(),
                    })
                    .collect(),
            ),
            messages: None,
        }]
    }

    fn board() -> Board {
        Board::new(SimulatedSurface::default(), Viewport::new(1600, 900))
    }

    #[test]
    fn test_relayout_without_data_is_no_data() {
        assert!(matches!(board().relayout(), Err(AppError::NoData)));
    }

    #[test]
    fn test_replace_data_detects_change() {
        let mut board = board();
        assert!(board.replace_data(feed(2)));
        assert!(!board.replace_data(feed(2)));
        assert!(board.replace_data(feed(3)));
    }

    #[test]
    fn test_store_keeps_newest_generation() {
        let mut board = board();
        board.replace_data(feed(2));
        let first = board.relayout().unwrap();
        let second = board.relayout().unwrap();
        board.store(first);
        assert_eq!(board.layout().map(|l| l.generation), Some(second.generation));
    }

    #[tokio::test]
    async fn test_relayout_with_applies_viewport_first() {
        let handle = board().into_handle();
        handle.lock().await.replace_data(feed(3));

        let state = relayout_with(&handle, |b| b.set_viewport(Viewport::new(720, 1280)))
            .await
            .unwrap();
        assert_eq!(state.viewport, Viewport::new(720, 1280));
        assert_eq!(state.source, SizeSource::Fixed);

        let guard = handle.lock().await;
        assert_eq!(guard.layout(), Some(&state));
    }

    fn titled(titles: &[&str]) -> Vec<FeedCard> {
        titles
            .iter()
            .map(|title| FeedCard {
                title: title.to_string(),
                card_type: FeedCardType::Schedule,
                items: Some(vec![FeedItem {
                    label: "שחרית".to_string(),
                    value: "06:30".to_string(),
                }]),
                messages: None,
            })
            .collect()
    }

    #[test]
    fn test_replace_data_drops_stale_layout() {
        let mut board = board();
        board.replace_data(feed(2));
        board.relayout().unwrap();
        assert!(board.layout().is_some());

        board.replace_data(feed(3));
        assert!(board.layout().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_pairs_layout_with_current_cards() {
        let handle = board().into_handle();
        assert!(matches!(snapshot(&handle).await, Err(AppError::NoData)));

        handle.lock().await.replace_data(titled(&["א", "ב"]));
        relayout(&handle).await;

        // New data lands without a pass, like a refresh that has not relaid out yet.
        handle
            .lock()
            .await
            .replace_data(titled(&["זמני היום", "ג", "הודעות"]));

        let (layout, cards) = snapshot(&handle).await.unwrap();
        let planned: Vec<&str> = layout.plan.placements.iter().map(|p| p.title.as_str()).collect();
        let served: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(planned, served);
        assert_eq!(served, vec!["הודעות", "ג", "זמני היום"]);
    }

    async fn relayout(handle: &BoardHandle) {
        relayout_with(handle, |_| {}).await.unwrap();
    }

    #[tokio::test]
    async fn test_resize_to_compares_against_board_viewport() {
        let handle = board().into_handle();
        handle.lock().await.replace_data(feed(3));

        // Jitter around the current viewport is ignored.
        assert!(resize_to(&handle, Viewport::new(1601, 899)).await.unwrap().is_none());
        assert_eq!(handle.lock().await.viewport(), Viewport::new(1600, 900));

        // A layout request moves the board without going through resize reports.
        relayout_with(&handle, |b| b.set_viewport(Viewport::new(1280, 720)))
            .await
            .unwrap();

        // Reporting the earlier size again must move the board back.
        let state = resize_to(&handle, Viewport::new(1600, 900))
            .await
            .unwrap()
            .expect("relayout at the reported viewport");
        assert_eq!(state.viewport, Viewport::new(1600, 900));
        assert_eq!(handle.lock().await.viewport(), Viewport::new(1600, 900));
    }

    #[test]
    fn test_watch_viewport_follows_every_change() {
        let mut board = board();
        let watched = board.watch_viewport();
        assert_eq!(*watched.borrow(), Viewport::new(1600, 900));
        board.set_viewport(Viewport::new(1280, 720));
        assert_eq!(*watched.borrow(), Viewport::new(1280, 720));
    }

    #[tokio::test]
    async fn test_resize_to_without_data_moves_viewport_only() {
        let handle = board().into_handle();
        assert!(resize_to(&handle, Viewport::new(900, 1600)).await.unwrap().is_none());
        let guard = handle.lock().await;
        assert_eq!(guard.viewport(), Viewport::new(900, 1600));
        assert!(guard.layout().is_none());
    }
}
