//! Axum route handlers for the Board API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::board::{relayout_with, snapshot};
use crate::errors::AppError;
use crate::feed::poller::check_for_updates;
use crate::layout::{LayoutState, PresentationDirectives};
use crate::models::card::Card;
use crate::models::viewport::Viewport;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ViewportRequest {
    pub width: u32,
    pub height: u32,
}

impl ViewportRequest {
    fn validated(&self) -> Result<Viewport, AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Validation(
                "width and height must be positive".to_string(),
            ));
        }
        Ok(Viewport::new(self.width, self.height))
    }
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub layout: LayoutState,
    pub directives: PresentationDirectives,
}

impl From<LayoutState> for LayoutResponse {
    fn from(layout: LayoutState) -> Self {
        let directives = layout.directives();
        Self { layout, directives }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub site_title: String,
    pub footer_dedication: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub clock: String,
    /// Cards in display order.
    pub cards: Vec<Card>,
    pub layout: LayoutState,
    pub directives: PresentationDirectives,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub changed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/board
///
/// Returns the display-ordered cards with the current layout. Lays out on demand if data
/// exists but no pass has run yet.
pub async fn handle_get_board(
    State(state): State<AppState>,
) -> Result<Json<BoardResponse>, AppError> {
    let (layout, cards) = snapshot(&state.board).await?;

    Ok(Json(BoardResponse {
        site_title: state.config.site_title.clone(),
        footer_dedication: state.config.footer_dedication.clone(),
        clock: chrono::Local::now().format("%H:%M:%S").to_string(),
        cards,
        directives: layout.directives(),
        layout,
    }))
}

/// POST /api/v1/layout
///
/// Relayouts synchronously at the given viewport and returns the result.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<ViewportRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    let viewport = request.validated()?;
    let layout = relayout_with(&state.board, move |board| board.set_viewport(viewport)).await?;
    Ok(Json(layout.into()))
}

/// PUT /api/v1/viewport
///
/// Reports a display client's viewport. Coalesced by the resize debouncer; returns 202.
pub async fn handle_viewport(
    State(state): State<AppState>,
    Json(request): Json<ViewportRequest>,
) -> Result<StatusCode, AppError> {
    let viewport = request.validated()?;
    state.resize.trigger(viewport);
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/refresh
///
/// Checks the feed now instead of waiting for the next poll.
pub async fn handle_refresh(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let changed = check_for_updates(state.feed.as_ref(), &state.board).await?;
    Ok(Json(RefreshResponse { changed }))
}
