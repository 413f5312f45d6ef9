use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::layout::surface::RenderSurface;
use crate::state::AppState;

/// GET /health
/// Returns a status object with service version and layout engine counters.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let board = state.board.lock().await;
    let engine = board.engine();
    let viewport = board.viewport();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "board",
        "board": {
            "has_data": board.data().is_some(),
            "viewport": { "width": viewport.width, "height": viewport.height },
            "generation": engine.generation(),
            "font_px": engine.surface().font_size().px(),
            "searches": engine.searches(),
            "cache": {
                "entries": engine.cache().len(),
                "hits": engine.cache().hits(),
                "misses": engine.cache().misses(),
            },
        },
    }))
}
