mod board;
mod config;
mod errors;
mod feed;
mod layout;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::board::Board;
use crate::config::Config;
use crate::feed::poller::{load_initial, spawn_poller};
use crate::feed::{FeedClient, FeedSource};
use crate::layout::{ResizeDebouncer, SimulatedSurface, SurfaceConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing or placeholder FEED_URL)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting board v{}", env!("CARGO_PKG_VERSION"));

    let client = FeedClient::new(config.feed_url.clone());
    info!(url = client.url(), "Feed client initialized");
    let feed: Arc<dyn FeedSource> = Arc::new(client);

    let surface = SimulatedSurface::new(SurfaceConfig {
        font: config.font,
        ..SurfaceConfig::default()
    });
    info!(
        "Layout surface: {:?}, initial viewport {}x{}",
        config.font, config.initial_viewport.width, config.initial_viewport.height
    );
    let board = Board::new(surface, config.initial_viewport);
    let last_seen = board.watch_viewport();
    let board = board.into_handle();

    load_initial(feed.as_ref(), &board).await;

    let poller = spawn_poller(
        feed.clone(),
        board.clone(),
        Duration::from_secs(config.update_interval_secs),
    );

    let resize_board = board.clone();
    let resize = ResizeDebouncer::spawn(
        Duration::from_millis(config.resize_debounce_ms),
        last_seen,
        move |viewport| {
            let handle = resize_board.clone();
            async move {
                if let Err(e) = board::resize_to(&handle, viewport).await {
                    warn!(error = %e, "Relayout after viewport change failed");
                }
            }
        },
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        feed,
        board,
        resize: Arc::new(resize),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    poller.abort();
    Ok(())
}
