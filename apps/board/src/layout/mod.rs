// Auto-fit layout engine: grid selection, overflow measurement, font-size bisection.
// The engine is synchronous; the board service runs passes inside tokio::task::spawn_blocking.

pub mod cache;
pub mod debounce;
pub mod font_metrics;
pub mod font_size;
pub mod oracle;
pub mod orchestrator;
pub mod search;
pub mod selector;
pub mod surface;

// Re-export the public API consumed by the board service.
pub use debounce::ResizeDebouncer;
pub use font_metrics::FontFamily;
pub use orchestrator::{LayoutEngine, LayoutState, PresentationDirectives};
pub use surface::{SimulatedSurface, SurfaceConfig};
