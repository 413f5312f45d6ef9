//! Layout Orchestrator: one relayout pass from cards + viewport to applied presentation.
//!
//! # Pass
//! 1. Pick the grid plan for the viewport's orientation.
//! 2. Mount the cards on the surface, hidden.
//! 3. Portrait: apply the fixed portrait size. Landscape: try the size cache (re-validated
//!    against the oracle), otherwise bisect and store the result.
//! 4. Reveal and return the resulting `LayoutState`.
//!
//! The engine is the only writer of the surface and the cache.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::layout::cache::{Fingerprint, SizeCache};
use crate::layout::font_size::{FontRange, FontSize};
use crate::layout::oracle::has_overflow;
use crate::layout::search::{find_optimal_font_size, SearchOutcome};
use crate::layout::selector::{select_layout, GridPlan};
use crate::layout::surface::RenderSurface;
use crate::models::card::Card;
use crate::models::viewport::{Orientation, Viewport};

/// Where a pass got its font size from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSource {
    /// Portrait constant; no search.
    Fixed,
    /// Size cache hit that passed re-validation.
    Cached,
    /// Fresh bisection.
    Searched,
}

/// Result of one relayout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    /// Monotonic pass counter of the engine that produced this state.
    pub generation: u64,
    pub viewport: Viewport,
    pub plan: GridPlan,
    pub font_size: FontSize,
    pub compact_font_size: FontSize,
    pub source: SizeSource,
    pub search: Option<SearchOutcome>,
}

/// What a display client needs to apply the layout to its own DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationDirectives {
    /// `grid` (landscape) or `flex` (portrait column).
    pub display: String,
    pub grid_template_columns: Option<String>,
    /// Value of `--base-font-size`.
    pub base_font_size: String,
    /// Value of `--compact-font-size`.
    pub compact_font_size: String,
    /// `grid-column` per placement, in display order; empty in portrait.
    pub card_spans: Vec<String>,
}

impl LayoutState {
    pub fn directives(&self) -> PresentationDirectives {
        let display = match self.plan.orientation {
            Orientation::Landscape => "grid",
            Orientation::Portrait => "flex",
        };
        PresentationDirectives {
            display: display.to_string(),
            grid_template_columns: self.plan.grid_template_columns(),
            base_font_size: self.font_size.to_css(),
            compact_font_size: self.compact_font_size.to_css(),
            card_spans: self
                .plan
                .placements
                .iter()
                .map(|p| p.span.map(|s| format!("span {s}")).unwrap_or_default())
                .collect(),
        }
    }

    /// Same plan and sizes, ignoring which pass produced them or how.
    pub fn same_presentation(&self, other: &LayoutState) -> bool {
        self.viewport == other.viewport
            && self.plan == other.plan
            && self.font_size == other.font_size
            && self.compact_font_size == other.compact_font_size
    }
}

pub struct LayoutEngine<S: RenderSurface> {
    surface: S,
    cache: SizeCache,
    range: FontRange,
    generation: u64,
    searches: u64,
}

impl<S: RenderSurface> LayoutEngine<S> {
    pub fn new(surface: S) -> Self {
        Self::with_range(surface, FontRange::default())
    }

    pub fn with_range(surface: S, range: FontRange) -> Self {
        Self {
            surface,
            cache: SizeCache::new(),
            range,
            generation: 0,
            searches: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn cache(&self) -> &SizeCache {
        &self.cache
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of bisections run so far.
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Runs one full layout pass and returns the applied state.
    pub fn relayout(&mut self, cards: &[Card], viewport: Viewport) -> LayoutState {
        self.generation += 1;
        let orientation = viewport.orientation();
        let plan = select_layout(cards, orientation);

        self.surface.set_visible(false);
        self.surface.mount(viewport, cards, &plan);

        let (font_size, source, search) = match orientation {
            Orientation::Portrait => {
                self.surface.apply_font_size(FontSize::PORTRAIT);
                (FontSize::PORTRAIT, SizeSource::Fixed, None)
            }
            Orientation::Landscape => self.resolve_landscape_size(viewport, cards),
        };

        self.surface.set_visible(true);

        debug!(
            generation = self.generation,
            width = viewport.width,
            height = viewport.height,
            columns = plan.total_columns,
            font_px = font_size.px(),
            ?source,
            "Relayout complete"
        );

        LayoutState {
            generation: self.generation,
            viewport,
            compact_font_size: font_size.compact(),
            plan,
            font_size,
            source,
            search,
        }
    }

    fn resolve_landscape_size(
        &mut self,
        viewport: Viewport,
        cards: &[Card],
    ) -> (FontSize, SizeSource, Option<SearchOutcome>) {
        let fingerprint = Fingerprint::new(viewport, cards);

        if let Some(cached) = self.cache.get(&fingerprint) {
            self.surface.apply_font_size(cached);
            if !has_overflow(&mut self.surface) {
                return (cached, SizeSource::Cached, None);
            }
            info!(
                font_px = cached.px(),
                "Cached font size overflows the current surface; searching again"
            );
        }

        debug!(
            cards = fingerprint.card_count(),
            cached = self.cache.len(),
            "No usable cached size; searching"
        );
        let outcome = self.search();
        self.cache.put(fingerprint, outcome.size);
        (outcome.size, SizeSource::Searched, Some(outcome))
    }

    fn search(&mut self) -> SearchOutcome {
        self.searches += 1;
        find_optimal_font_size(
            &self.range,
            &mut self.surface,
            |surface, size| surface.apply_font_size(size),
            |surface| has_overflow(surface),
        )
    }
}
