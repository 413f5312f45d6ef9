//! Render surface: where the engine applies layout and reads geometry back.
//!
//! `RenderSurface` is the seam between the layout engine and whatever actually draws the
//! board. `SimulatedSurface` is the shipped implementation: a deterministic box model
//! (one grid row of cards, header + scrollable body per card) measured with the static
//! font-metric tables. It commits layout synchronously, so a measurement taken right after
//! `apply_font_size` always observes settled geometry.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};
use crate::layout::font_size::FontSize;
use crate::layout::selector::GridPlan;
use crate::models::card::{Card, CardContent, CardKind};
use crate::models::viewport::{Orientation, Viewport};

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Visible size vs content size of one box, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub client_width: f32,
    pub client_height: f32,
    pub scroll_width: f32,
    pub scroll_height: f32,
}

/// Snapshot of everything the overflow oracle inspects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    pub grid: BoxMetrics,
    pub card_bodies: Vec<BoxMetrics>,
    pub card_headers: Vec<BoxMetrics>,
    /// Label and value boxes of every schedule row. Message lines are not included.
    pub row_texts: Vec<BoxMetrics>,
}

/// A presentation target the layout engine can drive.
pub trait RenderSurface {
    /// Replaces the rendered cards with `cards`, ordered and spanned per `plan`.
    fn mount(&mut self, viewport: Viewport, cards: &[Card], plan: &GridPlan);

    fn apply_font_size(&mut self, size: FontSize);

    fn font_size(&self) -> FontSize;

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Enables or suspends text wrapping; returns the previous setting.
    fn set_text_wrap(&mut self, wrap: bool) -> bool;

    /// Current geometry, or `None` if nothing is mounted.
    fn measure(&self) -> Option<SurfaceGeometry>;
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated surface
// ────────────────────────────────────────────────────────────────────────────

/// Fixed page chrome and box-model constants for the simulated board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub font: FontFamily,
    /// Site title bar above the grid.
    pub header_height_px: f32,
    /// Dedication bar below the grid.
    pub footer_height_px: f32,
    pub grid_gap_px: f32,
    pub card_padding_px: f32,
    /// Gap between a row's label and value.
    pub row_gap_px: f32,
    pub line_height: f32,
    /// Card header font relative to the card's body font.
    pub header_scale: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            font: FontFamily::Heebo,
            header_height_px: 80.0,
            footer_height_px: 40.0,
            grid_gap_px: 16.0,
            card_padding_px: 12.0,
            row_gap_px: 8.0,
            line_height: 1.4,
            header_scale: 1.25,
        }
    }
}

#[derive(Debug, Clone)]
struct Mounted {
    viewport: Viewport,
    orientation: Orientation,
    total_columns: u32,
    /// Cards in display order with their spans.
    cards: Vec<(Card, Option<u32>)>,
}

#[derive(Debug)]
pub struct SimulatedSurface {
    config: SurfaceConfig,
    mounted: Option<Mounted>,
    font_size: FontSize,
    visible: bool,
    wrap: bool,
}

/// Laid-out text box: the visible box width and the text's natural single-line width.
struct TextBox {
    width: f32,
    natural: f32,
}

impl TextBox {
    fn lines(&self, wrap: bool) -> f32 {
        if !wrap || self.natural <= self.width || self.width <= 0.0 {
            1.0
        } else {
            (self.natural / self.width).ceil()
        }
    }

    fn metrics(&self, wrap: bool, line_px: f32) -> BoxMetrics {
        let lines = self.lines(wrap);
        let scroll_width = if wrap {
            self.natural.min(self.width)
        } else {
            self.natural
        };
        BoxMetrics {
            client_width: self.width,
            client_height: lines * line_px,
            scroll_width,
            scroll_height: lines * line_px,
        }
    }
}

impl SimulatedSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            mounted: None,
            font_size: FontSize::MIN,
            visible: true,
            wrap: true,
        }
    }

    fn metrics_table(&self) -> &'static FontMetricTable {
        get_metrics(&self.config.font)
    }

    /// Height left for the grid between the site header and footer.
    fn available_height(&self, viewport: Viewport) -> f32 {
        (viewport.height as f32 - self.config.header_height_px - self.config.footer_height_px)
            .max(0.0)
    }

    /// Width of one grid column track. Zero columns means no tracks, not a division.
    fn column_width(&self, mounted: &Mounted) -> f32 {
        if mounted.total_columns == 0 {
            return 0.0;
        }
        let gaps = self.config.grid_gap_px * (mounted.total_columns - 1) as f32;
        ((mounted.viewport.width as f32 - gaps) / mounted.total_columns as f32).max(0.0)
    }

    /// A spanning card covers `span` tracks and the gaps between them.
    fn card_width(&self, mounted: &Mounted, span: Option<u32>) -> f32 {
        match (mounted.orientation, span) {
            (Orientation::Landscape, Some(span)) if span > 0 => {
                self.column_width(mounted) * span as f32
                    + self.config.grid_gap_px * (span - 1) as f32
            }
            _ => mounted.viewport.width as f32,
        }
    }

    fn body_font(&self, kind: CardKind) -> FontSize {
        if kind.is_compact() {
            self.font_size.compact()
        } else {
            self.font_size
        }
    }

    fn layout(&self, mounted: &Mounted) -> SurfaceGeometry {
        let metrics = self.metrics_table();
        let cfg = &self.config;
        let available = self.available_height(mounted.viewport);
        let pad = cfg.card_padding_px;

        let mut geometry = SurfaceGeometry::default();
        let mut stacked_height = 0.0_f32;
        let mut tallest_fixed = 0.0_f32;

        for (card, span) in &mounted.cards {
            let inner_width = (self.card_width(mounted, *span) - 2.0 * pad).max(0.0);
            let body_font = self.body_font(card.kind);
            let header_font = body_font.scaled(cfg.header_scale);
            let row_line = body_font.px() * cfg.line_height;

            let header = TextBox {
                width: inner_width,
                natural: metrics.measure_px(&card.title, header_font),
            };
            let header_metrics = header.metrics(self.wrap, header_font.px() * cfg.line_height);
            geometry.card_headers.push(header_metrics);

            let mut content_height = 0.0_f32;
            match &card.content {
                CardContent::Rows(rows) => {
                    let half = ((inner_width - cfg.row_gap_px) / 2.0).max(0.0);
                    for row in rows {
                        let label = TextBox {
                            width: half,
                            natural: metrics.measure_px(&row.label, body_font),
                        };
                        let value = TextBox {
                            width: half,
                            natural: metrics.measure_px(&row.value, body_font),
                        };
                        let lines = label.lines(self.wrap).max(value.lines(self.wrap));
                        content_height += lines * row_line;
                        geometry.row_texts.push(label.metrics(self.wrap, row_line));
                        geometry.row_texts.push(value.metrics(self.wrap, row_line));
                    }
                }
                CardContent::Messages(lines) => {
                    for line in lines {
                        let text = TextBox {
                            width: inner_width,
                            natural: metrics.measure_px(line, body_font),
                        };
                        content_height += text.lines(self.wrap) * row_line;
                    }
                }
            }

            let fixed = header_metrics.scroll_height + 2.0 * pad;
            let body = match mounted.orientation {
                // Cards stretch to the grid row; the body gets what the header leaves.
                Orientation::Landscape => BoxMetrics {
                    client_width: inner_width,
                    client_height: (available - fixed).max(0.0),
                    scroll_width: inner_width,
                    scroll_height: content_height,
                },
                // Stacked cards grow with their content.
                Orientation::Portrait => BoxMetrics {
                    client_width: inner_width,
                    client_height: content_height,
                    scroll_width: inner_width,
                    scroll_height: content_height,
                },
            };
            geometry.card_bodies.push(body);
            stacked_height += fixed + content_height + cfg.grid_gap_px;
            tallest_fixed = tallest_fixed.max(fixed);
        }

        let grid_content = match mounted.orientation {
            Orientation::Landscape => tallest_fixed,
            Orientation::Portrait => (stacked_height - cfg.grid_gap_px).max(0.0),
        };
        geometry.grid = BoxMetrics {
            client_width: mounted.viewport.width as f32,
            client_height: available,
            scroll_width: mounted.viewport.width as f32,
            scroll_height: grid_content,
        };
        geometry
    }
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl RenderSurface for SimulatedSurface {
    fn mount(&mut self, viewport: Viewport, cards: &[Card], plan: &GridPlan) {
        let ordered = plan
            .placements
            .iter()
            .filter_map(|p| cards.get(p.source_index).map(|c| (c.clone(), p.span)))
            .collect();
        self.mounted = Some(Mounted {
            viewport,
            orientation: plan.orientation,
            total_columns: plan.total_columns,
            cards: ordered,
        });
    }

    fn apply_font_size(&mut self, size: FontSize) {
        self.font_size = size;
    }

    fn font_size(&self) -> FontSize {
        self.font_size
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_text_wrap(&mut self, wrap: bool) -> bool {
        std::mem::replace(&mut self.wrap, wrap)
    }

    fn measure(&self) -> Option<SurfaceGeometry> {
        self.mounted.as_ref().map(|m| self.layout(m))
    }
}
