//! Measurement Oracle: answers "does anything overflow at the applied font size?"
//!
//! Overflow means any of:
//! - the grid's content is taller than its visible height
//! - a card body's content is taller than its visible height
//! - a row label or value is wider than its box (unwrapped)
//! - a card header is wider than its box (unwrapped)
//!
//! Vertical checks read the geometry as displayed. Horizontal checks suspend wrapping to
//! read natural text width; the previous wrap mode is restored when the guard drops, which
//! also covers a panic inside `measure`.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::layout::surface::{BoxMetrics, RenderSurface, SurfaceGeometry};

/// Sub-pixel rounding tolerance. Content exactly at the box edge is not overflow.
pub const OVERFLOW_EPSILON_PX: f32 = 1.0;

fn overflows_vertically(b: &BoxMetrics) -> bool {
    b.scroll_height > b.client_height + OVERFLOW_EPSILON_PX
}

fn overflows_horizontally(b: &BoxMetrics) -> bool {
    b.scroll_width > b.client_width + OVERFLOW_EPSILON_PX
}

/// Vertical overflow of the grid or any card body.
pub fn vertical_overflow(geometry: &SurfaceGeometry) -> bool {
    overflows_vertically(&geometry.grid) || geometry.card_bodies.iter().any(overflows_vertically)
}

/// Horizontal overflow of any row text or card header.
pub fn horizontal_overflow(geometry: &SurfaceGeometry) -> bool {
    geometry.row_texts.iter().any(overflows_horizontally)
        || geometry.card_headers.iter().any(overflows_horizontally)
}

/// Suspends text wrapping on a surface for the guard's lifetime.
pub struct WrapSuspended<'a, S: RenderSurface + ?Sized> {
    surface: &'a mut S,
    previous: bool,
}

impl<'a, S: RenderSurface + ?Sized> WrapSuspended<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let previous = surface.set_text_wrap(false);
        Self { surface, previous }
    }
}

impl<S: RenderSurface + ?Sized> Deref for WrapSuspended<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> DerefMut for WrapSuspended<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> Drop for WrapSuspended<'_, S> {
    fn drop(&mut self) {
        self.surface.set_text_wrap(self.previous);
    }
}

/// Returns true if the surface overflows at its currently applied font size.
///
/// A surface with no committed geometry counts as overflowing, so the search shrinks
/// rather than confirming a fit it never measured.
pub fn has_overflow<S: RenderSurface + ?Sized>(surface: &mut S) -> bool {
    let Some(displayed) = surface.measure() else {
        debug!("Surface has no committed geometry; treating as overflow");
        return true;
    };
    if vertical_overflow(&displayed) {
        return true;
    }

    let unwrapped = WrapSuspended::new(surface);
    match unwrapped.measure() {
        Some(natural) => horizontal_overflow(&natural),
        None => {
            debug!("Surface lost geometry while measuring natural widths; treating as overflow");
            true
        }
    }
}
