//! Font-size scalar and the compile-time sizing constants.

use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 72.0;
/// Bisection stops once the bracket is narrower than this.
pub const FONT_STEP: f32 = 0.1;
/// Hard ceiling on bisection steps against a live surface.
pub const MAX_ITERATIONS: u32 = 100;
/// Portrait layouts stack cards and scroll, so no search is run.
pub const PORTRAIT_FONT_SIZE: f32 = 18.0;
pub const COMPACT_FONT_RATIO: f32 = 0.75;

/// Base font size in CSS pixels, shared by all regular text.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(f32);

impl FontSize {
    pub const MIN: FontSize = FontSize(MIN_FONT_SIZE);
    pub const MAX: FontSize = FontSize(MAX_FONT_SIZE);
    pub const PORTRAIT: FontSize = FontSize(PORTRAIT_FONT_SIZE);

    pub fn new(px: f32) -> Self {
        Self(px)
    }

    pub fn px(self) -> f32 {
        self.0
    }

    /// The compact variant, rounded to whole pixels.
    pub fn compact(self) -> FontSize {
        FontSize((self.0 * COMPACT_FONT_RATIO).round())
    }

    pub fn scaled(self, factor: f32) -> FontSize {
        FontSize(self.0 * factor)
    }

    /// CSS length, e.g. `"18px"`.
    pub fn to_css(self) -> String {
        format!("{}px", self.0)
    }
}

/// Search bounds and convergence parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontRange {
    pub min: FontSize,
    pub max: FontSize,
    pub step: f32,
    pub max_iterations: u32,
}

impl Default for FontRange {
    fn default() -> Self {
        Self {
            min: FontSize::MIN,
            max: FontSize::MAX,
            step: FONT_STEP,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

impl FontRange {
    #[cfg(test)]
    pub fn contains(&self, size: FontSize) -> bool {
        size >= self.min && size <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_rounds_to_whole_pixels() {
        assert_eq!(FontSize::new(18.0).compact(), FontSize::new(14.0)); // 13.5 → 14
        assert_eq!(FontSize::new(45.6).compact(), FontSize::new(34.0)); // 34.2 → 34
    }

    #[test]
    fn test_to_css() {
        assert_eq!(FontSize::PORTRAIT.to_css(), "18px");
        assert_eq!(FontSize::new(40.5).to_css(), "40.5px");
    }

    #[test]
    fn test_default_range_contains_bounds() {
        let range = FontRange::default();
        assert!(range.contains(FontSize::MIN));
        assert!(range.contains(FontSize::MAX));
        assert!(!range.contains(FontSize::new(7.9)));
    }
}
