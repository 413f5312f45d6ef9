use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Taller-than-wide is portrait; a square viewport is landscape.
    pub fn orientation(&self) -> Orientation {
        if self.height > self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// True if `other` differs enough to warrant a relayout: an orientation flip, or
    /// either dimension moving by more than one pixel.
    pub fn differs_from(&self, other: &Viewport) -> bool {
        self.orientation() != other.orientation()
            || self.width.abs_diff(other.width) > 1
            || self.height.abs_diff(other.height) > 1
    }
}
