//! Static font-metric tables for the board's display fonts.
//!
//! Widths are in em units (relative to font size) and grouped by character class rather
//! than per glyph. This is an approximation: the browser measures real glyph advances, but
//! class widths keep the simulated surface within a few percent of it, and the search only
//! needs measurement to be monotone in font size, not exact.
//!
//! Markup tags inside row values (`<b>`, `<em>`, ...) are skipped and contribute no width.

use serde::{Deserialize, Serialize};

use crate::layout::font_size::FontSize;

/// Display fonts the board templates ship with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    /// Default sans-serif with a Hebrew block designed alongside the Latin.
    #[default]
    Heebo,
    /// Narrower humanist sans.
    Assistant,
    /// Serif for the classic template; wider Hebrew letterforms.
    FrankRuhlLibre,
}

impl std::str::FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heebo" => Ok(FontFamily::Heebo),
            "assistant" => Ok(FontFamily::Assistant),
            "frank-ruhl-libre" | "frank-ruhl" => Ok(FontFamily::FrankRuhlLibre),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Metric table
// ────────────────────────────────────────────────────────────────────────────

/// Character-class width table for one font family, in em.
pub struct FontMetricTable {
    /// Hebrew letters, U+05D0..=U+05EA, plus presentation forms.
    pub hebrew: f32,
    /// Hebrew points and cantillation marks (combining; zero advance).
    pub hebrew_mark: f32,
    pub latin_lower: f32,
    pub latin_upper: f32,
    pub digit: f32,
    /// `i l j . , : ; ' | !` and similar.
    pub narrow: f32,
    /// `m w M W @ %`.
    pub wide: f32,
    pub space_width: f32,
    /// Everything else (other punctuation, symbols, scripts without a table).
    pub average_char_width: f32,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> f32 {
        match c {
            '\u{0591}'..='\u{05C7}' => self.hebrew_mark,
            '\u{05D0}'..='\u{05EA}' | '\u{FB1D}'..='\u{FB4F}' => self.hebrew,
            ' ' | '\u{00A0}' => self.space_width,
            '0'..='9' => self.digit,
            'i' | 'l' | 'j' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | '"' | '\u{05F3}'
            | '\u{05F4}' => self.narrow,
            'm' | 'w' | 'M' | 'W' | '@' | '%' => self.wide,
            'a'..='z' => self.latin_lower,
            'A'..='Z' => self.latin_upper,
            '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' => 0.0,
            _ => self.average_char_width,
        }
    }

    /// Width of the visible text of `s` in em. Markup tags are skipped.
    pub fn measure_str(&self, s: &str) -> f32 {
        let mut in_tag = false;
        let mut width = 0.0_f32;
        for c in s.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if in_tag => {}
                _ => width += self.char_width(c),
            }
        }
        width
    }

    /// Width of `s` in CSS pixels at the given font size.
    pub fn measure_px(&self, s: &str, size: FontSize) -> f32 {
        self.measure_str(s) * size.px()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

static HEEBO: FontMetricTable = FontMetricTable {
    hebrew: 0.58,
    hebrew_mark: 0.0,
    latin_lower: 0.52,
    latin_upper: 0.64,
    digit: 0.56,
    narrow: 0.24,
    wide: 0.84,
    space_width: 0.25,
    average_char_width: 0.50,
};

static ASSISTANT: FontMetricTable = FontMetricTable {
    hebrew: 0.53,
    hebrew_mark: 0.0,
    latin_lower: 0.48,
    latin_upper: 0.60,
    digit: 0.51,
    narrow: 0.22,
    wide: 0.78,
    space_width: 0.23,
    average_char_width: 0.46,
};

static FRANK_RUHL_LIBRE: FontMetricTable = FontMetricTable {
    hebrew: 0.63,
    hebrew_mark: 0.0,
    latin_lower: 0.50,
    latin_upper: 0.68,
    digit: 0.54,
    narrow: 0.26,
    wide: 0.86,
    space_width: 0.26,
    average_char_width: 0.52,
};

/// Returns the metric table for a font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Heebo => &HEEBO,
        FontFamily::Assistant => &ASSISTANT,
        FontFamily::FrankRuhlLibre => &FRANK_RUHL_LIBRE,
    }
}
