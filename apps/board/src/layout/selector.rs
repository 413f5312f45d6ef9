//! Layout Selector: picks the grid shape and display order for a card set.
//!
//! # Rules
//! - Portrait: one column, input order, no spans (cards stack and scroll).
//! - Landscape: one grid row; each card spans `COMPACT_SPAN` or `REGULAR_SPAN` columns and
//!   the total column count is the sum of spans.
//! - Landscape order: the messages card first (rightmost under RTL flow), the times card
//!   last (leftmost), everything else in input order.

use serde::{Deserialize, Serialize};

use crate::models::card::{Card, CardKind, MESSAGES_TITLE, TIMES_TITLE};
use crate::models::viewport::Orientation;

pub const REGULAR_SPAN: u32 = 5;
pub const COMPACT_SPAN: u32 = 4;

/// One card's slot in the grid, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Index into the card slice passed to `select_layout`.
    pub source_index: usize,
    pub title: String,
    pub kind: CardKind,
    /// Column span; `None` in portrait.
    pub span: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPlan {
    pub orientation: Orientation,
    /// Zero when landscape with no cards.
    pub total_columns: u32,
    pub regular_span: u32,
    pub compact_span: u32,
    pub placements: Vec<Placement>,
}

impl GridPlan {
    /// CSS `grid-template-columns`, absent for portrait and for an empty grid.
    pub fn grid_template_columns(&self) -> Option<String> {
        match self.orientation {
            Orientation::Landscape if self.total_columns > 0 => {
                Some(format!("repeat({}, 1fr)", self.total_columns))
            }
            _ => None,
        }
    }
}

pub fn span_for(kind: CardKind) -> u32 {
    if kind.is_compact() {
        COMPACT_SPAN
    } else {
        REGULAR_SPAN
    }
}

/// Builds the grid plan for `cards` in the given orientation.
pub fn select_layout(cards: &[Card], orientation: Orientation) -> GridPlan {
    let placements: Vec<Placement> = match orientation {
        Orientation::Portrait => cards
            .iter()
            .enumerate()
            .map(|(i, card)| Placement {
                source_index: i,
                title: card.title.clone(),
                kind: card.kind,
                span: None,
            })
            .collect(),
        Orientation::Landscape => display_order(cards)
            .into_iter()
            .map(|i| Placement {
                source_index: i,
                title: cards[i].title.clone(),
                kind: cards[i].kind,
                span: Some(span_for(cards[i].kind)),
            })
            .collect(),
    };

    let total_columns = match orientation {
        Orientation::Portrait => 1,
        Orientation::Landscape => placements.iter().filter_map(|p| p.span).sum(),
    };

    GridPlan {
        orientation,
        total_columns,
        regular_span: REGULAR_SPAN,
        compact_span: COMPACT_SPAN,
        placements,
    }
}

/// Stable partial sort with two pinned positions.
fn display_order(cards: &[Card]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cards.len()).collect();
    // sort_by_key is stable, so unpinned cards keep their input order.
    order.sort_by_key(|&i| pin_rank(&cards[i].title));
    order
}

fn pin_rank(title: &str) -> u8 {
    match title {
        MESSAGES_TITLE => 0,
        TIMES_TITLE => 2,
        _ => 1,
    }
}
