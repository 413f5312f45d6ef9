//! Size Cache: memoizes the resolved font size per viewport and content shape.
//!
//! The cache never evicts. Entries live as long as the process; a changed viewport or
//! card composition simply produces a new fingerprint.

use std::collections::HashMap;

use crate::layout::font_size::FontSize;
use crate::models::card::Card;
use crate::models::viewport::Viewport;

/// Cache key: viewport size plus the ordered `(title, item count)` of every card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub width: u32,
    pub height: u32,
    pub cards: Vec<(String, usize)>,
}

impl Fingerprint {
    pub fn new(viewport: Viewport, cards: &[Card]) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            cards: cards
                .iter()
                .map(|c| (c.title.clone(), c.item_count()))
                .collect(),
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Debug, Default)]
pub struct SizeCache {
    entries: HashMap<Fingerprint, FontSize>,
    hits: u64,
    misses: u64,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, fingerprint: &Fingerprint) -> Option<FontSize> {
        let found = self.entries.get(fingerprint).copied();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn put(&mut self, fingerprint: Fingerprint, size: FontSize) {
        self.entries.insert(fingerprint, size);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
