//! Card model consumed by the layout engine.
//!
//! Cards are derived from feed entries on every render. The `kind` of a card is a pure
//! function of its title and the feed's `type` discriminator; it is never stored on the
//! feed side and never mutated after conversion.

use serde::{Deserialize, Serialize};

use crate::feed::models::{FeedCard, FeedCardType};

/// Reserved title of the daily-times card. Rendered compact and pinned last.
pub const TIMES_TITLE: &str = "זמני היום";
/// Reserved title of the announcements card. Rendered compact and pinned first.
pub const MESSAGES_TITLE: &str = "הודעות";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Full-width schedule card.
    Regular,
    /// Narrow card (one of the reserved titles) holding rows.
    Compact,
    /// Narrow announcements card holding free-text lines.
    Messages,
}

impl CardKind {
    /// Derives the kind from the card title and the feed discriminator.
    pub fn derive(title: &str, card_type: FeedCardType) -> Self {
        match (is_reserved_title(title), card_type) {
            (true, FeedCardType::Messages) => CardKind::Messages,
            (true, _) => CardKind::Compact,
            (false, _) => CardKind::Regular,
        }
    }

    /// Compact and Messages cards share the narrow column span and the compact font.
    pub fn is_compact(self) -> bool {
        matches!(self, CardKind::Compact | CardKind::Messages)
    }
}

pub fn is_reserved_title(title: &str) -> bool {
    title == TIMES_TITLE || title == MESSAGES_TITLE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub label: String,
    /// May carry inline markup such as `<b>`; passed through as trusted.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "entries", rename_all = "snake_case")]
pub enum CardContent {
    Rows(Vec<Row>),
    Messages(Vec<String>),
}

impl CardContent {
    /// Number of rows or message lines; the per-card component of the size fingerprint.
    pub fn item_count(&self) -> usize {
        match self {
            CardContent::Rows(rows) => rows.len(),
            CardContent::Messages(lines) => lines.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub kind: CardKind,
    pub content: CardContent,
}

impl Card {
    pub fn new(title: impl Into<String>, card_type: FeedCardType, content: CardContent) -> Self {
        let title = title.into();
        let kind = CardKind::derive(&title, card_type);
        Self {
            title,
            kind,
            content,
        }
    }

    /// Convenience constructor for a schedule card.
    pub fn schedule(title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self::new(title, FeedCardType::Schedule, CardContent::Rows(rows))
    }

    /// Convenience constructor for an announcements card.
    pub fn messages(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self::new(title, FeedCardType::Messages, CardContent::Messages(lines))
    }

    pub fn item_count(&self) -> usize {
        self.content.item_count()
    }
}

impl From<&FeedCard> for Card {
    /// A card missing the content array for its declared type gets empty content.
    fn from(feed: &FeedCard) -> Self {
        let content = match feed.card_type {
            FeedCardType::Messages => {
                CardContent::Messages(feed.messages.clone().unwrap_or_default())
            }
            FeedCardType::Schedule => CardContent::Rows(
                feed.items
                    .iter()
                    .flatten()
                    .map(|item| Row {
                        label: item.label.clone(),
                        value: item.value.clone(),
                    })
                    .collect(),
            ),
        };
        Card::new(feed.title.clone(), feed.card_type, content)
    }
}

/// Converts a full feed payload, preserving input order.
pub fn cards_from_feed(feed: &[FeedCard]) -> Vec<Card> {
    feed.iter().map(Card::from).collect()
}
