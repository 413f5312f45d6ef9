//! Wire types for the schedule feed.

use serde::{Deserialize, Serialize};

/// The feed's `type` discriminator. Missing or unrecognized values mean a schedule card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedCardType {
    Messages,
    #[default]
    #[serde(other)]
    Schedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCard {
    pub title: String,
    #[serde(rename = "type", default)]
    pub card_type: FeedCardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<FeedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

/// A feed response is either the card array or an error object from the sheet script.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FeedResponse {
    Cards(Vec<FeedCard>),
    Error { error: String },
}
