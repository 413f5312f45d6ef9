//! Feed client: fetches the board's card data from the published sheet script.
//!
//! The feed is a black box: one GET returning either a JSON card array or
//! `{"error": "..."}`. A cache-busting `cb` query parameter defeats intermediary caches.
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;
pub mod poller;

use models::{FeedCard, FeedResponse};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Feed reported an error: {0}")]
    Remote(String),
}

/// A source of card data. Carried in `AppState` as `Arc<dyn FeedSource>`.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<FeedCard>, FeedError>;
}

#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<Vec<FeedCard>, FeedError> {
        let cache_buster = chrono::Utc::now().timestamp_millis();
        debug!(url = %self.url, cache_buster, "Fetching feed");

        let response = self
            .client
            .get(&self.url)
            .query(&[("cb", cache_buster)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Feed request failed");
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        parse_feed(&text)
    }
}

/// Parses a feed body into cards, surfacing a remote error object as `FeedError::Remote`.
pub fn parse_feed(body: &str) -> Result<Vec<FeedCard>, FeedError> {
    match serde_json::from_str::<FeedResponse>(body) {
        Ok(FeedResponse::Cards(cards)) => Ok(cards),
        Ok(FeedResponse::Error { error }) => Err(FeedError::Remote(error)),
        // Re-parse strictly so the error names what was wrong with the card array.
        Err(_) => Err(serde_json::from_str::<Vec<FeedCard>>(body)
            .err()
            .map(FeedError::Parse)
            .unwrap_or_else(|| FeedError::Remote("unrecognized feed payload".to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_cards() {
        let cards = parse_feed(r#"[{"title": "חול", "items": [{"label": "שחרית", "value": "06:30"}]}]"#)
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "חול");
    }

    #[test]
    fn test_parse_feed_empty_array() {
        assert!(parse_feed("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_remote_error() {
        let err = parse_feed(r#"{"error": "Sheet 'לוח' not found"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Remote(msg) if msg.contains("not found")));
    }

    #[test]
    fn test_parse_feed_malformed() {
        let err = parse_feed(r#"[{"items": []}]"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)), "got {err:?}");
        assert!(parse_feed("<html>").is_err());
    }
}
