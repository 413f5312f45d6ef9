use anyhow::{bail, Context, Result};

use crate::layout::FontFamily;
use crate::models::viewport::Viewport;

const PLACEHOLDER_FEED_URL: &str = "YOUR_DEPLOYED_WEB_APP_URL_GOES_HERE";
const DEFAULT_SITE_TITLE: &str = "בית הכנסת היכל חיים";
const DEFAULT_FOOTER_DEDICATION: &str = "לעלוי נשמת יהושע בן ישראל איסר ז\"ל";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub port: u16,
    pub rust_log: String,
    pub update_interval_secs: u64,
    pub resize_debounce_ms: u64,
    pub initial_viewport: Viewport,
    pub font: FontFamily,
    pub site_title: String,
    pub footer_dedication: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let feed_url = lookup("FEED_URL")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'FEED_URL' is not set")?;
        if feed_url.contains(PLACEHOLDER_FEED_URL) {
            bail!("FEED_URL still holds the placeholder; set it to the deployed web app URL");
        }

        let font = match lookup("BOARD_FONT") {
            Some(raw) => raw
                .parse::<FontFamily>()
                .map_err(anyhow::Error::msg)
                .context("BOARD_FONT must be heebo, assistant, or frank-ruhl-libre")?,
            None => FontFamily::default(),
        };

        Ok(Config {
            feed_url,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            update_interval_secs: parse_or(&lookup, "UPDATE_INTERVAL_SECS", 60)?,
            resize_debounce_ms: parse_or(&lookup, "RESIZE_DEBOUNCE_MS", 200)?,
            initial_viewport: Viewport::new(
                parse_or(&lookup, "VIEWPORT_WIDTH", 1920)?,
                parse_or(&lookup, "VIEWPORT_HEIGHT", 1080)?,
            ),
            font,
            site_title: lookup("SITE_TITLE").unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
            footer_dedication: lookup("FOOTER_DEDICATION")
                .unwrap_or_else(|| DEFAULT_FOOTER_DEDICATION.to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("FEED_URL", "https://example.org/exec")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.update_interval_secs, 60);
        assert_eq!(config.resize_debounce_ms, 200);
        assert_eq!(config.initial_viewport, Viewport::new(1920, 1080));
        assert_eq!(config.font, FontFamily::Heebo);
        assert_eq!(config.site_title, DEFAULT_SITE_TITLE);
    }

    #[test]
    fn test_missing_feed_url_fails() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("FEED_URL", "  ")])).is_err());
    }

    #[test]
    fn test_placeholder_feed_url_rejected() {
        let err = Config::from_lookup(lookup_from(&[("FEED_URL", PLACEHOLDER_FEED_URL)]))
            .unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_invalid_numbers_and_font_rejected() {
        let base = ("FEED_URL", "https://example.org/exec");
        assert!(Config::from_lookup(lookup_from(&[base, ("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[base, ("VIEWPORT_WIDTH", "-5")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[base, ("BOARD_FONT", "papyrus")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("FEED_URL", "https://example.org/exec"),
            ("PORT", "3000"),
            ("BOARD_FONT", "assistant"),
            ("VIEWPORT_WIDTH", "1280"),
            ("VIEWPORT_HEIGHT", "720"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.font, FontFamily::Assistant);
        assert_eq!(config.initial_viewport, Viewport::new(1280, 720));
    }
}
