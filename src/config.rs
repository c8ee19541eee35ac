use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog root: a URL prefix or a directory holding `ar.json` / `en.json`
    pub translations_source: String,

    /// JSON file holding the persisted language preference
    pub preference_file: String,

    /// Upper bound on one catalog load
    pub load_timeout: Duration,

    /// Pause before subtree notifications are sent to externally rendered trees
    pub legacy_sync_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            translations_source: std::env::var("TRANSLATIONS_SOURCE")
                .unwrap_or_else(|_| "translations".to_string()),
            preference_file: std::env::var("PREFERENCE_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),
            load_timeout: Duration::from_millis(
                parse_optional("LOAD_TIMEOUT_MS")?.unwrap_or(10_000),
            ),
            legacy_sync_delay: Duration::from_millis(
                parse_optional("LEGACY_SYNC_DELAY_MS")?.unwrap_or(50),
            ),
        })
    }
}

/// Read a numeric variable. Unset is `None`; set but unparsable is an error.
fn parse_optional(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a whole number of milliseconds, got '{}'", name, value)),
        Err(_) => Ok(None),
    }
}
