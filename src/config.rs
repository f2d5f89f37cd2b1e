//! Enhancer configuration parsed from page-supplied JSON.
//!
//! Every field is optional; an empty object yields the built-in defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    DEFAULT_PLACEHOLDER_SRC, DEFAULT_REVEAL_SELECTORS, DEFAULT_ROOT_MARGIN, DEFAULT_STORAGE_KEY,
    DEFAULT_THEME_ATTRIBUTE, DEFAULT_THRESHOLD, DEFAULT_VISIBLE_CLASS,
};
use crate::error::EnhanceError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    pub storage_key: String,
    pub theme_attribute: String,
    pub visible_class: String,
    pub reveal_selectors: Vec<String>,
    pub threshold: f64,
    pub root_margin: String,
    pub placeholder_src: String,
    pub perf_logging: bool,
    pub log_level: String,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            theme_attribute: DEFAULT_THEME_ATTRIBUTE.to_owned(),
            visible_class: DEFAULT_VISIBLE_CLASS.to_owned(),
            reveal_selectors: DEFAULT_REVEAL_SELECTORS.iter().map(|s| (*s).to_owned()).collect(),
            threshold: DEFAULT_THRESHOLD,
            root_margin: DEFAULT_ROOT_MARGIN.to_owned(),
            placeholder_src: DEFAULT_PLACEHOLDER_SRC.to_owned(),
            perf_logging: false,
            log_level: "info".to_owned(),
        }
    }
}

impl EnhancerConfig {
    /// Parse config JSON, filling unspecified fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Config`] if `raw` is not a valid config object.
    pub fn from_json(raw: &str) -> Result<Self, EnhanceError> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.threshold = config.threshold.clamp(0.0, 1.0);
        Ok(config)
    }

    /// The reveal selectors joined into one selector list.
    #[must_use]
    pub fn reveal_selector(&self) -> String {
        self.reveal_selectors.join(", ")
    }

    /// Configured log level, falling back to `Info` for unknown names.
    #[must_use]
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
