//! Engine configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use text_metrics::SplitConfig;

/// Configuration for a [`WeaveEngine`](crate::engine::WeaveEngine).
///
/// Every field has a default, so partial TOML files work:
///
/// ```toml
/// lines_to_display = 4
/// seed_path = "assets/monologue.md"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of display lines per excerpt.
    pub lines_to_display: usize,

    /// Characters per display line.
    pub chars_per_line: usize,

    /// Entropy threshold for fragment splitting.
    pub entropy_threshold: f64,

    /// Perplexity threshold for fragment splitting.
    pub perplexity_threshold: f64,

    /// Seed document read on first run. When absent, a missing persisted
    /// state degrades to the placeholder text.
    pub seed_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lines_to_display: 6,
            chars_per_line: 80,
            entropy_threshold: 2.0,
            perplexity_threshold: 4.0,
            seed_path: None,
        }
    }
}

impl EngineConfig {
    /// Target excerpt length in characters.
    pub fn target_chars(&self) -> usize {
        self.lines_to_display * self.chars_per_line
    }

    /// Splitter thresholds derived from this configuration.
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig {
            entropy_threshold: self.entropy_threshold,
            perplexity_threshold: self.perplexity_threshold,
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a configuration from a TOML file.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
