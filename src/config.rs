use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::DEFAULT_MAX_HEADING_CHARS;
use crate::error::ConfigError;
use crate::metadata::DEFAULT_METADATA_WINDOW;
use crate::normalize::DEFAULT_MAX_BLANK_RUN;

/// Extraction settings; every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Lines searched for the separator that closes a header.
    pub metadata_window: usize,
    pub max_blank_run: usize,
    /// Longer lines are always content.
    pub max_heading_chars: usize,
    pub fallback_title: String,
    pub meta_file_names: Vec<String>,
    pub chapter_extensions: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            metadata_window: DEFAULT_METADATA_WINDOW,
            max_blank_run: DEFAULT_MAX_BLANK_RUN,
            max_heading_chars: DEFAULT_MAX_HEADING_CHARS,
            fallback_title: "正文".to_string(),
            meta_file_names: ["meta.txt", "info.txt", "简介.txt", "meta.md"]
                .into_iter()
                .map(String::from)
                .collect(),
            chapter_extensions: vec!["txt".to_string(), "md".to_string()],
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metadata_window == 0 {
            return Err(ConfigError::Invalid("metadata_window must be > 0".into()));
        }
        if self.max_blank_run == 0 {
            return Err(ConfigError::Invalid("max_blank_run must be > 0".into()));
        }
        if self.max_heading_chars == 0 {
            return Err(ConfigError::Invalid("max_heading_chars must be > 0".into()));
        }
        if self.fallback_title.trim().is_empty() {
            return Err(ConfigError::Invalid("missing fallback_title".into()));
        }
        if !self.chapter_extensions.iter().any(|e| !e.trim().is_empty()) {
            return Err(ConfigError::Invalid("no chapter_extensions".into()));
        }
        Ok(())
    }

    /// Whether `ext` (without the dot) names a chapter file.
    pub fn is_chapter_extension(&self, ext: &str) -> bool {
        self.chapter_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Load and validate a YAML config file.
pub fn load_config(path: &Path) -> Result<ExtractConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<ExtractConfig, ConfigError> {
    // an empty file is a valid, all-default config
    let cfg: ExtractConfig = if raw.trim().is_empty() {
        ExtractConfig::default()
    } else {
        serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?
    };
    cfg.validate()?;
    Ok(cfg)
}
