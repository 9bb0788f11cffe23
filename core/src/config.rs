use crate::error::{Result, SearchError};
use crate::MAX_RESULT_DOCUMENT_COUNT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub stop_words: Vec<String>,
    pub max_results: usize,
    /// Bucket count of the parallel relevance accumulator. `None` picks one per
    /// spare core.
    pub accumulator_buckets: Option<usize>,
    pub history_window: usize,
}

pub const DEFAULT_HISTORY_WINDOW: usize = 1440;

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            stop_words: Vec::new(),
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            accumulator_buckets: None,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SearchError::Config(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn bucket_count(&self) -> usize {
        self.accumulator_buckets
            .unwrap_or_else(|| num_cpus::get().saturating_sub(1))
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = SearchConfig::from_json_str(r#"{"stop_words": ["in", "the"]}"#).unwrap();
        assert_eq!(config.stop_words, vec!["in", "the"]);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.history_window, 1440);
        assert!(config.bucket_count() >= 1);
    }

    #[test]
    fn zero_buckets_is_clamped() {
        let config = SearchConfig { accumulator_buckets: Some(0), ..Default::default() };
        assert_eq!(config.bucket_count(), 1);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(SearchConfig::from_json_str("{"), Err(SearchError::Config(_))));
    }
}
