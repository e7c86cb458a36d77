use std::path::PathBuf;

const DEFAULT_CONTEXT_DIR: &str = ".ai_context";
const DEFAULT_INDEX_FILE: &str = "routing.json";

/// Runtime configuration for a search invocation.
///
/// Parsed from environment variables with fallback defaults; command-line
/// flags override individual fields afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Directory holding the index document (default `.ai_context`).
    pub context_dir: PathBuf,
    /// File name of the index document inside `context_dir`
    /// (default `routing.json`).
    pub index_file: String,
    /// Whether queried tags get their usage scores incremented (default true).
    pub record_usage: bool,
    /// Maximum number of results to print (default unlimited).
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_dir: PathBuf::from(DEFAULT_CONTEXT_DIR),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            record_usage: true,
            limit: None,
        }
    }
}

impl SearchConfig {
    /// Parses configuration from environment variables.
    ///
    /// Falls back to defaults when env vars are not set or invalid.
    ///
    /// # Environment Variables
    ///
    /// - `TAGROUTE_CONTEXT_DIR` (path, default `.ai_context`)
    /// - `TAGROUTE_INDEX_FILE` (file name, default `routing.json`)
    /// - `TAGROUTE_NO_RECORD` (`1`/`true`/`yes` disables usage recording)
    /// - `TAGROUTE_LIMIT` (usize, default unlimited)
    ///
    /// # Examples
    ///
    /// ```
    /// use tagroute::SearchConfig;
    ///
    /// let config = SearchConfig::from_env();
    /// assert!(config.index_path().ends_with(&config.index_file));
    /// ```
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let context_dir = std::env::var("TAGROUTE_CONTEXT_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.context_dir);

        let index_file = std::env::var("TAGROUTE_INDEX_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.index_file);

        let record_usage = !std::env::var("TAGROUTE_NO_RECORD")
            .ok()
            .is_some_and(|s| parse_flag(&s));

        let limit = std::env::var("TAGROUTE_LIMIT")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self {
            context_dir,
            index_file,
            record_usage,
            limit,
        }
    }

    /// Returns the full path of the index document.
    pub fn index_path(&self) -> PathBuf {
        self.context_dir.join(&self.index_file)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
