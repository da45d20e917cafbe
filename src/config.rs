//! Configuration module for the word matcher
//!
//! Configuration is supplied as JSON by whatever host drives the matcher
//! (a query server, a test bench). Everything is validated once, up front;
//! a configuration that passes `validate` cannot fail later.

use serde::{Deserialize, Serialize};

use crate::search::PageSearch;
use crate::streaming::{Matcher, BEAT_WIDTH};

/// Pattern matcher configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatcherConfig {
    /// Pattern to search for (1 to 32 bytes)
    pub pattern: String,

    /// Only count matches that are whole words
    #[serde(default)]
    pub whole_words: bool,

    /// Per-position qualifiers, empty or as long as the pattern
    #[serde(default)]
    pub qualifiers: String,

    /// Bytes consumed per automaton step
    #[serde(default = "default_beat_width")]
    pub beat_width: usize,
}

fn default_beat_width() -> usize {
    BEAT_WIDTH
}

impl MatcherConfig {
    /// Configuration for a plain substring search
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            whole_words: false,
            qualifiers: String::new(),
            beat_width: default_beat_width(),
        }
    }

    /// Parse configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        parse_json(bytes)
    }

    /// Check every construction-time constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        Matcher::from_config(self).map(|_| ())
    }
}

/// Which engine evaluates a search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Beat-parallel window automaton (bit-exact with hardware)
    #[default]
    Model,
    /// Straightforward software matcher
    Reference,
}

/// Page search configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(flatten)]
    pub matcher: MatcherConfig,

    /// Matches a page needs before it is reported
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,

    #[serde(default)]
    pub mode: SearchMode,

    /// Number of page partitions searched in parallel
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_min_matches() -> usize {
    1
}

fn default_threads() -> usize {
    1
}

impl SearchConfig {
    /// Search configuration with defaults for everything but the pattern
    pub fn new(pattern: &str) -> Self {
        Self {
            matcher: MatcherConfig::new(pattern),
            min_matches: default_min_matches(),
            mode: SearchMode::default(),
            threads: default_threads(),
        }
    }

    /// Parse configuration from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        parse_json(bytes)
    }

    /// Check every construction-time constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        PageSearch::new(self.clone()).map(|_| ())
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, ConfigError> {
    let config_str =
        std::str::from_utf8(bytes).map_err(|e| ConfigError::InvalidUtf8(e.to_string()))?;

    serde_json::from_str(config_str).map_err(|e| ConfigError::InvalidJson(e.to_string()))
}

/// Configuration errors, all raised before any matching happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Pattern is empty or longer than 32 bytes
    PatternLength { len: usize },
    /// Qualifier string is neither empty nor as long as the pattern
    QualifierLength { pattern: usize, qualifiers: usize },
    /// Beat width outside `1..=31`
    BeatWidth { width: usize },
    /// Zero worker threads requested
    Threads,
    InvalidUtf8(String),
    InvalidJson(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::PatternLength { len } => {
                write!(f, "Pattern length {} outside 1..=32", len)
            }
            ConfigError::QualifierLength {
                pattern,
                qualifiers,
            } => write!(
                f,
                "Qualifier length {} does not match pattern length {}",
                qualifiers, pattern
            ),
            ConfigError::BeatWidth { width } => write!(f, "Beat width {} outside 1..=31", width),
            ConfigError::Threads => write!(f, "At least one thread is required"),
            ConfigError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {}", e),
            ConfigError::InvalidJson(e) => write!(f, "Invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
