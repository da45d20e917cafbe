//! Telemetry Module for the word matcher
//!
//! Emits one structured JSON log line per search, plus one per rejected
//! configuration. Whatever logger the host installs collects them.

use log::{info, warn};
use serde::Serialize;

use crate::config::{ConfigError, SearchConfig, SearchMode};
use crate::search::SearchResults;

/// Search event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchEventType {
    /// A page search ran to completion
    SearchCompleted,
    /// A configuration failed validation
    ConfigRejected,
}

/// Search event for logging
#[derive(Debug, Clone, Serialize)]
pub struct SearchEvent {
    pub event_type: SearchEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SearchMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_matches: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_matches: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beats: Option<u64>,
    /// Bytes of text plus page offsets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_micros: Option<u64>,
    /// Throughput in MB/s, when the run took measurable time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_mbps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SearchEvent {
    pub fn new(event_type: SearchEventType) -> Self {
        Self {
            event_type,
            pattern: None,
            mode: None,
            threads: None,
            word_matches: None,
            page_matches: None,
            beats: None,
            data_size: None,
            elapsed_micros: None,
            throughput_mbps: None,
            reason: None,
        }
    }

    /// Set the pattern; sentinel bytes are escaped by JSON serialization
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn with_search(mut self, mode: SearchMode, threads: usize) -> Self {
        self.mode = Some(mode);
        self.threads = Some(threads);
        self
    }

    /// Set match totals
    pub fn with_matches(mut self, word_matches: u64, page_matches: u64) -> Self {
        self.word_matches = Some(word_matches);
        self.page_matches = Some(page_matches);
        self
    }

    /// Set work done and time taken
    pub fn with_timing(mut self, beats: u64, data_size: u64, elapsed_micros: u64) -> Self {
        self.beats = Some(beats);
        self.data_size = Some(data_size);
        self.elapsed_micros = Some(elapsed_micros);
        if elapsed_micros > 0 {
            // bytes per microsecond is MB/s
            self.throughput_mbps = Some(data_size as f64 / elapsed_micros as f64);
        }
        self
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// Log the event
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => match self.event_type {
                SearchEventType::ConfigRejected => {
                    warn!("[WORD-MATCH] {}", json);
                }
                SearchEventType::SearchCompleted => {
                    info!("[WORD-MATCH] {}", json);
                }
            },
            Err(e) => {
                warn!("Failed to serialize search event: {}", e);
            }
        }
    }
}

/// Create a completed search event
pub fn search_completed(config: &SearchConfig, results: &SearchResults) -> SearchEvent {
    SearchEvent::new(SearchEventType::SearchCompleted)
        .with_pattern(&config.matcher.pattern)
        .with_search(config.mode, config.threads)
        .with_matches(results.num_word_matches, results.num_page_matches)
        .with_timing(results.beats, results.data_size, results.elapsed_micros)
}

/// Create a rejected configuration event
pub fn config_rejected(error: &ConfigError) -> SearchEvent {
    SearchEvent::new(SearchEventType::ConfigRejected).with_reason(&error.to_string())
}
