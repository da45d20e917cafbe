//! Beat-parallel word matcher
//!
//! Software model of a hardware text-search kernel. Text streams through a
//! fixed-size window automaton eight bytes per step (the beat width is
//! configurable) and every occurrence of a pattern of up to 32 bytes is
//! counted, overlapping occurrences included. Patterns may contain wildcard,
//! word-class and non-word-class slots, any slot may repeat one or more
//! times, and matches can be restricted to whole words.
//!
//! ```
//! use word_match::Matcher;
//!
//! let matcher = Matcher::new("here", false, "").unwrap();
//! assert_eq!(matcher.check_str("herehere"), 2);
//! ```
//!
//! `search::PageSearch` runs a matcher over many titled pages, optionally
//! partitioned across threads, and ranks the pages that match.

pub mod config;
pub mod search;
pub mod streaming;
pub mod telemetry;

pub use config::{ConfigError, MatcherConfig, SearchConfig, SearchMode};
pub use search::{Page, PageMatch, PageSearch, SearchResults};
pub use streaming::{BeatTrace, MatchSession, Matcher, Pattern, SessionSummary};
