//! Page Search
//!
//! Runs one matcher over a collection of pages. Pages are split into
//! `threads` contiguous partitions; each partition is searched
//! independently (one scoped thread per partition) and the partial results
//! are combined in partition order, so the outcome does not depend on
//! scheduling.

use std::time::Instant;

use log::debug;

use super::reference;
use super::results::{PartialResults, SearchResults};
use crate::config::{ConfigError, SearchConfig, SearchMode};
use crate::streaming::Matcher;
use crate::telemetry;

/// A titled text to search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub text: Vec<u8>,
}

impl Page {
    pub fn new(title: &str, text: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.to_string(),
            text: text.into(),
        }
    }
}

/// Validated page search
#[derive(Clone, Debug)]
pub struct PageSearch {
    matcher: Matcher,
    config: SearchConfig,
}

impl PageSearch {
    /// Compile the matcher and check the search parameters
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        let checked = if config.threads == 0 {
            Err(ConfigError::Threads)
        } else {
            Matcher::from_config(&config.matcher)
        };

        match checked {
            Ok(matcher) => Ok(Self { matcher, config }),
            Err(e) => {
                telemetry::config_rejected(&e).emit();
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Search every page and combine the partition results
    pub fn run(&self, pages: &[Page]) -> SearchResults {
        let start = Instant::now();
        let partitions = self.config.threads;

        let partials: Vec<PartialResults> = if partitions == 1 {
            vec![self.search_partition(pages)]
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..partitions)
                    .map(|t| {
                        let slice = partition(pages, t, partitions);
                        scope.spawn(move || self.search_partition(slice))
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| match handle.join() {
                        Ok(partial) => partial,
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            })
        };

        let results = SearchResults::combine(partials, self.config.min_matches, start.elapsed());
        telemetry::search_completed(&self.config, &results).emit();
        results
    }

    fn search_partition(&self, pages: &[Page]) -> PartialResults {
        let mut partial = PartialResults::default();
        for page in pages {
            let count = match self.config.mode {
                SearchMode::Model => {
                    let summary = self.matcher.scan(&page.text);
                    partial.beats += summary.beats;
                    summary.matches
                }
                SearchMode::Reference => reference::count_matches(
                    self.matcher.pattern(),
                    &page.text,
                    self.matcher.whole_words(),
                ),
            };
            partial.data_size += page.text.len() as u64 + 4;
            partial.record_page(&page.title, count, self.config.min_matches);
        }

        debug!(
            "partition searched: {} pages, {} matching",
            pages.len(),
            partial.num_page_matches
        );
        partial
    }
}

/// Pages `[n*t/T, n*(t+1)/T)` of partition `t` out of `T`
fn partition(pages: &[Page], t: usize, partitions: usize) -> &[Page] {
    let n = pages.len();
    &pages[n * t / partitions..n * (t + 1) / partitions]
}
