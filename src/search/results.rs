//! Search Results
//!
//! Each page partition produces a `PartialResults`; `SearchResults`
//! combines them. Only the first `MAX_PAGE_MATCH_RECORDS` matching pages of
//! a partition are recorded by title, mirroring the fixed-size result
//! buffers of the hardware kernel; totals are always exact.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

/// Matching-page records kept per partition
pub const MAX_PAGE_MATCH_RECORDS: usize = 256;

/// A page that reached the match threshold
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageMatch {
    pub title: String,
    pub count: usize,
}

/// Results of one page partition
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartialResults {
    /// Matches across all pages of the partition
    pub num_word_matches: u64,
    /// Pages with at least `min_matches` matches
    pub num_page_matches: u64,
    /// First matching pages, at most `MAX_PAGE_MATCH_RECORDS`
    pub page_matches: Vec<PageMatch>,
    /// Highest match count of any page
    pub max_word_matches: usize,
    /// Page with the highest match count (later pages win ties)
    pub max_page_title: Option<String>,
    /// Automaton steps taken; zero for the reference engine
    pub beats: u64,
    /// Text bytes plus one 4-byte offset per page
    pub data_size: u64,
}

impl PartialResults {
    /// Account for one searched page
    pub(crate) fn record_page(&mut self, title: &str, count: usize, min_matches: usize) {
        self.num_word_matches += count as u64;
        if count >= min_matches {
            self.num_page_matches += 1;
            if self.page_matches.len() < MAX_PAGE_MATCH_RECORDS {
                self.page_matches.push(PageMatch {
                    title: title.to_string(),
                    count,
                });
            }
        }
        if count >= self.max_word_matches || self.max_page_title.is_none() {
            self.max_word_matches = count;
            self.max_page_title = Some(title.to_string());
        }
    }

    /// Whether every matching page got a record
    pub fn all_known(&self) -> bool {
        self.page_matches.len() as u64 >= self.num_page_matches
    }
}

/// Combined results of a page search
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub num_word_matches: u64,
    pub num_page_matches: u64,
    pub max_word_matches: usize,
    pub max_page_title: Option<String>,
    pub beats: u64,
    pub data_size: u64,
    pub elapsed_micros: u64,
    pub min_matches: usize,
    pub partials: Vec<PartialResults>,
}

impl SearchResults {
    /// Merge partition results in partition order
    pub(crate) fn combine(
        partials: Vec<PartialResults>,
        min_matches: usize,
        elapsed: Duration,
    ) -> Self {
        let mut results = Self {
            num_word_matches: 0,
            num_page_matches: 0,
            max_word_matches: 0,
            max_page_title: None,
            beats: 0,
            data_size: 0,
            elapsed_micros: elapsed.as_micros() as u64,
            min_matches,
            partials: Vec::new(),
        };

        for partial in &partials {
            results.num_word_matches += partial.num_word_matches;
            results.num_page_matches += partial.num_page_matches;
            results.beats += partial.beats;
            results.data_size += partial.data_size;
            if partial.max_page_title.is_some()
                && partial.max_word_matches >= results.max_word_matches
            {
                results.max_word_matches = partial.max_word_matches;
                results.max_page_title = partial.max_page_title.clone();
            }
        }

        results.partials = partials;
        results
    }

    /// Whether every matching page of every partition got a record
    pub fn all_known(&self) -> bool {
        self.partials.iter().all(PartialResults::all_known)
    }

    /// Every known matching page, most matches first, then by title
    ///
    /// Includes each partition's top page when it reaches the threshold,
    /// even if it fell outside that partition's record slots.
    pub fn ranked(&self) -> Vec<PageMatch> {
        let mut pages: BTreeMap<&str, usize> = BTreeMap::new();
        for partial in &self.partials {
            if let Some(title) = &partial.max_page_title {
                if partial.max_word_matches >= self.min_matches {
                    pages.insert(title, partial.max_word_matches);
                }
            }
            for record in &partial.page_matches {
                pages.insert(&record.title, record.count);
            }
        }

        let mut ranked: Vec<PageMatch> = pages
            .into_iter()
            .map(|(title, count)| PageMatch {
                title: title.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.title.cmp(&b.title)));
        ranked
    }
}
