//! Match Counting
//!
//! `Matcher` is the immutable, reusable configuration (compiled pattern,
//! whole-word flag, beat width). Every text is matched in its own
//! `MatchSession`, which owns the only mutable state: a window automaton
//! and the beat assembler. Nothing leaks from one session to the next.

use log::debug;
use serde::Serialize;

use super::beat::{check_beat_width, BeatAssembler, BeatFeeder, BEAT_WIDTH};
use super::pattern::Pattern;
use super::window::{BeatTrace, WindowAutomaton};
use crate::config::{ConfigError, MatcherConfig};

/// Compiled matcher configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    pattern: Pattern,
    whole_words: bool,
    beat_width: usize,
}

impl Matcher {
    /// Compile a matcher with the reference beat width
    pub fn new(pattern: &str, whole_words: bool, qualifiers: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_pattern(
            Pattern::compile(pattern, qualifiers)?,
            whole_words,
        ))
    }

    /// Compile a matcher from deserialized configuration
    pub fn from_config(config: &MatcherConfig) -> Result<Self, ConfigError> {
        Self::new(&config.pattern, config.whole_words, &config.qualifiers)?
            .with_beat_width(config.beat_width)
    }

    /// Wrap an already compiled pattern
    pub fn with_pattern(pattern: Pattern, whole_words: bool) -> Self {
        Self {
            pattern,
            whole_words,
            beat_width: BEAT_WIDTH,
        }
    }

    /// Change the number of bytes consumed per automaton step
    pub fn with_beat_width(mut self, width: usize) -> Result<Self, ConfigError> {
        check_beat_width(width)?;
        self.beat_width = width;
        Ok(self)
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn whole_words(&self) -> bool {
        self.whole_words
    }

    pub fn beat_width(&self) -> usize {
        self.beat_width
    }

    /// Start a fresh session for chunked input
    pub fn session(&self) -> MatchSession<'_> {
        MatchSession {
            automaton: self.automaton(),
            assembler: BeatAssembler::new(self.beat_width),
            matches: 0,
            beats: 0,
            bytes: 0,
        }
    }

    /// Count (possibly overlapping) matches in `text`
    pub fn check(&self, text: &[u8]) -> usize {
        self.scan(text).matches
    }

    /// Count matches in a string
    pub fn check_str(&self, text: &str) -> usize {
        self.check(text.as_bytes())
    }

    /// Count matches and report how many beats it took
    pub fn scan(&self, text: &[u8]) -> SessionSummary {
        let mut automaton = self.automaton();
        let mut summary = SessionSummary {
            bytes: text.len() as u64,
            ..Default::default()
        };
        for beat in BeatFeeder::with_width(text, self.beat_width) {
            summary.matches += automaton.feed(&beat);
            summary.beats += 1;
        }
        summary
    }

    /// Count matches, handing a snapshot of every beat to `on_beat`
    pub fn check_traced<F>(&self, text: &[u8], mut on_beat: F) -> usize
    where
        F: FnMut(&BeatTrace<'_>),
    {
        let mut automaton = self.automaton();
        let mut matches = 0;
        for beat in BeatFeeder::with_width(text, self.beat_width) {
            let trace = automaton.feed_traced(&beat);
            matches += trace.matches;
            on_beat(&trace);
        }
        matches
    }

    fn automaton(&self) -> WindowAutomaton<'_> {
        WindowAutomaton::new(&self.pattern, self.whole_words, self.beat_width)
    }
}

/// Outcome of one session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Total matches in the text
    pub matches: usize,
    /// Automaton steps taken (hardware cycles)
    pub beats: u64,
    /// Text length in bytes
    pub bytes: u64,
}

/// Matching state for a single text delivered in chunks
pub struct MatchSession<'m> {
    automaton: WindowAutomaton<'m>,
    assembler: BeatAssembler,
    matches: usize,
    beats: u64,
    bytes: u64,
}

impl MatchSession<'_> {
    /// Feed the next chunk of text; chunk boundaries do not affect results
    pub fn push(&mut self, chunk: &[u8]) {
        self.bytes += chunk.len() as u64;
        let automaton = &mut self.automaton;
        let matches = &mut self.matches;
        let beats = &mut self.beats;
        self.assembler.push(chunk, |beat| {
            *matches += automaton.feed(&beat);
            *beats += 1;
        });
    }

    /// Matches ending in the beats processed so far
    ///
    /// Up to one beat of input is held back until more text or `finish`
    /// arrives, so this lags behind `push`.
    pub fn matches_so_far(&self) -> usize {
        self.matches
    }

    /// Process the final beat and close the session
    pub fn finish(mut self) -> SessionSummary {
        let beat = self.assembler.finish();
        self.matches += self.automaton.feed(&beat);
        self.beats += 1;

        debug!(
            "session finished: {} bytes in {} beats, {} matches",
            self.bytes, self.beats, self.matches
        );

        SessionSummary {
            matches: self.matches,
            beats: self.beats,
            bytes: self.bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_counts_overlaps() {
        let matcher = Matcher::new("here", false, "").unwrap();
        assert_eq!(matcher.check_str("herehere"), 2);
        assert_eq!(matcher.check_str(""), 0);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            Matcher::new("", false, ""),
            Err(ConfigError::PatternLength { len: 0 })
        ));
        assert!(matches!(
            Matcher::new("abc", false, "+"),
            Err(ConfigError::QualifierLength { .. })
        ));
        let matcher = Matcher::new("abc", false, "").unwrap();
        assert!(matches!(
            matcher.with_beat_width(0),
            Err(ConfigError::BeatWidth { width: 0 })
        ));
    }

    #[test]
    fn test_from_config() {
        let config = MatcherConfig {
            whole_words: true,
            beat_width: 4,
            ..MatcherConfig::new("test")
        };
        let matcher = Matcher::from_config(&config).unwrap();
        assert_eq!(matcher.beat_width(), 4);
        assert!(matcher.whole_words());
        assert_eq!(matcher.check_str("test testing a test"), 2);
    }

    #[test]
    fn test_scan_reports_beats() {
        let matcher = Matcher::new("fox", false, "").unwrap();
        let summary = matcher.scan(b"the quick brown fox");
        assert_eq!(summary.matches, 1);
        assert_eq!(summary.beats, 3);
        assert_eq!(summary.bytes, 19);

        assert_eq!(matcher.scan(b"").beats, 1);
    }

    #[test]
    fn test_session_chunking() {
        let matcher = Matcher::new("hello", true, "").unwrap();
        let text = b"hello there, hello again; othello hello";
        let expected = matcher.check(text);
        assert_eq!(expected, 3);

        for size in 1..=text.len() {
            let mut session = matcher.session();
            for chunk in text.chunks(size) {
                session.push(chunk);
            }
            let summary = session.finish();
            assert_eq!(summary.matches, expected, "chunk size {}", size);
            assert_eq!(summary, matcher.scan(text));
        }
    }

    #[test]
    fn test_matches_so_far_lags_one_beat() {
        let matcher = Matcher::new("ab", false, "").unwrap();
        let mut session = matcher.session();

        session.push(b"ab");
        assert_eq!(session.matches_so_far(), 0);
        // A full beat is held back until more input or `finish`
        session.push(b"xxxxxx");
        assert_eq!(session.matches_so_far(), 0);
        session.push(b"x");
        assert_eq!(session.matches_so_far(), 1);

        assert_eq!(session.finish().matches, 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let matcher = Matcher::new("ab", false, "").unwrap();
        let mut first = matcher.session();
        let mut second = matcher.session();
        first.push(b"xxa");
        second.push(b"b");
        assert_eq!(first.finish().matches, 0);
        assert_eq!(second.finish().matches, 0);
    }

    #[test]
    fn test_repeated_checks_are_idempotent() {
        let a = Matcher::new("h\0llo", false, " +   ").unwrap();
        let b = Matcher::new("h\0llo", false, " +   ").unwrap();
        let text = b"hello hallo haallo";
        assert_eq!(a.check(text), 3);
        assert_eq!(a.check(text), 3);
        assert_eq!(b.check(text), a.check(text));
    }

    #[test]
    fn test_check_traced() {
        let matcher = Matcher::new("ab", false, "").unwrap();
        let mut per_beat = Vec::new();
        let total = matcher.check_traced(b"abxxxxxxxxab", |trace| per_beat.push(trace.matches));
        assert_eq!(total, 2);
        assert_eq!(per_beat, vec![1, 1]);
    }
}
