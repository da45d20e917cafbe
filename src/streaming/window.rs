//! Window Automaton
//!
//! Bit-exact software model of the beat-parallel matcher pipeline.
//!
//! Per beat the automaton builds a `CharacterMatrix` (beat position x
//! pattern column compatibility), advances the persistent `WindowMatrix`
//! shift register by one beat and folds the character matrix into it along
//! the diagonals `ci == mi + width - 1 - ii`. Windows that leave through
//! the top of the register have seen every pattern column plus the right
//! boundary and are counted.
//!
//! State carried between beats is `33 + width` bits, independent of text
//! length.

use std::fmt;

use log::trace;

use super::beat::Beat;
use super::boundary::is_boundary;
use super::pattern::{Pattern, MAX_PATTERN_LEN};

/// Pattern columns: left sentinel, 32 slots, right boundary
pub const COLUMNS: usize = MAX_PATTERN_LEN + 2;

/// Column holding the right word-boundary check
const RIGHT_BOUNDARY: usize = MAX_PATTERN_LEN + 1;

/// Window index that has consumed the last pattern slot but not yet the
/// right boundary
const PENDING_WINDOW: usize = MAX_PATTERN_LEN;

/// Mask with the lowest `n` bits set (`n <= 64`)
#[inline]
fn low_bits(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Per-beat compatibility grid, one 34-bit row per beat position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterMatrix {
    rows: [u64; super::beat::MAX_BEAT_WIDTH],
    width: usize,
}

impl CharacterMatrix {
    /// Evaluate every pattern column against every byte of the beat
    pub fn build(pattern: &Pattern, beat: &Beat, whole_words: bool) -> Self {
        let mut rows = [0u64; super::beat::MAX_BEAT_WIDTH];
        let left = pattern.first_slot();

        for (ii, row) in rows.iter_mut().enumerate().take(beat.width()) {
            *row = low_bits(COLUMNS);
            match beat.get(ii) {
                Some(byte) => {
                    let word_bound = !whole_words || is_boundary(byte);
                    if !word_bound {
                        *row &= !(1 << left);
                        *row &= !(1 << RIGHT_BOUNDARY);
                    }
                    for (offset, symbol) in pattern.symbols().iter().enumerate() {
                        if !symbol.class.accepts(byte) {
                            *row &= !(1 << (left + 1 + offset));
                        }
                    }
                }
                None => {
                    // Filler never matches a pattern slot; it does close a word.
                    for offset in 0..pattern.len() {
                        *row &= !(1 << (left + 1 + offset));
                    }
                }
            }
        }

        Self {
            rows,
            width: beat.width(),
        }
    }

    /// Whether beat position `ii` is compatible with column `mi`
    #[inline]
    pub fn get(&self, ii: usize, mi: usize) -> bool {
        (self.rows[ii] >> mi) & 1 == 1
    }

    /// Number of beat positions
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Liveness of every candidate window, a `33 + width` bit shift register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowMatrix {
    bits: u64,
    len: usize,
}

impl WindowMatrix {
    fn new(width: usize) -> Self {
        let len = MAX_PATTERN_LEN + 1 + width;
        Self {
            bits: low_bits(len),
            len,
        }
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a window register has at least 34 entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Liveness of window `ci`
    #[inline]
    pub fn get(&self, ci: usize) -> bool {
        (self.bits >> ci) & 1 == 1
    }

    #[inline]
    fn set(&mut self, ci: usize, live: bool) {
        if live {
            self.bits |= 1 << ci;
        } else {
            self.bits &= !(1 << ci);
        }
    }

    /// Start of text: no window may begin before the first byte
    fn reset(&mut self, left_bound: usize) {
        self.bits = low_bits(left_bound + 1);
    }

    /// Shift by one beat; the newest `width` windows start out live
    fn advance(&mut self, width: usize) {
        self.bits = ((self.bits << width) | low_bits(width)) & low_bits(self.len);
    }

    /// Windows that completed during the beat just folded
    fn completed(&self) -> usize {
        (self.bits >> RIGHT_BOUNDARY).count_ones() as usize
    }
}

/// Streaming matcher state for one text
///
/// Beats must be fed strictly in text order; every beat depends on the
/// window register left behind by the previous one.
#[derive(Clone, Debug)]
pub struct WindowAutomaton<'p> {
    pattern: &'p Pattern,
    whole_words: bool,
    width: usize,
    window: WindowMatrix,
    /// Next beat starts a new text
    first: bool,
}

impl<'p> WindowAutomaton<'p> {
    /// Create an automaton for the given pattern and beat width
    pub fn new(pattern: &'p Pattern, whole_words: bool, width: usize) -> Self {
        Self {
            pattern,
            whole_words,
            width,
            window: WindowMatrix::new(width),
            first: true,
        }
    }

    /// Consume one beat and return the number of matches ending in it
    pub fn feed(&mut self, beat: &Beat) -> usize {
        self.step(beat).0
    }

    /// Consume one beat and capture the matrices for inspection
    pub fn feed_traced(&mut self, beat: &Beat) -> BeatTrace<'p> {
        let (matches, chars) = self.step(beat);
        BeatTrace {
            pattern: self.pattern,
            beat: *beat,
            chars,
            window: self.window,
            matches,
        }
    }

    /// Current window register
    pub fn window(&self) -> &WindowMatrix {
        &self.window
    }

    fn step(&mut self, beat: &Beat) -> (usize, CharacterMatrix) {
        debug_assert_eq!(beat.width(), self.width);
        let chars = CharacterMatrix::build(self.pattern, beat, self.whole_words);

        if self.first {
            self.window.reset(self.pattern.first_slot());
        }
        self.window.advance(self.width);

        // Position-major, window-minor and in place: when window `ci` takes
        // column `mi`, window `ci + 1` holds that same column one byte
        // earlier, which is what a repeating slot continues from.
        let lead = self.width - 1;
        let windows = self.window.len();
        for ii in 0..self.width {
            for mi in 0..COLUMNS {
                let ci = mi + lead - ii;
                let mut live = self.window.get(ci);
                if (1..=MAX_PATTERN_LEN).contains(&mi)
                    && self.pattern.repeats(mi - 1)
                    && ci + 1 < windows
                {
                    live |= self.window.get(ci + 1);
                }
                self.window.set(ci, live && chars.get(ii, mi));
            }
        }

        let mut matches = self.window.completed();
        if beat.is_last() && self.window.get(PENDING_WINDOW) {
            matches += 1;
        }
        self.first = beat.is_last();

        if log::log_enabled!(log::Level::Trace) {
            let snapshot = BeatTrace {
                pattern: self.pattern,
                beat: *beat,
                chars,
                window: self.window,
                matches,
            };
            trace!("beat:\n{}", snapshot);
        }

        (matches, chars)
    }
}

/// Snapshot of one automaton step
#[derive(Clone, Copy, Debug)]
pub struct BeatTrace<'p> {
    pattern: &'p Pattern,
    pub beat: Beat,
    pub chars: CharacterMatrix,
    /// Window register after folding
    pub window: WindowMatrix,
    pub matches: usize,
}

impl fmt::Display for BeatTrace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let printable: String = (0..self.beat.width())
            .map(|ii| match self.beat.get(ii) {
                Some(b) if b.is_ascii_graphic() || b == b' ' => b as char,
                Some(_) => '.',
                None => '~',
            })
            .collect();
        writeln!(
            f,
            "    [{}] count={} last={}",
            printable,
            self.beat.count(),
            self.beat.is_last()
        )?;

        for mi in 0..COLUMNS {
            let label = match mi {
                0 | RIGHT_BOUNDARY => "~~~".to_string(),
                _ => self.pattern.slot_label(mi - 1),
            };
            let row: String = (0..self.chars.width())
                .map(|ii| if self.chars.get(ii, mi) { '1' } else { '0' })
                .collect();
            writeln!(f, "{} {}", label, row)?;
        }

        let window: String = (0..self.window.len())
            .rev()
            .map(|ci| if self.window.get(ci) { '1' } else { '0' })
            .collect();
        write!(f, "    {} = {}", window, self.matches)
    }
}
