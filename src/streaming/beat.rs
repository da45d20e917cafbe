//! Beat Assembly
//!
//! The hardware matcher consumes a fixed number of bytes per clock cycle
//! (a "beat"). This module cuts text into beats:
//! - `BeatFeeder` walks an in-memory text
//! - `BeatAssembler` re-chunks arbitrarily sized pushes
//!
//! The final beat is padded with filler positions and tagged `last`. Empty
//! text still produces exactly one (all filler) beat so that the automaton
//! performs one update per text.

use crate::config::ConfigError;

/// Bytes per beat in the reference hardware (elements per cycle)
pub const BEAT_WIDTH: usize = 8;

/// Widest supported beat. The window register holds `33 + width` bits.
pub const MAX_BEAT_WIDTH: usize = 31;

/// Validate a beat width
pub fn check_beat_width(width: usize) -> Result<(), ConfigError> {
    if (1..=MAX_BEAT_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(ConfigError::BeatWidth { width })
    }
}

/// One automaton step worth of input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Beat {
    bytes: [u8; MAX_BEAT_WIDTH],
    width: usize,
    count: usize,
    last: bool,
}

impl Beat {
    /// Build a beat from up to `width` real bytes.
    ///
    /// # Panics
    /// Panics if `width` is out of range or `chunk` is longer than `width`.
    pub fn new(chunk: &[u8], width: usize, last: bool) -> Self {
        assert!(
            (1..=MAX_BEAT_WIDTH).contains(&width),
            "beat width {} out of range",
            width
        );
        assert!(
            chunk.len() <= width,
            "chunk of {} bytes does not fit a beat of {}",
            chunk.len(),
            width
        );
        let mut bytes = [0u8; MAX_BEAT_WIDTH];
        bytes[..chunk.len()].copy_from_slice(chunk);
        Self {
            bytes,
            width,
            count: chunk.len(),
            last,
        }
    }

    /// Byte at beat position `ii`, `None` for filler positions
    #[inline]
    pub fn get(&self, ii: usize) -> Option<u8> {
        if ii < self.count {
            Some(self.bytes[ii])
        } else {
            None
        }
    }

    /// The real bytes of this beat
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.count]
    }

    /// Number of positions in the beat
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of real (non-filler) bytes
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether this is the final beat of a text
    pub fn is_last(&self) -> bool {
        self.last
    }
}

/// Lazy beat sequence over an in-memory text
pub struct BeatFeeder<'a> {
    text: &'a [u8],
    width: usize,
    pos: usize,
    done: bool,
}

impl<'a> BeatFeeder<'a> {
    /// Create a feeder with the reference beat width
    pub fn new(text: &'a [u8]) -> Self {
        Self::with_width(text, BEAT_WIDTH)
    }

    /// Create a feeder with a custom beat width.
    ///
    /// # Panics
    /// Panics if `width` is not in `1..=MAX_BEAT_WIDTH`.
    pub fn with_width(text: &'a [u8], width: usize) -> Self {
        assert!(
            (1..=MAX_BEAT_WIDTH).contains(&width),
            "beat width {} out of range",
            width
        );
        Self {
            text,
            width,
            pos: 0,
            done: false,
        }
    }
}

impl Iterator for BeatFeeder<'_> {
    type Item = Beat;

    fn next(&mut self) -> Option<Beat> {
        if self.done {
            return None;
        }
        let end = (self.pos + self.width).min(self.text.len());
        let last = end >= self.text.len();
        let beat = Beat::new(&self.text[self.pos..end], self.width, last);
        self.pos = end;
        self.done = last;
        Some(beat)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = self.text.len() - self.pos;
        let beats = remaining.div_ceil(self.width).max(1);
        (beats, Some(beats))
    }
}

impl ExactSizeIterator for BeatFeeder<'_> {}

/// Re-chunks pushed byte slices of any size into beats.
///
/// A completely filled beat is held back until more input arrives, since
/// only `finish` can tell whether it is the last one.
pub struct BeatAssembler {
    /// Bytes of the beat under construction
    pending: [u8; MAX_BEAT_WIDTH],
    /// Number of pending bytes
    pending_len: usize,
    width: usize,
}

impl BeatAssembler {
    /// Create an assembler for the given beat width.
    ///
    /// # Panics
    /// Panics if `width` is not in `1..=MAX_BEAT_WIDTH`.
    pub fn new(width: usize) -> Self {
        assert!(
            (1..=MAX_BEAT_WIDTH).contains(&width),
            "beat width {} out of range",
            width
        );
        Self {
            pending: [0u8; MAX_BEAT_WIDTH],
            pending_len: 0,
            width,
        }
    }

    /// Push a chunk, calling `emit` for every beat that is now complete
    pub fn push<F: FnMut(Beat)>(&mut self, mut chunk: &[u8], mut emit: F) {
        while !chunk.is_empty() {
            if self.pending_len == self.width {
                emit(Beat::new(&self.pending[..self.width], self.width, false));
                self.pending_len = 0;
            }
            let take = (self.width - self.pending_len).min(chunk.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&chunk[..take]);
            self.pending_len += take;
            chunk = &chunk[take..];
        }
    }

    /// Flush the held-back bytes as the final beat and reset
    pub fn finish(&mut self) -> Beat {
        let beat = Beat::new(&self.pending[..self.pending_len], self.width, true);
        self.pending_len = 0;
        beat
    }

    /// Number of bytes waiting for the next beat
    pub fn pending(&self) -> usize {
        self.pending_len
    }
}
