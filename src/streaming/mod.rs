//! Streaming module for beat-parallel pattern matching
//!
//! Text arrives in fixed-width beats and is matched by a window automaton
//! whose state is a single bit vector carried from beat to beat:
//! - Fixed memory per session, independent of text length
//! - Matches spanning beat boundaries are found without buffering text
//! - Results are identical for every beat width and chunking

pub mod beat;
pub mod boundary;
pub mod counter;
pub mod pattern;
pub mod window;

pub use beat::{Beat, BeatAssembler, BeatFeeder, BEAT_WIDTH, MAX_BEAT_WIDTH};
pub use boundary::{is_boundary, is_word_char};
pub use counter::{MatchSession, Matcher, SessionSummary};
pub use pattern::{
    Pattern, PatternSymbol, Quantifier, SymbolClass, ANY_CHAR, MAX_PATTERN_LEN, NON_WORD_CHAR,
    WORD_CHAR,
};
pub use window::{BeatTrace, CharacterMatrix, WindowAutomaton, WindowMatrix, COLUMNS};
