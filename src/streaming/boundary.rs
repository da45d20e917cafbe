//! Word Boundary Classification
//!
//! A byte is a word byte if it is an ASCII letter, digit or underscore.
//! Everything else (whitespace, punctuation, control bytes and every byte
//! >= 0x80) is a boundary byte. Start and end of text also count as
//! boundaries, but that is handled by the automaton, not here.

/// Check if a byte belongs to a word: `[a-zA-Z0-9_]`
#[inline]
pub fn is_word_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Check if a byte separates words
#[inline]
pub fn is_boundary(byte: u8) -> bool {
    !is_word_char(byte)
}
