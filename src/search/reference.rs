//! Software Reference Matcher
//!
//! Whole-text matcher with no streaming constraints: for every start
//! position it runs the pattern as a small NFA and records where matches
//! end. Counts distinct end positions, which is what the window automaton
//! counts (one window per end position).
//!
//! Used as the `SearchMode::Reference` engine and as a test oracle.

use crate::streaming::{is_boundary, Pattern, PatternSymbol, Quantifier};

/// Count matches of `pattern` in `text`
pub fn count_matches(pattern: &Pattern, text: &[u8], whole_words: bool) -> usize {
    let symbols = pattern.symbols();
    let accept = symbols.len();

    let mut ends = vec![false; text.len() + 1];
    let mut current = vec![false; accept + 1];
    let mut next = vec![false; accept + 1];

    for start in 0..text.len() {
        if whole_words && start > 0 && !is_boundary(text[start - 1]) {
            continue;
        }

        current.fill(false);
        current[0] = true;

        for (pos, &byte) in text.iter().enumerate().skip(start) {
            step(symbols, &current, &mut next, byte);
            std::mem::swap(&mut current, &mut next);

            let end = pos + 1;
            if current[accept] && (!whole_words || end == text.len() || is_boundary(text[end])) {
                ends[end] = true;
            }
            if !current.iter().any(|&active| active) {
                break;
            }
        }
    }

    ends.iter().filter(|&&end| end).count()
}

/// Advance the NFA by one byte.
///
/// State `j` means the first `j` symbols have been consumed; a repeating
/// symbol `j - 1` may keep consuming while in state `j`.
fn step(symbols: &[PatternSymbol], current: &[bool], next: &mut [bool], byte: u8) {
    next.fill(false);
    for state in (0..current.len()).filter(|&state| current[state]) {
        if let Some(symbol) = symbols.get(state) {
            if symbol.class.accepts(byte) {
                next[state + 1] = true;
            }
        }
        if let Some(previous) = state.checked_sub(1).map(|i| &symbols[i]) {
            if previous.quantifier == Quantifier::OneOrMore && previous.class.accepts(byte) {
                next[state] = true;
            }
        }
    }
}
