//! Pattern Compilation
//!
//! Compiles a pattern string plus an optional qualifier string into the
//! fixed-width slot layout used by the window automaton. Patterns are
//! right-aligned in `MAX_PATTERN_LEN` slots; unused leading slots always
//! match.
//!
//! Pattern bytes below printable ASCII are class sentinels:
//! - `0x00..=0x0F`: any byte
//! - `0x10..=0x17`: any word byte (`[a-zA-Z0-9_]`)
//! - `0x18..=0x1F`: any boundary byte
//!
//! Qualifier bytes: `' '` is a single match, `'+'` is one-or-more. Anything
//! else (including the reserved `'*'`) falls back to a single match.

use log::debug;

use super::boundary::is_word_char;
use crate::config::ConfigError;

/// Number of pattern slots in the hardware matcher
pub const MAX_PATTERN_LEN: usize = 32;

/// Sentinel byte for "any byte" in a pattern string
pub const ANY_CHAR: char = '\x00';
/// Sentinel byte for "any word byte" in a pattern string
pub const WORD_CHAR: char = '\x10';
/// Sentinel byte for "any boundary byte" in a pattern string
pub const NON_WORD_CHAR: char = '\x18';

/// What a single pattern slot accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolClass {
    /// Exactly this byte
    Exact(u8),
    /// Any byte
    Any,
    /// Any word byte
    Word,
    /// Any boundary byte
    NonWord,
}

impl SymbolClass {
    /// Decode a pattern byte, honouring the sentinel ranges
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00..=0x0F => SymbolClass::Any,
            0x10..=0x17 => SymbolClass::Word,
            0x18..=0x1F => SymbolClass::NonWord,
            _ => SymbolClass::Exact(byte),
        }
    }

    /// Check whether a text byte satisfies this class
    #[inline]
    pub fn accepts(&self, byte: u8) -> bool {
        match *self {
            SymbolClass::Exact(expected) => byte == expected,
            SymbolClass::Any => true,
            SymbolClass::Word => is_word_char(byte),
            SymbolClass::NonWord => !is_word_char(byte),
        }
    }
}

/// How many text bytes a slot consumes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quantifier {
    #[default]
    One,
    OneOrMore,
}

impl Quantifier {
    /// Decode a qualifier byte. Unsupported qualifiers degrade to `One`.
    pub fn from_qualifier(byte: u8) -> Self {
        match byte {
            b'+' => Quantifier::OneOrMore,
            b' ' => Quantifier::One,
            b'*' => {
                debug!("zero-or-more qualifier is not supported, matching exactly once");
                Quantifier::One
            }
            other => {
                debug!(
                    "unknown qualifier {:?}, matching exactly once",
                    other as char
                );
                Quantifier::One
            }
        }
    }
}

/// One position of a compiled pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternSymbol {
    pub class: SymbolClass,
    pub quantifier: Quantifier,
}

impl PatternSymbol {
    /// A single exact byte
    pub fn exact(byte: u8) -> Self {
        Self {
            class: SymbolClass::Exact(byte),
            quantifier: Quantifier::One,
        }
    }

    /// Same class, repeated one or more times
    pub fn repeated(self) -> Self {
        Self {
            quantifier: Quantifier::OneOrMore,
            ..self
        }
    }
}

impl From<SymbolClass> for PatternSymbol {
    fn from(class: SymbolClass) -> Self {
        Self {
            class,
            quantifier: Quantifier::One,
        }
    }
}

/// A compiled, immutable pattern of 1 to 32 symbols
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    symbols: Vec<PatternSymbol>,
}

impl Pattern {
    /// Compile a pattern string and a qualifier string.
    ///
    /// `qualifiers` is either empty or exactly as long as `pattern` (in
    /// bytes); it is right-aligned the same way the pattern is.
    pub fn compile(pattern: &str, qualifiers: &str) -> Result<Self, ConfigError> {
        let bytes = pattern.as_bytes();
        check_length(bytes.len())?;

        let qualifiers = qualifiers.as_bytes();
        if !qualifiers.is_empty() && qualifiers.len() != bytes.len() {
            return Err(ConfigError::QualifierLength {
                pattern: bytes.len(),
                qualifiers: qualifiers.len(),
            });
        }

        let symbols = bytes
            .iter()
            .enumerate()
            .map(|(i, &b)| PatternSymbol {
                class: SymbolClass::from_byte(b),
                quantifier: qualifiers
                    .get(i)
                    .map(|&q| Quantifier::from_qualifier(q))
                    .unwrap_or_default(),
            })
            .collect();

        Ok(Self { symbols })
    }

    /// Build a pattern directly from typed symbols
    pub fn from_symbols(symbols: Vec<PatternSymbol>) -> Result<Self, ConfigError> {
        check_length(symbols.len())?;
        Ok(Self { symbols })
    }

    /// Number of real (non-padding) symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a compiled pattern; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Index of the first real slot in the right-aligned layout
    ///
    /// This is also the column of the left word-boundary check: columns are
    /// offset by one from slots, so column `first_slot()` sits directly
    /// before the first real symbol.
    pub fn first_slot(&self) -> usize {
        MAX_PATTERN_LEN - self.symbols.len()
    }

    /// Symbol in slot `slot` of the right-aligned layout, `None` for padding
    #[inline]
    pub fn slot(&self, slot: usize) -> Option<&PatternSymbol> {
        slot.checked_sub(self.first_slot()).and_then(|i| self.symbols.get(i))
    }

    /// Whether slot `slot` may consume more than one byte
    #[inline]
    pub fn repeats(&self, slot: usize) -> bool {
        matches!(
            self.slot(slot),
            Some(PatternSymbol {
                quantifier: Quantifier::OneOrMore,
                ..
            })
        )
    }

    /// Whether any slot carries a repetition qualifier
    pub fn has_repetition(&self) -> bool {
        self.symbols
            .iter()
            .any(|s| s.quantifier == Quantifier::OneOrMore)
    }

    /// The symbols in pattern order
    pub fn symbols(&self) -> &[PatternSymbol] {
        &self.symbols
    }

    /// Printable label for one slot, used by the matrix trace
    pub(crate) fn slot_label(&self, slot: usize) -> String {
        let Some(symbol) = self.slot(slot) else {
            return "   ".to_string();
        };
        let class = match symbol.class {
            SymbolClass::Exact(b) if b.is_ascii_graphic() || b == b' ' => {
                (b as char).to_string()
            }
            SymbolClass::Exact(_) => "#".to_string(),
            SymbolClass::Any => "?".to_string(),
            SymbolClass::Word => "w".to_string(),
            SymbolClass::NonWord => "W".to_string(),
        };
        match symbol.quantifier {
            Quantifier::One => format!("[{}]", class),
            Quantifier::OneOrMore => format!("[{}+", class),
        }
    }
}

fn check_length(len: usize) -> Result<(), ConfigError> {
    if (1..=MAX_PATTERN_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ConfigError::PatternLength { len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_exact() {
        let pattern = Pattern::compile("test", "").unwrap();
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.first_slot(), 28);
        assert_eq!(pattern.slot(27), None);
        assert_eq!(pattern.slot(28), Some(&PatternSymbol::exact(b't')));
        assert_eq!(pattern.slot(31), Some(&PatternSymbol::exact(b't')));
        assert!(!pattern.has_repetition());
    }

    #[test]
    fn test_length_limits() {
        assert!(matches!(
            Pattern::compile("", ""),
            Err(ConfigError::PatternLength { len: 0 })
        ));
        let longest = "x".repeat(MAX_PATTERN_LEN);
        let pattern = Pattern::compile(&longest, "").unwrap();
        assert_eq!(pattern.first_slot(), 0);
        assert!(matches!(
            Pattern::compile(&"x".repeat(MAX_PATTERN_LEN + 1), ""),
            Err(ConfigError::PatternLength { len: 33 })
        ));
    }

    #[test]
    fn test_qualifier_length_mismatch() {
        let err = Pattern::compile("hello", "  +").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::QualifierLength {
                pattern: 5,
                qualifiers: 3
            }
        ));
    }

    #[test]
    fn test_sentinel_classes() {
        let text = format!("a{}{}{}\x1f", ANY_CHAR, WORD_CHAR, NON_WORD_CHAR);
        let pattern = Pattern::compile(&text, "").unwrap();
        let classes: Vec<SymbolClass> = pattern.symbols().iter().map(|s| s.class).collect();
        assert_eq!(
            classes,
            vec![
                SymbolClass::Exact(b'a'),
                SymbolClass::Any,
                SymbolClass::Word,
                SymbolClass::NonWord,
                SymbolClass::NonWord,
            ]
        );
    }

    #[test]
    fn test_qualifiers() {
        let pattern = Pattern::compile("h\0llo", " +   ").unwrap();
        assert!(pattern.has_repetition());
        assert!(pattern.repeats(28));
        assert!(!pattern.repeats(27));
        assert!(!pattern.repeats(29));
    }

    #[test]
    fn test_reserved_qualifiers_degrade() {
        let pattern = Pattern::compile("abc", "*x ").unwrap();
        assert!(!pattern.has_repetition());
        assert_eq!(pattern, Pattern::compile("abc", "").unwrap());
    }

    #[test]
    fn test_class_accepts() {
        assert!(SymbolClass::Word.accepts(b'q'));
        assert!(!SymbolClass::Word.accepts(b'-'));
        assert!(SymbolClass::NonWord.accepts(b'-'));
        assert!(!SymbolClass::NonWord.accepts(b'_'));
        assert!(SymbolClass::Any.accepts(0xFF));
        assert!(!SymbolClass::Exact(b'a').accepts(b'A'));
    }

    #[test]
    fn test_from_symbols() {
        let pattern = Pattern::from_symbols(vec![
            PatternSymbol::exact(b'x'),
            PatternSymbol::from(SymbolClass::Any).repeated(),
        ])
        .unwrap();
        assert!(pattern.repeats(31));
        assert!(Pattern::from_symbols(Vec::new()).is_err());
    }
}
