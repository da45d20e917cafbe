use proptest::prelude::*;
use word_match::search::count_matches;
use word_match::streaming::{
    is_boundary, PatternSymbol, SymbolClass, ANY_CHAR, NON_WORD_CHAR, WORD_CHAR,
};
use word_match::{Matcher, Pattern};

/// Occurrences of `pattern` in `text`, overlapping ones included
fn naive_count(pattern: &[u8], text: &[u8], whole_words: bool) -> usize {
    if pattern.len() > text.len() {
        return 0;
    }
    (0..=text.len() - pattern.len())
        .filter(|&i| {
            let end = i + pattern.len();
            &text[i..end] == pattern
                && (!whole_words
                    || ((i == 0 || is_boundary(text[i - 1]))
                        && (end == text.len() || is_boundary(text[end]))))
        })
        .count()
}

fn text_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ab _-1".to_vec()), 0..max_len)
}

fn exact_pattern_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ab _".to_vec()), 1..6)
}

fn symbol_strategy() -> impl Strategy<Value = PatternSymbol> {
    let class = prop_oneof![
        4 => prop::sample::select(b"ab -".to_vec()).prop_map(SymbolClass::Exact),
        1 => Just(SymbolClass::Any),
        1 => Just(SymbolClass::Word),
        1 => Just(SymbolClass::NonWord),
    ];
    (class, prop::bool::weighted(0.3)).prop_map(|(class, repeat)| {
        let symbol = PatternSymbol::from(class);
        if repeat {
            symbol.repeated()
        } else {
            symbol
        }
    })
}

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    prop::collection::vec(symbol_strategy(), 1..5)
        .prop_map(|symbols| Pattern::from_symbols(symbols).unwrap())
}

fn check_bytes(pattern: &[u8], text: &[u8], whole_words: bool) -> usize {
    let symbols = pattern.iter().map(|&b| PatternSymbol::exact(b)).collect();
    let pattern = Pattern::from_symbols(symbols).unwrap();
    Matcher::with_pattern(pattern, whole_words).check(text)
}

proptest! {
    #[test]
    fn automaton_matches_naive_scan(
        pattern in exact_pattern_strategy(),
        text in text_strategy(80),
        whole_words in any::<bool>(),
    ) {
        prop_assert_eq!(
            check_bytes(&pattern, &text, whole_words),
            naive_count(&pattern, &text, whole_words)
        );
    }

    #[test]
    fn long_patterns_match_naive_scan(
        pattern in prop::collection::vec(prop::sample::select(b"ab".to_vec()), 20..=32),
        text in prop::collection::vec(prop::sample::select(b"ab ".to_vec()), 0..120),
        whole_words in any::<bool>(),
    ) {
        prop_assert_eq!(
            check_bytes(&pattern, &text, whole_words),
            naive_count(&pattern, &text, whole_words)
        );
    }

    #[test]
    fn automaton_matches_reference(
        pattern in pattern_strategy(),
        text in text_strategy(48),
        whole_words in any::<bool>(),
        width in 1usize..=31,
    ) {
        let matcher = Matcher::with_pattern(pattern.clone(), whole_words)
            .with_beat_width(width)
            .unwrap();
        prop_assert_eq!(matcher.check(&text), count_matches(&pattern, &text, whole_words));
    }

    #[test]
    fn chunking_does_not_change_count(
        pattern in pattern_strategy(),
        text in text_strategy(64),
        chunk in 1usize..20,
        whole_words in any::<bool>(),
    ) {
        let matcher = Matcher::with_pattern(pattern, whole_words);
        let mut session = matcher.session();
        for piece in text.chunks(chunk) {
            session.push(piece);
        }
        prop_assert_eq!(session.finish(), matcher.scan(&text));
    }

    #[test]
    fn beat_width_does_not_change_count(
        pattern in exact_pattern_strategy(),
        text in text_strategy(64),
        width in 1usize..=31,
        whole_words in any::<bool>(),
    ) {
        let symbols = pattern.iter().map(|&b| PatternSymbol::exact(b)).collect();
        let pattern = Pattern::from_symbols(symbols).unwrap();
        let reference = Matcher::with_pattern(pattern.clone(), whole_words).check(&text);
        let matcher = Matcher::with_pattern(pattern, whole_words)
            .with_beat_width(width)
            .unwrap();
        prop_assert_eq!(matcher.check(&text), reference);
    }

    #[test]
    fn checks_are_idempotent(
        pattern in pattern_strategy(),
        first in text_strategy(40),
        second in text_strategy(40),
    ) {
        let matcher = Matcher::with_pattern(pattern, false);
        let before = matcher.check(&second);
        matcher.check(&first);
        prop_assert_eq!(matcher.check(&second), before);
    }
}

#[test]
fn documented_counts() {
    let check = |pattern: &str, qualifiers: &str, whole_words: bool, text: &str| {
        Matcher::new(pattern, whole_words, qualifiers)
            .unwrap()
            .check_str(text)
    };

    assert_eq!(check("here", "", false, "herehere"), 2);
    assert_eq!(check("test", "", false, ""), 0);
    let hallo = format!("h{}llo", ANY_CHAR);
    assert_eq!(check(&hallo, "", false, "hello hallo haallo"), 2);
    assert_eq!(check(&hallo, " +   ", false, "hello hallo haallo"), 3);

    let run = "a".repeat(17);
    assert_eq!(check(&hallo, " +   ", false, &format!("h{}llo", run)), 1);
    assert_eq!(check(&hallo, " +   ", false, &format!("h{}llohallo", run)), 2);

    let classes = format!("{}{}{}", WORD_CHAR, NON_WORD_CHAR, WORD_CHAR);
    assert_eq!(check(&classes, "", false, "a-b c d_e"), 3);
    assert_eq!(check(&classes, "", true, "a-b c d_e"), 2);
}
