//! JTR-style mutation rules.
//!
//! Every rule is a pure function from a word to a list of candidates:
//! deterministic, order-stable, and unit-testable in isolation.

use itertools::Itertools;

use crate::lexicon::{
    self, COMMON_PREFIXES, COMMON_SUFFIXES, DIGIT_INFIXES, DIGIT_SUFFIXES, HISTORICAL_YEARS,
    INSERTION_ALPHABET, LEET_ADVANCED, LEET_BASIC, RECENT_YEARS, SEPARATORS,
};

/// A named word mutation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    // case family
    Lowercase,
    Uppercase,
    Capitalize,
    InvertCapitalize,
    AlternatingEven,
    AlternatingOdd,
    SwapCase,
    // leet family
    LeetBasic,
    LeetAdvanced,
    LeetPartial,
    // append/prepend family
    AppendDigit,
    PrependDigit,
    PrependCommon,
    AppendNumber,
    AppendSymbol,
    // transform family
    Reverse,
    Duplicate,
    DuplicateReverse,
    Reflect,
    // truncation/substring family
    Prefixes,
    DropFirst,
    DropLast,
    FirstHalf,
    SecondHalf,
    // insertion
    InsertMiddle,
    // years
    AppendYear,
    // compound family
    CapitalizeDigits,
    UppercaseDigits,
    LeetDigits,
}

/// The full rule registry, in application order.
pub const REGISTRY: &[Rule] = &[
    Rule::Lowercase,
    Rule::Uppercase,
    Rule::Capitalize,
    Rule::InvertCapitalize,
    Rule::AlternatingEven,
    Rule::AlternatingOdd,
    Rule::SwapCase,
    Rule::LeetBasic,
    Rule::LeetAdvanced,
    Rule::LeetPartial,
    Rule::AppendDigit,
    Rule::PrependDigit,
    Rule::PrependCommon,
    Rule::AppendNumber,
    Rule::AppendSymbol,
    Rule::Reverse,
    Rule::Duplicate,
    Rule::DuplicateReverse,
    Rule::Reflect,
    Rule::Prefixes,
    Rule::DropFirst,
    Rule::DropLast,
    Rule::FirstHalf,
    Rule::SecondHalf,
    Rule::InsertMiddle,
    Rule::AppendYear,
    Rule::CapitalizeDigits,
    Rule::UppercaseDigits,
    Rule::LeetDigits,
];

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Lowercase => "lowercase",
            Rule::Uppercase => "uppercase",
            Rule::Capitalize => "capitalize",
            Rule::InvertCapitalize => "invert_capitalize",
            Rule::AlternatingEven => "alternating_even",
            Rule::AlternatingOdd => "alternating_odd",
            Rule::SwapCase => "swap_case",
            Rule::LeetBasic => "leet_basic",
            Rule::LeetAdvanced => "leet_advanced",
            Rule::LeetPartial => "leet_partial",
            Rule::AppendDigit => "append_digit",
            Rule::PrependDigit => "prepend_digit",
            Rule::PrependCommon => "prepend_common",
            Rule::AppendNumber => "append_number",
            Rule::AppendSymbol => "append_symbol",
            Rule::Reverse => "reverse",
            Rule::Duplicate => "duplicate",
            Rule::DuplicateReverse => "duplicate_reverse",
            Rule::Reflect => "reflect",
            Rule::Prefixes => "prefixes",
            Rule::DropFirst => "drop_first",
            Rule::DropLast => "drop_last",
            Rule::FirstHalf => "first_half",
            Rule::SecondHalf => "second_half",
            Rule::InsertMiddle => "insert_middle",
            Rule::AppendYear => "append_year",
            Rule::CapitalizeDigits => "capitalize_digits",
            Rule::UppercaseDigits => "uppercase_digits",
            Rule::LeetDigits => "leet_digits",
        }
    }

    /// Applies the rule to a word, producing zero or more candidates.
    pub fn apply(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let n = chars.len();

        match self {
            Rule::Lowercase => vec![word.to_lowercase()],
            Rule::Uppercase => vec![word.to_uppercase()],
            Rule::Capitalize => vec![lexicon::capitalize(&word.to_lowercase())],
            Rule::InvertCapitalize => {
                let upper = word.to_uppercase();
                let mut out: String = upper.chars().take(1).flat_map(|c| c.to_lowercase()).collect();
                out.extend(upper.chars().skip(1));
                vec![out]
            }
            Rule::AlternatingEven => vec![alternating(&chars, 0)],
            Rule::AlternatingOdd => vec![alternating(&chars, 1)],
            Rule::SwapCase => vec![chars
                .iter()
                .map(|c| {
                    if c.is_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                })
                .collect()],
            Rule::LeetBasic => vec![leet(word, LEET_BASIC)],
            Rule::LeetAdvanced => vec![leet(word, LEET_ADVANCED)],
            Rule::LeetPartial => {
                // one substituted letter at a time, for every position where
                // a basic substitution applies
                let mut out = Vec::new();
                for (i, c) in chars.iter().enumerate() {
                    let lower = c.to_ascii_lowercase();
                    if let Some((_, replacement)) =
                        LEET_BASIC.iter().find(|(from, _)| *from == lower)
                    {
                        let mut variant = chars.clone();
                        variant[i] = *replacement;
                        out.push(variant.into_iter().collect());
                    }
                }
                out
            }
            Rule::AppendDigit => (0..10).map(|d| format!("{word}{d}")).collect(),
            Rule::PrependDigit => (0..10).map(|d| format!("{d}{word}")).collect(),
            Rule::PrependCommon => COMMON_PREFIXES
                .iter()
                .map(|p| format!("{p}{word}"))
                .collect(),
            Rule::AppendNumber => (0..100)
                .map(|i| format!("{word}{i:02}"))
                .chain(["123", "1234", "12345"].iter().map(|s| format!("{word}{s}")))
                .collect(),
            Rule::AppendSymbol => ["!", "@", "#", "$", "!!", "!@#", "?", "*", "1!", "!1"]
                .iter()
                .map(|s| format!("{word}{s}"))
                .collect(),
            Rule::Reverse => vec![chars.iter().rev().collect()],
            Rule::Duplicate => vec![format!("{word}{word}")],
            Rule::DuplicateReverse => {
                let reversed: String = chars.iter().rev().collect();
                vec![format!("{word}{word}"), format!("{word}{reversed}")]
            }
            Rule::Reflect => {
                let reversed: String = chars.iter().rev().collect();
                vec![format!("{reversed}{word}")]
            }
            Rule::Prefixes => (2..n).map(|len| chars[..len].iter().collect()).collect(),
            Rule::DropFirst => {
                if n > 1 {
                    vec![chars[1..].iter().collect()]
                } else {
                    vec![]
                }
            }
            Rule::DropLast => {
                if n > 1 {
                    vec![chars[..n - 1].iter().collect()]
                } else {
                    vec![]
                }
            }
            Rule::FirstHalf => {
                if n >= 4 {
                    vec![chars[..n / 2].iter().collect()]
                } else {
                    vec![]
                }
            }
            Rule::SecondHalf => {
                if n >= 4 {
                    vec![chars[n / 2..].iter().collect()]
                } else {
                    vec![]
                }
            }
            Rule::InsertMiddle => {
                let mid = n / 2;
                INSERTION_ALPHABET
                    .iter()
                    .map(|c| {
                        let mut variant = chars.clone();
                        variant.insert(mid, *c);
                        variant.into_iter().collect()
                    })
                    .collect()
            }
            Rule::AppendYear => RECENT_YEARS
                .map(|y| format!("{word}{y}"))
                .chain(HISTORICAL_YEARS.iter().map(|y| format!("{word}{y}")))
                .collect(),
            Rule::CapitalizeDigits => {
                let capitalized = lexicon::capitalize(&word.to_lowercase());
                DIGIT_SUFFIXES
                    .iter()
                    .map(|s| format!("{capitalized}{s}"))
                    .collect()
            }
            Rule::UppercaseDigits => {
                let upper = word.to_uppercase();
                DIGIT_SUFFIXES.iter().map(|s| format!("{upper}{s}")).collect()
            }
            Rule::LeetDigits => {
                let leeted = leet(word, LEET_BASIC);
                DIGIT_SUFFIXES.iter().map(|s| format!("{leeted}{s}")).collect()
            }
        }
    }
}

/// Substitutes every mapped letter of the word.
fn leet(word: &str, map: &[(char, char)]) -> String {
    word.chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            map.iter()
                .find(|(from, _)| *from == lower)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Alternates character case starting at the given phase offset.
fn alternating(chars: &[char], offset: usize) -> String {
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i % 2 == offset {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Variants for one ordered word pair: every separator, with and without
/// leading capitals, plus digit infixes. Small and cheap, so callers can
/// walk large word lists one pair at a time instead of materializing the
/// full cross product.
pub fn pair_variants(a: &str, b: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(SEPARATORS.len() * 2 + DIGIT_INFIXES.len());

    for sep in SEPARATORS {
        out.push(format!("{a}{sep}{b}"));
        out.push(format!(
            "{}{sep}{}",
            lexicon::capitalize(a),
            lexicon::capitalize(b)
        ));
    }
    for infix in DIGIT_INFIXES {
        out.push(format!("{a}{infix}{b}"));
    }

    out
}

/// Variants for one ordered word triple, one per separator.
pub fn triple_variants(a: &str, b: &str, c: &str) -> Vec<String> {
    SEPARATORS
        .iter()
        .map(|sep| format!("{a}{sep}{b}{sep}{c}"))
        .collect()
}

/// Builds multi-word candidates: 2-word concatenations always, 3-word ones
/// for small input sets, with separators, digit infixes and capitalization
/// variants. Deduplicated, order-stable.
pub fn combine_words(words: &[String]) -> Vec<String> {
    let mut out = Vec::new();

    for (i, a) in words.iter().enumerate() {
        for (j, b) in words.iter().enumerate() {
            if i == j {
                continue;
            }
            out.extend(pair_variants(a, b));
        }
    }

    // triples explode combinatorially, only worth it for small input sets
    if (3..=10).contains(&words.len()) {
        for (i, a) in words.iter().enumerate() {
            for (j, b) in words.iter().enumerate() {
                for (k, c) in words.iter().enumerate() {
                    if i == j || j == k || i == k {
                        continue;
                    }
                    out.extend(triple_variants(a, b, c));
                }
            }
        }
    }

    out.into_iter().unique().collect()
}

/// Suffix variants tried by the hybrid phase: three case variants of the
/// base word crossed with the common suffix table.
pub fn hybrid_variants(word: &str) -> Vec<String> {
    let lower = word.to_lowercase();
    let bases = [lower.clone(), lexicon::capitalize(&lower), word.to_uppercase()];

    bases
        .iter()
        .flat_map(|base| COMMON_SUFFIXES.iter().map(move |s| format!("{base}{s}")))
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_pure() {
        for rule in REGISTRY {
            assert_eq!(rule.apply("Password1"), rule.apply("Password1"));
        }
    }

    #[test]
    fn case_family() {
        assert_eq!(Rule::Uppercase.apply("hello"), vec!["HELLO"]);
        assert_eq!(Rule::Capitalize.apply("hello"), vec!["Hello"]);
        assert_eq!(Rule::InvertCapitalize.apply("hello"), vec!["hELLO"]);
        assert_eq!(Rule::AlternatingEven.apply("hello"), vec!["HeLlO"]);
        assert_eq!(Rule::AlternatingOdd.apply("hello"), vec!["hElLo"]);
        assert_eq!(Rule::SwapCase.apply("hEllo"), vec!["HeLLO"]);
    }

    #[test]
    fn leet_family() {
        assert_eq!(Rule::LeetBasic.apply("password"), vec!["p455w0rd"]);
        assert_eq!(Rule::LeetAdvanced.apply("test"), vec!["73$7"]);

        // one substitution per candidate
        let partial = Rule::LeetPartial.apply("sos");
        assert_eq!(partial, vec!["5os", "s0s", "so5"]);
    }

    #[test]
    fn transform_family() {
        assert_eq!(Rule::Reverse.apply("abc"), vec!["cba"]);
        assert_eq!(Rule::Duplicate.apply("ab"), vec!["abab"]);
        assert_eq!(Rule::DuplicateReverse.apply("ab"), vec!["abab", "abba"]);
        assert_eq!(Rule::Reflect.apply("abc"), vec!["cbaabc"]);
    }

    #[test]
    fn truncation_family() {
        assert_eq!(Rule::Prefixes.apply("abcde"), vec!["ab", "abc", "abcd"]);
        assert_eq!(Rule::DropFirst.apply("abc"), vec!["bc"]);
        assert_eq!(Rule::DropLast.apply("abc"), vec!["ab"]);
        assert_eq!(Rule::FirstHalf.apply("abcdef"), vec!["abc"]);
        assert_eq!(Rule::SecondHalf.apply("abcdef"), vec!["def"]);

        // too short to truncate
        assert!(Rule::Prefixes.apply("ab").is_empty());
        assert!(Rule::FirstHalf.apply("abc").is_empty());
        assert!(Rule::DropFirst.apply("a").is_empty());
    }

    #[test]
    fn insertion_happens_at_the_midpoint() {
        let candidates = Rule::InsertMiddle.apply("abcd");
        assert_eq!(candidates.len(), INSERTION_ALPHABET.len());
        assert_eq!(candidates[0], "ab0cd");
        assert_eq!(candidates[10], "ab!cd");
    }

    #[test]
    fn append_families_cover_their_tables() {
        assert_eq!(Rule::AppendDigit.apply("x").len(), 10);
        assert_eq!(Rule::PrependDigit.apply("x")[9], "9x");
        assert!(Rule::PrependCommon.apply("pass").contains(&"mypass".to_owned()));
        assert_eq!(Rule::AppendNumber.apply("x").len(), 103);
        assert!(Rule::AppendYear.apply("x").contains(&"x2024".to_owned()));
        assert!(Rule::AppendYear.apply("x").contains(&"x1999".to_owned()));
    }

    #[test]
    fn compound_family() {
        let candidates = Rule::CapitalizeDigits.apply("admin");
        assert!(candidates.contains(&"Admin123".to_owned()));
        let candidates = Rule::LeetDigits.apply("password");
        assert!(candidates.contains(&"p455w0rd1".to_owned()));
    }

    #[test]
    fn pair_variants_cover_separators_and_infixes() {
        let variants = pair_variants("john", "doe");
        assert_eq!(variants.len(), SEPARATORS.len() * 2 + DIGIT_INFIXES.len());
        assert!(variants.contains(&"johndoe".to_owned()));
        assert!(variants.contains(&"John_Doe".to_owned()));
        assert!(variants.contains(&"john123doe".to_owned()));
    }

    #[test]
    fn combiner_produces_pairs_and_triples() {
        let words: Vec<String> = ["alpha", "beta", "gamma"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let combos = combine_words(&words);

        assert!(combos.contains(&"alphabeta".to_owned()));
        assert!(combos.contains(&"alpha_beta".to_owned()));
        assert!(combos.contains(&"Alpha.Beta".to_owned()));
        assert!(combos.contains(&"alpha123beta".to_owned()));
        assert!(combos.contains(&"alpha-beta-gamma".to_owned()));

        // no duplicates
        let unique: std::collections::HashSet<_> = combos.iter().collect();
        assert_eq!(combos.len(), unique.len());
    }

    #[test]
    fn combiner_skips_triples_for_large_inputs() {
        let words: Vec<String> = (0..11).map(|i| format!("word{i}")).collect();
        let combos = combine_words(&words);
        assert!(!combos.iter().any(|c| c.matches("word").count() == 3));
    }

    #[test]
    fn hybrid_variants_cover_three_cases() {
        let variants = hybrid_variants("james");
        assert!(variants.contains(&"james123".to_owned()));
        assert!(variants.contains(&"James123".to_owned()));
        assert!(variants.contains(&"JAMES123".to_owned()));
    }
}
