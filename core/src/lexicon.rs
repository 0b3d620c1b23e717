//! Static word corpora bundled with the engine.
//!
//! Everything here is read once at bootstrap; nothing is persisted or
//! mutated afterwards.

use itertools::Itertools;

/// Passwords seen at the top of every public breach corpus.
pub const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "123456789",
    "12345678",
    "12345",
    "1234567",
    "qwerty",
    "abc123",
    "password1",
    "password123",
    "123123",
    "admin",
    "letmein",
    "welcome",
    "monkey",
    "dragon",
    "master",
    "login",
    "princess",
    "solo",
    "passw0rd",
    "starwars",
    "hello",
    "charlie",
    "donald",
    "root",
    "toor",
    "test",
    "guest",
    "administrator",
    "iloveyou",
    "sunshine",
    "trustno1",
    "shadow",
    "superman",
    "batman",
    "football",
    "baseball",
    "soccer",
    "hockey",
    "jordan",
    "harley",
    "hunter",
    "ranger",
    "buster",
    "tigger",
    "pepper",
    "summer",
    "winter",
    "secret",
    "freedom",
    "whatever",
    "internet",
    "computer",
    "mustang",
    "corvette",
    "banana",
    "cookie",
    "flower",
    "killer",
];

/// First names commonly reused as passwords or password stems.
pub const FIRST_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "thomas", "charles",
    "daniel", "matthew", "anthony", "mark", "steven", "kevin", "brian", "jason", "justin", "mary",
    "patricia", "jennifer", "linda", "elizabeth", "susan", "jessica", "sarah", "karen", "nancy",
    "lisa", "michelle", "amanda", "ashley", "emily", "emma", "olivia", "nicole", "laura", "maggie",
];

/// Straight-line keyboard walks.
pub const KEYBOARD_PATTERNS: &[&str] = &[
    "qwerty",
    "qwertyuiop",
    "asdfgh",
    "asdfghjkl",
    "zxcvbn",
    "zxcvbnm",
    "qazwsx",
    "1qaz2wsx",
    "qweasdzxc",
    "1234qwer",
    "qwer1234",
    "asdf1234",
    "098765",
    "987654321",
];

/// Basic leet substitutions (letter -> digit).
pub const LEET_BASIC: &[(char, char)] = &[
    ('a', '4'),
    ('e', '3'),
    ('i', '1'),
    ('o', '0'),
    ('s', '5'),
];

/// Advanced leet substitutions mixing digits and symbols.
pub const LEET_ADVANCED: &[(char, char)] = &[
    ('a', '@'),
    ('e', '3'),
    ('i', '!'),
    ('o', '0'),
    ('s', '$'),
    ('t', '7'),
];

/// Reverse map used to de-obfuscate leet speak back to letters.
pub const LEET_REVERSE: &[(char, char)] = &[
    ('4', 'a'),
    ('@', 'a'),
    ('8', 'b'),
    ('3', 'e'),
    ('1', 'i'),
    ('!', 'i'),
    ('0', 'o'),
    ('5', 's'),
    ('$', 's'),
    ('7', 't'),
];

/// Suffixes users bolt onto a base word.
pub const COMMON_SUFFIXES: &[&str] = &[
    "1", "12", "123", "1234", "12345", "123456", "!", "@", "#", "!@#", "!!", "01", "007", "69",
    "666", "99", "00", "2023", "2024", "2025", "2026",
];

/// Short digit suffixes used by the compound mutation rules.
pub const DIGIT_SUFFIXES: &[&str] = &["1", "2", "3", "7", "12", "123", "1234", "69", "007"];

pub const COMMON_PREFIXES: &[&str] = &["1", "123", "!", "@", "the", "my"];

/// Years worth appending: a recent window plus a few memorable ones.
pub const RECENT_YEARS: core::ops::RangeInclusive<u32> = 2015..=2026;
pub const HISTORICAL_YEARS: &[u32] = &[1970, 1980, 1984, 1990, 1999, 2000, 2001, 2010, 2012];

/// Separators accepted by the word combiner.
pub const SEPARATORS: &[&str] = &["", "_", "-", ".", "@"];

/// Digit infixes accepted by the word combiner.
pub const DIGIT_INFIXES: &[&str] = &["1", "123", "2024"];

/// The alphabet used by the middle-insertion rule.
pub const INSERTION_ALPHABET: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '!', '@', '#', '$',
];

/// The base word corpus: everything an attacker would try verbatim.
pub fn base_words() -> impl Iterator<Item = &'static str> {
    COMMON_PASSWORDS
        .iter()
        .chain(FIRST_NAMES)
        .chain(KEYBOARD_PATTERNS)
        .copied()
}

/// The corpus the Markov model is trained on. Fixed for the process lifetime.
pub fn training_corpus() -> impl Iterator<Item = &'static str> {
    base_words()
}

/// The expanded dictionary feeding the rainbow tables: base words plus a
/// small fixed set of suffix mutations, deduplicated and order-stable.
pub fn expanded_dictionary() -> Vec<String> {
    const EXPANSION_SUFFIXES: &[&str] = &["1", "123", "!", "2024"];

    base_words()
        .flat_map(|word| {
            let mut variants = vec![word.to_owned(), capitalize(word)];
            for suffix in EXPANSION_SUFFIXES {
                variants.push(format!("{word}{suffix}"));
            }
            variants
        })
        .unique()
        .collect()
}

/// Uppercases the first character, leaving the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
