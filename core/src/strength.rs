//! Password strength scoring.
//!
//! Entirely independent of the attack pipeline: it estimates resistance
//! from entropy, character-class diversity and pattern detectors, without
//! hashing anything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lexicon::{self, KEYBOARD_PATTERNS, LEET_REVERSE};

/// Guess rates in hashes per second for the time-to-crack table.
pub const ATTACKER_PRESETS: &[(&str, f64)] = &[
    ("single cpu", 1e8),
    ("consumer gpu", 1e10),
    ("gpu cluster", 1e12),
    ("dedicated asic", 1e13),
    ("nation state", 1e15),
];

const LOWERCASE_SIZE: usize = 26;
const UPPERCASE_SIZE: usize = 26;
const DIGIT_SIZE: usize = 10;
const SYMBOL_SIZE: usize = 32;

/// Ordinal rating derived from the numeric score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Rating {
    pub fn name(&self) -> &'static str {
        match self {
            Rating::VeryWeak => "very weak",
            Rating::Weak => "weak",
            Rating::Moderate => "moderate",
            Rating::Strong => "strong",
            Rating::VeryStrong => "very strong",
        }
    }

    fn from_score(score: u8) -> Self {
        match score {
            0..=19 => Rating::VeryWeak,
            20..=39 => Rating::Weak,
            40..=59 => Rating::Moderate,
            60..=79 => Rating::Strong,
            _ => Rating::VeryStrong,
        }
    }
}

/// A structural weakness found by the pattern detectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weakness {
    DictionaryWord,
    LeetDictionaryWord,
    KeyboardWalk,
    DatePattern,
    Repetition,
    Sequence,
    Palindrome,
    SingleCharacterClass,
}

impl Weakness {
    pub fn describe(&self) -> &'static str {
        match self {
            Weakness::DictionaryWord => "exact dictionary word",
            Weakness::LeetDictionaryWord => "leet-obfuscated dictionary word",
            Weakness::KeyboardWalk => "keyboard walk",
            Weakness::DatePattern => "date or year pattern",
            Weakness::Repetition => "repeated characters",
            Weakness::Sequence => "sequential characters",
            Weakness::Palindrome => "palindrome",
            Weakness::SingleCharacterClass => "single character class",
        }
    }

    fn penalty(&self) -> i32 {
        match self {
            Weakness::DictionaryWord => 35,
            Weakness::LeetDictionaryWord => 25,
            Weakness::SingleCharacterClass => 10,
            _ => 15,
        }
    }
}

/// Time to exhaust the search space at one attacker preset's rate.
#[derive(Clone, Debug, Serialize)]
pub struct CrackTimeEstimate {
    pub attacker: &'static str,
    pub seconds: f64,
    pub display: String,
}

/// Everything the scorer knows about one password.
#[derive(Clone, Debug, Serialize)]
pub struct StrengthReport {
    pub score: u8,
    pub rating: Rating,
    pub length: usize,
    pub entropy_bits: f64,
    pub charset_size: usize,
    pub search_space: f64,
    pub weaknesses: Vec<Weakness>,
    pub crack_times: Vec<CrackTimeEstimate>,
}

/// Scores a password on a 0-100 scale with a weighted rubric: length,
/// class diversity and entropy add points, every detected weakness
/// subtracts its penalty.
pub fn score(password: &str) -> StrengthReport {
    let chars: Vec<char> = password.chars().collect();
    let length = chars.len();
    let charset_size = charset_size(&chars);
    let entropy_bits = shannon_entropy(&chars) * length as f64;
    let search_space = (charset_size.max(1) as f64).powi(length as i32);
    let weaknesses = detect_weaknesses(password, &chars);

    let mut points: i32 = 0;
    points += match length {
        16.. => 30,
        12..=15 => 25,
        8..=11 => 15,
        6..=7 => 5,
        _ => 0,
    };
    points += 8 * (character_classes(&chars).saturating_sub(1)) as i32;
    points += match entropy_bits {
        bits if bits >= 80.0 => 30,
        bits if bits >= 60.0 => 22,
        bits if bits >= 40.0 => 12,
        bits if bits >= 28.0 => 6,
        _ => 0,
    };
    points -= weaknesses.iter().map(Weakness::penalty).sum::<i32>();

    let score = points.clamp(0, 100) as u8;

    StrengthReport {
        score,
        rating: Rating::from_score(score),
        length,
        entropy_bits,
        charset_size,
        search_space,
        weaknesses,
        crack_times: crack_times(search_space),
    }
}

/// Time-to-exhaustion under every attacker preset.
fn crack_times(search_space: f64) -> Vec<CrackTimeEstimate> {
    ATTACKER_PRESETS
        .iter()
        .map(|&(attacker, rate)| {
            let seconds = search_space / rate;
            CrackTimeEstimate {
                attacker,
                seconds,
                display: format_seconds(seconds),
            }
        })
        .collect()
}

/// Shannon entropy in bits per character over the observed distribution.
fn shannon_entropy(chars: &[char]) -> f64 {
    if chars.is_empty() {
        return 0.0;
    }

    let mut frequency: HashMap<char, usize> = HashMap::new();
    for &c in chars {
        *frequency.entry(c).or_insert(0) += 1;
    }

    let total = chars.len() as f64;
    frequency
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

fn character_classes(chars: &[char]) -> usize {
    let mut classes = 0;
    if chars.iter().any(|c| c.is_ascii_lowercase()) {
        classes += 1;
    }
    if chars.iter().any(|c| c.is_ascii_uppercase()) {
        classes += 1;
    }
    if chars.iter().any(|c| c.is_ascii_digit()) {
        classes += 1;
    }
    if chars.iter().any(|c| !c.is_ascii_alphanumeric()) {
        classes += 1;
    }
    classes
}

fn charset_size(chars: &[char]) -> usize {
    let mut size = 0;
    if chars.iter().any(|c| c.is_ascii_lowercase()) {
        size += LOWERCASE_SIZE;
    }
    if chars.iter().any(|c| c.is_ascii_uppercase()) {
        size += UPPERCASE_SIZE;
    }
    if chars.iter().any(|c| c.is_ascii_digit()) {
        size += DIGIT_SIZE;
    }
    if chars.iter().any(|c| !c.is_ascii_alphanumeric()) {
        size += SYMBOL_SIZE;
    }
    size
}

fn detect_weaknesses(password: &str, chars: &[char]) -> Vec<Weakness> {
    let lower = password.to_lowercase();
    let mut weaknesses = Vec::new();

    if is_dictionary_word(&lower) {
        weaknesses.push(Weakness::DictionaryWord);
    } else if is_leet_dictionary_word(&lower) {
        weaknesses.push(Weakness::LeetDictionaryWord);
    }
    if is_keyboard_walk(&lower) {
        weaknesses.push(Weakness::KeyboardWalk);
    }
    if has_date_pattern(&lower) {
        weaknesses.push(Weakness::DatePattern);
    }
    if has_repetition(chars) {
        weaknesses.push(Weakness::Repetition);
    }
    if has_sequence(chars) {
        weaknesses.push(Weakness::Sequence);
    }
    if is_palindrome(chars) {
        weaknesses.push(Weakness::Palindrome);
    }
    if character_classes(chars) == 1 {
        weaknesses.push(Weakness::SingleCharacterClass);
    }

    weaknesses
}

fn is_dictionary_word(lower: &str) -> bool {
    let stripped: String = lower
        .trim_end_matches(|c: char| c.is_ascii_digit() || !c.is_ascii_alphanumeric())
        .to_owned();

    lexicon::base_words().any(|word| word == lower || (!stripped.is_empty() && word == stripped))
}

/// Reverses leet substitutions and re-runs the dictionary check. Only
/// counts when something was actually substituted.
fn is_leet_dictionary_word(lower: &str) -> bool {
    let deleeted: String = lower
        .chars()
        .map(|c| {
            LEET_REVERSE
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect();

    deleeted != lower && is_dictionary_word(&deleeted)
}

fn is_keyboard_walk(lower: &str) -> bool {
    KEYBOARD_PATTERNS.iter().any(|pattern| {
        let reversed: String = pattern.chars().rev().collect();
        lower.contains(pattern) || lower.contains(&reversed)
    })
}

/// Any embedded plausible year counts as a date pattern, as does a
/// password made purely of 6 or 8 digits (ddmmyy / ddmmyyyy shapes).
fn has_date_pattern(lower: &str) -> bool {
    let digits: Vec<char> = lower.chars().collect();
    for window in digits.windows(4) {
        if window.iter().all(char::is_ascii_digit) {
            let year: String = window.iter().collect();
            if let Ok(year) = year.parse::<u32>() {
                if (1940..=2039).contains(&year) {
                    return true;
                }
            }
        }
    }

    let all_digits = !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit());
    all_digits && (lower.len() == 6 || lower.len() == 8)
}

/// Three or more identical consecutive characters.
fn has_repetition(chars: &[char]) -> bool {
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Three or more characters in ascending or descending code-point order.
fn has_sequence(chars: &[char]) -> bool {
    chars.windows(3).any(|w| {
        let (a, b, c) = (w[0] as i32, w[1] as i32, w[2] as i32);
        (b - a == 1 && c - b == 1) || (a - b == 1 && b - c == 1)
    })
}

fn is_palindrome(chars: &[char]) -> bool {
    chars.len() >= 4 && chars.iter().eq(chars.iter().rev())
}

/// Renders a duration in seconds at human scale.
pub fn format_seconds(seconds: f64) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 3_600.0;
    const DAY: f64 = 86_400.0;
    const YEAR: f64 = 365.25 * DAY;

    if seconds < 1.0 {
        "instant".to_owned()
    } else if seconds < MINUTE {
        format!("{seconds:.0} seconds")
    } else if seconds < HOUR {
        format!("{:.1} minutes", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{:.1} hours", seconds / HOUR)
    } else if seconds < YEAR {
        format!("{:.1} days", seconds / DAY)
    } else if seconds < 1e6 * YEAR {
        format!("{:.1} years", seconds / YEAR)
    } else if seconds < 1e15 * YEAR {
        format!("{:.1e} years", seconds / YEAR)
    } else {
        "practically forever".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_passwords_score_below_strong_ones() {
        let weak = score("123456");
        let strong = score("K9#mPx2L7!qT");

        assert!(weak.score < strong.score);
        assert_eq!(weak.rating, Rating::VeryWeak);
        assert!(strong.rating >= Rating::Strong);
    }

    #[test]
    fn dictionary_words_are_flagged() {
        let report = score("123456");
        assert!(report.weaknesses.contains(&Weakness::DictionaryWord));

        let report = score("K9#mPx2L7!qT");
        assert!(!report.weaknesses.contains(&Weakness::DictionaryWord));
        assert!(!report.weaknesses.contains(&Weakness::LeetDictionaryWord));
    }

    #[test]
    fn leet_obfuscation_is_seen_through() {
        let report = score("p455w0rd");
        assert!(report.weaknesses.contains(&Weakness::LeetDictionaryWord));
        assert!(!report.weaknesses.contains(&Weakness::DictionaryWord));
    }

    #[test]
    fn pattern_detectors_fire() {
        assert!(score("qwertyuiop77").weaknesses.contains(&Weakness::KeyboardWalk));
        assert!(score("summer2024").weaknesses.contains(&Weakness::DatePattern));
        assert!(score("aaabce").weaknesses.contains(&Weakness::Repetition));
        assert!(score("xkabcdkx").weaknesses.contains(&Weakness::Sequence));
        assert!(score("abcddcba").weaknesses.contains(&Weakness::Palindrome));
        assert!(score("zzyzxvtq").weaknesses.contains(&Weakness::SingleCharacterClass));
    }

    #[test]
    fn scores_stay_in_range() {
        for password in ["", "a", "123456", "password", "K9#mPx2L7!qT", "aaaaaaaaaaaaaaaaaaaa"] {
            let report = score(password);
            assert!(report.score <= 100);
            assert!(report.entropy_bits.is_finite());
            assert!(report.search_space.is_finite() || password.len() > 100);
        }
    }

    #[test]
    fn crack_times_shrink_with_attacker_speed() {
        let report = score("K9#mPx2L7!qT");
        assert_eq!(report.crack_times.len(), ATTACKER_PRESETS.len());
        for pair in report.crack_times.windows(2) {
            assert!(pair[0].seconds > pair[1].seconds);
        }
    }

    #[test]
    fn formats_time_scales() {
        assert_eq!(format_seconds(0.5), "instant");
        assert_eq!(format_seconds(30.0), "30 seconds");
        assert_eq!(format_seconds(3_600.0 * 5.0), "5.0 hours");
        assert_eq!(format_seconds(1e40), "practically forever");
    }
}
