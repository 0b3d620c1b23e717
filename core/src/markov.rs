//! Order-k character Markov model with beam-search generation.
//!
//! The model is trained once at bootstrap from the bundled corpus and is
//! immutable afterwards, so it can be shared across concurrent runs behind
//! an `Arc` without locking.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;

use crate::lexicon;

/// Context length of the model.
pub const MARKOV_ORDER: usize = 3;

/// Marks the virtual positions before the first character of a password.
const START: char = '\u{0002}';
/// Marks the end of a password.
const END: char = '\u{0003}';

/// Additive smoothing floor for unseen transitions. Keeps log-probabilities
/// finite.
const SMOOTHING: f64 = 1e-10;

/// Shortest candidate the generator is allowed to emit.
pub const MIN_GENERATED_LENGTH: usize = 3;

/// Model-assigned likelihood of a password.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PasswordScore {
    /// Sum of log transition probabilities over the padded password.
    pub log_probability: f64,
    /// Log-probability divided by the number of transitions.
    pub normalized: f64,
    /// exp(-normalized), lower means more password-like.
    pub perplexity: f64,
}

/// Beam-search generation parameters.
#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    /// How many candidates to produce.
    pub count: usize,
    /// Hard cap on candidate length.
    pub max_length: usize,
    /// Beams kept alive after each expansion step.
    pub beam_width: usize,
    /// Next-character expansions per beam per step.
    pub branching: usize,
    /// Flattens (>1) or sharpens (<1) the expansion ranking. Only affects
    /// which beams survive pruning, never the reported log-probability.
    pub temperature: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 5_000,
            max_length: 16,
            beam_width: 200,
            branching: 8,
            temperature: 1.0,
        }
    }
}

/// A partial sequence tracked by the beam search.
#[derive(Clone, Debug)]
struct Beam {
    text: String,
    context: String,
    /// Untempered accumulated log-probability, reported to consumers.
    log_prob: f64,
    /// Tempered accumulated log-probability, used for pruning only.
    rank: f64,
}

/// The trained transition table.
#[derive(Clone, Debug, Default)]
pub struct MarkovModel {
    /// context (k chars) -> next char -> count.
    transitions: HashMap<String, HashMap<char, u32>>,
    /// Shortened (k-1 chars) contexts, consulted when the exact context is
    /// unseen.
    backoff: HashMap<String, HashMap<char, u32>>,
    /// Frequency of each password's opening k-gram.
    start_grams: HashMap<String, u32>,
    vocabulary: BTreeSet<char>,
    total_transitions: u64,
}

impl MarkovModel {
    /// Trains a model on the bundled corpus.
    pub fn bootstrap() -> Self {
        let mut model = Self::default();
        for word in lexicon::training_corpus() {
            model.observe(word);
        }
        model
    }

    /// Trains a model on an arbitrary corpus.
    pub fn train<'a>(corpus: impl IntoIterator<Item = &'a str>) -> Self {
        let mut model = Self::default();
        for word in corpus {
            model.observe(word);
        }
        model
    }

    /// Folds one password into the transition tables.
    fn observe(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let padded = pad(word);

        let opening: String = word.chars().take(MARKOV_ORDER).collect();
        *self.start_grams.entry(opening).or_insert(0) += 1;

        for window in padded.windows(MARKOV_ORDER + 1) {
            let context: String = window[..MARKOV_ORDER].iter().collect();
            let shortened: String = window[1..MARKOV_ORDER].iter().collect();
            let next = window[MARKOV_ORDER];

            *self
                .transitions
                .entry(context)
                .or_default()
                .entry(next)
                .or_insert(0) += 1;
            *self
                .backoff
                .entry(shortened)
                .or_default()
                .entry(next)
                .or_insert(0) += 1;
            self.total_transitions += 1;
        }

        self.vocabulary.extend(word.chars());
    }

    /// Probability of `next` following `context`. Zero if the context was
    /// never observed.
    pub fn transition_probability(&self, context: &str, next: char) -> f64 {
        match self.transitions.get(context) {
            Some(counts) => {
                let total: u32 = counts.values().sum();
                counts
                    .get(&next)
                    .map(|&c| f64::from(c) / f64::from(total))
                    .unwrap_or(0.0)
            }
            None => 0.0,
        }
    }

    /// Observed next characters for a context, most probable first. Ties
    /// break on character order so the result is deterministic.
    pub fn next_char_distribution(&self, context: &str) -> Vec<(char, f64)> {
        self.transitions
            .get(context)
            .map(|counts| distribution(counts))
            .unwrap_or_default()
    }

    /// Two-tier lookup used by the generator: exact context first, then the
    /// shortened suffix context.
    fn expansion_distribution(&self, context: &str) -> Vec<(char, f64)> {
        if let Some(counts) = self.transitions.get(context) {
            return distribution(counts);
        }

        let shortened: String = context.chars().skip(1).collect();
        self.backoff
            .get(&shortened)
            .map(|counts| distribution(counts))
            .unwrap_or_default()
    }

    /// Scores a password against the model. Unseen transitions are smoothed
    /// so the result is always finite.
    pub fn score(&self, password: &str) -> PasswordScore {
        let padded = pad(password);
        let mut log_probability = 0.0;
        let mut windows = 0usize;

        for window in padded.windows(MARKOV_ORDER + 1) {
            let context: String = window[..MARKOV_ORDER].iter().collect();
            let probability = self.transition_probability(&context, window[MARKOV_ORDER]);
            log_probability += probability.max(SMOOTHING).ln();
            windows += 1;
        }

        let normalized = log_probability / windows.max(1) as f64;

        PasswordScore {
            log_probability,
            normalized,
            perplexity: (-normalized).exp(),
        }
    }

    /// Generates candidates by beam search, most probable first.
    ///
    /// Candidates are between [`MIN_GENERATED_LENGTH`] and
    /// `config.max_length` characters, deduplicated, and sorted by
    /// descending cumulative log-probability. Consumers rely on that order.
    pub fn generate(&self, config: &GeneratorConfig) -> Vec<String> {
        let temperature = config.temperature.max(0.05);
        let seed = Beam {
            text: String::new(),
            context: START.to_string().repeat(MARKOV_ORDER),
            log_prob: 0.0,
            rank: 0.0,
        };

        let mut beams = vec![seed];
        let mut finished: Vec<Beam> = Vec::new();

        for _ in 0..config.max_length {
            if beams.is_empty() || finished.len() >= config.count {
                break;
            }

            let mut expanded = Vec::with_capacity(beams.len() * config.branching);

            for beam in &beams {
                let candidates = self.expansion_distribution(&beam.context);

                for (next, probability) in candidates.into_iter().take(config.branching) {
                    let log_prob = beam.log_prob + probability.max(SMOOTHING).ln();
                    let rank =
                        beam.rank + probability.max(SMOOTHING).powf(1.0 / temperature).ln();

                    if next == END {
                        if beam.text.chars().count() >= MIN_GENERATED_LENGTH {
                            finished.push(Beam {
                                text: beam.text.clone(),
                                context: beam.context.clone(),
                                log_prob,
                                rank,
                            });
                        }
                        continue;
                    }

                    let mut text = beam.text.clone();
                    text.push(next);
                    let context: String = beam.context.chars().skip(1).chain([next]).collect();

                    expanded.push(Beam {
                        text,
                        context,
                        log_prob,
                        rank,
                    });
                }
            }

            expanded.sort_by(|a, b| b.rank.total_cmp(&a.rank));
            expanded.truncate(config.beam_width);
            beams = expanded;
        }

        // beams that ran out of steps still count, provided they are long
        // enough to be legal candidates
        finished.extend(
            beams
                .into_iter()
                .filter(|beam| beam.text.chars().count() >= MIN_GENERATED_LENGTH),
        );

        finished.sort_by(|a, b| {
            b.log_prob
                .total_cmp(&a.log_prob)
                .then_with(|| a.text.cmp(&b.text))
        });

        finished
            .into_iter()
            .map(|beam| beam.text)
            .unique()
            .take(config.count)
            .collect()
    }

    /// Extends a word with up to `max_extra` model-guided characters,
    /// returning the completions most probable first.
    pub fn extend_word(&self, word: &str, max_extra: usize) -> Vec<String> {
        if word.is_empty() {
            return Vec::new();
        }

        let padded: Vec<char> = std::iter::repeat(START)
            .take(MARKOV_ORDER)
            .chain(word.chars())
            .collect();
        let context: String = padded[padded.len() - MARKOV_ORDER..].iter().collect();

        let seed = Beam {
            text: word.to_owned(),
            context,
            log_prob: 0.0,
            rank: 0.0,
        };

        let mut beams = vec![seed];
        let mut finished: Vec<Beam> = Vec::new();

        for _ in 0..max_extra {
            if beams.is_empty() {
                break;
            }

            let mut expanded = Vec::new();

            for beam in &beams {
                for (next, probability) in
                    self.expansion_distribution(&beam.context).into_iter().take(4)
                {
                    let log_prob = beam.log_prob + probability.max(SMOOTHING).ln();

                    if next == END {
                        if beam.text != word {
                            finished.push(Beam {
                                log_prob,
                                ..beam.clone()
                            });
                        }
                        continue;
                    }

                    let mut text = beam.text.clone();
                    text.push(next);
                    let context: String = beam.context.chars().skip(1).chain([next]).collect();

                    expanded.push(Beam {
                        text,
                        context,
                        log_prob,
                        rank: log_prob,
                    });
                }
            }

            expanded.sort_by(|a, b| b.rank.total_cmp(&a.rank));
            expanded.truncate(16);
            beams = expanded;
        }

        finished.extend(beams.into_iter().filter(|beam| beam.text != word));
        finished.sort_by(|a, b| {
            b.log_prob
                .total_cmp(&a.log_prob)
                .then_with(|| a.text.cmp(&b.text))
        });

        finished
            .into_iter()
            .map(|beam| beam.text)
            .unique()
            .collect()
    }

    /// Reorders a charset by observed character frequency, most common
    /// first. Characters the model never saw keep their relative order at
    /// the tail.
    pub fn ranked_charset(&self, base: &[char]) -> Vec<char> {
        let mut frequency: HashMap<char, u64> = HashMap::new();
        for counts in self.transitions.values() {
            for (c, count) in counts {
                *frequency.entry(*c).or_insert(0) += u64::from(*count);
            }
        }

        let mut ranked: Vec<(usize, char)> = base.iter().copied().enumerate().collect();
        ranked.sort_by_key(|&(position, c)| {
            (std::cmp::Reverse(frequency.get(&c).copied().unwrap_or(0)), position)
        });
        ranked.into_iter().map(|(_, c)| c).collect()
    }

    /// The most common opening k-grams in the training corpus.
    pub fn top_start_grams(&self, count: usize) -> Vec<(String, u32)> {
        self.start_grams
            .iter()
            .map(|(gram, &n)| (gram.clone(), n))
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .take(count)
            .collect()
    }

    pub fn context_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn total_transitions(&self) -> u64 {
        self.total_transitions
    }
}

/// Pads a password with k start sentinels and one end sentinel.
fn pad(word: &str) -> Vec<char> {
    std::iter::repeat(START)
        .take(MARKOV_ORDER)
        .chain(word.chars())
        .chain([END])
        .collect()
}

/// Normalizes a count table into a probability distribution sorted by
/// descending probability, then character order.
fn distribution(counts: &HashMap<char, u32>) -> Vec<(char, f64)> {
    let total: u32 = counts.values().sum();
    counts
        .iter()
        .map(|(&c, &count)| (c, f64::from(count) / f64::from(total)))
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_probabilities_sum_to_one() {
        let model = MarkovModel::bootstrap();
        let distribution = model.next_char_distribution("pas");
        assert!(!distribution.is_empty());

        let total: f64 = distribution.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unseen_context_has_empty_distribution() {
        let model = MarkovModel::bootstrap();
        assert!(model.next_char_distribution("ZZZ").is_empty());
        assert_eq!(model.transition_probability("ZZZ", 'a'), 0.0);
    }

    #[test]
    fn corpus_words_score_better_than_noise() {
        let model = MarkovModel::bootstrap();
        let likely = model.score("password");
        let noise = model.score("xqjklrwy4");

        assert!(likely.normalized > noise.normalized);
        assert!(likely.perplexity < noise.perplexity);
    }

    #[test]
    fn scores_are_always_finite() {
        let model = MarkovModel::bootstrap();
        for password in ["password", "xqjklrwy4", "\u{1F512}unicode", "a"] {
            let score = model.score(password);
            assert!(score.log_probability.is_finite());
            assert!(score.normalized.is_finite());
            assert!(score.perplexity.is_finite());
        }
    }

    #[test]
    fn generated_candidates_respect_length_bounds() {
        let model = MarkovModel::bootstrap();
        let config = GeneratorConfig {
            count: 500,
            ..Default::default()
        };
        let candidates = model.generate(&config);

        assert!(!candidates.is_empty());
        for candidate in &candidates {
            let length = candidate.chars().count();
            assert!(
                (MIN_GENERATED_LENGTH..=config.max_length).contains(&length),
                "candidate {candidate:?} has illegal length {length}"
            );
        }
    }

    #[test]
    fn generation_is_deterministic_and_deduplicated() {
        let model = MarkovModel::bootstrap();
        let config = GeneratorConfig {
            count: 200,
            ..Default::default()
        };

        let first = model.generate(&config);
        let second = model.generate(&config);
        assert_eq!(first, second);

        let unique: std::collections::HashSet<_> = first.iter().collect();
        assert_eq!(first.len(), unique.len());
    }

    #[test]
    fn extensions_grow_the_seed_word() {
        let model = MarkovModel::bootstrap();
        let extensions = model.extend_word("pass", 6);

        assert!(!extensions.is_empty());
        for extension in &extensions {
            assert!(extension.starts_with("pass"));
            assert!(extension.len() > "pass".len());
        }
    }

    #[test]
    fn ranked_charset_is_a_permutation() {
        let model = MarkovModel::bootstrap();
        let base: Vec<char> = ('a'..='z').chain('0'..='9').collect();
        let ranked = model.ranked_charset(&base);

        assert_eq!(ranked.len(), base.len());
        let mut sorted = ranked.clone();
        sorted.sort_unstable();
        let mut expected = base.clone();
        expected.sort_unstable();
        assert_eq!(sorted, expected);

        // corpus is dominated by lowercase letters, so some letter must
        // outrank every digit that never appears
        assert_ne!(ranked, base);
    }
}
