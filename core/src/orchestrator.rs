//! Multi-phase attack sequencing.
//!
//! Phases are strategy objects run in a fixed priority order against a
//! shared context carrying the target digest, the attempt counter and the
//! wall-clock deadline. The first match halts the pipeline.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::hash::HashAlgorithm;
use crate::lexicon::{self, FIRST_NAMES};
use crate::markov::{GeneratorConfig, MarkovModel};
use crate::rainbow::RainbowIndex;
use crate::rules::{self, Rule, REGISTRY};
use crate::stream::{BruteForceIterator, BRUTE_FORCE_CHARSET};

/// How many candidates a long-running phase tries between deadline polls.
const DEADLINE_POLL_CADENCE: u64 = 1_000;

/// Tunables shared by every phase of a run.
#[derive(Clone, Debug)]
pub struct AttackConfig {
    /// Wall-clock budget for the whole run.
    pub deadline: Duration,
    /// Longest candidate tried by the incremental brute-force phase.
    pub brute_force_ceiling: usize,
    /// Beam-search candidates requested from the model.
    pub markov_candidates: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(30),
            brute_force_ceiling: 4,
            markov_candidates: 5_000,
        }
    }
}

/// Telemetry for one phase of a run.
#[derive(Clone, Debug, Serialize)]
pub struct PhaseRecord {
    pub phase: &'static str,
    pub attempts: u64,
    pub success: bool,
    pub elapsed: Duration,
    pub candidate: Option<String>,
    pub origin: Option<String>,
}

/// Outcome of a full run. "Not cracked" is an ordinary result with the
/// same shape, not an error.
#[derive(Clone, Debug, Serialize)]
pub struct AttackResult {
    pub cracked: bool,
    pub password: Option<String>,
    pub method: Option<&'static str>,
    pub origin: Option<String>,
    pub attempts: u64,
    pub elapsed: Duration,
    pub time_limited: bool,
    pub phases: Vec<PhaseRecord>,
}

impl AttackResult {
    /// Hash computations per second over the whole run.
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.attempts as f64 / seconds
        } else {
            self.attempts as f64
        }
    }
}

/// A successful candidate with its provenance.
struct PhaseMatch {
    candidate: String,
    origin: String,
}

/// State shared by every phase of one run.
struct PhaseCtx<'a> {
    target: &'a str,
    algorithm: HashAlgorithm,
    user_words: &'a [String],
    rainbow: &'a RainbowIndex,
    model: &'a MarkovModel,
    config: &'a AttackConfig,
    deadline: Instant,
    attempts: u64,
    last_poll: u64,
    deadline_hit: bool,
}

impl PhaseCtx<'_> {
    /// Hashes a candidate and compares it to the target. Every call counts
    /// one attempt.
    fn try_candidate(&mut self, candidate: &str) -> bool {
        self.attempts += 1;
        self.algorithm.digest_hex(candidate) == self.target
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Deadline poll amortized over [`DEADLINE_POLL_CADENCE`] candidates
    /// since the previous poll, so it fires at the same cadence regardless
    /// of the stride the calling phase advances the counter in.
    /// Sets the time-limited flag once tripped.
    fn check_deadline(&mut self) -> bool {
        if self.deadline_hit {
            return true;
        }
        if self.attempts - self.last_poll >= DEADLINE_POLL_CADENCE {
            self.last_poll = self.attempts;
            if self.expired() {
                self.deadline_hit = true;
            }
        }
        self.deadline_hit
    }
}

trait Phase {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch>;
}

/// Phase 1: O(1) reverse lookup. Attempts are charged as the full table
/// size on both hit and miss, mirroring what an exhaustive scan of the
/// same dictionary would cost.
struct RainbowPhase;

impl Phase for RainbowPhase {
    fn name(&self) -> &'static str {
        "rainbow"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        if !ctx.rainbow.supports(ctx.algorithm) {
            return None;
        }

        ctx.attempts += ctx.rainbow.table_len(ctx.algorithm) as u64;
        ctx.rainbow
            .lookup(ctx.algorithm, ctx.target)
            .map(|word| PhaseMatch {
                candidate: word.to_owned(),
                origin: "rainbow table entry".to_owned(),
            })
    }
}

/// Phase 2: the corpus and user words, verbatim.
struct DictionaryPhase;

impl Phase for DictionaryPhase {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        for word in lexicon::base_words() {
            if ctx.try_candidate(word) {
                return Some(PhaseMatch {
                    candidate: word.to_owned(),
                    origin: format!("corpus word \"{word}\""),
                });
            }
        }
        for word in ctx.user_words.to_vec() {
            if ctx.try_candidate(&word) {
                return Some(PhaseMatch {
                    candidate: word.clone(),
                    origin: format!("user word \"{word}\""),
                });
            }
        }
        None
    }
}

/// Phase 3: every word crossed with every mutation rule.
struct RulePhase;

impl Phase for RulePhase {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        let words: Vec<String> = lexicon::base_words()
            .map(str::to_owned)
            .chain(ctx.user_words.iter().cloned())
            .collect();

        for word in &words {
            if ctx.check_deadline() {
                return None;
            }
            for rule in REGISTRY {
                for candidate in rule.apply(word) {
                    if ctx.try_candidate(&candidate) {
                        return Some(PhaseMatch {
                            candidate,
                            origin: format!("{}(\"{word}\")", rule.name()),
                        });
                    }
                }
            }
        }
        None
    }
}

/// Phase 4: first names crossed with the common suffix table, three case
/// variants each.
struct HybridPhase;

impl Phase for HybridPhase {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        for name in FIRST_NAMES {
            if ctx.check_deadline() {
                return None;
            }
            for candidate in rules::hybrid_variants(name) {
                if ctx.try_candidate(&candidate) {
                    return Some(PhaseMatch {
                        candidate,
                        origin: format!("suffixed \"{name}\""),
                    });
                }
            }
        }
        None
    }
}

/// Tries the model's beam-search candidates in probability order.
fn try_generated(ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
    let config = GeneratorConfig {
        count: ctx.config.markov_candidates,
        ..Default::default()
    };

    for candidate in ctx.model.generate(&config) {
        if ctx.check_deadline() {
            return None;
        }
        if ctx.try_candidate(&candidate) {
            return Some(PhaseMatch {
                candidate,
                origin: "beam search".to_owned(),
            });
        }
    }
    None
}

/// Tries user words verbatim, then model-guided continuations, leet
/// transforms and suffix variants of each.
fn try_guided_words(ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
    for word in ctx.user_words.to_vec() {
        if ctx.check_deadline() {
            return None;
        }

        if ctx.try_candidate(&word) {
            return Some(PhaseMatch {
                candidate: word.clone(),
                origin: format!("user word \"{word}\""),
            });
        }

        let mut variants = ctx.model.extend_word(&word, 8);
        variants.extend(Rule::LeetBasic.apply(&word));
        variants.extend(Rule::LeetAdvanced.apply(&word));
        variants.extend(rules::hybrid_variants(&word));

        for candidate in variants {
            if ctx.try_candidate(&candidate) {
                return Some(PhaseMatch {
                    candidate,
                    origin: format!("model-guided \"{word}\""),
                });
            }
        }
    }
    None
}

/// Phase 5 of the full pipeline: beam-search generation plus guided user
/// words.
struct MarkovPhase;

impl Phase for MarkovPhase {
    fn name(&self) -> &'static str {
        "markov"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        try_generated(ctx).or_else(|| try_guided_words(ctx))
    }
}

/// Standalone generation phase of the AI pipeline.
struct GenerationPhase;

impl Phase for GenerationPhase {
    fn name(&self) -> &'static str {
        "ai-generation"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        try_generated(ctx)
    }
}

/// Standalone guided-words phase of the AI pipeline.
struct GuidedWordsPhase;

impl Phase for GuidedWordsPhase {
    fn name(&self) -> &'static str {
        "ai-words"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        try_guided_words(ctx)
    }
}

/// Phase 6: multi-word concatenations with light suffix mutation.
struct CombinationPhase;

impl Phase for CombinationPhase {
    fn name(&self) -> &'static str {
        "combination"
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        let words: Vec<String> = if ctx.user_words.is_empty() {
            FIRST_NAMES.iter().take(8).map(|s| s.to_string()).collect()
        } else {
            ctx.user_words.to_vec()
        };

        // combinations are generated one word tuple at a time so the cross
        // product is never materialized and the deadline can cut in
        // mid-phase even for large user word lists
        for (i, a) in words.iter().enumerate() {
            for (j, b) in words.iter().enumerate() {
                if i == j {
                    continue;
                }
                if ctx.check_deadline() {
                    return None;
                }
                for combo in rules::pair_variants(a, b) {
                    if let Some(matched) = try_suffixed(ctx, &combo) {
                        return Some(matched);
                    }
                }
            }
        }

        if (3..=10).contains(&words.len()) {
            for (i, a) in words.iter().enumerate() {
                for (j, b) in words.iter().enumerate() {
                    for (k, c) in words.iter().enumerate() {
                        if i == j || j == k || i == k {
                            continue;
                        }
                        if ctx.check_deadline() {
                            return None;
                        }
                        for combo in rules::triple_variants(a, b, c) {
                            if let Some(matched) = try_suffixed(ctx, &combo) {
                                return Some(matched);
                            }
                        }
                    }
                }
            }
        }

        None
    }
}

/// Tries a combined word with the light suffix set bolted on.
fn try_suffixed(ctx: &mut PhaseCtx, combo: &str) -> Option<PhaseMatch> {
    const LIGHT_SUFFIXES: &[&str] = &["", "1", "123", "!"];

    for suffix in LIGHT_SUFFIXES {
        let candidate = format!("{combo}{suffix}");
        if ctx.try_candidate(&candidate) {
            return Some(PhaseMatch {
                candidate,
                origin: "combined words".to_owned(),
            });
        }
    }
    None
}

/// Phase 7: incremental brute force up to the configured ceiling, over the
/// plain charset or a model-frequency-ranked one.
struct BruteForcePhase {
    ranked: bool,
}

impl Phase for BruteForcePhase {
    fn name(&self) -> &'static str {
        if self.ranked {
            "ranked-brute-force"
        } else {
            "brute-force"
        }
    }

    fn run(&self, ctx: &mut PhaseCtx) -> Option<PhaseMatch> {
        let charset = if self.ranked {
            ctx.model.ranked_charset(BRUTE_FORCE_CHARSET)
        } else {
            BRUTE_FORCE_CHARSET.to_vec()
        };

        for candidate in BruteForceIterator::new(&charset, 1, ctx.config.brute_force_ceiling) {
            if ctx.check_deadline() {
                return None;
            }
            if ctx.try_candidate(&candidate) {
                return Some(PhaseMatch {
                    candidate,
                    origin: "exhaustive search".to_owned(),
                });
            }
        }
        None
    }
}

/// Runs the full 7-phase pipeline.
pub fn run_full(
    rainbow: &RainbowIndex,
    model: &MarkovModel,
    algorithm: HashAlgorithm,
    target: &str,
    user_words: &[String],
    config: &AttackConfig,
) -> AttackResult {
    let phases: &[&dyn Phase] = &[
        &RainbowPhase,
        &DictionaryPhase,
        &RulePhase,
        &HybridPhase,
        &MarkovPhase,
        &CombinationPhase,
        &BruteForcePhase { ranked: false },
    ];
    run(phases, rainbow, model, algorithm, target, user_words, config)
}

/// Runs the model-first 3-phase pipeline.
pub fn run_ai(
    rainbow: &RainbowIndex,
    model: &MarkovModel,
    algorithm: HashAlgorithm,
    target: &str,
    user_words: &[String],
    config: &AttackConfig,
) -> AttackResult {
    let phases: &[&dyn Phase] = &[
        &GenerationPhase,
        &GuidedWordsPhase,
        &BruteForcePhase { ranked: true },
    ];
    run(phases, rainbow, model, algorithm, target, user_words, config)
}

fn run(
    phases: &[&dyn Phase],
    rainbow: &RainbowIndex,
    model: &MarkovModel,
    algorithm: HashAlgorithm,
    target: &str,
    user_words: &[String],
    config: &AttackConfig,
) -> AttackResult {
    let started = Instant::now();
    let mut ctx = PhaseCtx {
        target,
        algorithm,
        user_words,
        rainbow,
        model,
        config,
        deadline: started + config.deadline,
        attempts: 0,
        last_poll: 0,
        deadline_hit: false,
    };

    let mut records = Vec::with_capacity(phases.len());
    let mut outcome: Option<(&'static str, PhaseMatch)> = None;

    for phase in phases {
        if ctx.expired() {
            ctx.deadline_hit = true;
            break;
        }

        let phase_started = Instant::now();
        let attempts_before = ctx.attempts;
        let result = phase.run(&mut ctx);
        let success = result.is_some();

        records.push(PhaseRecord {
            phase: phase.name(),
            attempts: ctx.attempts - attempts_before,
            success,
            elapsed: phase_started.elapsed(),
            candidate: result.as_ref().map(|m| m.candidate.clone()),
            origin: result.as_ref().map(|m| m.origin.clone()),
        });

        debug!(
            phase = phase.name(),
            attempts = ctx.attempts - attempts_before,
            success,
            "phase finished"
        );

        if let Some(matched) = result {
            outcome = Some((phase.name(), matched));
            break;
        }
        if ctx.deadline_hit {
            break;
        }
    }

    match outcome {
        Some((method, matched)) => AttackResult {
            cracked: true,
            password: Some(matched.candidate),
            method: Some(method),
            origin: Some(matched.origin),
            attempts: ctx.attempts,
            elapsed: started.elapsed(),
            time_limited: false,
            phases: records,
        },
        None => AttackResult {
            cracked: false,
            password: None,
            method: None,
            origin: None,
            attempts: ctx.attempts,
            elapsed: started.elapsed(),
            time_limited: ctx.deadline_hit,
            phases: records,
        },
    }
}
