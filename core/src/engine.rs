//! Process-wide engine handle.
//!
//! Owns the tables built at bootstrap and hands out read-only access to
//! every entry point. Cloning is cheap and clones share the same tables,
//! so one engine can serve concurrent callers.

use std::sync::Arc;

use tracing::info;

use crate::error::{PicklockError, PicklockResult};
use crate::hash::HashAlgorithm;
use crate::identify::{self, HashInfo};
use crate::markov::MarkovModel;
use crate::orchestrator::{self, AttackConfig, AttackResult};
use crate::rainbow::RainbowIndex;
use crate::strength::{self, StrengthReport};
use crate::stream::{self, BruteForceHandle};

#[derive(Clone)]
pub struct Engine {
    rainbow: Arc<RainbowIndex>,
    model: Arc<MarkovModel>,
    config: AttackConfig,
}

impl Engine {
    /// Builds the rainbow tables and trains the Markov model. Call once at
    /// startup; both structures are immutable afterwards.
    pub fn bootstrap() -> Self {
        Self::with_config(AttackConfig::default())
    }

    pub fn with_config(config: AttackConfig) -> Self {
        let rainbow = RainbowIndex::build();
        let model = MarkovModel::bootstrap();

        info!(
            rainbow_entries = rainbow.table_len(HashAlgorithm::Md5),
            contexts = model.context_count(),
            transitions = model.total_transitions(),
            vocabulary = model.vocabulary_size(),
            "engine bootstrapped"
        );

        Self {
            rainbow: Arc::new(rainbow),
            model: Arc::new(model),
            config,
        }
    }

    /// Classifies a hash string without attacking it.
    pub fn identify(&self, hash: &str) -> PicklockResult<HashInfo> {
        if hash.trim().is_empty() {
            return Err(PicklockError::InvalidInput);
        }
        Ok(identify::identify(hash))
    }

    /// Runs the full 7-phase pipeline against a hash. The algorithm is
    /// inferred from the hash format; formats without a crackable digest
    /// are rejected up front.
    pub fn crack(&self, hash: &str, user_words: &[String]) -> PicklockResult<AttackResult> {
        let info = self.identify(hash)?;
        let algorithm = info
            .algorithm
            .ok_or_else(|| PicklockError::UnsupportedAlgorithm(info.kind.name().to_owned()))?;

        Ok(orchestrator::run_full(
            &self.rainbow,
            &self.model,
            algorithm,
            &info.normalized,
            user_words,
            &self.config,
        ))
    }

    /// Runs the model-first 3-phase pipeline with a caller-supplied
    /// algorithm.
    pub fn ai_crack(
        &self,
        hash: &str,
        algorithm: HashAlgorithm,
        user_words: &[String],
    ) -> PicklockResult<AttackResult> {
        let normalized = normalize(hash)?;

        Ok(orchestrator::run_ai(
            &self.rainbow,
            &self.model,
            algorithm,
            &normalized,
            user_words,
            &self.config,
        ))
    }

    /// Scores a password's resistance without hashing anything.
    pub fn score(&self, password: &str) -> PicklockResult<StrengthReport> {
        if password.is_empty() {
            return Err(PicklockError::InvalidInput);
        }
        Ok(strength::score(password))
    }

    /// Starts a streaming brute-force run on a background thread.
    pub fn stream_brute_force(
        &self,
        hash: &str,
        algorithm: HashAlgorithm,
        max_length: usize,
    ) -> PicklockResult<BruteForceHandle> {
        let normalized = normalize(hash)?;
        Ok(stream::spawn_brute_force(normalized, algorithm, max_length))
    }

    /// The trained model, for callers that want raw scores or candidates.
    pub fn model(&self) -> &MarkovModel {
        &self.model
    }
}

fn normalize(hash: &str) -> PicklockResult<String> {
    let trimmed = hash.trim();
    if trimmed.is_empty() {
        return Err(PicklockError::InvalidInput);
    }
    Ok(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_engine() -> Engine {
        Engine::with_config(AttackConfig {
            deadline: Duration::from_secs(20),
            brute_force_ceiling: 3,
            markov_candidates: 300,
        })
    }

    #[test]
    fn cracks_a_known_password_end_to_end() {
        let engine = test_engine();
        let hash = HashAlgorithm::Md5.digest_hex("password");

        let result = engine.crack(&hash, &[]).unwrap();
        assert!(result.cracked);
        assert_eq!(result.password.as_deref(), Some("password"));
    }

    #[test]
    fn rejects_formats_without_a_crackable_digest() {
        let engine = test_engine();
        let error = engine
            .crack("$2b$12$C6UzMDM.H6dfI/f/IKcEeO7route0a2dWfXbVatD5Cq7U1nOLYzS2", &[])
            .unwrap_err();
        assert_eq!(error, PicklockError::UnsupportedAlgorithm("bcrypt".to_owned()));
    }

    #[test]
    fn rejects_empty_input_at_the_boundary() {
        let engine = test_engine();
        assert_eq!(engine.identify("  ").unwrap_err(), PicklockError::InvalidInput);
        assert_eq!(engine.crack("", &[]).unwrap_err(), PicklockError::InvalidInput);
        assert_eq!(engine.score("").unwrap_err(), PicklockError::InvalidInput);
        assert_eq!(
            engine
                .stream_brute_force("", HashAlgorithm::Md5, 3)
                .unwrap_err(),
            PicklockError::InvalidInput
        );
    }

    #[test]
    fn uppercase_hashes_are_normalized_before_matching() {
        let engine = test_engine();
        let hash = HashAlgorithm::Md5.digest_hex("password").to_uppercase();

        let result = engine.crack(&hash, &[]).unwrap();
        assert!(result.cracked);
    }

    #[test]
    fn clones_share_the_trained_tables() {
        let engine = test_engine();
        let clone = engine.clone();
        let hash = HashAlgorithm::Sha1.digest_hex("qwerty");

        assert!(engine.crack(&hash, &[]).unwrap().cracked);
        assert!(clone.crack(&hash, &[]).unwrap().cracked);
    }
}
