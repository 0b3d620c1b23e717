//! Password-cracking and candidate-generation engine.
//!
//! The [`Engine`] facade owns the state built at bootstrap (rainbow tables
//! and the trained Markov model) and exposes the five entry points:
//! identify, crack, ai-crack, strength scoring and streaming brute force.

pub mod engine;
pub mod error;
pub mod hash;
pub mod identify;
pub mod lexicon;
pub mod markov;
pub mod orchestrator;
pub mod rainbow;
pub mod rules;
pub mod strength;
pub mod stream;

pub use engine::Engine;
pub use error::{PicklockError, PicklockResult};
pub use hash::HashAlgorithm;
pub use identify::{HashInfo, HashKind};
pub use markov::{GeneratorConfig, MarkovModel, PasswordScore};
pub use orchestrator::{AttackConfig, AttackResult, PhaseRecord};
pub use rainbow::RainbowIndex;
pub use strength::{StrengthReport, Weakness};
pub use stream::{BruteForceEvent, BruteForceHandle};
