mod brute;
mod crack;
mod identify;
mod strength;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use picklock_core::{AttackConfig, Engine, HashAlgorithm};
use tracing::Level;

use brute::brute;
use crack::{ai_crack, crack};
use identify::identify;
use strength::strength;

/// All the digest algorithms that can be attacked.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum AlgorithmArg {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Md5 => HashAlgorithm::Md5,
            AlgorithmArg::Sha1 => HashAlgorithm::Sha1,
            AlgorithmArg::Sha224 => HashAlgorithm::Sha224,
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
            AlgorithmArg::Sha384 => HashAlgorithm::Sha384,
            AlgorithmArg::Sha512 => HashAlgorithm::Sha512,
        }
    }
}

/// Password-cracking toolkit with hash identification, multi-phase attacks
/// and strength scoring.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Print per-phase progress while running.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    Identify(Identify),
    Crack(Crack),
    AiCrack(AiCrack),
    Strength(Strength),
    Brute(Brute),
}

/// Identify the algorithm behind a hash string.
#[derive(Args)]
pub struct Identify {
    /// The hash to classify.
    hash: String,
}

/// Run the full 7-phase attack pipeline against a hash.
#[derive(Args)]
pub struct Crack {
    /// The hash to attack. The algorithm is inferred from its format.
    hash: String,

    /// Extra words to seed the dictionary, rule and combination phases.
    #[arg(short, long = "word")]
    words: Vec<String>,

    #[command(flatten)]
    tuning: Tuning,
}

/// Run the Markov-first 3-phase pipeline against a digest.
#[derive(Args)]
pub struct AiCrack {
    /// The digest to attack, in hexadecimal.
    #[arg(value_parser = check_hex)]
    digest: String,

    /// The algorithm that produced the digest.
    algorithm: AlgorithmArg,

    /// Extra words for model-guided extension.
    #[arg(short, long = "word")]
    words: Vec<String>,

    #[command(flatten)]
    tuning: Tuning,
}

/// Score a password's resistance to cracking.
#[derive(Args)]
pub struct Strength {
    /// The password to score.
    password: String,
}

/// Brute force a digest, streaming progress.
#[derive(Args)]
pub struct Brute {
    /// The digest to attack, in hexadecimal.
    #[arg(value_parser = check_hex)]
    digest: String,

    /// The algorithm that produced the digest.
    algorithm: AlgorithmArg,

    /// The longest candidate to try.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=8), default_value_t = 4)]
    max_length: u8,
}

/// Attack tunables shared by both pipelines.
#[derive(Args)]
pub struct Tuning {
    /// Wall-clock budget in seconds.
    #[arg(short, long, default_value_t = 30)]
    deadline: u64,

    /// Longest candidate tried by the incremental brute-force phase.
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=6), default_value_t = 4)]
    brute_force_ceiling: u8,

    /// Beam-search candidates requested from the Markov model.
    #[arg(short = 'n', long, default_value_t = 5_000)]
    markov_candidates: usize,
}

impl From<&Tuning> for AttackConfig {
    fn from(tuning: &Tuning) -> Self {
        Self {
            deadline: Duration::from_secs(tuning.deadline),
            brute_force_ceiling: tuning.brute_force_ceiling as usize,
            markov_candidates: tuning.markov_candidates,
        }
    }
}

/// Checks if the digest is valid hexadecimal.
fn check_hex(hex: &str) -> Result<String> {
    hex::decode(hex).context("The digest is not valid hexadecimal")?;
    Ok(hex.to_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.commands {
        Commands::Identify(args) => identify(args)?,
        Commands::Crack(args) => crack(args)?,
        Commands::AiCrack(args) => ai_crack(args)?,
        Commands::Strength(args) => strength(args)?,
        Commands::Brute(args) => brute(args)?,
    }

    Ok(())
}

/// Helper building an engine with the given tunables. Bootstrapping trains
/// the Markov model and hashes the rainbow dictionary, so it takes a
/// moment.
fn build_engine(tuning: &Tuning) -> Engine {
    Engine::with_config(tuning.into())
}
