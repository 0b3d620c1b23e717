use anyhow::Result;
use human_repr::HumanCount;
use picklock_core::{BruteForceEvent, Engine};

use crate::Brute;

pub fn brute(args: Brute) -> Result<()> {
    let engine = Engine::bootstrap();
    let handle =
        engine.stream_brute_force(&args.digest, args.algorithm.into(), args.max_length as usize)?;

    while let Some(event) = handle.recv() {
        match event {
            BruteForceEvent::Progress {
                attempts,
                current_length,
            } => {
                eprintln!(
                    "{} candidates tried, now at length {current_length}",
                    attempts.human_count_bare()
                );
            }
            BruteForceEvent::Cracked { password, attempts } => {
                println!("Password found after {attempts} attempts: {password}");
                break;
            }
            BruteForceEvent::Exhausted { attempts } => {
                println!("Search space exhausted after {attempts} attempts, no match");
                break;
            }
        }
    }

    Ok(())
}
