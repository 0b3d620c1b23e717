use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use human_repr::{HumanDuration, HumanThroughput};
use picklock_core::AttackResult;

use crate::{build_engine, AiCrack, Crack};

pub fn crack(args: Crack) -> Result<()> {
    let engine = build_engine(&args.tuning);
    let result = engine.crack(&args.hash, &args.words)?;
    report(&result);
    Ok(())
}

pub fn ai_crack(args: AiCrack) -> Result<()> {
    let engine = build_engine(&args.tuning);
    let result = engine.ai_crack(&args.digest, args.algorithm.into(), &args.words)?;
    report(&result);
    Ok(())
}

fn report(result: &AttackResult) {
    if result.cracked {
        println!(
            "Password found: {}",
            result.password.as_deref().unwrap_or_default()
        );
        if let (Some(method), Some(origin)) = (result.method, result.origin.as_deref()) {
            println!("Found by the {method} phase ({origin})");
        }
    } else if result.time_limited {
        println!("No password found before the deadline");
    } else {
        println!("No password found, all phases exhausted");
    }

    println!(
        "{} attempts in {} ({})",
        result.attempts,
        result.elapsed.as_secs_f64().human_duration(),
        result.throughput().human_throughput("hash"),
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Phase", "Attempts", "Elapsed", "Outcome"]);

    for record in &result.phases {
        let outcome = if record.success {
            record.candidate.clone().unwrap_or_default()
        } else {
            "-".to_owned()
        };
        table.add_row(vec![
            record.phase.to_owned(),
            record.attempts.to_string(),
            record.elapsed.as_secs_f64().human_duration().to_string(),
            outcome,
        ]);
    }

    println!("{table}");
}
