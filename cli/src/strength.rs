use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use picklock_core::strength::score;

use crate::Strength;

pub fn strength(args: Strength) -> Result<()> {
    if args.password.is_empty() {
        bail!("The password to score cannot be empty");
    }

    let report = score(&args.password);

    println!(
        "Score: {}/100 ({})",
        report.score,
        report.rating.name()
    );
    println!(
        "Entropy: {:.1} bits over a charset of {} characters",
        report.entropy_bits, report.charset_size
    );

    if report.weaknesses.is_empty() {
        println!("No structural weaknesses detected");
    } else {
        println!("Weaknesses:");
        for weakness in &report.weaknesses {
            println!("  - {}", weakness.describe());
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Attacker", "Time to exhaust search space"]);
    for estimate in &report.crack_times {
        table.add_row(vec![estimate.attacker.to_owned(), estimate.display.clone()]);
    }
    println!("{table}");

    Ok(())
}
