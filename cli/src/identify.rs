use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use picklock_core::identify;

use crate::Identify;

pub fn identify(args: Identify) -> Result<()> {
    if args.hash.trim().is_empty() {
        bail!("The hash to identify cannot be empty");
    }

    let info = identify::identify(&args.hash);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Kind", info.kind.name()]);
    table.add_row(vec![
        "Algorithm",
        info.algorithm.map(|a| a.name()).unwrap_or("not crackable"),
    ]);
    table.add_row(vec!["Strength", info.strength]);
    table.add_row(vec!["Length".to_owned(), info.length.to_string()]);

    println!("{table}");

    if info.algorithm.is_none() {
        eprintln!("This format cannot be attacked by the crack subcommands");
    }

    Ok(())
}
