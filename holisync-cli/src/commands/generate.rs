use std::path::PathBuf;

use anyhow::{Context, Result};
use holisync_core::config::HolisyncConfig;
use holisync_core::holiday;
use holisync_core::ics::generate_ics;
use owo_colors::OwoColorize;

pub fn run(config: &HolisyncConfig, output: Option<PathBuf>) -> Result<()> {
    let events = holiday::expand(&config.holidays, config.years())?;
    let contents = generate_ics(&events)?;

    let path = output.unwrap_or_else(|| config.output_path());
    std::fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Wrote {} holidays ({}–{}) to {}",
        events.len(),
        config.start_year,
        config.end_year,
        path.display().to_string().bold()
    );

    Ok(())
}
