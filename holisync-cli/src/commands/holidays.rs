use anyhow::Result;
use chrono::{TimeZone, Utc};
use holisync_core::config::HolisyncConfig;
use holisync_core::holiday;
use holisync_core::OwnerTag;
use owo_colors::OwoColorize;

use crate::render::{self, Render};
use crate::utils::tui;

pub async fn run(config: &HolisyncConfig, dry_run: bool, verbose: bool) -> Result<()> {
    let desired = OwnerTag::tag_all(holiday::expand(&config.holidays, config.years())?);

    let gateway = super::connect(config).await?;
    let engine = super::engine(&gateway, config);

    let since = Utc
        .with_ymd_and_hms(config.start_year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Invalid start_year {}", config.start_year))?;

    let spinner = tui::create_spinner(format!("📅 {}", engine.calendar_id()));
    let plan = engine.plan_create(desired, since).await;
    spinner.finish_and_clear();
    let plan = plan?;

    println!("📅 {}", engine.calendar_id());
    println!("{}", render::render_create_plan(&plan, verbose));

    if dry_run {
        println!("\n{}", "Dry run, nothing changed".dimmed());
        return Ok(());
    }

    let summary = engine.apply_create(&plan).await;
    println!("\n{}", summary.render());

    Ok(())
}
