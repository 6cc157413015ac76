use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use holisync_core::config::HolisyncConfig;
use holisync_core::event::StartKey;
use holisync_core::ics::Normalizer;
use holisync_core::Event;
use owo_colors::OwoColorize;

use crate::render::{self, Render};
use crate::utils::{timezone, tui};

pub async fn run(config: &HolisyncConfig, file: &Path, tz_flag: Option<&str>, dry_run: bool) -> Result<()> {
    let contents = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let default_tz = timezone::resolve(tz_flag, config.timezone.as_deref())?;
    tracing::debug!(timezone = %default_tz, "default timezone for floating times");

    let batch = Normalizer::new(default_tz).normalize_calendar(&contents)?;
    let total = batch.total();

    println!("{} ({} {})", file.display().to_string().bold(), total, if total == 1 { "event" } else { "events" });
    for event in &batch.events {
        println!("{}", event.render());
    }
    for skipped in &batch.skipped {
        println!("{}", skipped.render());
    }

    if dry_run {
        println!("\n{}", "Dry run, nothing imported".dimmed());
        return Ok(());
    }

    let Some(since) = earliest_start(&batch.events) else {
        println!("\nAdded 0 out of {} events", total);
        return Ok(());
    };

    let gateway = super::connect(config).await?;
    let engine = super::engine(&gateway, config);

    let spinner = tui::create_spinner(format!("📅 {}", engine.calendar_id()));
    let plan = engine.plan_create(batch.events, since).await;
    spinner.finish_and_clear();
    let plan = plan?;

    println!("\n📅 {}", engine.calendar_id());
    println!("{}", render::render_create_plan(&plan, true));

    let summary = engine.apply_create(&plan).await;
    println!("\n{}", summary.render());
    println!("Added {} out of {} events", summary.succeeded, total);

    Ok(())
}

/// Start of the listing window that covers every imported event.
fn earliest_start(events: &[Event]) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter_map(|event| match event.start().start_key() {
            StartKey::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
            StartKey::Instant(instant) => Some(instant),
        })
        .min()
}
