use anyhow::Result;
use chrono::Utc;
use holisync_core::config::HolisyncConfig;
use holisync_core::holiday;
use holisync_core::sync::{CleanupPolicy, CleanupScope};
use owo_colors::OwoColorize;

use crate::render::{self, Render};
use crate::utils::tui;

pub struct CleanupOptions {
    pub misdated: bool,
    pub keep_untagged: bool,
    pub dry_run: bool,
}

pub async fn run(config: &HolisyncConfig, options: CleanupOptions) -> Result<()> {
    let policy = if options.keep_untagged {
        CleanupPolicy::ForeignMarkerOnly
    } else {
        config.cleanup_policy
    };

    let mut scope = CleanupScope::new(config.holiday_titles(), Utc::now()).with_policy(policy);
    if options.misdated {
        let specs = config.holidays.clone();
        scope = scope.with_validity(move |event| holiday::is_on_schedule(&specs, event));
    }
    tracing::debug!(?scope, "cleanup scope");

    let gateway = super::connect(config).await?;
    let engine = super::engine(&gateway, config);

    let spinner = tui::create_spinner(format!("📅 {}", engine.calendar_id()));
    let plan = engine.plan_cleanup(&scope).await;
    spinner.finish_and_clear();
    let plan = plan?;

    println!("📅 {}", engine.calendar_id());
    println!("{}", render::render_cleanup_plan(&plan));
    let kept = plan.kept;
    if kept > 0 {
        println!("   {}", format!("{} owned {} kept", kept, if kept == 1 { "event" } else { "events" }).dimmed());
    }

    if options.dry_run {
        println!("\n{}", "Dry run, nothing deleted".dimmed());
        return Ok(());
    }

    let summary = engine.apply_cleanup(&plan).await;
    println!("\n{}", summary.render());

    Ok(())
}
