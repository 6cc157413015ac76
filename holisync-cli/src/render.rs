//! Colored terminal rendering for holisync types.

use holisync_core::ics::Skipped;
use holisync_core::sync::{CleanupPlan, CreatePlan, DiffKind, SyncSummary};
use holisync_core::Event;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        colorize(*self, self.symbol())
    }
}

fn colorize(kind: DiffKind, text: &str) -> String {
    match kind {
        DiffKind::Create => text.green().to_string(),
        DiffKind::Delete => text.red().to_string(),
    }
}

/// Show counts instead of individual events above this many
const COMPACT_THRESHOLD: usize = 10;

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "event" } else { "events" }
}

/// Lines for a create plan: one per event to insert, or a count.
pub fn render_create_plan(plan: &CreatePlan, verbose: bool) -> String {
    if plan.is_empty() {
        return "   Nothing to create".dimmed().to_string();
    }

    let kind = DiffKind::Create;
    let mut lines = Vec::new();

    if verbose || plan.to_create.len() <= COMPACT_THRESHOLD {
        for event in &plan.to_create {
            lines.push(format!(
                "   {} {} {}",
                kind.render(),
                colorize(kind, event.summary()),
                event.start().to_string().dimmed()
            ));
        }
    } else {
        let label = format!("({} new {})", plan.to_create.len(), pluralize(plan.to_create.len()));
        lines.push(format!("   {} {}", kind.render(), colorize(kind, &label)));
    }

    if !plan.present.is_empty() {
        let label = format!("{} already present", plan.present.len());
        lines.push(format!("   {}", label.dimmed()));
    }

    lines.join("\n")
}

/// Lines for the events cleanup would delete, with the reason for each.
pub fn render_cleanup_plan(plan: &CleanupPlan) -> String {
    if plan.is_empty() {
        return "   Nothing to delete".dimmed().to_string();
    }

    let kind = DiffKind::Delete;
    plan
        .to_delete
        .iter()
        .map(|(event, reason)| {
            format!(
                "   {} {} {} {}",
                kind.render(),
                colorize(kind, &event.title),
                event.start.to_string().dimmed(),
                format!("({})", reason).dimmed()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Import preview of one normalized event.
impl Render for Event {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "   {} {} {} {}",
            self.summary().bold(),
            self.start().to_string().dimmed(),
            "→".dimmed(),
            self.end().to_string().dimmed()
        )];

        if let Some(location) = self.location() {
            lines.push(format!("      {} {}", "location:".dimmed(), location));
        }
        if let Some(description) = self.description() {
            let first_line = description.lines().next().unwrap_or_default();
            lines.push(format!("      {} {}", "description:".dimmed(), first_line));
        }

        lines.join("\n")
    }
}

impl Render for Skipped {
    fn render(&self) -> String {
        let title = self.summary.as_deref().unwrap_or("(untitled)");
        format!(
            "   {} #{} {} {}",
            "skipped".yellow(),
            self.index + 1,
            title,
            format!("({})", self.reason).dimmed()
        )
    }
}

impl Render for SyncSummary {
    fn render(&self) -> String {
        let verb = self.kind.past_tense();
        let mut lines = vec![format!(
            "{}: {} {}, {} skipped, {} failed",
            capitalize(verb),
            self.succeeded,
            pluralize(self.succeeded),
            self.skipped,
            self.failed
        )];

        for failure in &self.failures {
            lines.push(format!(
                "   {} {} {} {}",
                "✗".red(),
                failure.title,
                failure.start.to_string().dimmed(),
                failure.error.red()
            ));
        }

        lines.join("\n")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
