//! Per-run outcome counts.

use crate::event::{EventTime, RemoteEvent};
use crate::sync::DiffKind;

/// A single create or delete the gateway refused.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationFailure {
    pub title: String,
    pub start: EventTime,
    pub error: String,
}

/// Aggregate result of one sync pass.
///
/// `skipped` counts desired events already present (create mode) or
/// in-scope events that passed the ownership check (cleanup mode).
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    pub kind: DiffKind,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Remote events created or deleted, in the order applied.
    pub applied: Vec<RemoteEvent>,
    pub failures: Vec<OperationFailure>,
}

impl SyncSummary {
    pub fn new(kind: DiffKind) -> Self {
        SyncSummary {
            kind,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            applied: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn record_success(&mut self, event: RemoteEvent) {
        self.attempted += 1;
        self.succeeded += 1;
        self.applied.push(event);
    }

    pub(crate) fn record_failure(&mut self, title: &str, start: &EventTime, error: String) {
        self.attempted += 1;
        self.failed += 1;
        self.failures.push(OperationFailure {
            title: title.to_string(),
            start: start.clone(),
            error,
        });
    }

    pub fn is_noop(&self) -> bool {
        self.attempted == 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
