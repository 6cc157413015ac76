//! Reconciling desired events with a remote calendar.
//!
//! Two passes exist: create mode only inserts what is missing, cleanup mode
//! only deletes what fails the ownership check within a title set. Both
//! report an aggregate summary instead of failing on a single remote error.

mod cleanup;
mod create;
mod diff_kind;
mod engine;
mod summary;

pub use cleanup::{CleanupPlan, CleanupPolicy, CleanupScope, DeleteReason, Verdict};
pub use create::CreatePlan;
pub use diff_kind::DiffKind;
pub use engine::SyncEngine;
pub use summary::{OperationFailure, SyncSummary};
