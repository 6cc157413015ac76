//! Create and cleanup passes against a remote calendar.

use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_CALENDAR_ID, DEFAULT_MAX_RESULTS};
use crate::error::HolisyncResult;
use crate::event::{Event, RemoteEvent};
use crate::gateway::{ListQuery, RemoteCalendarGateway};
use crate::sync::{CleanupPlan, CleanupScope, CreatePlan, DiffKind, SyncSummary};

/// Drives create and cleanup passes against one calendar.
///
/// Each pass is planned from a complete listing, then applied. A failed
/// listing aborts the pass with an error. Individual insert or delete
/// failures are recorded in the summary and the pass carries on.
pub struct SyncEngine<'a, G: RemoteCalendarGateway> {
    gateway: &'a G,
    calendar_id: String,
    max_results: u32,
}

impl<'a, G: RemoteCalendarGateway> SyncEngine<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        SyncEngine {
            gateway,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Events fetched per listing request.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Every remote event ending at or after `since`.
    pub async fn list(&self, since: DateTime<Utc>) -> HolisyncResult<Vec<RemoteEvent>> {
        let query = ListQuery::new(&self.calendar_id, since).with_max_results(self.max_results);
        let events = self.gateway.list(&query).await?;

        tracing::debug!(calendar = %self.calendar_id, count = events.len(), "listed remote events");

        Ok(events)
    }

    /// List from `since` and split `desired` into missing and present events.
    pub async fn plan_create(&self, desired: Vec<Event>, since: DateTime<Utc>) -> HolisyncResult<CreatePlan> {
        let remote = self.list(since).await?;
        Ok(CreatePlan::new(desired, &remote))
    }

    /// Plan, then insert every desired event not already there.
    pub async fn create(&self, desired: Vec<Event>, since: DateTime<Utc>) -> HolisyncResult<SyncSummary> {
        let plan = self.plan_create(desired, since).await?;
        Ok(self.apply_create(&plan).await)
    }

    pub async fn apply_create(&self, plan: &CreatePlan) -> SyncSummary {
        let mut summary = SyncSummary::new(DiffKind::Create);
        summary.skipped = plan.present.len();

        for event in &plan.to_create {
            match self.gateway.insert(&self.calendar_id, event).await {
                Ok(created) => {
                    tracing::info!(title = %created.title, start = %created.start, "created");
                    summary.record_success(created);
                }
                Err(e) => {
                    tracing::warn!(title = %event.summary(), start = %event.start(), error = %e, "create failed");
                    summary.record_failure(event.summary(), event.start(), e.to_string());
                }
            }
        }

        summary
    }

    /// List from the scope's start and classify every event against it.
    pub async fn plan_cleanup(&self, scope: &CleanupScope) -> HolisyncResult<CleanupPlan> {
        let remote = self.list(scope.since()).await?;
        Ok(CleanupPlan::new(scope, remote))
    }

    /// Plan, then delete every in-scope event that fails the ownership check.
    pub async fn cleanup(&self, scope: &CleanupScope) -> HolisyncResult<SyncSummary> {
        let plan = self.plan_cleanup(scope).await?;
        Ok(self.apply_cleanup(&plan).await)
    }

    pub async fn apply_cleanup(&self, plan: &CleanupPlan) -> SyncSummary {
        let mut summary = SyncSummary::new(DiffKind::Delete);
        summary.skipped = plan.kept;

        for (event, _) in &plan.to_delete {
            match self.gateway.delete(&self.calendar_id, &event.remote_id).await {
                Ok(()) => {
                    tracing::info!(title = %event.title, start = %event.start, "deleted");
                    summary.record_success(event.clone());
                }
                Err(e) => {
                    tracing::warn!(title = %event.title, start = %event.start, error = %e, "delete failed");
                    summary.record_failure(&event.title, &event.start, e.to_string());
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use crate::gateway::testing::MemoryGateway;
    use crate::holiday::{self, HolidaySpec};
    use crate::owner_tag::{Marker, OwnerTag};
    use chrono::{NaiveDate, TimeZone};

    fn start_of(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
    }

    fn remote(id: &str, title: &str, y: i32, m: u32, d: u32, marker: Marker) -> RemoteEvent {
        let d = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        RemoteEvent {
            remote_id: id.into(),
            title: title.into(),
            marker,
            start: EventTime::Date(d),
            end: EventTime::Date(d.succ_opt().unwrap()),
        }
    }

    fn holidays_2025() -> Vec<Event> {
        OwnerTag::tag_all(holiday::expand(&HolidaySpec::defaults(), 2025..=2025).unwrap())
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let gateway = MemoryGateway::default();
        let engine = SyncEngine::new(&gateway);

        let first = engine.create(holidays_2025(), start_of(2025)).await.unwrap();
        assert_eq!((first.attempted, first.succeeded, first.failed), (2, 2, 0));
        assert!(first.applied.iter().all(|e| e.marker == Marker::Owner));

        let second = engine.create(holidays_2025(), start_of(2025)).await.unwrap();
        assert!(second.is_noop());
        assert_eq!(second.skipped, 2);
        assert_eq!(*gateway.inserts.borrow(), 2);
    }

    #[tokio::test]
    async fn test_create_counts_failures_and_continues() {
        let gateway = MemoryGateway::default().failing_on("Mother's Day");
        let engine = SyncEngine::new(&gateway);

        let summary = engine.create(holidays_2025(), start_of(2025)).await.unwrap();

        assert_eq!((summary.attempted, summary.succeeded, summary.failed), (2, 1, 1));
        assert_eq!(summary.failures[0].title, "Mother's Day");
        assert_eq!(gateway.titles(), vec!["Father's Day".to_string()]);
    }

    #[tokio::test]
    async fn test_list_failure_aborts_pass() {
        let gateway = MemoryGateway::default().failing_list();
        let engine = SyncEngine::new(&gateway);

        assert!(engine.create(holidays_2025(), start_of(2025)).await.is_err());
        assert_eq!(*gateway.inserts.borrow(), 0);
    }

    fn foreign_january() -> Vec<RemoteEvent> {
        (1..=3)
            .map(|d| remote(&format!("f{}", d), "Standup", 2025, 1, d, Marker::Other("9".into())))
            .collect()
    }

    #[tokio::test]
    async fn test_create_is_idempotent_when_listing_spans_pages() {
        let gateway = MemoryGateway::with_events(foreign_january());
        let engine = SyncEngine::new(&gateway).with_max_results(3);

        let first = engine.create(holidays_2025(), start_of(2025)).await.unwrap();
        assert_eq!(first.succeeded, 2);

        let second = engine.create(holidays_2025(), start_of(2025)).await.unwrap();
        assert_eq!(second.succeeded, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(gateway.events.borrow().len(), 5);
        assert_eq!(*gateway.pages_served.borrow(), 1 + 2);
    }

    #[tokio::test]
    async fn test_incomplete_listing_refuses_to_plan() {
        let mut events = foreign_january();
        events.push(remote("m", "Mother's Day", 2025, 5, 11, Marker::Owner));
        events.push(remote("f", "Father's Day", 2025, 6, 15, Marker::Owner));
        let gateway = MemoryGateway::with_events(events).stopping_after_pages(1);
        let engine = SyncEngine::new(&gateway).with_max_results(3);

        assert!(engine.plan_create(holidays_2025(), start_of(2025)).await.is_err());
        assert!(engine.create(holidays_2025(), start_of(2025)).await.is_err());
        assert_eq!(*gateway.inserts.borrow(), 0);
    }

    #[tokio::test]
    async fn test_plan_create_does_not_mutate() {
        let gateway = MemoryGateway::default();
        let engine = SyncEngine::new(&gateway);

        let plan = engine.plan_create(holidays_2025(), start_of(2025)).await.unwrap();

        assert_eq!(plan.to_create.len(), 2);
        assert_eq!(*gateway.inserts.borrow(), 0);

        let summary = engine.apply_create(&plan).await;
        assert_eq!(summary.succeeded, 2);
    }

    #[tokio::test]
    async fn test_cleanup_deletes_only_mismatched_in_scope() {
        let gateway = MemoryGateway::with_events(vec![
            remote("a", "Mother's Day", 2025, 5, 11, Marker::Owner),
            remote("b", "Mother's Day", 2025, 5, 11, Marker::Absent),
            remote("c", "Mother's Day", 2025, 5, 11, Marker::Other("2".into())),
            remote("d", "Unrelated", 2025, 5, 11, Marker::Other("2".into())),
        ]);
        let engine = SyncEngine::new(&gateway);
        let scope = CleanupScope::new(["Mother's Day", "Father's Day"], start_of(2025));

        let summary = engine.cleanup(&scope).await.unwrap();

        assert_eq!((summary.attempted, summary.succeeded, summary.failed), (2, 2, 0));
        assert_eq!(summary.skipped, 1);
        assert_eq!(*gateway.deletes.borrow(), vec!["b".to_string(), "c".to_string()]);
        assert_eq!(gateway.events.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_cleanup_ignores_events_before_window() {
        let gateway = MemoryGateway::with_events(vec![remote("old", "Father's Day", 2024, 6, 16, Marker::Absent)]);
        let engine = SyncEngine::new(&gateway);
        let scope = CleanupScope::new(["Father's Day"], start_of(2025));

        let plan = engine.plan_cleanup(&scope).await.unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.kept, 0);

        let summary = engine.cleanup(&scope).await.unwrap();

        assert!(summary.is_noop());
        assert!(gateway.deletes.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_delete_failure_is_counted() {
        let gateway = MemoryGateway::with_events(vec![
            remote("x", "Father's Day", 2025, 6, 15, Marker::Absent),
            remote("y", "Mother's Day", 2025, 5, 11, Marker::Absent),
        ])
        .failing_on("Father's Day");
        let engine = SyncEngine::new(&gateway);
        let scope = CleanupScope::new(["Mother's Day", "Father's Day"], start_of(2025));

        let summary = engine.cleanup(&scope).await.unwrap();

        assert_eq!((summary.attempted, summary.succeeded, summary.failed), (2, 1, 1));
        assert!(summary.has_failures());
    }

    #[tokio::test]
    async fn test_cleanup_with_schedule_validity() {
        let specs = HolidaySpec::defaults();
        let gateway = MemoryGateway::with_events(vec![
            remote("ok", "Mother's Day", 2025, 5, 11, Marker::Owner),
            remote("bad", "Mother's Day", 2025, 5, 18, Marker::Owner),
        ]);
        let engine = SyncEngine::new(&gateway);
        let scope = CleanupScope::new(["Mother's Day"], start_of(2025))
            .with_validity(move |e| holiday::is_on_schedule(&specs, e));

        let summary = engine.cleanup(&scope).await.unwrap();

        assert_eq!(*gateway.deletes.borrow(), vec!["bad".to_string()]);
        assert_eq!(summary.skipped, 1);
    }
}
