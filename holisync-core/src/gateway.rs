//! Boundary to the remote calendar service.
//!
//! The sync engine only ever talks to a `RemoteCalendarGateway`. Gateways
//! translate between the remote schema and `RemoteEvent`/`Event`, including
//! the mapping of `OwnerTag` onto whatever reserved field the service offers.

use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_MAX_RESULTS;
use crate::error::HolisyncResult;
use crate::event::{Event, RemoteEvent};

/// Parameters for listing a calendar.
///
/// Listings contain expanded single instances only, ordered by start.
/// `max_results` is the number of events fetched per request; a gateway
/// pages until the listing is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub max_results: u32,
    pub single_events: bool,
}

impl ListQuery {
    pub fn new(calendar_id: impl Into<String>, time_min: DateTime<Utc>) -> Self {
        ListQuery {
            calendar_id: calendar_id.into(),
            time_min,
            max_results: DEFAULT_MAX_RESULTS,
            single_events: true,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

/// List/insert/delete against a calendar service.
///
/// `list` returns every matching event or an error, never a partial
/// listing. A gateway that cannot page to the end fails the call.
///
/// Calls are awaited one at a time; the engine assumes it is the only writer
/// to the calendar for the duration of a run.
#[allow(async_fn_in_trait)]
pub trait RemoteCalendarGateway {
    async fn list(&self, query: &ListQuery) -> HolisyncResult<Vec<RemoteEvent>>;

    /// Persist `event` and return it as the service now stores it.
    async fn insert(&self, calendar_id: &str, event: &Event) -> HolisyncResult<RemoteEvent>;

    async fn delete(&self, calendar_id: &str, event_id: &str) -> HolisyncResult<()>;
}
