//! Canonical event types.
//!
//! `Event` is what the resolver and the ICS normalizer produce and what the
//! sync engine wants to exist remotely. `RemoteEvent` is the reduced view a
//! gateway hands back when listing a calendar.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{HolisyncError, HolisyncResult};
use crate::owner_tag::{Marker, OwnerTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Timed,
    AllDay,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Timed => write!(f, "timed"),
            EventKind::AllDay => write!(f, "all-day"),
        }
    }
}

/// Start or end of an event. All-day values carry no time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<Tz>),
}

impl EventTime {
    pub fn kind(&self) -> EventKind {
        match self {
            EventTime::Date(_) => EventKind::AllDay,
            EventTime::DateTime(_) => EventKind::Timed,
        }
    }

    /// Calendar date of this value, in its own timezone for timed values.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTime(dt) => dt.date_naive(),
        }
    }

    /// Key used to compare a desired start with a remote one.
    pub fn start_key(&self) -> StartKey {
        match self {
            EventTime::Date(d) => StartKey::Date(*d),
            EventTime::DateTime(dt) => StartKey::Instant(dt.with_timezone(&Utc)),
        }
    }

    /// Whether this value lies at or after `since`.
    ///
    /// All-day values compare by UTC calendar date so that today's all-day
    /// events are still inside a window that starts now.
    pub fn is_at_or_after(&self, since: DateTime<Utc>) -> bool {
        match self {
            EventTime::Date(d) => *d >= since.date_naive(),
            EventTime::DateTime(dt) => dt.with_timezone(&Utc) >= since,
        }
    }

    /// The default end for an event starting here: one hour later for timed
    /// events, the next day (exclusive) for all-day events.
    pub fn default_end(&self) -> EventTime {
        match self {
            EventTime::Date(d) => EventTime::Date(*d + Duration::days(1)),
            EventTime::DateTime(dt) => EventTime::DateTime(*dt + Duration::hours(1)),
        }
    }

    /// Whether `self` is a valid end for an event starting at `start`.
    pub fn is_valid_end_for(&self, start: &EventTime) -> bool {
        match (start, self) {
            (EventTime::Date(s), EventTime::Date(e)) => *e >= *s + Duration::days(1),
            (EventTime::DateTime(s), EventTime::DateTime(e)) => e > s,
            _ => false,
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StartKey {
    Date(NaiveDate),
    Instant(DateTime<Utc>),
}

/// Semantic identity of an event for presence checks: title plus start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub title: String,
    pub start: StartKey,
}

/// A canonical calendar event. Fields are fixed once constructed; the
/// `with_*` methods return a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    summary: String,
    description: Option<String>,
    location: Option<String>,
    start: EventTime,
    end: EventTime,
    owner_tag: Option<OwnerTag>,
}

impl Event {
    /// Build an event, checking that the title is non-empty, that start and
    /// end are the same kind, and that the end lies after the start (at least
    /// one day after for all-day events).
    pub fn new(summary: impl Into<String>, start: EventTime, end: EventTime) -> HolisyncResult<Self> {
        let summary = summary.into();

        if summary.trim().is_empty() {
            return Err(HolisyncError::InvalidEvent("title must not be empty".into()));
        }

        if start.kind() != end.kind() {
            return Err(HolisyncError::InvalidEvent(format!(
                "'{}' starts {} but ends {}",
                summary,
                start.kind(),
                end.kind()
            )));
        }

        if !end.is_valid_end_for(&start) {
            return Err(HolisyncError::InvalidEvent(format!(
                "'{}' ends at {} which is not after its start {}",
                summary, end, start
            )));
        }

        Ok(Event {
            summary,
            description: None,
            location: None,
            start,
            end,
            owner_tag: None,
        })
    }

    /// A single-day all-day event (end is the following day, exclusive).
    pub fn all_day(summary: impl Into<String>, date: NaiveDate) -> HolisyncResult<Self> {
        let start = EventTime::Date(date);
        let end = start.default_end();
        Event::new(summary, start, end)
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.is_empty());
        self
    }

    pub(crate) fn with_owner_tag(mut self, tag: OwnerTag) -> Self {
        self.owner_tag = Some(tag);
        self
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn start(&self) -> &EventTime {
        &self.start
    }

    pub fn end(&self) -> &EventTime {
        &self.end
    }

    pub fn kind(&self) -> EventKind {
        self.start.kind()
    }

    pub fn owner_tag(&self) -> Option<OwnerTag> {
        self.owner_tag
    }

    pub fn is_tagged(&self) -> bool {
        self.owner_tag.is_some()
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            title: self.summary.clone(),
            start: self.start.start_key(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

/// Reduced view of an event as listed by a gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvent {
    pub remote_id: String,
    pub title: String,
    pub marker: Marker,
    pub start: EventTime,
    pub end: EventTime,
}

impl RemoteEvent {
    pub fn key(&self) -> EventKey {
        EventKey {
            title: self.title.clone(),
            start: self.start.start_key(),
        }
    }

    pub fn is_tagged(&self) -> bool {
        OwnerTag::is_tagged(self)
    }
}

impl fmt::Display for RemoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.title, self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_all_day_event_ends_next_day() {
        let event = Event::all_day("Mother's Day", date(2025, 5, 11)).unwrap();

        assert_eq!(event.kind(), EventKind::AllDay);
        assert_eq!(event.end(), &EventTime::Date(date(2025, 5, 12)));
        assert!(!event.is_tagged());
    }

    #[test]
    fn test_rejects_empty_title() {
        let result = Event::all_day("   ", date(2025, 5, 11));
        assert!(matches!(result, Err(HolisyncError::InvalidEvent(_))));
    }

    #[test]
    fn test_rejects_mixed_kinds() {
        let start = EventTime::Date(date(2025, 5, 11));
        let end = EventTime::DateTime(Tz::UTC.with_ymd_and_hms(2025, 5, 12, 0, 0, 0).unwrap());
        assert!(Event::new("Mixed", start, end).is_err());
    }

    #[test]
    fn test_rejects_timed_end_not_after_start() {
        let at = Tz::Europe__Berlin.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let result = Event::new("Zero", EventTime::DateTime(at), EventTime::DateTime(at));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_all_day_end_equal_to_start() {
        let d = EventTime::Date(date(2025, 5, 11));
        assert!(Event::new("Same day", d.clone(), d).is_err());
    }

    #[test]
    fn test_timed_key_compares_instants_across_timezones() {
        let berlin = Tz::Europe__Berlin.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap();
        let utc = Tz::UTC.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();

        assert_eq!(
            EventTime::DateTime(berlin).start_key(),
            EventTime::DateTime(utc).start_key()
        );
    }

    #[test]
    fn test_all_day_window_includes_today() {
        let since = Utc.with_ymd_and_hms(2025, 5, 11, 9, 30, 0).unwrap();

        assert!(EventTime::Date(date(2025, 5, 11)).is_at_or_after(since));
        assert!(!EventTime::Date(date(2025, 5, 10)).is_at_or_after(since));
    }

    #[test]
    fn test_empty_description_is_dropped() {
        let event = Event::all_day("Father's Day", date(2025, 6, 15))
            .unwrap()
            .with_description(Some(String::new()))
            .with_location(Some("Home".into()));

        assert_eq!(event.description(), None);
        assert_eq!(event.location(), Some("Home"));
    }
}
