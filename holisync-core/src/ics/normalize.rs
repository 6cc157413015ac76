//! Normalization of imported VEVENTs into canonical events.

use std::fmt;

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::parser::{Component, read_calendar, unfold};
use icalendar::{CalendarDateTime, DatePerhapsTime};

use crate::constants::NO_TITLE;
use crate::error::{HolisyncError, HolisyncResult};
use crate::event::{Event, EventTime};

/// Why a record was dropped during import.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingStart,
    UnreadableStart(String),
    UnreadableEnd(String),
    /// A floating local time that falls into a DST gap.
    NonexistentLocalTime(NaiveDateTime),
    Invalid(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingStart => write!(f, "no DTSTART"),
            SkipReason::UnreadableStart(raw) => write!(f, "unreadable DTSTART '{}'", raw),
            SkipReason::UnreadableEnd(raw) => write!(f, "unreadable DTEND '{}'", raw),
            SkipReason::NonexistentLocalTime(dt) => {
                write!(f, "local time {} does not exist in the default timezone", dt)
            }
            SkipReason::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Event(Event),
    Skip(SkipReason),
}

/// The fields of a VEVENT the normalizer looks at.
#[derive(Debug, Clone, Default)]
pub struct RawVEvent {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub dtstart: Option<DatePerhapsTime>,
    pub dtend: Option<DatePerhapsTime>,
}

impl RawVEvent {
    /// Extract the fields from a parsed VEVENT component. A DTSTART or DTEND
    /// that is present but cannot be read is a skip, not an error.
    pub fn from_component(vevent: &Component<'_>) -> Result<Self, SkipReason> {
        let text = |name: &str| vevent.find_prop(name).map(|p| p.val.to_string());

        let dtstart = match vevent.find_prop("DTSTART") {
            Some(prop) => Some(
                DatePerhapsTime::try_from(prop)
                    .map_err(|_| SkipReason::UnreadableStart(prop.val.to_string()))?,
            ),
            None => None,
        };

        let dtend = match vevent.find_prop("DTEND") {
            Some(prop) => Some(
                DatePerhapsTime::try_from(prop)
                    .map_err(|_| SkipReason::UnreadableEnd(prop.val.to_string()))?,
            ),
            None => None,
        };

        Ok(RawVEvent {
            summary: text("SUMMARY"),
            description: text("DESCRIPTION"),
            location: text("LOCATION"),
            dtstart,
            dtend,
        })
    }
}

/// A skipped record and its position among the file's VEVENTs.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub index: usize,
    pub summary: Option<String>,
    pub reason: SkipReason,
}

/// Result of normalizing every VEVENT in a file.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub events: Vec<Event>,
    pub skipped: Vec<Skipped>,
}

impl ImportBatch {
    pub fn total(&self) -> usize {
        self.events.len() + self.skipped.len()
    }
}

/// Converts VEVENT records into canonical events.
///
/// Timed values without timezone information get `default_tz`, which the
/// caller chooses explicitly instead of reading process-global state.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    default_tz: Tz,
}

impl Normalizer {
    pub fn new(default_tz: Tz) -> Self {
        Normalizer { default_tz }
    }

    pub fn normalize(&self, raw: RawVEvent) -> Normalized {
        match self.try_normalize(raw) {
            Ok(event) => Normalized::Event(event),
            Err(reason) => Normalized::Skip(reason),
        }
    }

    fn try_normalize(&self, raw: RawVEvent) -> Result<Event, SkipReason> {
        let summary = raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let start = self.to_event_time(raw.dtstart.ok_or(SkipReason::MissingStart)?)?;

        // An end of the wrong kind, or one not after the start, is ignored
        let end = match raw.dtend.map(|end| self.to_event_time(end)).transpose()? {
            Some(end) if end.is_valid_end_for(&start) => end,
            Some(end) => {
                tracing::debug!(%summary, %start, %end, "ignoring unusable DTEND");
                start.default_end()
            }
            None => start.default_end(),
        };

        Event::new(summary, start, end)
            .map(|event| event.with_description(raw.description).with_location(raw.location))
            .map_err(|e| SkipReason::Invalid(e.to_string()))
    }

    fn to_event_time(&self, value: DatePerhapsTime) -> Result<EventTime, SkipReason> {
        match value {
            DatePerhapsTime::Date(d) => Ok(EventTime::Date(d)),
            DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
                Ok(EventTime::DateTime(dt.with_timezone(&Tz::UTC)))
            }
            DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
                localize(self.default_tz, naive)
            }
            DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
                match tzid.parse::<Tz>() {
                    Ok(tz) => localize(tz, date_time),
                    Err(_) => {
                        tracing::warn!(%tzid, default = %self.default_tz, "unknown TZID, using default timezone");
                        localize(self.default_tz, date_time)
                    }
                }
            }
        }
    }

    /// Normalize every VEVENT in an ICS document, nested ones included.
    ///
    /// Only a document that cannot be parsed at all is an error; individual
    /// records that fail end up in `skipped` and the rest carry on.
    pub fn normalize_calendar(&self, content: &str) -> HolisyncResult<ImportBatch> {
        let unfolded = unfold(content);
        let calendar =
            read_calendar(&unfolded).map_err(|e| HolisyncError::IcsParse(e.to_string()))?;

        let mut vevents = Vec::new();
        for component in &calendar.components {
            collect_vevents(component, &mut vevents);
        }

        let mut batch = ImportBatch::default();

        for (index, vevent) in vevents.into_iter().enumerate() {
            let summary = vevent.find_prop("SUMMARY").map(|p| p.val.to_string());
            let normalized = match RawVEvent::from_component(vevent) {
                Ok(raw) => self.normalize(raw),
                Err(reason) => Normalized::Skip(reason),
            };

            match normalized {
                Normalized::Event(event) => batch.events.push(event),
                Normalized::Skip(reason) => {
                    tracing::warn!(index, summary = ?summary, %reason, "skipping VEVENT");
                    batch.skipped.push(Skipped {
                        index,
                        summary,
                        reason,
                    });
                }
            }
        }

        Ok(batch)
    }
}

fn localize(tz: Tz, naive: NaiveDateTime) -> Result<EventTime, SkipReason> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(EventTime::DateTime)
        .ok_or(SkipReason::NonexistentLocalTime(naive))
}

fn collect_vevents<'c, 'a>(component: &'c Component<'a>, out: &mut Vec<&'c Component<'a>>) {
    if component.name == "VEVENT" {
        out.push(component);
    }
    for child in &component.components {
        collect_vevents(child, out);
    }
}
