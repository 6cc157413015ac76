//! ICS file generation.

use chrono::Utc;
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarDateTime, Component, DatePerhapsTime, EventLike};

use crate::error::HolisyncResult;
use crate::event::{Event, EventTime};

/// Generate one VCALENDAR holding a VEVENT per event.
pub fn generate_ics(events: &[Event]) -> HolisyncResult<String> {
    let mut cal = Calendar::new();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event_uid(event));
        ics_event.summary(event.summary());
        ics_event.starts(to_date_perhaps_time(event.start()));
        ics_event.ends(to_date_perhaps_time(event.end()));

        if let Some(desc) = event.description() {
            ics_event.description(desc);
        }

        if let Some(loc) = event.location() {
            ics_event.location(loc);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Stable UID for an event: slugged title plus start, so regenerating the
/// same year range produces the same file.
pub fn event_uid(event: &Event) -> String {
    let start = match event.start() {
        EventTime::Date(d) => d.format("%Y%m%d").to_string(),
        EventTime::DateTime(dt) => dt.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string(),
    };
    format!("{}-{}@holisync", slug::slugify(event.summary()), start)
}

fn to_date_perhaps_time(time: &EventTime) -> DatePerhapsTime {
    match time {
        EventTime::Date(d) => DatePerhapsTime::Date(*d),
        EventTime::DateTime(dt) if dt.timezone() == Tz::UTC => {
            CalendarDateTime::Utc(dt.with_timezone(&Utc)).into()
        }
        EventTime::DateTime(dt) => CalendarDateTime::WithTimezone {
            date_time: dt.naive_local(),
            tzid: dt.timezone().name().to_string(),
        }
        .into(),
    }
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with HOLISYNC
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:HOLISYNC\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
