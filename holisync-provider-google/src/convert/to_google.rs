use holisync_core::{Event, EventTime, Marker};

use super::OWNER_COLOR_ID;

pub fn to_google_event(event: &Event) -> google_calendar::types::Event {
    google_calendar::types::Event {
        summary: event.summary().to_string(),
        description: event.description().unwrap_or_default().to_string(),
        location: event.location().unwrap_or_default().to_string(),
        start: Some(event_time_to_google(event.start())),
        end: Some(event_time_to_google(event.end())),
        color_id: Marker::raw_for(event.owner_tag(), OWNER_COLOR_ID).unwrap_or_default(),
        ..Default::default()
    }
}

fn event_time_to_google(time: &EventTime) -> google_calendar::types::EventDateTime {
    match time {
        EventTime::Date(d) => google_calendar::types::EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventTime::DateTime(dt) => google_calendar::types::EventDateTime {
            date: None,
            date_time: Some(dt.with_timezone(&chrono::Utc)),
            time_zone: dt.timezone().name().to_string(),
        },
    }
}
