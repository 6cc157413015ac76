use anyhow::{Result, bail};
use chrono_tz::Tz;
use holisync_core::{EventTime, Marker, RemoteEvent};

use super::OWNER_COLOR_ID;

pub fn from_google_event(event: google_calendar::types::Event) -> Result<RemoteEvent> {
    if event.id.is_empty() {
        bail!("Event has no id");
    }

    let Some(start) = event.start.as_ref().and_then(event_time_from_google) else {
        bail!("Event {} has no start time", event.id);
    };
    // Google always sends an end, but fall back rather than drop the event
    let end = event
        .end
        .as_ref()
        .and_then(event_time_from_google)
        .unwrap_or_else(|| start.default_end());

    let marker = Marker::from_raw(Some(&event.color_id), OWNER_COLOR_ID);

    Ok(RemoteEvent {
        remote_id: event.id,
        title: event.summary,
        marker,
        start,
        end,
    })
}

fn event_time_from_google(time: &google_calendar::types::EventDateTime) -> Option<EventTime> {
    if let Some(dt) = time.date_time {
        let tz = time.time_zone.parse::<Tz>().unwrap_or(Tz::UTC);
        Some(EventTime::DateTime(dt.with_timezone(&tz)))
    } else {
        time.date.map(EventTime::Date)
    }
}
