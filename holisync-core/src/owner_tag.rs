//! Ownership marker for events created by holisync.
//!
//! The remote schema has no dedicated "owner" field, so a gateway backs the
//! tag with some reserved value it does offer (Google: `colorId` "5").
//! That value is known only to the gateway; everything in this crate works
//! with `OwnerTag` and `Marker`.

use crate::event::{Event, RemoteEvent};

/// The single reserved marker meaning "this event is managed by holisync".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerTag;

impl OwnerTag {
    /// Mark an event as owned. Only system-generated events should be
    /// tagged; imported events stay untagged so cleanup never removes them.
    pub fn tag(event: Event) -> Event {
        event.with_owner_tag(OwnerTag)
    }

    pub fn tag_all(events: impl IntoIterator<Item = Event>) -> Vec<Event> {
        events.into_iter().map(OwnerTag::tag).collect()
    }

    /// Whether a listed event carries exactly the reserved marker.
    pub fn is_tagged(event: &RemoteEvent) -> bool {
        event.marker == Marker::Owner
    }
}

/// The ownership-relevant marker a remote event carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// No marker value at all.
    Absent,
    /// Exactly the reserved value.
    Owner,
    /// Some other value, e.g. a color a human picked.
    Other(String),
}

impl Marker {
    /// Map a raw remote value onto a marker. Matching is exact: anything but
    /// the reserved value itself is `Other`, and an empty value is `Absent`.
    pub fn from_raw(raw: Option<&str>, reserved: &str) -> Self {
        match raw {
            None | Some("") => Marker::Absent,
            Some(value) if value == reserved => Marker::Owner,
            Some(value) => Marker::Other(value.to_string()),
        }
    }

    /// The raw value to send for an event, given whether it is tagged.
    pub fn raw_for(tag: Option<OwnerTag>, reserved: &str) -> Option<String> {
        tag.map(|_| reserved.to_string())
    }
}
