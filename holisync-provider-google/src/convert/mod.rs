//! Mapping between holisync events and Google Calendar events.
//!
//! This is the only place that knows the owner tag is stored as a colorId.

mod from_google;
mod to_google;

pub use from_google::from_google_event;
pub use to_google::to_google_event;

/// colorId reserved for events holisync owns ("banana" in Google's palette).
pub const OWNER_COLOR_ID: &str = "5";
