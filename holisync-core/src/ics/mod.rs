//! ICS reading and writing.
//!
//! Imported files go through the normalizer, which turns each VEVENT into a
//! canonical `Event` or a skip. Generated holiday files contain one all-day
//! VEVENT per event.

mod generate;
mod normalize;

pub use generate::{event_uid, generate_ics};
pub use normalize::{ImportBatch, Normalized, Normalizer, RawVEvent, SkipReason, Skipped};
