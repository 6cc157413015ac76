//! Core types for holisync.
//!
//! This crate holds everything that does not talk to a calendar service:
//! - `event` for the canonical event model and the reduced remote view
//! - `holiday` for resolving "nth weekday of month" holidays
//! - `ics` for normalizing imported VEVENTs and writing holiday files
//! - `owner_tag` for marking events this tool owns
//! - `sync` for the create and cleanup passes against a `gateway`

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod gateway;
pub mod holiday;
pub mod ics;
pub mod owner_tag;
pub mod sync;

pub use error::{HolisyncError, HolisyncResult};
pub use event::{Event, EventKind, EventTime, RemoteEvent};
pub use owner_tag::{Marker, OwnerTag};
