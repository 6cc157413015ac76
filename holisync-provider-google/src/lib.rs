//! Google Calendar gateway for holisync.
//!
//! The gateway reads its own credentials and tokens:
//!   ~/.config/holisync/providers/google/credentials.json
//!   ~/.config/holisync/providers/google/tokens/{account}.json

mod config;
mod convert;
mod gateway;
mod session;

pub use convert::{OWNER_COLOR_ID, from_google_event, to_google_event};
pub use gateway::GoogleGateway;
