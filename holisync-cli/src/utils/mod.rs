pub mod timezone;
pub mod tui;
