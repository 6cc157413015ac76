/// Historical upper bound for a single remote listing.
pub const DEFAULT_MAX_RESULTS: u32 = 2500;

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

pub const DEFAULT_START_YEAR: i32 = 2025;
pub const DEFAULT_END_YEAR: i32 = 2125;

pub const DEFAULT_OUTPUT_PATH: &str = "mother_and_father_days.ics";

/// Title used when an imported VEVENT has no SUMMARY.
pub const NO_TITLE: &str = "No Title";
