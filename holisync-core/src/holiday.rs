//! Recurring "nth weekday of month" holidays.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{HolisyncError, HolisyncResult};
use crate::event::{Event, RemoteEvent};

/// Date of the `n`-th `weekday` in the given month, or `None` if the month
/// has fewer than `n` of them.
///
/// Month and year validity is the caller's concern: an invalid month simply
/// yields no candidate days.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: i32) -> HolisyncResult<Option<NaiveDate>> {
    if n <= 0 {
        return Err(HolisyncError::InvalidArgument(format!(
            "occurrence index must be positive, got {}",
            n
        )));
    }

    let mut count = 0;
    for day in 1..=31 {
        // Running off the end of the month is the normal stop condition
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        if date.weekday() == weekday {
            count += 1;
            if count == n {
                return Ok(Some(date));
            }
        }
    }

    Ok(None)
}

/// Template for a holiday that falls on the n-th weekday of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySpec {
    pub title: String,
    pub month: u32,
    pub weekday: Weekday,
    pub occurrence: i32,
}

impl HolidaySpec {
    pub fn new(title: impl Into<String>, month: u32, weekday: Weekday, occurrence: i32) -> Self {
        HolidaySpec {
            title: title.into(),
            month,
            weekday,
            occurrence,
        }
    }

    /// Second Sunday of May
    pub fn mothers_day() -> Self {
        HolidaySpec::new("Mother's Day", 5, Weekday::Sun, 2)
    }

    /// Third Sunday of June
    pub fn fathers_day() -> Self {
        HolidaySpec::new("Father's Day", 6, Weekday::Sun, 3)
    }

    pub fn defaults() -> Vec<Self> {
        vec![HolidaySpec::mothers_day(), HolidaySpec::fathers_day()]
    }

    pub fn date_in(&self, year: i32) -> HolisyncResult<Option<NaiveDate>> {
        nth_weekday(year, self.month, self.weekday, self.occurrence)
    }

    /// The all-day (untagged) event for this holiday in `year`.
    pub fn resolve(&self, year: i32) -> HolisyncResult<Option<Event>> {
        match self.date_in(year)? {
            Some(date) => Event::all_day(self.title.clone(), date).map(Some),
            None => Ok(None),
        }
    }
}

/// Expand every spec over every year in `years`, year by year in spec order.
///
/// A spec whose occurrence does not exist in some year is skipped for that
/// year only.
pub fn expand(specs: &[HolidaySpec], years: RangeInclusive<i32>) -> HolisyncResult<Vec<Event>> {
    let mut events = Vec::new();

    for year in years {
        for spec in specs {
            match spec.resolve(year)? {
                Some(event) => events.push(event),
                None => tracing::warn!(
                    title = %spec.title,
                    year,
                    "holiday has no occurrence {} in month {}",
                    spec.occurrence,
                    spec.month
                ),
            }
        }
    }

    Ok(events)
}

/// Whether a listed event sits on the date its holiday resolves to for the
/// event's year. When several specs share a title, matching any of them is
/// enough. Events whose title matches no spec are considered valid.
pub fn is_on_schedule(specs: &[HolidaySpec], event: &RemoteEvent) -> bool {
    let date = event.start.date();
    let mut matching = specs.iter().filter(|spec| spec.title == event.title).peekable();

    if matching.peek().is_none() {
        return true;
    }

    matching.any(|spec| matches!(spec.date_in(date.year()), Ok(Some(expected)) if expected == date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventTime};
    use crate::owner_tag::Marker;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nth_weekday_known_dates() {
        assert_eq!(nth_weekday(2025, 5, Weekday::Sun, 2).unwrap(), Some(date(2025, 5, 11)));
        assert_eq!(nth_weekday(2025, 6, Weekday::Sun, 3).unwrap(), Some(date(2025, 6, 15)));
        assert_eq!(nth_weekday(2024, 2, Weekday::Thu, 5).unwrap(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_nth_weekday_not_found_past_month_end() {
        // June 2025 has four Tuesdays
        assert_eq!(nth_weekday(2025, 6, Weekday::Tue, 5).unwrap(), None);
        assert_eq!(nth_weekday(2025, 2, Weekday::Sat, 5).unwrap(), None);
    }

    #[test]
    fn test_nth_weekday_rejects_non_positive_index() {
        assert!(matches!(
            nth_weekday(2025, 5, Weekday::Sun, 0),
            Err(HolisyncError::InvalidArgument(_))
        ));
        assert!(nth_weekday(2025, 5, Weekday::Sun, -1).is_err());
    }

    #[test]
    fn test_nth_weekday_invalid_month_yields_none() {
        assert_eq!(nth_weekday(2025, 13, Weekday::Sun, 1).unwrap(), None);
    }

    #[test]
    fn test_nth_weekday_matches_weekday_and_order_for_every_month() {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];

        for year in [2024, 2025, 2100] {
            for month in 1..=12 {
                for weekday in weekdays {
                    let mut previous: Option<NaiveDate> = None;
                    for n in 1..=5 {
                        let Some(found) = nth_weekday(year, month, weekday, n).unwrap() else {
                            // Once an occurrence is missing, later ones are too
                            assert_eq!(nth_weekday(year, month, weekday, n + 1).unwrap(), None);
                            break;
                        };
                        assert_eq!(found.weekday(), weekday);
                        assert_eq!(found.month(), month);
                        assert_eq!(found.day0() / 7, (n - 1) as u32);
                        if let Some(prev) = previous {
                            assert_eq!(found - prev, chrono::Duration::days(7));
                        }
                        previous = Some(found);
                    }
                }
            }
        }
    }

    #[test]
    fn test_expand_three_years_alternates_titles() {
        let events = expand(&HolidaySpec::defaults(), 2025..=2027).unwrap();

        assert_eq!(events.len(), 6);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.kind(), EventKind::AllDay);
            let expected = if i % 2 == 0 { "Mother's Day" } else { "Father's Day" };
            assert_eq!(event.summary(), expected);
            assert!(!event.is_tagged());
        }
        assert_eq!(events[0].start(), &EventTime::Date(date(2025, 5, 11)));
        assert_eq!(events[1].start(), &EventTime::Date(date(2025, 6, 15)));
    }

    #[test]
    fn test_expand_skips_missing_occurrence() {
        let specs = vec![HolidaySpec::new("Fifth Tuesday", 6, Weekday::Tue, 5)];

        // June 2025 has four Tuesdays, June 2026 has five
        let events = expand(&specs, 2025..=2026).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start(), &EventTime::Date(date(2026, 6, 30)));
    }

    #[test]
    fn test_is_on_schedule() {
        let specs = HolidaySpec::defaults();
        let remote = |title: &str, d: NaiveDate| RemoteEvent {
            remote_id: "id".into(),
            title: title.into(),
            marker: Marker::Owner,
            start: EventTime::Date(d),
            end: EventTime::Date(d.succ_opt().unwrap()),
        };

        assert!(is_on_schedule(&specs, &remote("Mother's Day", date(2026, 5, 10))));
        assert!(!is_on_schedule(&specs, &remote("Mother's Day", date(2026, 5, 11))));
        assert!(is_on_schedule(&specs, &remote("Birthday", date(2026, 5, 11))));
    }

    #[test]
    fn test_is_on_schedule_with_shared_title() {
        let specs = vec![
            HolidaySpec::new("Bank Holiday", 5, Weekday::Mon, 1),
            HolidaySpec::new("Bank Holiday", 8, Weekday::Mon, 1),
        ];
        let remote = |d: NaiveDate| RemoteEvent {
            remote_id: "id".into(),
            title: "Bank Holiday".into(),
            marker: Marker::Owner,
            start: EventTime::Date(d),
            end: EventTime::Date(d.succ_opt().unwrap()),
        };

        assert!(is_on_schedule(&specs, &remote(date(2025, 5, 5))));
        assert!(is_on_schedule(&specs, &remote(date(2025, 8, 4))));
        assert!(!is_on_schedule(&specs, &remote(date(2025, 8, 11))));
    }
}
