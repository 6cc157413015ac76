//! Create mode planning.

use std::collections::HashSet;

use crate::event::{Event, EventKey, RemoteEvent};

/// Desired events split into those missing remotely and those already there.
#[derive(Debug, Clone, Default)]
pub struct CreatePlan {
    pub to_create: Vec<Event>,
    pub present: Vec<Event>,
}

impl CreatePlan {
    /// Compare desired events against a remote listing by title and start.
    ///
    /// A tagged desired event only counts as present if a tagged remote event
    /// matches; an untagged one only matches untagged remote events. Desired
    /// duplicates are planned once.
    pub fn new(desired: Vec<Event>, remote: &[RemoteEvent]) -> Self {
        let mut existing: HashSet<(bool, EventKey)> = remote
            .iter()
            .map(|event| (event.is_tagged(), event.key()))
            .collect();

        let mut plan = CreatePlan::default();

        for event in desired {
            let key = (event.is_tagged(), event.key());
            if existing.contains(&key) {
                tracing::debug!(title = %event.summary(), start = %event.start(), "already present");
                plan.present.push(event);
            } else {
                existing.insert(key);
                plan.to_create.push(event);
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use crate::owner_tag::{Marker, OwnerTag};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn remote(title: &str, d: NaiveDate, marker: Marker) -> RemoteEvent {
        RemoteEvent {
            remote_id: format!("{}-{}", title, d),
            title: title.into(),
            marker,
            start: EventTime::Date(d),
            end: EventTime::Date(d.succ_opt().unwrap()),
        }
    }

    fn holiday(title: &str, d: NaiveDate) -> Event {
        OwnerTag::tag(Event::all_day(title, d).unwrap())
    }

    #[test]
    fn test_tagged_match_is_present() {
        let plan = CreatePlan::new(
            vec![
                holiday("Mother's Day", date(2025, 5, 11)),
                holiday("Father's Day", date(2025, 6, 15)),
            ],
            &[remote("Mother's Day", date(2025, 5, 11), Marker::Owner)],
        );

        assert_eq!(plan.present.len(), 1);
        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.to_create[0].summary(), "Father's Day");
    }

    #[test]
    fn test_untagged_remote_does_not_satisfy_tagged_desired() {
        let plan = CreatePlan::new(
            vec![holiday("Mother's Day", date(2025, 5, 11))],
            &[remote("Mother's Day", date(2025, 5, 11), Marker::Absent)],
        );

        assert_eq!(plan.to_create.len(), 1);
    }

    #[test]
    fn test_same_title_other_date_is_missing() {
        let plan = CreatePlan::new(
            vec![holiday("Mother's Day", date(2026, 5, 10))],
            &[remote("Mother's Day", date(2025, 5, 11), Marker::Owner)],
        );

        assert_eq!(plan.to_create.len(), 1);
        assert!(plan.present.is_empty());
    }

    #[test]
    fn test_untagged_desired_matches_untagged_remote() {
        let imported = Event::all_day("Picnic", date(2025, 7, 4)).unwrap();
        let plan = CreatePlan::new(
            vec![imported],
            &[remote("Picnic", date(2025, 7, 4), Marker::Absent)],
        );

        assert!(plan.is_empty());
    }

    #[test]
    fn test_duplicate_desired_planned_once() {
        let d = date(2025, 5, 11);
        let plan = CreatePlan::new(vec![holiday("Mother's Day", d), holiday("Mother's Day", d)], &[]);

        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.present.len(), 1);
    }
}
