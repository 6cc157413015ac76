//! Cleanup mode classification.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::RemoteEvent;
use crate::owner_tag::Marker;

/// Which markers make an in-scope event eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleanupPolicy {
    /// Anything but the reserved marker, including no marker at all.
    #[default]
    MarkerMismatch,
    /// Only events carrying some other marker value; untagged events stay.
    ForeignMarkerOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteReason {
    Untagged,
    ForeignMarker(String),
    /// Tagged, but rejected by the scope's validity check.
    Invalid,
}

impl fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteReason::Untagged => write!(f, "no marker"),
            DeleteReason::ForeignMarker(value) => write!(f, "marker '{}'", value),
            DeleteReason::Invalid => write!(f, "tagged but invalid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Title outside the interest set, or before the window.
    OutOfScope,
    Keep,
    Delete(DeleteReason),
}

/// In-scope events cleanup would delete, with the reason for each.
#[derive(Debug, Clone, Default)]
pub struct CleanupPlan {
    pub to_delete: Vec<(RemoteEvent, DeleteReason)>,
    /// In-scope events that passed the ownership check.
    pub kept: usize,
}

impl CleanupPlan {
    /// Classify a listing against `scope`.
    pub fn new(scope: &CleanupScope, remote: Vec<RemoteEvent>) -> Self {
        let mut plan = CleanupPlan::default();

        for event in remote {
            match scope.classify(&event) {
                Verdict::OutOfScope => {}
                Verdict::Keep => plan.kept += 1,
                Verdict::Delete(reason) => {
                    tracing::debug!(title = %event.title, start = %event.start, %reason, "marked for deletion");
                    plan.to_delete.push((event, reason));
                }
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
    }
}

type Validity = Box<dyn Fn(&RemoteEvent) -> bool>;

/// What cleanup may touch: a set of titles, from `since` onwards.
///
/// Events whose title is not in the set are never deleted, whatever their
/// marker.
pub struct CleanupScope {
    titles: BTreeSet<String>,
    since: DateTime<Utc>,
    policy: CleanupPolicy,
    validity: Option<Validity>,
}

impl CleanupScope {
    pub fn new<I, S>(titles: I, since: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CleanupScope {
            titles: titles.into_iter().map(Into::into).collect(),
            since,
            policy: CleanupPolicy::default(),
            validity: None,
        }
    }

    pub fn with_policy(mut self, policy: CleanupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Also delete tagged events for which `valid` returns false.
    pub fn with_validity(mut self, valid: impl Fn(&RemoteEvent) -> bool + 'static) -> Self {
        self.validity = Some(Box::new(valid));
        self
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    pub fn classify(&self, event: &RemoteEvent) -> Verdict {
        if !self.titles.contains(&event.title) || !event.start.is_at_or_after(self.since) {
            return Verdict::OutOfScope;
        }

        match &event.marker {
            Marker::Owner => match &self.validity {
                Some(valid) if !valid(event) => Verdict::Delete(DeleteReason::Invalid),
                _ => Verdict::Keep,
            },
            Marker::Absent => match self.policy {
                CleanupPolicy::MarkerMismatch => Verdict::Delete(DeleteReason::Untagged),
                CleanupPolicy::ForeignMarkerOnly => Verdict::Keep,
            },
            Marker::Other(value) => Verdict::Delete(DeleteReason::ForeignMarker(value.clone())),
        }
    }
}

impl fmt::Debug for CleanupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupScope")
            .field("titles", &self.titles)
            .field("since", &self.since)
            .field("policy", &self.policy)
            .field("validity", &self.validity.is_some())
            .finish()
    }
}
