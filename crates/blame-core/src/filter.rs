//! User and time-range filtering of the raw delta stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::delta::{Delta, timestamp};

/// Decides whether a delta takes part in a view.
///
/// The default value is the identity filter: every delta passes.
///
/// Bounds are inclusive. A range whose start is after its end is accepted
/// as-is and simply passes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterPredicate {
    /// Only deltas by this user. Empty means any user.
    pub user: String,

    /// Drop deltas strictly earlier than this.
    #[serde(deserialize_with = "timestamp::deserialize_opt")]
    pub timestamp_start: Option<DateTime<Utc>>,

    /// Drop deltas strictly later than this.
    #[serde(deserialize_with = "timestamp::deserialize_opt")]
    pub timestamp_end: Option<DateTime<Utc>>,
}

impl FilterPredicate {
    /// The filter that passes every delta.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn with_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.timestamp_start = start;
        self.timestamp_end = end;
        self
    }

    /// `true` when no condition is set.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.user.is_empty() && self.timestamp_start.is_none() && self.timestamp_end.is_none()
    }

    /// Evaluate the filter against one delta.
    #[must_use]
    pub fn passes(&self, delta: &Delta) -> bool {
        if !self.user.is_empty() && self.user != delta.user {
            return false;
        }
        if self.timestamp_start.is_some_and(|start| delta.timestamp < start) {
            return false;
        }
        if self.timestamp_end.is_some_and(|end| delta.timestamp > end) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::DeltaValue;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, day, hour, 0, 0).unwrap()
    }

    fn delta(user: &str, ts: DateTime<Utc>) -> Delta {
        Delta {
            version: 1,
            user: user.into(),
            app: "app".into(),
            timestamp: ts,
            value: DeltaValue::new(["1"]),
        }
    }

    #[test]
    fn identity_passes_everything() {
        let filter = FilterPredicate::identity();
        assert!(filter.is_identity());
        assert!(filter.passes(&delta("alice", at(1, 0))));
        assert!(filter.passes(&delta("", at(30, 23))));
    }

    #[test]
    fn user_filter_is_exact() {
        let filter = FilterPredicate::identity().with_user("alice");
        assert!(!filter.is_identity());
        assert!(filter.passes(&delta("alice", at(1, 0))));
        assert!(!filter.passes(&delta("Alice", at(1, 0))));
        assert!(!filter.passes(&delta("bob", at(1, 0))));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let filter = FilterPredicate::identity().with_range(Some(at(2, 0)), Some(at(3, 0)));
        assert!(!filter.passes(&delta("a", at(1, 23))));
        assert!(filter.passes(&delta("a", at(2, 0))));
        assert!(filter.passes(&delta("a", at(2, 12))));
        assert!(filter.passes(&delta("a", at(3, 0))));
        assert!(!filter.passes(&delta("a", at(3, 1))));
    }

    #[test]
    fn open_ended_ranges() {
        let from = FilterPredicate::identity().with_range(Some(at(2, 0)), None);
        assert!(from.passes(&delta("a", at(28, 0))));
        assert!(!from.passes(&delta("a", at(1, 0))));

        let until = FilterPredicate::identity().with_range(None, Some(at(2, 0)));
        assert!(until.passes(&delta("a", at(1, 0))));
        assert!(!until.passes(&delta("a", at(28, 0))));
    }

    #[test]
    fn inverted_range_passes_nothing() {
        let filter = FilterPredicate::identity().with_range(Some(at(5, 0)), Some(at(4, 0)));
        for day in 1..=9 {
            assert!(!filter.passes(&delta("a", at(day, 0))));
        }
    }

    #[test]
    fn user_and_range_combine() {
        let filter = FilterPredicate::identity()
            .with_user("bob")
            .with_range(Some(at(2, 0)), None);
        assert!(filter.passes(&delta("bob", at(3, 0))));
        assert!(!filter.passes(&delta("bob", at(1, 0))));
        assert!(!filter.passes(&delta("alice", at(3, 0))));
    }

    #[test]
    fn deserializes_host_filter_object() {
        let filter: FilterPredicate = serde_json::from_str(
            r#"{"user":"alice","timestampStart":"2016-03-02","timestampEnd":""}"#,
        )
        .expect("parse");
        assert_eq!(filter.user, "alice");
        assert_eq!(filter.timestamp_start, Some(at(2, 0)));
        assert_eq!(filter.timestamp_end, None);

        let empty: FilterPredicate = serde_json::from_str("{}").expect("parse");
        assert!(empty.is_identity());
    }
}
