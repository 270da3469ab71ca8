//! Per-user summaries over a delta sequence.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::delta::{Delta, RecordId};

/// Number of deltas authored by each user.
///
/// The counts sum to the number of deltas given.
pub fn per_user_edit_counts<'a, I>(deltas: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a Delta>,
{
    let mut counts = BTreeMap::new();
    for delta in deltas {
        *counts.entry(delta.user.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Number of distinct records each user's deltas touched.
///
/// A delta with no `RecId` column touches nothing but still registers its
/// author with a count of 0.
pub fn per_user_records_touched<'a, I>(deltas: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a Delta>,
{
    let mut touched: BTreeMap<&'a str, BTreeSet<&'a RecordId>> = BTreeMap::new();
    for delta in deltas {
        let records = touched.entry(delta.user.as_str()).or_default();
        records.extend(delta.value.rec_ids().unwrap_or_default());
    }
    touched
        .into_iter()
        .map(|(user, records)| (user, records.len()))
        .collect()
}

/// One user's activity in a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary<'a> {
    pub user: &'a str,
    /// Deltas authored.
    pub edits: usize,
    /// Distinct records touched.
    pub records: usize,
}

/// Per-user summaries, busiest user first (ties broken by name).
pub fn user_summaries<'a, I>(deltas: I) -> Vec<UserSummary<'a>>
where
    I: IntoIterator<Item = &'a Delta>,
    I::IntoIter: Clone,
{
    let deltas = deltas.into_iter();
    let records = per_user_records_touched(deltas.clone());
    let mut rows: Vec<UserSummary<'a>> = per_user_edit_counts(deltas)
        .into_iter()
        .map(|(user, edits)| UserSummary {
            user,
            edits,
            records: records.get(user).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| b.edits.cmp(&a.edits).then_with(|| a.user.cmp(b.user)));
    rows
}
