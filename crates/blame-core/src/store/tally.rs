//! Category tallies for discrete columns.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::delta::CellValue;

/// The configured set of columns whose values are categorical.
///
/// Only writes to these columns are tallied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscreteColumns(BTreeSet<String>);

impl DiscreteColumns {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Running write counts per observed value of one discrete column.
///
/// Every write counts, including a later delta overwriting the same cell:
/// this is a histogram of writes, not of current records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTally {
    counts: BTreeMap<CellValue, u64>,
}

pub(crate) static EMPTY_TALLY: CategoryTally = CategoryTally {
    counts: BTreeMap::new(),
};

impl CategoryTally {
    pub(crate) fn record(&mut self, value: &CellValue) {
        *self.counts.entry(value.clone()).or_insert(0) += 1;
    }

    /// Write count for `value` (0 if never written).
    #[must_use]
    pub fn get(&self, value: &str) -> u64 {
        self.counts.get(&CellValue::from(value)).copied().unwrap_or(0)
    }

    /// `(value, count)` pairs in value order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellValue, u64)> {
        self.counts.iter().map(|(value, count)| (value, *count))
    }

    /// Number of distinct values observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. total writes to the column.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Plain `value -> count` map, for comparisons and rendering.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        self.counts
            .iter()
            .map(|(value, count)| (value.as_str().to_string(), *count))
            .collect()
    }
}
