//! Filter-driven recomputation of every derived view.
//!
//! [`build_view`] is the only way a view is produced: it folds the passing
//! deltas of a raw snapshot into a fresh [`DeltaStore`]. Changing the filter
//! never patches an existing store, it rebuilds from the snapshot.
//!
//! [`Session`] is the explicit filter state a host threads through its
//! render cycle. It has two phases:
//!
//! ```text
//!            apply / select_user / set_range
//!   Default ──────────────────────────────────▶ Filtered
//!      ▲                                          │  apply / select_user / set_range
//!      └──────────────── reset ───────────────────┘◀─┘
//! ```
//!
//! Every transition performs exactly one full [`build_view`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::delta::Delta;
use crate::error::ViewError;
use crate::filter::FilterPredicate;
use crate::store::{DeltaStore, DiscreteColumns};
use crate::summary::{UserSummary, per_user_edit_counts, user_summaries};

/// A store built from one filtered pass over a snapshot.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub store: DeltaStore<'a>,
    /// The deltas that passed the filter, in their original order.
    pub filtered: Vec<&'a Delta>,
}

impl<'a> View<'a> {
    /// Per-user edit counts over the filtered deltas.
    #[must_use]
    pub fn user_counts(&self) -> std::collections::BTreeMap<&'a str, usize> {
        per_user_edit_counts(self.filtered.iter().copied())
    }

    /// Per-user edit and record counts over the filtered deltas.
    #[must_use]
    pub fn user_summaries(&self) -> Vec<UserSummary<'a>> {
        user_summaries(self.filtered.iter().copied())
    }
}

/// Fold every delta of `raw` that passes `predicate` into a fresh store.
///
/// Deltas are visited once, in order. The returned `filtered` sequence is
/// exactly the passing sub-sequence of `raw`.
///
/// # Errors
///
/// Returns [`ViewError::Malformed`] for the first passing delta that cannot
/// be ingested. The partial view is dropped; callers should treat the whole
/// view as invalid.
pub fn build_view<'a>(
    raw: &'a [Delta],
    predicate: &FilterPredicate,
    discrete: &DiscreteColumns,
) -> Result<View<'a>, ViewError> {
    let started = Instant::now();
    let mut store = DeltaStore::new(discrete.clone());
    let mut filtered = Vec::new();

    for (index, delta) in raw.iter().enumerate() {
        if !predicate.passes(delta) {
            continue;
        }
        store
            .add(delta)
            .map_err(|source| ViewError::Malformed { index, source })?;
        filtered.push(delta);
    }

    info!(
        raw = raw.len(),
        filtered = filtered.len(),
        records = store.records().count(),
        columns = store.columns().len(),
        identity = predicate.is_identity(),
        elapsed_ms = started.elapsed().as_millis(),
        "view built"
    );

    Ok(View { store, filtered })
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Which side of the filter state machine a [`Session`] is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    /// Identity filter, all deltas visible.
    Default,
    /// A filter was set since the last reset.
    Filtered,
}

/// Filter state over one host-owned snapshot of deltas.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    raw: &'a [Delta],
    discrete: DiscreteColumns,
    filter: FilterPredicate,
    phase: FilterPhase,
}

impl<'a> Session<'a> {
    /// Start in the default phase over `raw`.
    #[must_use]
    pub fn new(raw: &'a [Delta], discrete: DiscreteColumns) -> Self {
        Self {
            raw,
            discrete,
            filter: FilterPredicate::identity(),
            phase: FilterPhase::Default,
        }
    }

    #[must_use]
    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    #[must_use]
    pub fn filter(&self) -> &FilterPredicate {
        &self.filter
    }

    #[must_use]
    pub fn raw(&self) -> &'a [Delta] {
        self.raw
    }

    /// Build the view for the current filter without changing state.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewError`] from [`build_view`].
    pub fn view(&self) -> Result<View<'a>, ViewError> {
        build_view(self.raw, &self.filter, &self.discrete)
    }

    /// Replace the whole filter and rebuild.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewError`] from [`build_view`].
    pub fn apply(&mut self, filter: FilterPredicate) -> Result<View<'a>, ViewError> {
        self.filter = filter;
        self.phase = FilterPhase::Filtered;
        self.view()
    }

    /// Set or clear the user condition, keeping the time range, and rebuild.
    ///
    /// This is what selecting (or deselecting) a bar in a per-user chart does.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewError`] from [`build_view`].
    pub fn select_user(&mut self, user: Option<String>) -> Result<View<'a>, ViewError> {
        let filter = self.filter.clone().with_user(user.unwrap_or_default());
        self.apply(filter)
    }

    /// Set the time range, keeping the user condition, and rebuild.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewError`] from [`build_view`].
    pub fn set_range(
        &mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<View<'a>, ViewError> {
        let filter = self.filter.clone().with_range(start, end);
        self.apply(filter)
    }

    /// Restore the identity filter and rebuild.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewError`] from [`build_view`].
    pub fn reset(&mut self) -> Result<View<'a>, ViewError> {
        self.filter = FilterPredicate::identity();
        self.phase = FilterPhase::Default;
        self.view()
    }
}
