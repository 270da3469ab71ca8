//! The delta store: an in-memory fold of deltas into derived views.
//!
//! A [`DeltaStore`] is built by calling [`DeltaStore::add`] once per delta,
//! in order. It never forgets anything; to drop deltas (e.g. when a filter
//! changes) build a fresh store.
//!
//! # What is tracked
//!
//! | View            | Keyed by                | Holds                               |
//! |-----------------|-------------------------|-------------------------------------|
//! | columns         | column name             | every data column ever written      |
//! | latest grid     | record id, column       | value from the last delta to write  |
//! | cell history    | record id, column       | every delta that wrote, in order    |
//! | cell editors    | record id, column       | distinct users that wrote           |
//! | category tally  | discrete column, value  | number of writes of that value      |
//!
//! The store borrows deltas from the caller's snapshot; nothing is copied
//! per cell except tally keys.

mod cell;
mod grid;
mod tally;

pub use cell::CellEdit;
pub use grid::{GridCell, GridRow};
pub use tally::{CategoryTally, DiscreteColumns};

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::delta::validate::validate_delta;
use crate::delta::{CellValue, Delta, REC_ID_COLUMN, RecordId};
use crate::error::DeltaError;
use cell::CellState;
use tally::EMPTY_TALLY;

/// Aggregation of a sequence of deltas.
#[derive(Debug, Clone)]
pub struct DeltaStore<'a> {
    discrete: DiscreteColumns,
    columns: BTreeSet<&'a str>,
    /// record -> column -> cell state. Doubles as the latest grid.
    cells: BTreeMap<&'a RecordId, BTreeMap<&'a str, CellState<'a>>>,
    tallies: BTreeMap<&'a str, CategoryTally>,
    delta_count: usize,
}

impl<'a> DeltaStore<'a> {
    /// Create an empty store that tallies the given discrete columns.
    #[must_use]
    pub fn new(discrete: DiscreteColumns) -> Self {
        Self {
            discrete,
            columns: BTreeSet::new(),
            cells: BTreeMap::new(),
            tallies: BTreeMap::new(),
            delta_count: 0,
        }
    }

    /// Fold one delta into the store.
    ///
    /// For every data column and every row `i`: registers the column,
    /// appends `delta` to the cell's history, records `delta.user` as an
    /// editor, overwrites the latest value, and bumps the category tally if
    /// the column is discrete.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError`] if the delta has no `RecId` column or a column
    /// is misaligned with it. The store is not modified in that case.
    pub fn add(&mut self, delta: &'a Delta) -> Result<(), DeltaError> {
        let rec_ids = validate_delta(delta).inspect_err(|err| {
            warn!(version = delta.version, user = %delta.user, "rejecting delta: {err}");
        })?;

        for (column, values) in delta.value.columns() {
            self.columns.insert(column);
            let discrete = self.discrete.contains(column);

            for (row, (rec_id, value)) in rec_ids.iter().zip(values).enumerate() {
                self.write_cell(delta, row, rec_id, column, value);
                if discrete {
                    self.tallies.entry(column).or_default().record(value);
                }
            }
        }

        self.delta_count += 1;
        debug!(
            version = delta.version,
            user = %delta.user,
            rows = rec_ids.len(),
            columns = delta.value.columns().count(),
            "ingested delta"
        );
        Ok(())
    }

    fn write_cell(
        &mut self,
        delta: &'a Delta,
        row: usize,
        rec_id: &'a RecordId,
        column: &'a str,
        value: &'a CellValue,
    ) {
        self.cells
            .entry(rec_id)
            .or_default()
            .entry(column)
            .and_modify(|state| state.write(delta, row, value))
            .or_insert_with(|| CellState::new(delta, row, value));
    }

    fn cell(&self, rec_id: &RecordId, column: &str) -> Option<&CellState<'a>> {
        self.cells.get(rec_id)?.get(column)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every data column ever written, in name order. `RecId` is not included.
    #[must_use]
    pub fn columns(&self) -> Vec<&'a str> {
        self.columns.iter().copied().collect()
    }

    /// Header row for the latest grid: `RecId` followed by [`Self::columns`].
    #[must_use]
    pub fn display_columns(&self) -> Vec<&'a str> {
        std::iter::once(REC_ID_COLUMN)
            .chain(self.columns.iter().copied())
            .collect()
    }

    /// Record ids present in the latest grid, in order.
    pub fn records(&self) -> impl Iterator<Item = &'a RecordId> + '_ {
        self.cells.keys().copied()
    }

    /// Latest value written to a cell, if any.
    #[must_use]
    pub fn latest_value(&self, rec_id: &RecordId, column: &str) -> Option<&'a CellValue> {
        self.cell(rec_id, column).map(|state| state.latest)
    }

    /// The latest grid as `record -> column -> value`.
    #[must_use]
    pub fn latest_grid(&self) -> BTreeMap<&'a RecordId, BTreeMap<&'a str, &'a CellValue>> {
        self.cells
            .iter()
            .map(|(rec_id, row)| {
                let values = row
                    .iter()
                    .map(|(column, state)| (*column, state.latest))
                    .collect();
                (*rec_id, values)
            })
            .collect()
    }

    /// Deltas that wrote the cell, in ingestion order. Empty if untouched.
    #[must_use]
    pub fn cell_history(&self, rec_id: &RecordId, column: &str) -> &[&'a Delta] {
        self.cell(rec_id, column)
            .map(|state| state.history.as_slice())
            .unwrap_or_default()
    }

    /// Number of distinct users that wrote the cell (0 if untouched).
    #[must_use]
    pub fn editor_count(&self, rec_id: &RecordId, column: &str) -> usize {
        self.cell(rec_id, column).map_or(0, |state| state.editors.len())
    }

    /// Distinct users that wrote the cell, in name order.
    #[must_use]
    pub fn editors(&self, rec_id: &RecordId, column: &str) -> Vec<&'a str> {
        self.cell(rec_id, column)
            .map(|state| state.editors.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The cell history with the value each write stored.
    ///
    /// A delta that lists the record more than once yields one edit per row.
    #[must_use]
    pub fn cell_edits(&self, rec_id: &RecordId, column: &str) -> Vec<CellEdit<'a>> {
        self.cell(rec_id, column)
            .map(|state| {
                state
                    .history
                    .iter()
                    .zip(&state.rows)
                    .map(|(&delta, &row)| CellEdit::from_row(delta, column, row))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Write counts per value for a discrete column.
    ///
    /// Empty if the column is not discrete or was never written.
    #[must_use]
    pub fn category_tally(&self, column: &str) -> &CategoryTally {
        self.tallies.get(column).unwrap_or(&EMPTY_TALLY)
    }

    /// Every non-empty tally, by column name.
    pub fn category_tallies(&self) -> impl Iterator<Item = (&'a str, &CategoryTally)> + '_ {
        self.tallies.iter().map(|(column, tally)| (*column, tally))
    }

    #[must_use]
    pub fn is_discrete_column(&self, column: &str) -> bool {
        self.discrete.contains(column)
    }

    #[must_use]
    pub fn discrete_columns(&self) -> &DiscreteColumns {
        &self.discrete
    }

    /// Number of deltas folded in so far.
    #[must_use]
    pub fn delta_count(&self) -> usize {
        self.delta_count
    }

    /// One row per record with every data column, annotated with change and
    /// editor counts. A cell is `contended` once `min_editors` distinct users
    /// have written it.
    #[must_use]
    pub fn grid_rows(&self, min_editors: usize) -> Vec<GridRow<'a>> {
        self.cells
            .iter()
            .map(|(&rec_id, row)| GridRow {
                rec_id,
                cells: self
                    .columns
                    .iter()
                    .map(|&column| {
                        let state = row.get(column);
                        let editors = state.map_or(0, |s| s.editors.len());
                        GridCell {
                            column,
                            value: state.map(|s| s.latest),
                            changes: state.map_or(0, |s| s.history.len()),
                            editors,
                            contended: editors > 0 && editors >= min_editors,
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for DeltaStore<'_> {
    fn default() -> Self {
        Self::new(DiscreteColumns::default())
    }
}
