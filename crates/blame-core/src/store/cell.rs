//! Per-cell state: latest value, edit history and distinct editors.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::delta::{CellValue, Delta};

/// Everything the store knows about one (record, column) cell.
#[derive(Debug, Clone)]
pub(crate) struct CellState<'a> {
    pub(crate) latest: &'a CellValue,
    /// Every delta that touched the cell, in ingestion order.
    pub(crate) history: Vec<&'a Delta>,
    /// Row of each `history` entry within its delta.
    pub(crate) rows: Vec<usize>,
    pub(crate) editors: BTreeSet<&'a str>,
}

impl<'a> CellState<'a> {
    pub(crate) fn new(delta: &'a Delta, row: usize, value: &'a CellValue) -> Self {
        Self {
            latest: value,
            history: vec![delta],
            rows: vec![row],
            editors: BTreeSet::from([delta.user.as_str()]),
        }
    }

    pub(crate) fn write(&mut self, delta: &'a Delta, row: usize, value: &'a CellValue) {
        self.latest = value;
        self.history.push(delta);
        self.rows.push(row);
        self.editors.insert(delta.user.as_str());
    }
}

/// One row of a cell's drill-down listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellEdit<'a> {
    pub version: u64,
    pub user: &'a str,
    pub app: &'a str,
    pub timestamp: DateTime<Utc>,
    /// What this delta wrote to the cell.
    pub value: Option<&'a CellValue>,
}

impl<'a> CellEdit<'a> {
    pub(crate) fn from_row(delta: &'a Delta, column: &str, row: usize) -> Self {
        Self {
            version: delta.version,
            user: &delta.user,
            app: &delta.app,
            timestamp: delta.timestamp,
            value: delta.value.column(column).and_then(|values| values.get(row)),
        }
    }
}
