//! Latest-grid rows annotated with contention.

use serde::Serialize;

use crate::delta::{CellValue, RecordId};

/// One record of the latest grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow<'s> {
    pub rec_id: &'s RecordId,
    /// One entry per known data column, in column order.
    pub cells: Vec<GridCell<'s>>,
}

/// One cell of the latest grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell<'s> {
    pub column: &'s str,
    /// `None` when no ingested delta wrote this cell.
    pub value: Option<&'s CellValue>,
    /// Number of deltas that wrote the cell.
    pub changes: usize,
    /// Number of distinct users that wrote the cell.
    pub editors: usize,
    /// `editors` reached the configured contention threshold.
    pub contended: bool,
}

impl GridCell<'_> {
    /// Display text: the value followed by change/editor annotations when
    /// there is more than one of either.
    #[must_use]
    pub fn annotated(&self) -> String {
        let Some(value) = self.value else {
            return String::new();
        };
        let mut text = value.as_str().to_string();
        if self.changes > 1 {
            text.push_str(&format!(" [{} changes]", self.changes));
        }
        if self.editors > 1 {
            text.push_str(&format!(" [users: {}]", self.editors));
        }
        text
    }
}
