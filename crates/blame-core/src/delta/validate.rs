//! Shape validation for a single delta.
//!
//! Ingestion is all-or-nothing: a delta is checked in full before any of
//! its rows touch the store.

use super::{Delta, RecordId};
use crate::error::DeltaError;

/// Check that `delta` has a `RecId` column and that every data column has
/// exactly one value per record id.
///
/// Returns the record ids on success so callers need not look them up again.
///
/// # Errors
///
/// - [`DeltaError::MissingRecordIds`] if `RecId` is absent.
/// - [`DeltaError::ColumnLengthMismatch`] for the first misaligned column
///   (columns are checked in name order).
pub fn validate_delta(delta: &Delta) -> Result<&[RecordId], DeltaError> {
    let rec_ids = delta
        .value
        .rec_ids()
        .ok_or(DeltaError::MissingRecordIds {
            version: delta.version,
        })?;

    for (column, values) in delta.value.columns() {
        if values.len() != rec_ids.len() {
            return Err(DeltaError::ColumnLengthMismatch {
                version: delta.version,
                column: column.to_string(),
                expected: rec_ids.len(),
                found: values.len(),
            });
        }
    }

    Ok(rec_ids)
}
