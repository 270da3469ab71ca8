//! Delta data model.
//!
//! A [`Delta`] is one historical edit record: who made it, from which app,
//! when, and a column-oriented payload that may cover many rows at once.
//!
//! # Payload shape
//!
//! ```json
//! {
//!   "Version": 12, "User": "alice", "App": "canvass", "Timestamp": "2016-03-01T08:00:00Z",
//!   "Value": { "RecId": ["101", "102"], "Status": ["Open", "Closed"] }
//! }
//! ```
//!
//! Position `i` of every column refers to the record at `RecId[i]`. The
//! alignment is checked by [`validate`] before a delta is ingested.

pub mod scalar;
pub mod timestamp;
pub mod validate;

pub use scalar::{CellValue, RecordId};
pub use timestamp::{TimestampError, parse_instant};

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the reserved column holding the record ids.
pub const REC_ID_COLUMN: &str = "RecId";

/// A single edit record from the host's delta feed. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Delta {
    /// Ordinal of the edit revision.
    pub version: u64,

    /// Identifier of the editor.
    pub user: String,

    /// Client application that produced the edit.
    pub app: String,

    /// When the edit was made.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,

    /// Column-oriented values, aligned on `RecId`.
    pub value: DeltaValue,
}

impl Delta {
    /// The value this delta wrote for one cell.
    ///
    /// If the record appears more than once in the payload, the first row
    /// wins. Returns `None` when the delta did not touch the cell.
    #[must_use]
    pub fn value_for(&self, rec_id: &RecordId, column: &str) -> Option<&CellValue> {
        let row = self.value.rec_ids()?.iter().position(|id| id == rec_id)?;
        self.value.column(column)?.get(row)
    }

    /// Number of rows covered by this delta (length of `RecId`).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.value.rec_ids().map_or(0, <[RecordId]>::len)
    }
}

/// Column name -> values, plus the reserved `RecId` column.
///
/// `RecId` is optional here so that its absence surfaces as a
/// [`crate::DeltaError`] during validation rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaValue {
    rec_ids: Option<Vec<RecordId>>,
    columns: BTreeMap<String, Vec<CellValue>>,
}

impl DeltaValue {
    /// Start a payload covering `rec_ids`.
    pub fn new<I, R>(rec_ids: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RecordId>,
    {
        Self {
            rec_ids: Some(rec_ids.into_iter().map(Into::into).collect()),
            columns: BTreeMap::new(),
        }
    }

    /// A payload with data columns but no `RecId`. Only useful for exercising
    /// validation.
    #[must_use]
    pub fn without_rec_ids() -> Self {
        Self::default()
    }

    /// Add (or replace) a data column.
    #[must_use]
    pub fn with_column<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.columns
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn rec_ids(&self) -> Option<&[RecordId]> {
        self.rec_ids.as_deref()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Data columns (everything except `RecId`), by name.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[CellValue])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl Serialize for DeltaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.columns.len() + usize::from(self.rec_ids.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(ids) = &self.rec_ids {
            map.serialize_entry(REC_ID_COLUMN, ids)?;
        }
        for (name, values) in &self.columns {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DeltaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DeltaValueVisitor;

        impl<'de> Visitor<'de> for DeltaValueVisitor {
            type Value = DeltaValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to value array")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DeltaValue, A::Error> {
                let mut value = DeltaValue::default();
                while let Some(name) = access.next_key::<String>()? {
                    if name == REC_ID_COLUMN {
                        value.rec_ids = Some(access.next_value()?);
                    } else {
                        let values: Vec<CellValue> = access.next_value()?;
                        value.columns.insert(name, values);
                    }
                }
                Ok(value)
            }
        }

        deserializer.deserialize_map(DeltaValueVisitor)
    }
}

// ---------------------------------------------------------------------------
// Batch parsing
// ---------------------------------------------------------------------------

/// A delta batch that is not valid JSON or does not match the delta shape.
#[derive(Debug, thiserror::Error)]
#[error("invalid delta batch: {0}")]
pub struct BatchError(#[from] serde_json::Error);

/// Parse a complete delta batch from JSON text.
///
/// Shape errors inside a delta (missing `RecId`, misaligned columns) are not
/// detected here; they are reported when the delta is ingested.
///
/// # Errors
///
/// Returns [`BatchError`] if the text is not a batch of deltas.
pub fn parse_batch(json: &str) -> Result<Vec<Delta>, BatchError> {
    // The host wraps results in `{ "Results": [...] }`; a bare array is also accepted.
    let raw: serde_json::Value = serde_json::from_str(json)?;
    let results = match raw {
        array @ serde_json::Value::Array(_) => array,
        serde_json::Value::Object(mut envelope) => envelope
            .remove("Results")
            .unwrap_or(serde_json::Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(results)?)
}
