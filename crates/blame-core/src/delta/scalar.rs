//! Scalar cell types: record identifiers and cell values.
//!
//! The host feed is loosely typed: a record id may arrive as `101` or
//! `"101"`, and a cell value may be a string, number, boolean or `null`.
//! Both types normalize to their text form on the way in so that equal
//! inputs compare, hash and tally identically.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a logical row in the underlying dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor).map(Self)
    }
}

/// One value written into a cell.
///
/// Ordered and hashable so it can key a category tally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CellValue(String);

impl CellValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellValue {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for CellValue {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor).map(Self)
    }
}

/// Accepts any JSON scalar and yields its text form.
struct ScalarVisitor;

impl Visitor<'_> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(format!("{v}"))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[101, "101", "A-7"]"#).expect("parse");
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[0].as_str(), "101");
        assert_eq!(ids[2].as_str(), "A-7");
    }

    #[test]
    fn cell_value_normalizes_scalars() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"["F", 3, 2.5, 2.0, true, null]"#).expect("parse");
        let text: Vec<&str> = values.iter().map(CellValue::as_str).collect();
        assert_eq!(text, ["F", "3", "2.5", "2", "true", ""]);
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = serde_json::from_str::<CellValue>(r#"{"a": 1}"#).unwrap_err();
        assert!(err.to_string().contains("string, number, boolean or null"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&RecordId::from(42_u64)).expect("serialize");
        assert_eq!(json, r#""42""#);
    }
}
