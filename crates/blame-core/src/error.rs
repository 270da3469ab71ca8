use std::fmt;

/// Machine-readable error codes for host-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    BatchParseError,
    InvalidTimestamp,
    MalformedDelta,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::BatchParseError => "E2001",
            Self::InvalidTimestamp => "E2002",
            Self::MalformedDelta => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::BatchParseError => "Delta batch parse error",
            Self::InvalidTimestamp => "Invalid timestamp",
            Self::MalformedDelta => "Malformed delta",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .blame/config.toml and retry."),
            Self::BatchParseError => {
                Some("Supply a JSON array of deltas or an object with a `Results` array.")
            }
            Self::InvalidTimestamp => {
                Some("Use RFC 3339 (2016-03-01T08:00:00Z) or a plain date (2016-03-01).")
            }
            Self::MalformedDelta => {
                Some("Every column must have exactly one value per entry in `RecId`.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A delta that cannot be ingested. The store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeltaError {
    /// The value payload has no `RecId` column.
    #[error("delta version {version} has no RecId column")]
    MissingRecordIds { version: u64 },

    /// A data column does not line up with `RecId`.
    #[error(
        "delta version {version}: column '{column}' has {found} values but RecId has {expected}"
    )]
    ColumnLengthMismatch {
        version: u64,
        column: String,
        expected: usize,
        found: usize,
    },
}

impl DeltaError {
    /// Error code shared by every malformed-delta variant.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::MalformedDelta
    }
}

/// Failure while building a view. The partially built view is discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The delta at `index` in the raw sequence was rejected.
    #[error("delta #{index} rejected: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: DeltaError,
    },
}

impl ViewError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed { .. } => ErrorCode::MalformedDelta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::BatchParseError,
            ErrorCode::InvalidTimestamp,
            ErrorCode::MalformedDelta,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::MalformedDelta.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn length_mismatch_message_names_column_and_counts() {
        let err = DeltaError::ColumnLengthMismatch {
            version: 7,
            column: "Status".into(),
            expected: 3,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("version 7"));
        assert!(msg.contains("'Status'"));
        assert!(msg.contains("2 values"));
        assert!(msg.contains("has 3"));
        assert_eq!(err.code(), ErrorCode::MalformedDelta);
    }

    #[test]
    fn view_error_wraps_delta_error() {
        let err = ViewError::Malformed {
            index: 4,
            source: DeltaError::MissingRecordIds { version: 2 },
        };
        assert_eq!(err.to_string(), "delta #4 rejected: delta version 2 has no RecId column");
        assert_eq!(err.code().code(), "E3001");
    }
}
