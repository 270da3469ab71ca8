//! Arguments and loading shared by every view command.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use blame_core::delta::parse_instant;
use blame_core::{Delta, FilterPredicate, parse_batch};
use clap::Args;

/// Where the deltas come from and which of them to keep.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Delta batch JSON file, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    pub deltas: PathBuf,

    /// Only keep deltas authored by this user.
    #[arg(long)]
    pub user: Option<String>,

    /// Only keep deltas at or after this instant (RFC 3339 or `YYYY-MM-DD`).
    #[arg(long, value_name = "WHEN")]
    pub since: Option<String>,

    /// Only keep deltas at or before this instant (RFC 3339 or `YYYY-MM-DD`).
    #[arg(long, value_name = "WHEN")]
    pub until: Option<String>,
}

impl SourceArgs {
    /// Build the filter these flags describe.
    ///
    /// # Errors
    ///
    /// Fails if `--since` or `--until` is not a recognised timestamp.
    pub fn predicate(&self) -> anyhow::Result<FilterPredicate> {
        let since = self
            .since
            .as_deref()
            .map(parse_instant)
            .transpose()
            .context("invalid --since")?;
        let until = self
            .until
            .as_deref()
            .map(parse_instant)
            .transpose()
            .context("invalid --until")?;

        Ok(FilterPredicate::identity()
            .with_user(self.user.clone().unwrap_or_default())
            .with_range(since, until))
    }

    /// Read and parse the delta batch.
    ///
    /// # Errors
    ///
    /// Fails if the source cannot be read or is not a delta batch.
    pub fn load(&self) -> anyhow::Result<Vec<Delta>> {
        let raw = read_source(&self.deltas)?;
        let deltas = parse_batch(&raw)
            .with_context(|| format!("Failed to parse {}", self.deltas.display()))?;
        tracing::debug!(count = deltas.len(), source = %self.deltas.display(), "loaded deltas");
        Ok(deltas)
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read deltas from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SourceArgs {
        SourceArgs {
            deltas: PathBuf::from("batch.json"),
            ..SourceArgs::default()
        }
    }

    #[test]
    fn no_flags_is_identity() {
        assert!(args().predicate().expect("predicate").is_identity());
    }

    #[test]
    fn flags_populate_predicate() {
        let source = SourceArgs {
            user: Some("alice".into()),
            since: Some("2016-03-01".into()),
            until: Some("2016-03-31T23:59:59Z".into()),
            ..args()
        };
        let predicate = source.predicate().expect("predicate");
        assert_eq!(predicate.user, "alice");
        assert!(predicate.timestamp_start.is_some());
        assert!(predicate.timestamp_end.is_some());
    }

    #[test]
    fn bad_timestamp_names_the_flag() {
        let source = SourceArgs {
            until: Some("next tuesday".into()),
            ..args()
        };
        let err = source.predicate().unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid --until"));
    }

    #[test]
    fn missing_file_is_reported() {
        let source = SourceArgs {
            deltas: PathBuf::from("/definitely/not/here.json"),
            ..args()
        };
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
