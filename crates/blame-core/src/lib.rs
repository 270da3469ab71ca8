//! blame-core library.
//!
//! Folds a batch of cell-level edit records ([`Delta`]s) into derived views:
//! a compacted latest-value grid, per-cell contention, per-user edit counts
//! and category histograms for discrete columns.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for library failures, `anyhow::Result`
//!   where a file is read (config loading).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod delta;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod store;
pub mod summary;

pub use delta::{CellValue, Delta, DeltaValue, RecordId, parse_batch};
pub use error::{DeltaError, ErrorCode, ViewError};
pub use filter::FilterPredicate;
pub use pipeline::{FilterPhase, Session, View, build_view};
pub use store::{DeltaStore, DiscreteColumns};
pub use summary::{UserSummary, per_user_edit_counts, per_user_records_touched, user_summaries};
