//! `blame grid`: the latest value of every cell.

use std::io::{self, Write};

use blame_core::config::BlameConfig;
use blame_core::store::GridRow;
use blame_core::{FilterPredicate, Session};
use clap::Args;
use serde::Serialize;

use super::common::SourceArgs;
use crate::output::{OutputMode, pretty_section, pretty_table, render_mode};

/// Arguments for `blame grid`.
#[derive(Args, Debug)]
pub struct GridArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only show records with at least one contended cell.
    #[arg(long)]
    pub contended: bool,
}

#[derive(Debug, Serialize)]
struct GridReport<'a> {
    filter: &'a FilterPredicate,
    deltas: usize,
    columns: Vec<&'a str>,
    rows: Vec<GridRow<'a>>,
}

/// Execute `blame grid`.
pub fn run_grid(
    args: &GridArgs,
    output: OutputMode,
    config: &BlameConfig,
) -> anyhow::Result<()> {
    let raw = args.source.load()?;
    let mut session = Session::new(&raw, config.store.discrete_columns.clone());
    let view = session.apply(args.source.predicate()?)?;

    let mut rows = view.store.grid_rows(config.contention.min_editors);
    if args.contended {
        rows.retain(|row| row.cells.iter().any(|cell| cell.contended));
    }

    let report = GridReport {
        filter: session.filter(),
        deltas: view.filtered.len(),
        columns: view.store.display_columns(),
        rows,
    };
    render_mode(output, &report, render_text, render_pretty)
}

fn cells(row: &GridRow<'_>) -> Vec<String> {
    std::iter::once(row.rec_id.to_string())
        .chain(row.cells.iter().map(|cell| cell.annotated()))
        .collect()
}

fn render_text(report: &GridReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", report.columns.join("\t"))?;
    for row in &report.rows {
        writeln!(w, "{}", cells(row).join("\t"))?;
    }
    Ok(())
}

fn render_pretty(report: &GridReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Latest grid: {} records from {} deltas",
            report.rows.len(),
            report.deltas
        ),
    )?;
    if report.rows.is_empty() {
        return writeln!(w, "(no records)");
    }
    let rows: Vec<Vec<String>> = report.rows.iter().map(cells).collect();
    pretty_table(w, &report.columns, &rows)
}
