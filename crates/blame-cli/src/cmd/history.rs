//! `blame history`: drill into one cell.

use std::io::{self, Write};

use blame_core::config::BlameConfig;
use blame_core::store::CellEdit;
use blame_core::{RecordId, Session};
use clap::Args;
use serde::Serialize;

use super::common::SourceArgs;
use crate::output::{OutputMode, pretty_section, pretty_table, render_mode};

/// Arguments for `blame history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Record id of the cell.
    #[arg(long)]
    pub rec: String,

    /// Column of the cell.
    #[arg(long)]
    pub column: String,
}

#[derive(Debug, Serialize)]
struct HistoryReport<'a> {
    rec_id: &'a RecordId,
    column: &'a str,
    latest: Option<&'a str>,
    editors: Vec<&'a str>,
    edits: Vec<CellEdit<'a>>,
}

/// Execute `blame history`.
pub fn run_history(
    args: &HistoryArgs,
    output: OutputMode,
    config: &BlameConfig,
) -> anyhow::Result<()> {
    let raw = args.source.load()?;
    let mut session = Session::new(&raw, config.store.discrete_columns.clone());
    let view = session.apply(args.source.predicate()?)?;

    let rec_id = RecordId::new(args.rec.as_str());
    let report = HistoryReport {
        rec_id: &rec_id,
        column: &args.column,
        latest: view
            .store
            .latest_value(&rec_id, &args.column)
            .map(|v| v.as_str()),
        editors: view.store.editors(&rec_id, &args.column),
        edits: view.store.cell_edits(&rec_id, &args.column),
    };
    render_mode(output, &report, render_text, render_pretty)
}

fn edit_cells(edit: &CellEdit<'_>) -> Vec<String> {
    vec![
        edit.version.to_string(),
        edit.timestamp.to_rfc3339(),
        edit.user.to_string(),
        edit.app.to_string(),
        edit.value.map(ToString::to_string).unwrap_or_default(),
    ]
}

fn render_text(report: &HistoryReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for edit in &report.edits {
        writeln!(w, "{}", edit_cells(edit).join("\t"))?;
    }
    Ok(())
}

fn render_pretty(report: &HistoryReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Cell {} / {}", report.rec_id, report.column))?;
    if report.edits.is_empty() {
        return writeln!(w, "(never edited)");
    }
    writeln!(w, "latest:  {}", report.latest.unwrap_or_default())?;
    writeln!(
        w,
        "editors: {} ({})",
        report.editors.len(),
        report.editors.join(", ")
    )?;
    writeln!(w)?;
    let rows: Vec<Vec<String>> = report.edits.iter().map(edit_cells).collect();
    pretty_table(w, &["Version", "Timestamp", "User", "App", "Value"], &rows)
}
