//! `blame columns`: data columns present in the view.

use std::io::{self, Write};

use blame_core::Session;
use blame_core::config::BlameConfig;
use clap::Args;
use serde::Serialize;

use super::common::SourceArgs;
use crate::output::{OutputMode, pretty_section, pretty_table, render_mode};

/// Arguments for `blame columns`.
#[derive(Args, Debug)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct ColumnsReport<'a> {
    columns: Vec<ColumnInfo<'a>>,
}

#[derive(Debug, Serialize)]
struct ColumnInfo<'a> {
    name: &'a str,
    discrete: bool,
}

/// Execute `blame columns`.
pub fn run_columns(
    args: &ColumnsArgs,
    output: OutputMode,
    config: &BlameConfig,
) -> anyhow::Result<()> {
    let raw = args.source.load()?;
    let mut session = Session::new(&raw, config.store.discrete_columns.clone());
    let view = session.apply(args.source.predicate()?)?;

    let columns = view
        .store
        .columns()
        .into_iter()
        .map(|name| ColumnInfo {
            name,
            discrete: view.store.is_discrete_column(name),
        })
        .collect();
    render_mode(output, &ColumnsReport { columns }, render_text, render_pretty)
}

fn render_text(report: &ColumnsReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for column in &report.columns {
        writeln!(w, "{}", column.name)?;
    }
    Ok(())
}

fn render_pretty(report: &ColumnsReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{} columns", report.columns.len()))?;
    let rows: Vec<Vec<String>> = report
        .columns
        .iter()
        .map(|c| {
            let kind = if c.discrete { "discrete" } else { "" };
            vec![c.name.to_string(), kind.to_string()]
        })
        .collect();
    pretty_table(w, &["Column", "Kind"], &rows)
}
