//! `blame users`: per-user edit counts.

use std::io::{self, Write};

use blame_core::config::BlameConfig;
use blame_core::{Session, UserSummary};
use clap::Args;
use serde::Serialize;

use super::common::SourceArgs;
use crate::output::{OutputMode, pretty_section, pretty_table, render_mode};

/// Arguments for `blame users`.
#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct UsersReport<'a> {
    deltas: usize,
    users: Vec<UserSummary<'a>>,
}

/// Execute `blame users`.
pub fn run_users(
    args: &UsersArgs,
    output: OutputMode,
    config: &BlameConfig,
) -> anyhow::Result<()> {
    let raw = args.source.load()?;
    let mut session = Session::new(&raw, config.store.discrete_columns.clone());
    let view = session.apply(args.source.predicate()?)?;

    let report = UsersReport {
        deltas: view.filtered.len(),
        users: view.user_summaries(),
    };
    render_mode(output, &report, render_text, render_pretty)
}

fn render_text(report: &UsersReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for row in &report.users {
        writeln!(w, "{}\t{}\t{}", row.user, row.edits, row.records)?;
    }
    Ok(())
}

fn render_pretty(report: &UsersReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Edits by user ({} deltas)", report.deltas))?;
    let rows: Vec<Vec<String>> = report
        .users
        .iter()
        .map(|row| {
            vec![
                row.user.to_string(),
                row.edits.to_string(),
                row.records.to_string(),
            ]
        })
        .collect();
    pretty_table(w, &["User", "Edits", "Records"], &rows)
}
