//! `blame tally`: value histograms for discrete columns.

use std::collections::BTreeMap;
use std::io::{self, Write};

use blame_core::Session;
use blame_core::config::BlameConfig;
use clap::Args;

use super::common::SourceArgs;
use crate::output::{OutputMode, pretty_section, pretty_table, render_mode};

/// Arguments for `blame tally`.
#[derive(Args, Debug)]
pub struct TallyArgs {
    /// Only this column. Defaults to every configured discrete column.
    pub column: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

type Tallies = BTreeMap<String, BTreeMap<String, u64>>;

/// Execute `blame tally`.
pub fn run_tally(
    args: &TallyArgs,
    output: OutputMode,
    config: &BlameConfig,
) -> anyhow::Result<()> {
    let discrete = &config.store.discrete_columns;
    if let Some(column) = args.column.as_deref().filter(|c| !discrete.contains(c)) {
        tracing::warn!(column, "column is not configured as discrete; tally will be empty");
    }

    let raw = args.source.load()?;
    let mut session = Session::new(&raw, discrete.clone());
    let view = session.apply(args.source.predicate()?)?;

    let wanted: Vec<&str> = match args.column.as_deref() {
        Some(column) => vec![column],
        None => discrete.iter().collect(),
    };
    let tallies: Tallies = wanted
        .into_iter()
        .map(|column| (column.to_string(), view.store.category_tally(column).to_map()))
        .collect();

    render_mode(output, &tallies, render_text, render_pretty)
}

fn render_text(tallies: &Tallies, w: &mut dyn Write) -> io::Result<()> {
    for (column, counts) in tallies {
        for (value, count) in counts {
            writeln!(w, "{column}\t{value}\t{count}")?;
        }
    }
    Ok(())
}

fn render_pretty(tallies: &Tallies, w: &mut dyn Write) -> io::Result<()> {
    for (i, (column, counts)) in tallies.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        let total: u64 = counts.values().sum();
        pretty_section(w, &format!("{column} ({total} writes)"))?;
        if counts.is_empty() {
            writeln!(w, "(no values)")?;
            continue;
        }
        let rows: Vec<Vec<String>> = counts
            .iter()
            .map(|(value, count)| vec![value.clone(), count.to_string()])
            .collect();
        pretty_table(w, &["Value", "Count"], &rows)?;
    }
    Ok(())
}
