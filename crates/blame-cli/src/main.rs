#![forbid(unsafe_code)]

mod cmd;
mod output;

use blame_core::config::{BlameConfig, resolve_config};
use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "blame: who edited which cell, and who fought over it",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (same as setting `DEBUG`). `BLAME_LOG` still wins.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the project/user lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Show the latest grid",
        long_about = "Show the latest value of every cell, annotated with change and editor counts.",
        after_help = "EXAMPLES:\n    # Latest grid of a batch file\n    blame grid --deltas batch.json\n\n    # Only what alice wrote in March\n    blame grid --deltas batch.json --user alice --since 2016-03-01 --until 2016-03-31"
    )]
    Grid(cmd::grid::GridArgs),

    #[command(
        about = "Show every edit of one cell",
        after_help = "EXAMPLES:\n    blame history --deltas batch.json --rec 101 --column Status"
    )]
    History(cmd::history::HistoryArgs),

    #[command(
        about = "Show per-user edit counts",
        after_help = "EXAMPLES:\n    blame users --deltas batch.json --json"
    )]
    Users(cmd::users::UsersArgs),

    #[command(
        about = "Show value histograms for discrete columns",
        after_help = "EXAMPLES:\n    # Every discrete column\n    blame tally --deltas batch.json\n\n    # One column\n    blame tally Gender --deltas batch.json"
    )]
    Tally(cmd::tally::TallyArgs),

    #[command(about = "List the data columns written by the batch")]
    Columns(cmd::columns::ColumnsArgs),
}

const DEFAULT_LOG_FILTER: &str = "blame=info,blame_core=info,warn";
const DEBUG_LOG_FILTER: &str = "blame=debug,blame_core=debug,info";

/// Filter used when `BLAME_LOG` is unset.
const fn default_log_filter(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        DEBUG_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BLAME_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_log_filter(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("BLAME_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let config: BlameConfig = resolve_config(&project_root, cli.config.as_deref())?;

    match &cli.command {
        Commands::Grid(args) => cmd::grid::run_grid(args, output, &config),
        Commands::History(args) => cmd::history::run_history(args, output, &config),
        Commands::Users(args) => cmd::users::run_users(args, output, &config),
        Commands::Tally(args) => cmd::tally::run_tally(args, output, &config),
        Commands::Columns(args) => cmd::columns::run_columns(args, output, &config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "parsed arguments");

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &CliError::from_anyhow(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
