#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use dragboard_core::config::{ResolvedConfig, resolve_config};
use dragboard_core::error::ErrorCode;
use output::{CliError, CodedError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::process;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dragboard: drag-and-drop sessions over four ordered lists",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and the FORMAT env var).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

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
        next_help_heading = "Read",
        about = "Show the starting board",
        long_about = "Show the seeded board: every list with its items in order.",
        after_help = "EXAMPLES:\n    # Show all four lists\n    dragboard show\n\n    # Show one list\n    dragboard show --list list-2\n\n    # Emit machine-readable output\n    dragboard show --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Check whether a drop would be accepted",
        long_about = "Start a drag and hover over a destination without dropping, then report\n\
                      whether the validation policy accepts it and which item it highlights.",
        after_help = "EXAMPLES:\n    # Can the first item of list-1 land in list-3?\n    dragboard check --from list-1:0 --to list-3:0\n\n    # Even item onto an even occupant\n    dragboard check --from list-1:0 --to list-2:1\n\n    # Emit machine-readable output\n    dragboard check --from 2:0 --to 4:0 --json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Gesture",
        about = "Drag and drop once on a fresh board",
        long_about = "Run one complete drag gesture (start, hovers, drop) against the seeded\n\
                      board and print the outcome with the resulting board.",
        after_help = "EXAMPLES:\n    # Move an item to the empty fourth list\n    dragboard move --from list-1:2 --to list-4:0\n\n    # Group move\n    dragboard move --select item-3 --select item-7 --from list-1:1 --to list-4:0\n\n    # Release outside every list\n    dragboard move --from list-2:0\n\n    # Emit machine-readable output\n    dragboard move --from list-1:0 --to list-1:3 --json"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Gesture",
        about = "Replay a gesture script",
        long_about = "Feed a JSON-lines gesture script to a fresh board and print each signal\n\
                      and the final board. Blank lines and lines starting with # are skipped.",
        after_help = "EXAMPLES:\n    # Replay a script file\n    dragboard replay session.jsonl\n\n    # Read from stdin, final board only\n    cat session.jsonl | dragboard replay - --summary\n\n    # Emit machine-readable output\n    dragboard replay session.jsonl --json"
    )]
    Replay(cmd::replay::ReplayArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the effective config",
        long_about = "Show the resolved config and which file it came from.",
        after_help = "EXAMPLES:\n    # Show resolved config\n    dragboard config\n\n    # Emit machine-readable output\n    dragboard config --json"
    )]
    Config,

    #[command(
        next_help_heading = "Dev",
        about = "Deterministic simulation campaigns",
        long_about = "Run or replay seeded random gesture streams against the board."
    )]
    Sim(cmd::sim::SimArgs),

    #[command(
        next_help_heading = "Dev",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    dragboard completions bash > ~/.local/share/bash-completion/completions/dragboard"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DRAGBOARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "dragboard=debug,info"
        } else {
            "dragboard=info,warn"
        })
    });

    let format = env::var("DRAGBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

fn load_config() -> anyhow::Result<ResolvedConfig> {
    let project_root = env::current_dir()?;
    let resolved = resolve_config(&project_root)
        .map_err(|err| CodedError::new(ErrorCode::ConfigParseError, format!("{err:#}")))?;
    Ok(resolved)
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    // Completions must work even when the config file is broken.
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let resolved = load_config()?;
    info!(source = ?resolved.source, "config resolved");
    let config = &resolved.config;

    match &cli.command {
        Commands::Show(args) => cmd::show::run_show(args, config, output),
        Commands::Check(args) => cmd::check::run_check(args, config, output),
        Commands::Move(args) => cmd::move_cmd::run_move(args, config, output),
        Commands::Replay(args) => cmd::replay::run_replay(args, config, output),
        Commands::Config => cmd::config::run_config(&resolved, output),
        Commands::Sim(args) => match &args.command {
            cmd::sim::SimCommand::Run(run) => cmd::sim::run_sim_run(run, config, output),
            cmd::sim::SimCommand::Replay(replay) => {
                cmd::sim::run_sim_replay(replay, config, output)
            }
        },
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }
    let output = cli.output_mode();

    if let Err(err) = run(&cli, output) {
        render_error(output, &CliError::from_anyhow(&err))?;
        process::exit(1);
    }

    Ok(())
}
