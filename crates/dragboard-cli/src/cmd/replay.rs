//! `dragboard replay`: feed a JSON-lines gesture script to a fresh board.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dragboard_core::config::BoardConfig;
use dragboard_core::error::ErrorCode;
use dragboard_core::script::{Step, parse_script, replay};
use dragboard_core::session::{Board, BoardSnapshot, Signal};
use serde::Serialize;
use tracing::info;

use super::move_cmd::describe_outcome;
use super::show::{write_board_pretty, write_board_text};
use crate::output::{CodedError, OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dragboard replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Script file with one gesture event per line, or `-` for stdin.
    pub script: PathBuf,

    /// Only print the final board, not every step.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    steps: Vec<Step>,
    events: usize,
    commits: usize,
    board: BoardSnapshot,
}

/// Execute `dragboard replay`.
pub fn run_replay(args: &ReplayArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let source = read_script(&args.script)?;
    let events = parse_script(&source)
        .map_err(|err| CodedError::new(ErrorCode::ScriptParseError, format!("{err:#}")))
        .with_context(|| format!("cannot replay {}", args.script.display()))?;

    let mut board = Board::new(config);
    let steps = replay(&mut board, events);
    let commits = steps
        .iter()
        .filter(|step| matches!(&step.signal, Signal::Settled(report) if report.outcome.is_committed()))
        .count();
    info!(events = steps.len(), commits, "script replayed");

    let out = ReplayOutput {
        events: steps.len(),
        commits,
        steps: if args.summary { Vec::new() } else { steps },
        board: board.snapshot(),
    };
    render_mode(output, &out, write_text, write_pretty)
}

fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return io::read_to_string(io::stdin()).context("failed to read script from stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// One-line summary of a signal.
fn describe_signal(signal: &Signal) -> String {
    match signal {
        Signal::Highlight {
            invalid_item_id: None,
            ..
        } => "highlight none".to_string(),
        Signal::Highlight {
            invalid_item_id: Some(item),
            rejection,
        } => match rejection {
            Some(rejection) => format!("highlight {item}: {rejection}"),
            None => format!("highlight {item}"),
        },
        Signal::SelectionChanged { selection } => format!("selection {} items", selection.len()),
        Signal::Settled(report) => describe_outcome(&report.outcome),
        Signal::Ignored { code, message } => format!("ignored: {message} ({code})"),
    }
}

fn write_text(out: &ReplayOutput, w: &mut dyn Write) -> io::Result<()> {
    for (n, step) in out.steps.iter().enumerate() {
        writeln!(w, "step={} signal=\"{}\"", n + 1, describe_signal(&step.signal))?;
    }
    writeln!(w, "replay events={} commits={}", out.events, out.commits)?;
    write_board_text(&out.board, w)
}

fn write_pretty(out: &ReplayOutput, w: &mut dyn Write) -> io::Result<()> {
    if !out.steps.is_empty() {
        pretty_section(w, "Steps")?;
        for (n, step) in out.steps.iter().enumerate() {
            writeln!(w, "{:>4}  {}", n + 1, describe_signal(&step.signal))?;
        }
        writeln!(w)?;
    }
    pretty_section(w, "Replay")?;
    pretty_kv(w, "Events", out.events.to_string())?;
    pretty_kv(w, "Commits", out.commits.to_string())?;
    writeln!(w)?;
    write_board_pretty(&out.board, w)
}
