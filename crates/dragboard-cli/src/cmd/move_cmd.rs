//! `dragboard move`: run one complete drag gesture against a fresh board.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use dragboard_core::config::BoardConfig;
use dragboard_core::engine::CommitOutcome;
use dragboard_core::model::{ItemId, Location};
use dragboard_core::session::{AbortReason, Board, DropOutcome, DropReport};
use tracing::debug;

use super::show::{write_board_pretty, write_board_text};
use super::{apply_selection, drag_source_at, parse_location};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dragboard move`.
#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Slot the drag starts from, as `<list>:<index>`.
    #[arg(long, value_parser = parse_location)]
    pub from: Location,

    /// Slot the item is released over. Omit to release outside every list.
    #[arg(long, value_parser = parse_location)]
    pub to: Option<Location>,

    /// Hover over this slot before releasing. Repeatable, applied in order.
    #[arg(long, value_parser = parse_location, value_name = "LOCATION")]
    pub via: Vec<Location>,

    /// Select an item before the drag starts. Repeatable.
    #[arg(long = "select", value_name = "ITEM")]
    pub select: Vec<ItemId>,
}

/// Execute `dragboard move`.
pub fn run_move(args: &MoveArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let mut board = Board::new(config);
    apply_selection(&mut board, &args.select)?;

    board.drag_start(drag_source_at(&board, args.from)?);
    for hover in &args.via {
        debug!(%hover, "hover");
        board.drag_update(Some(*hover));
    }
    board.drag_update(args.to);
    let report = board.drop_on(args.to);

    render_mode(output, &report, write_text, write_pretty)
}

/// One-line summary of a drop outcome.
pub fn describe_outcome(outcome: &DropOutcome) -> String {
    match outcome {
        DropOutcome::Committed { commit } => match commit {
            CommitOutcome::Reordered { list, from, to } => {
                format!("reordered {list} from {from} to {to}")
            }
            CommitOutcome::Moved { item, from, to } => format!("moved {item} from {from} to {to}"),
            CommitOutcome::GroupMoved { items, destination } => {
                format!("moved {} items to {destination}", items.len())
            }
        },
        DropOutcome::Aborted { abort } => match abort {
            AbortReason::NoDestination => "aborted: released outside every list".to_string(),
            AbortReason::Rejected { rejection } => format!("aborted: {rejection}"),
            AbortReason::NoSession => "aborted: no drag in progress".to_string(),
            AbortReason::Stale { code, message } => format!("aborted: {message} ({code})"),
        },
    }
}

fn write_text(report: &DropReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "drop committed={} summary=\"{}\"",
        report.outcome.is_committed(),
        describe_outcome(&report.outcome)
    )?;
    write_board_text(&report.snapshot, w)
}

fn write_pretty(report: &DropReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Drop")?;
    pretty_kv(w, "Outcome", describe_outcome(&report.outcome))?;
    writeln!(w)?;
    write_board_pretty(&report.snapshot, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragboard_core::model::ListId;
    use dragboard_core::policy::Rejection;

    #[test]
    fn describes_commits() {
        let outcome = DropOutcome::Committed {
            commit: CommitOutcome::Moved {
                item: ItemId::numbered(2),
                from: Location::new(ListId::First, 2),
                to: Location::new(ListId::Fourth, 0),
            },
        };
        assert_eq!(
            describe_outcome(&outcome),
            "moved item-2 from list-1[2] to list-4[0]"
        );
    }

    #[test]
    fn describes_rejections() {
        let outcome = DropOutcome::Aborted {
            abort: AbortReason::Rejected {
                rejection: Rejection::ListPairBan {
                    from: ListId::First,
                    to: ListId::Third,
                },
            },
        };
        assert_eq!(
            describe_outcome(&outcome),
            "aborted: moves from list-1 to list-3 are not allowed"
        );
    }
}
