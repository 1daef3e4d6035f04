//! `dragboard check`: ask the policy about a hover without dropping.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use dragboard_core::config::BoardConfig;
use dragboard_core::model::{ItemId, Location};
use dragboard_core::policy::Rejection;
use dragboard_core::session::{Board, SessionState};
use serde::Serialize;

use super::{apply_selection, drag_source_at, parse_location};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dragboard check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Slot the drag starts from, as `<list>:<index>`.
    #[arg(long, value_parser = parse_location)]
    pub from: Location,

    /// Slot the pointer hovers over, as `<list>:<index>`.
    #[arg(long, value_parser = parse_location)]
    pub to: Location,

    /// Select an item before the drag starts. Repeatable.
    #[arg(long = "select", value_name = "ITEM")]
    pub select: Vec<ItemId>,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    item: ItemId,
    from: Location,
    to: Location,
    selection: Vec<ItemId>,
    allowed: bool,
    invalid_item_id: Option<ItemId>,
    rejection: Option<Rejection>,
}

/// Execute `dragboard check`.
pub fn run_check(args: &CheckArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let mut board = Board::new(config);
    apply_selection(&mut board, &args.select)?;

    let source = drag_source_at(&board, args.from)?;
    let item = source.item_id.clone();
    board.drag_start(source);
    board.drag_update(Some(args.to));

    let (invalid_item_id, rejection) = match board.state() {
        SessionState::Dragging(session) => (
            session.invalid_item_id().cloned(),
            session.rejection().cloned(),
        ),
        SessionState::Idle => (None, None),
    };

    let out = CheckOutput {
        item,
        from: args.from,
        to: args.to,
        selection: board.selection().iter().cloned().collect(),
        allowed: rejection.is_none(),
        invalid_item_id,
        rejection,
    };
    render_mode(output, &out, write_text, write_pretty)
}

fn write_text(out: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "check item={} from={} to={} selected={} allowed={}",
        out.item,
        out.from,
        out.to,
        out.selection.len(),
        out.allowed
    )?;
    if let Some(rejection) = &out.rejection {
        writeln!(w, "rejected reason=\"{rejection}\"")?;
    }
    Ok(())
}

fn write_pretty(out: &CheckOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Check {}", out.item))?;
    pretty_kv(w, "From", out.from.to_string())?;
    pretty_kv(w, "To", out.to.to_string())?;
    if !out.selection.is_empty() {
        let ids: Vec<&str> = out.selection.iter().map(ItemId::as_str).collect();
        pretty_kv(w, "Selection", ids.join(", "))?;
    }
    match &out.rejection {
        None => pretty_kv(w, "Verdict", "drop allowed"),
        Some(rejection) => {
            pretty_kv(w, "Verdict", "drop rejected")?;
            pretty_kv(w, "Reason", rejection.to_string())
        }
    }
}
