//! `dragboard show` and the board renderers shared by the other commands.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use dragboard_core::config::BoardConfig;
use dragboard_core::model::ListId;
use dragboard_core::session::{Board, BoardSnapshot};

use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `dragboard show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show this list (e.g. `list-2`, `column-2`, `2`).
    #[arg(long)]
    pub list: Option<ListId>,
}

/// Execute `dragboard show`.
pub fn run_show(args: &ShowArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let mut snapshot = Board::new(config).snapshot();
    if let Some(only) = args.list {
        snapshot.lists.retain(|view| view.id == only);
    }

    render_mode(output, &snapshot, write_board_text, write_board_pretty)
}

/// One `list` line per list and one `item` line per item.
pub fn write_board_text(snapshot: &BoardSnapshot, w: &mut dyn Write) -> io::Result<()> {
    for view in &snapshot.lists {
        writeln!(w, "list id={} items={}", view.id, view.items.len())?;
        for (index, item) in view.items.iter().enumerate() {
            writeln!(
                w,
                "item list={} index={index} id={} selected={} highlighted={}",
                view.id,
                item.id,
                snapshot.selection.contains(&item.id),
                snapshot.highlighted.as_ref() == Some(&item.id),
            )?;
        }
    }
    writeln!(
        w,
        "board selected={} dragging={}",
        snapshot.selection.len(),
        snapshot.dragging
    )
}

pub fn write_board_pretty(snapshot: &BoardSnapshot, w: &mut dyn Write) -> io::Result<()> {
    for (n, view) in snapshot.lists.iter().enumerate() {
        if n > 0 {
            writeln!(w)?;
        }
        pretty_section(w, &format!("{} ({})", view.title, view.id))?;
        if view.items.is_empty() {
            writeln!(w, "  (empty)")?;
        }
        for (index, item) in view.items.iter().enumerate() {
            let mut marks = String::new();
            if snapshot.selection.contains(&item.id) {
                marks.push_str(" [selected]");
            }
            if snapshot.highlighted.as_ref() == Some(&item.id) {
                marks.push_str(" [no drop]");
            }
            writeln!(w, "  {index:>3}  {:<10} {}{marks}", item.id.as_str(), item.content)?;
        }
    }
    Ok(())
}
