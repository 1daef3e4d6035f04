pub mod check;
pub mod completions;
pub mod config;
pub mod move_cmd;
pub mod replay;
pub mod show;
pub mod sim;

use anyhow::{Context, Result};
use dragboard_core::engine::DragSource;
use dragboard_core::error::BoardError;
use dragboard_core::model::{ItemId, ListId, Location};
use dragboard_core::session::Board;

/// Parse a `<list>:<index>` slot such as `list-2:0` or `3:1`.
pub fn parse_location(input: &str) -> Result<Location, String> {
    let (list, index) = input
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <list>:<index>, got '{input}'"))?;
    let list: ListId = list.parse().map_err(|err: BoardError| err.to_string())?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("index '{index}' is not a non-negative integer"))?;
    Ok(Location::new(list, index))
}

/// Resolve the item a drag would pick up at `location`.
pub fn drag_source_at(board: &Board, location: Location) -> Result<DragSource> {
    let registry = board.registry();
    let item = registry
        .item_at(location)
        .ok_or_else(|| BoardError::IndexOutOfRange {
            list: location.list,
            index: location.index,
            len: registry.len(location.list),
        })
        .with_context(|| format!("no item to drag at {location}"))?;
    Ok(DragSource::new(location, item.id.clone()))
}

/// Toggle each `--select` id on, in order.
pub fn apply_selection(board: &mut Board, ids: &[ItemId]) -> Result<()> {
    for id in ids {
        board
            .toggle_selection(id)
            .with_context(|| format!("cannot select {id}"))?;
    }
    Ok(())
}
