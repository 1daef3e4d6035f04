//! Commit a validated drop into the registry.
//!
//! Two shapes of commit:
//!
//! - **Single item** (empty selection): a same-list drop reorders by index, a
//!   cross-list drop moves the dragged item, located by id in its source list.
//! - **Group** (non-empty selection): every selected item is taken out of
//!   whatever list currently holds it, then the whole group is inserted as one
//!   contiguous block at the destination index, in selection order.
//!
//! The engine does not consult the policy or clear the selection; both are
//! the session's job.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BoardError;
use crate::model::{ItemId, ListId, Location};
use crate::registry::ListRegistry;
use crate::selection::SelectionSet;

/// The item a drag started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSource {
    #[serde(flatten)]
    pub location: Location,
    pub item_id: ItemId,
}

impl DragSource {
    #[must_use]
    pub const fn new(location: Location, item_id: ItemId) -> Self {
        Self { location, item_id }
    }
}

/// What a successful commit changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CommitOutcome {
    Reordered {
        list: ListId,
        from: usize,
        to: usize,
    },
    Moved {
        item: ItemId,
        from: Location,
        to: Location,
    },
    GroupMoved {
        items: Vec<ItemId>,
        destination: Location,
    },
}

/// Apply a drop of `source` onto `destination`.
///
/// # Errors
///
/// Returns a [`BoardError`] and leaves the registry untouched when the drop
/// refers to stale positions: the dragged item is no longer at its source
/// slot, or none of the selected items are on the board.
pub fn commit(
    registry: &mut ListRegistry,
    selection: &SelectionSet,
    source: &DragSource,
    destination: Location,
) -> Result<CommitOutcome, BoardError> {
    if selection.is_empty() {
        commit_single(registry, source, destination)
    } else {
        commit_group(registry, selection, destination)
    }
}

fn commit_single(
    registry: &mut ListRegistry,
    source: &DragSource,
    destination: Location,
) -> Result<CommitOutcome, BoardError> {
    let from = source.location;

    if from.list == destination.list {
        let at_source = registry.item_at(from).map(|item| &item.id);
        if at_source != Some(&source.item_id) {
            debug!(item = %source.item_id, %from, "reorder ignored: source slot is stale");
            return Err(BoardError::ItemNotInList {
                item: source.item_id.clone(),
                list: from.list,
            });
        }
        registry.reorder(from.list, from.index, destination.index)?;
        let to = registry
            .position_in(from.list, &source.item_id)
            .unwrap_or(destination.index);
        info!(list = %from.list, from = from.index, to, "reordered item");
        return Ok(CommitOutcome::Reordered {
            list: from.list,
            from: from.index,
            to,
        });
    }

    let (left, landed) =
        registry.move_item(&source.item_id, from.list, destination.list, destination.index)?;
    info!(item = %source.item_id, from = %left, to = %landed, "moved item");
    Ok(CommitOutcome::Moved {
        item: source.item_id.clone(),
        from: left,
        to: landed,
    })
}

fn commit_group(
    registry: &mut ListRegistry,
    selection: &SelectionSet,
    destination: Location,
) -> Result<CommitOutcome, BoardError> {
    let present: Vec<&ItemId> = selection.iter().filter(|id| registry.contains(id)).collect();
    if present.is_empty() {
        debug!(selected = selection.len(), "group move ignored: no selected item on the board");
        return Err(BoardError::EmptyGroup);
    }
    if present.len() < selection.len() {
        debug!(
            selected = selection.len(),
            present = present.len(),
            "group move skipping ids no longer on the board"
        );
    }

    let mut moving = Vec::with_capacity(present.len());
    for id in &present {
        // Presence was checked above and ids are unique, so every take succeeds.
        if let Some((_, item)) = registry.take(id) {
            moving.push(item);
        }
    }

    let items: Vec<ItemId> = moving.iter().map(|item| item.id.clone()).collect();
    let landed = registry.insert_block(destination.list, destination.index, moving);
    info!(count = items.len(), destination = %landed, "moved group");
    Ok(CommitOutcome::GroupMoved {
        items,
        destination: landed,
    })
}

#[cfg(test)]
mod tests {
    use super::{CommitOutcome, DragSource, commit};
    use crate::error::BoardError;
    use crate::model::{ItemId, ListId, Location};
    use crate::registry::ListRegistry;
    use crate::selection::SelectionSet;

    fn ids(registry: &ListRegistry, list: ListId) -> Vec<u64> {
        registry.ids(list).map(ItemId::number).collect()
    }

    fn source(list: ListId, index: usize, n: u64) -> DragSource {
        DragSource::new(Location::new(list, index), ItemId::numbered(n))
    }

    #[test]
    fn same_list_drop_reorders() {
        let mut registry = ListRegistry::seeded(5);
        let outcome = commit(
            &mut registry,
            &SelectionSet::new(),
            &source(ListId::First, 1, 1),
            Location::new(ListId::First, 3),
        )
        .unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Reordered {
                list: ListId::First,
                from: 1,
                to: 3
            }
        );
        assert_eq!(ids(&registry, ListId::First), vec![0, 2, 3, 1, 4]);
    }

    #[test]
    fn cross_list_drop_moves() {
        let mut registry = ListRegistry::seeded(5);
        let outcome = commit(
            &mut registry,
            &SelectionSet::new(),
            &source(ListId::Second, 2, 7),
            Location::new(ListId::Fourth, 0),
        )
        .unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Moved {
                item: ItemId::numbered(7),
                from: Location::new(ListId::Second, 2),
                to: Location::new(ListId::Fourth, 0),
            }
        );
        assert_eq!(ids(&registry, ListId::Second), vec![5, 6, 8, 9]);
        assert_eq!(ids(&registry, ListId::Fourth), vec![7]);
    }

    #[test]
    fn stale_reorder_source_is_rejected() {
        let mut registry = ListRegistry::seeded(5);
        let before = registry.clone();
        // item-3 is not at list-1[1].
        let err = commit(
            &mut registry,
            &SelectionSet::new(),
            &source(ListId::First, 1, 3),
            Location::new(ListId::First, 4),
        )
        .unwrap_err();
        assert!(matches!(err, BoardError::ItemNotInList { .. }));
        assert_eq!(registry, before);
    }

    #[test]
    fn cross_list_move_finds_item_by_id() {
        let mut registry = ListRegistry::seeded(5);
        // Index is stale but the id is still in list-1.
        let outcome = commit(
            &mut registry,
            &SelectionSet::new(),
            &source(ListId::First, 0, 3),
            Location::new(ListId::Third, 0),
        )
        .unwrap();
        assert_eq!(
            outcome,
            CommitOutcome::Moved {
                item: ItemId::numbered(3),
                from: Location::new(ListId::First, 3),
                to: Location::new(ListId::Third, 0),
            }
        );
        assert_eq!(ids(&registry, ListId::First), vec![0, 1, 2, 4]);
        assert_eq!(ids(&registry, ListId::Third), vec![3]);
    }

    #[test]
    fn group_move_keeps_selection_order() {
        let mut registry = ListRegistry::seeded(5);
        let mut selection = SelectionSet::new();
        selection.toggle(&ItemId::numbered(1));
        selection.toggle(&ItemId::numbered(3));

        let outcome = commit(
            &mut registry,
            &selection,
            &source(ListId::First, 1, 1),
            Location::new(ListId::Second, 0),
        )
        .unwrap();

        assert_eq!(ids(&registry, ListId::First), vec![0, 2, 4]);
        assert_eq!(ids(&registry, ListId::Second), vec![1, 3, 5, 6, 7, 8, 9]);
        assert_eq!(
            outcome,
            CommitOutcome::GroupMoved {
                items: vec![ItemId::numbered(1), ItemId::numbered(3)],
                destination: Location::new(ListId::Second, 0),
            }
        );
    }

    #[test]
    fn group_move_gathers_from_several_lists() {
        let mut registry = ListRegistry::seeded(5);
        let mut selection = SelectionSet::new();
        selection.toggle(&ItemId::numbered(8));
        selection.toggle(&ItemId::numbered(0));

        commit(
            &mut registry,
            &selection,
            &source(ListId::First, 0, 0),
            Location::new(ListId::Fourth, 0),
        )
        .unwrap();
        assert_eq!(ids(&registry, ListId::First), vec![1, 2, 3, 4]);
        assert_eq!(ids(&registry, ListId::Second), vec![5, 6, 7, 9]);
        assert_eq!(ids(&registry, ListId::Fourth), vec![8, 0]);
    }

    #[test]
    fn group_move_within_one_list_clamps_after_removal() {
        let mut registry = ListRegistry::seeded(5);
        let mut selection = SelectionSet::new();
        selection.toggle(&ItemId::numbered(1));
        selection.toggle(&ItemId::numbered(3));

        commit(
            &mut registry,
            &selection,
            &source(ListId::First, 1, 1),
            Location::new(ListId::First, 4),
        )
        .unwrap();
        assert_eq!(ids(&registry, ListId::First), vec![0, 2, 4, 1, 3]);
        assert_eq!(registry.total_items(), 10);
    }

    #[test]
    fn group_of_missing_ids_is_rejected() {
        let mut registry = ListRegistry::seeded(5);
        let before = registry.clone();
        let mut selection = SelectionSet::new();
        selection.toggle(&ItemId::numbered(42));

        let err = commit(
            &mut registry,
            &selection,
            &source(ListId::First, 0, 0),
            Location::new(ListId::Second, 0),
        )
        .unwrap_err();
        assert_eq!(err, BoardError::EmptyGroup);
        assert_eq!(registry, before);
    }
}
