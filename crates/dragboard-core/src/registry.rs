//! Fixed set of named, ordered item lists.
//!
//! The registry is the only owner of items. Every mutation either applies in
//! full or returns an error with the registry untouched, so a stale drag event
//! can never leave an item duplicated or orphaned.
//!
//! # Invariants
//!
//! - Every item id appears in exactly one list.
//! - The total item count is conserved by [`ListRegistry::reorder`] and
//!   [`ListRegistry::move_item`].

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::model::{Item, ItemId, ListId, Location};

/// Number of items in each pre-populated list of a fresh board.
pub const DEFAULT_ITEMS_PER_LIST: usize = 5;

/// Largest seed a board accepts per pre-populated list.
pub const MAX_ITEMS_PER_LIST: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListRegistry {
    lists: [Vec<Item>; 4],
}

/// Serializable view of one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub id: ListId,
    pub title: &'static str,
    pub items: Vec<Item>,
}

impl ListRegistry {
    /// Create a registry with four empty lists.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The startup board: `items_per_list` items in each of the first two
    /// lists (`item-0` onward), the other two lists empty.
    ///
    /// Sizes above [`MAX_ITEMS_PER_LIST`] are clamped to it.
    #[must_use]
    pub fn seeded(items_per_list: usize) -> Self {
        if items_per_list > MAX_ITEMS_PER_LIST {
            warn!(
                requested = items_per_list,
                max = MAX_ITEMS_PER_LIST,
                "seed size clamped"
            );
        }
        let n = items_per_list.min(MAX_ITEMS_PER_LIST) as u64;
        let end = n.saturating_mul(2);
        let mut registry = Self::empty();
        registry.lists[ListId::First.index()] = (0..n).map(Item::numbered).collect();
        registry.lists[ListId::Second.index()] = (n..end).map(Item::numbered).collect();
        registry
    }

    /// Build a registry from explicit list contents.
    ///
    /// Lists not mentioned stay empty. A list mentioned twice keeps the last
    /// contents given for it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateItem`] if any id appears more than once.
    pub fn from_lists(lists: impl IntoIterator<Item = (ListId, Vec<Item>)>) -> Result<Self, BoardError> {
        let mut registry = Self::empty();
        for (id, items) in lists {
            registry.lists[id.index()] = items;
        }
        registry.check_integrity()?;
        Ok(registry)
    }

    #[must_use]
    pub fn get(&self, list: ListId) -> &[Item] {
        &self.lists[list.index()]
    }

    #[must_use]
    pub fn len(&self, list: ListId) -> usize {
        self.lists[list.index()].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Iterate lists in board order.
    pub fn iter(&self) -> impl Iterator<Item = (ListId, &[Item])> {
        ListId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Ids of one list, in order.
    pub fn ids(&self, list: ListId) -> impl Iterator<Item = &ItemId> {
        self.get(list).iter().map(|item| &item.id)
    }

    #[must_use]
    pub fn item_at(&self, location: Location) -> Option<&Item> {
        self.get(location.list).get(location.index)
    }

    #[must_use]
    pub fn position_in(&self, list: ListId, id: &ItemId) -> Option<usize> {
        self.get(list).iter().position(|item| &item.id == id)
    }

    /// Find the current slot of an item anywhere on the board.
    #[must_use]
    pub fn locate(&self, id: &ItemId) -> Option<Location> {
        ListId::ALL.into_iter().find_map(|list| {
            self.position_in(list, id)
                .map(|index| Location::new(list, index))
        })
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.locate(id).is_some()
    }

    /// Move the item at `from` to `to` within one list.
    ///
    /// `to` is clamped to the last slot of the list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::IndexOutOfRange`] if `from` is not a valid slot.
    pub fn reorder(&mut self, list: ListId, from: usize, to: usize) -> Result<(), BoardError> {
        let items = &mut self.lists[list.index()];
        let len = items.len();
        if from >= len {
            debug!(%list, from, len, "reorder ignored: source index out of range");
            return Err(BoardError::IndexOutOfRange {
                list,
                index: from,
                len,
            });
        }

        let to = to.min(len - 1);
        if from != to {
            let item = items.remove(from);
            items.insert(to, item);
        }
        Ok(())
    }

    /// Move an item, located by id in `from`, to `to_index` of `to`.
    ///
    /// `to_index` is clamped to `[0, len]` of the destination after the item
    /// has been removed. Returns the slot the item left and the slot it
    /// landed in.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ItemNotInList`] if the item is not currently in
    /// `from`.
    pub fn move_item(
        &mut self,
        id: &ItemId,
        from: ListId,
        to: ListId,
        to_index: usize,
    ) -> Result<(Location, Location), BoardError> {
        let Some(position) = self.position_in(from, id) else {
            debug!(item = %id, list = %from, "move ignored: item not in source list");
            return Err(BoardError::ItemNotInList {
                item: id.clone(),
                list: from,
            });
        };

        let item = self.lists[from.index()].remove(position);
        let landed = self.insert_block(to, to_index, vec![item]);
        Ok((Location::new(from, position), landed))
    }

    /// Remove an item wherever it is.
    pub(crate) fn take(&mut self, id: &ItemId) -> Option<(Location, Item)> {
        let location = self.locate(id)?;
        let item = self.lists[location.list.index()].remove(location.index);
        Some((location, item))
    }

    /// Insert `items` contiguously at `index` (clamped to the list length).
    /// Returns the slot of the first inserted item.
    pub(crate) fn insert_block(&mut self, list: ListId, index: usize, items: Vec<Item>) -> Location {
        let target = &mut self.lists[list.index()];
        let index = index.min(target.len());
        target.splice(index..index, items);
        Location::new(list, index)
    }

    /// Verify that no id appears twice across the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateItem`] naming the first repeated id.
    pub fn check_integrity(&self) -> Result<(), BoardError> {
        let mut seen = HashSet::with_capacity(self.total_items());
        for item in self.lists.iter().flatten() {
            if !seen.insert(&item.id) {
                return Err(BoardError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(())
    }

    /// Serializable copy of every list, in board order.
    #[must_use]
    pub fn views(&self) -> Vec<ListView> {
        self.iter()
            .map(|(id, items)| ListView {
                id,
                title: id.title(),
                items: items.to_vec(),
            })
            .collect()
    }
}
