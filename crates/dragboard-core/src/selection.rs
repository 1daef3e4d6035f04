//! Items marked to move together on the next drop.

use serde::Serialize;

use crate::model::ItemId;
use crate::registry::ListRegistry;

/// Insertion-ordered set of selected item ids.
///
/// Group commits walk the set in the order items were selected, so order is
/// part of the observable behavior and a `Vec` is used instead of a hash set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<ItemId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present. Returns `true` when the id
    /// is selected afterwards.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are no longer anywhere on the board.
    pub fn retain_present(&mut self, registry: &ListRegistry) {
        self.ids.retain(|id| registry.contains(id));
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionSet;
    use crate::model::{ItemId, ListId};
    use crate::registry::ListRegistry;

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = SelectionSet::new();
        let id = ItemId::numbered(3);
        assert!(sel.toggle(&id));
        assert!(sel.contains(&id));
        assert!(!sel.toggle(&id));
        assert!(sel.is_empty());
    }

    #[test]
    fn keeps_selection_order() {
        let mut sel = SelectionSet::new();
        for n in [4, 1, 3] {
            sel.toggle(&ItemId::numbered(n));
        }
        sel.toggle(&ItemId::numbered(1));
        sel.toggle(&ItemId::numbered(1));
        let order: Vec<u64> = sel.iter().map(ItemId::number).collect();
        assert_eq!(order, vec![4, 3, 1]);
    }

    #[test]
    fn retain_present_prunes_stale_ids() {
        let registry = ListRegistry::seeded(5);
        let mut sel = SelectionSet::new();
        sel.toggle(&ItemId::numbered(2));
        sel.toggle(&ItemId::numbered(99));
        sel.retain_present(&registry);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(&ItemId::numbered(2)));
        assert!(registry.position_in(ListId::First, &ItemId::numbered(2)).is_some());
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut sel = SelectionSet::new();
        sel.toggle(&ItemId::numbered(1));
        sel.toggle(&ItemId::numbered(3));
        assert_eq!(serde_json::to_string(&sel).unwrap(), r#"["item-1","item-3"]"#);
    }
}
