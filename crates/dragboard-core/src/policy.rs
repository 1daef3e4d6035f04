//! Drop-target validation.
//!
//! The policy is a pure function of (source, destination, registry). It runs
//! on every drag update so a renderer can move the "disallowed" highlight as
//! the pointer crosses targets, and once more when the drop lands.
//!
//! Rules, checked in order:
//!
//! 1. **List-pair ban**: configured `(source list, destination list)` pairs
//!    are always rejected, whatever the indices or items involved. The default
//!    bans `list-1 -> list-3`.
//! 2. **Parity clash**: when the destination index lands on an existing item
//!    (strictly inside the destination list) and both the dragged item and
//!    that occupant have even numeric suffixes, the drop is rejected.
//!    Appending at or past the end never clashes. An even item hovering its
//!    own slot counts as landing on an even occupant.
//!
//! The dragged item is the one named by the [`DragSource`], not whatever
//! currently sits at its source slot: the engine moves that id, so the policy
//! judges that id too.
//!
//! A missing destination is never invalid; it aborts at drop time instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::DragSource;
use crate::model::{ItemId, ListId, Location};
use crate::registry::ListRegistry;
use crate::selection::SelectionSet;

/// Why a destination was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Rejection {
    ListPairBan { from: ListId, to: ListId },
    ParityClash { dragged: ItemId, occupant: ItemId },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListPairBan { from, to } => write!(f, "moves from {from} to {to} are not allowed"),
            Self::ParityClash { dragged, occupant } => {
                write!(f, "{dragged} cannot land on {occupant}: both are even")
            }
        }
    }
}

/// How a group drop is validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupValidation {
    /// Only the dragged item gates the drop; selected items follow it
    /// wherever it is allowed to go.
    #[default]
    AnchorOnly,
    /// Every selected item must pass the policy from its own slot, or the
    /// whole group drop is rejected.
    PerItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    banned_pairs: Vec<(ListId, ListId)>,
    parity_clash: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            banned_pairs: vec![(ListId::First, ListId::Third)],
            parity_clash: true,
        }
    }
}

impl ValidationPolicy {
    #[must_use]
    pub const fn new(banned_pairs: Vec<(ListId, ListId)>, parity_clash: bool) -> Self {
        Self {
            banned_pairs,
            parity_clash,
        }
    }

    /// A policy that accepts every destination.
    #[must_use]
    pub const fn permissive() -> Self {
        Self::new(Vec::new(), false)
    }

    #[must_use]
    pub fn banned_pairs(&self) -> &[(ListId, ListId)] {
        &self.banned_pairs
    }

    #[must_use]
    pub const fn parity_clash(&self) -> bool {
        self.parity_clash
    }

    #[must_use]
    pub fn is_banned(&self, from: ListId, to: ListId) -> bool {
        self.banned_pairs.contains(&(from, to))
    }

    /// Evaluate a candidate drop of `source.item_id` onto `destination`.
    #[must_use]
    pub fn check(
        &self,
        source: &DragSource,
        destination: Option<Location>,
        registry: &ListRegistry,
    ) -> Option<Rejection> {
        let destination = destination?;
        let from = source.location.list;

        if self.is_banned(from, destination.list) {
            return Some(Rejection::ListPairBan {
                from,
                to: destination.list,
            });
        }

        if !self.parity_clash {
            return None;
        }

        // Out-of-bounds destination means append: nothing to clash with.
        let occupant = registry.item_at(destination)?;
        let dragged = &source.item_id;
        if dragged.is_even() && occupant.id.is_even() {
            return Some(Rejection::ParityClash {
                dragged: dragged.clone(),
                occupant: occupant.id.clone(),
            });
        }

        None
    }

    #[must_use]
    pub fn is_invalid_destination(
        &self,
        source: &DragSource,
        destination: Option<Location>,
        registry: &ListRegistry,
    ) -> bool {
        self.check(source, destination, registry).is_some()
    }

    /// Evaluate every selected item from its own current slot. Ids no longer
    /// on the board are skipped.
    #[must_use]
    pub fn check_group(
        &self,
        selection: &SelectionSet,
        destination: Location,
        registry: &ListRegistry,
    ) -> Option<Rejection> {
        selection.iter().find_map(|id| {
            let source = DragSource::new(registry.locate(id)?, id.clone());
            self.check(&source, Some(destination), registry)
        })
    }
}
