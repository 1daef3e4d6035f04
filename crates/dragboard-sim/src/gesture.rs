//! Seeded gesture source.
//!
//! Produces the event stream a pointer would: whole drags (start, a few
//! hovers, drop), modifier-clicks, and the occasional malformed input a real
//! gesture layer can emit (stale drag sources, clicks on items that are
//! gone, updates and drops with no drag in progress).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use dragboard_core::engine::DragSource;
use dragboard_core::model::{ItemId, ListId, Location};
use dragboard_core::session::{Board, GestureEvent};

use crate::rng::DeterministicRng;

/// Mix of well-formed and hostile input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureMix {
    /// Chance a gesture is a modifier-click rather than a drag.
    pub toggle_percent: u8,
    /// Chance a drag is released outside every list.
    pub abandon_percent: u8,
    /// Chance a drag starts with an item id that is not at the source slot.
    pub stale_start_percent: u8,
    /// Chance a click names an item that is not on the board.
    pub unknown_item_percent: u8,
    /// Chance of a lone update or drop with no drag in progress.
    pub stray_percent: u8,
    /// Chance the drop lands somewhere other than the last hover.
    pub skip_update_percent: u8,
    /// Upper bound on hover updates per drag.
    pub max_updates: u8,
}

impl Default for GestureMix {
    fn default() -> Self {
        Self {
            toggle_percent: 25,
            abandon_percent: 10,
            stale_start_percent: 5,
            unknown_item_percent: 5,
            stray_percent: 3,
            skip_update_percent: 10,
            max_updates: 4,
        }
    }
}

/// Slots past the end of a list are generated too, to exercise append and
/// clamping.
const INDEX_OVERSHOOT: usize = 2;

pub struct GestureGenerator {
    rng: DeterministicRng,
    mix: GestureMix,
    pending: VecDeque<GestureEvent>,
}

impl GestureGenerator {
    #[must_use]
    pub fn new(seed: u64, mix: GestureMix) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
            mix,
            pending: VecDeque::new(),
        }
    }

    /// Next event, planned against the board as it is now.
    pub fn next_event(&mut self, board: &Board) -> GestureEvent {
        if let Some(event) = self.pending.pop_front() {
            return event;
        }

        if self.rng.hit_rate_percent(self.mix.stray_percent) {
            return self.stray(board);
        }
        if self.rng.hit_rate_percent(self.mix.toggle_percent) {
            return self.toggle(board);
        }
        match self.plan_drag(board) {
            Some(start) => start,
            None => self.toggle(board),
        }
    }

    /// `true` while a planned drag still has events to hand out.
    #[must_use]
    pub fn mid_gesture(&self) -> bool {
        !self.pending.is_empty()
    }

    fn stray(&mut self, board: &Board) -> GestureEvent {
        let source = self.location(board);
        let destination = self.destination(board);
        if self.rng.hit_rate_percent(50) {
            GestureEvent::DragUpdate {
                source,
                destination,
            }
        } else {
            GestureEvent::Drop {
                source,
                destination,
            }
        }
    }

    fn toggle(&mut self, board: &Board) -> GestureEvent {
        let item_id = if self.rng.hit_rate_percent(self.mix.unknown_item_percent) {
            self.unknown_item(board)
        } else {
            let ids: Vec<&ItemId> = board
                .registry()
                .iter()
                .flat_map(|(_, items)| items.iter().map(|item| &item.id))
                .collect();
            match self.rng.pick(&ids) {
                Some(id) => (*id).clone(),
                None => self.unknown_item(board),
            }
        };
        GestureEvent::ToggleSelection { item_id }
    }

    /// Queue a whole drag and return its start event.
    fn plan_drag(&mut self, board: &Board) -> Option<GestureEvent> {
        let occupied: Vec<ListId> = ListId::ALL
            .into_iter()
            .filter(|list| board.registry().len(*list) > 0)
            .collect();
        let list = *self.rng.pick(&occupied)?;
        let index = self.rng.next_index(board.registry().len(list));
        let origin = Location::new(list, index);

        let item_id = if self.rng.hit_rate_percent(self.mix.stale_start_percent) {
            self.any_item_id(board)
        } else {
            board.registry().item_at(origin)?.id.clone()
        };

        let updates = self.rng.next_index(usize::from(self.mix.max_updates) + 1);
        let mut last = None;
        for _ in 0..updates {
            last = self.destination(board);
            self.pending.push_back(GestureEvent::DragUpdate {
                source: origin,
                destination: last,
            });
        }

        let landing = if self.rng.hit_rate_percent(self.mix.abandon_percent) {
            None
        } else if last.is_none() || self.rng.hit_rate_percent(self.mix.skip_update_percent) {
            Some(self.location(board))
        } else {
            last
        };
        self.pending.push_back(GestureEvent::Drop {
            source: origin,
            destination: landing,
        });

        Some(GestureEvent::DragStart {
            source: DragSource::new(origin, item_id),
        })
    }

    fn location(&mut self, board: &Board) -> Location {
        let list = ListId::ALL[self.rng.next_index(ListId::ALL.len())];
        let index = self
            .rng
            .next_index(board.registry().len(list) + INDEX_OVERSHOOT);
        Location::new(list, index)
    }

    fn destination(&mut self, board: &Board) -> Option<Location> {
        if self.rng.hit_rate_percent(15) {
            None
        } else {
            Some(self.location(board))
        }
    }

    fn any_item_id(&mut self, board: &Board) -> ItemId {
        let total = u64::try_from(board.registry().total_items()).unwrap_or(u64::MAX);
        ItemId::numbered(self.rng.next_bounded(total.saturating_add(1)))
    }

    fn unknown_item(&mut self, board: &Board) -> ItemId {
        let total = u64::try_from(board.registry().total_items()).unwrap_or(u64::MAX);
        ItemId::numbered(total.saturating_add(1_000).saturating_add(self.rng.next_bounded(1_000)))
    }
}
