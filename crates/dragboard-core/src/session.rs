//! Drag-session state machine.
//!
//! [`Board`] owns the whole mutable state: the list registry, the selection,
//! and the current [`SessionState`]. A gesture source feeds it discrete
//! [`GestureEvent`]s and renders the [`Signal`] each one returns.
//!
//! ```text
//!            drag-start                 drop / abort
//!   Idle ─────────────────► Dragging ─────────────────► Idle
//!                           │      ▲
//!                           └──────┘ drag-update (re-validate)
//! ```
//!
//! Every drop, committed or aborted, clears the selection and the highlight.
//! Only a drop onto a destination that the policy accepts reaches the
//! registry.

use std::mem;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BoardConfig;
use crate::engine::{self, CommitOutcome, DragSource};
use crate::error::BoardError;
use crate::model::{ItemId, Location};
use crate::policy::{GroupValidation, Rejection, ValidationPolicy};
use crate::registry::{ListRegistry, ListView};
use crate::selection::SelectionSet;

/// Input from the gesture collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GestureEvent {
    DragStart {
        source: DragSource,
    },
    DragUpdate {
        source: Location,
        destination: Option<Location>,
    },
    Drop {
        source: Location,
        destination: Option<Location>,
    },
    /// Modifier-click on an item. Never starts a drag.
    ToggleSelection {
        item_id: ItemId,
    },
}

/// State of the one gesture in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    source: DragSource,
    destination: Option<Location>,
    rejection: Option<Rejection>,
}

impl DragSession {
    fn new(source: DragSource) -> Self {
        Self {
            source,
            destination: None,
            rejection: None,
        }
    }

    #[must_use]
    pub const fn source(&self) -> &DragSource {
        &self.source
    }

    #[must_use]
    pub const fn destination(&self) -> Option<Location> {
        self.destination
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.rejection.is_some()
    }

    /// The dragged item's id while the hovered destination is disallowed.
    #[must_use]
    pub fn invalid_item_id(&self) -> Option<&ItemId> {
        self.rejection.as_ref().map(|_| &self.source.item_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Why a drop did not reach the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum AbortReason {
    /// Released outside every list.
    NoDestination,
    /// Released over a destination the policy rejects.
    Rejected { rejection: Rejection },
    /// A drop arrived with no drag in progress.
    NoSession,
    /// The registry no longer matches the drag's view of it.
    Stale { code: &'static str, message: String },
}

impl From<BoardError> for AbortReason {
    fn from(err: BoardError) -> Self {
        Self::Stale {
            code: err.code().code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum DropOutcome {
    Committed { commit: CommitOutcome },
    Aborted { abort: AbortReason },
}

impl DropOutcome {
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Result of a drop plus the board to re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropReport {
    pub outcome: DropOutcome,
    pub snapshot: BoardSnapshot,
}

/// Everything a renderer needs to draw the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub lists: Vec<ListView>,
    pub selection: SelectionSet,
    pub highlighted: Option<ItemId>,
    pub dragging: bool,
}

/// Output for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "kebab-case")]
pub enum Signal {
    /// Emitted after drag-start and every drag-update.
    Highlight {
        invalid_item_id: Option<ItemId>,
        rejection: Option<Rejection>,
    },
    SelectionChanged { selection: SelectionSet },
    Settled(DropReport),
    /// The event referred to something not on the board; nothing changed.
    Ignored { code: &'static str, message: String },
}

pub struct Board {
    registry: ListRegistry,
    selection: SelectionSet,
    state: SessionState,
    policy: ValidationPolicy,
    group_validation: GroupValidation,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl Board {
    /// A freshly seeded board configured by `config`.
    #[must_use]
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_registry(
            ListRegistry::seeded(config.seed.items_per_list),
            config.validation_policy(),
            config.group.validation,
        )
    }

    #[must_use]
    pub fn with_registry(
        registry: ListRegistry,
        policy: ValidationPolicy,
        group_validation: GroupValidation,
    ) -> Self {
        Self {
            registry,
            selection: SelectionSet::new(),
            state: SessionState::Idle,
            policy,
            group_validation,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &ListRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging(_))
    }

    /// Item currently shown as "cannot drop here".
    #[must_use]
    pub fn highlighted(&self) -> Option<&ItemId> {
        match &self.state {
            SessionState::Dragging(session) => session.invalid_item_id(),
            SessionState::Idle => None,
        }
    }

    /// Dispatch one gesture event.
    pub fn handle(&mut self, event: GestureEvent) -> Signal {
        match event {
            GestureEvent::DragStart { source } => self.drag_start(source),
            GestureEvent::DragUpdate {
                source,
                destination,
            } => {
                self.note_source(source);
                self.drag_update(destination)
            }
            GestureEvent::Drop {
                source,
                destination,
            } => {
                self.note_source(source);
                Signal::Settled(self.drop_on(destination))
            }
            GestureEvent::ToggleSelection { item_id } => match self.toggle_selection(&item_id) {
                Ok(_) => Signal::SelectionChanged {
                    selection: self.selection.clone(),
                },
                Err(err) => Signal::Ignored {
                    code: err.code().code(),
                    message: err.to_string(),
                },
            },
        }
    }

    /// `Idle -> Dragging`.
    pub fn drag_start(&mut self, source: DragSource) -> Signal {
        if let SessionState::Dragging(stale) = &self.state {
            warn!(
                stale = %stale.source.item_id,
                new = %source.item_id,
                "drag started while another was active; discarding the old session"
            );
        }
        if self.registry.item_at(source.location).map(|item| &item.id) != Some(&source.item_id) {
            debug!(item = %source.item_id, at = %source.location, "drag started from a stale slot");
        }
        debug!(item = %source.item_id, at = %source.location, "drag start");
        self.state = SessionState::Dragging(DragSession::new(source));
        self.highlight_signal()
    }

    /// Re-validate against a new hover target.
    pub fn drag_update(&mut self, destination: Option<Location>) -> Signal {
        let mut state = mem::take(&mut self.state);
        if let SessionState::Dragging(session) = &mut state {
            self.revalidate(session, destination);
        } else {
            debug!("drag update ignored: no drag in progress");
        }
        self.state = state;
        self.highlight_signal()
    }

    /// `Dragging -> Idle`, committing when the destination is valid.
    pub fn drop_on(&mut self, destination: Option<Location>) -> DropReport {
        let outcome = match mem::take(&mut self.state) {
            SessionState::Idle => {
                debug!("drop ignored: no drag in progress");
                DropOutcome::Aborted {
                    abort: AbortReason::NoSession,
                }
            }
            SessionState::Dragging(mut session) => {
                self.revalidate(&mut session, destination);
                self.settle(&session)
            }
        };

        if !self.selection.is_empty() {
            debug!(count = self.selection.len(), "clearing selection after drop");
        }
        self.selection.clear();

        DropReport {
            outcome,
            snapshot: self.snapshot(),
        }
    }

    /// Flip an item's membership in the selection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ItemNotFound`] if the item is not on the board;
    /// the selection is unchanged.
    pub fn toggle_selection(&mut self, id: &ItemId) -> Result<bool, BoardError> {
        if !self.registry.contains(id) {
            debug!(item = %id, "toggle ignored: item not on the board");
            return Err(BoardError::ItemNotFound(id.clone()));
        }
        let selected = self.selection.toggle(id);
        debug!(item = %id, selected, "selection toggled");
        Ok(selected)
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            lists: self.registry.views(),
            selection: self.selection.clone(),
            highlighted: self.highlighted().cloned(),
            dragging: self.is_dragging(),
        }
    }

    fn note_source(&self, source: Location) {
        if let SessionState::Dragging(session) = &self.state {
            if session.source.location != source {
                debug!(
                    event = %source,
                    session = %session.source.location,
                    "event source differs from drag start; using drag start"
                );
            }
        }
    }

    fn revalidate(&self, session: &mut DragSession, destination: Option<Location>) {
        session.destination = destination;
        session.rejection = self
            .policy
            .check(&session.source, destination, &self.registry)
            .or_else(|| self.group_rejection(destination));
    }

    fn group_rejection(&self, destination: Option<Location>) -> Option<Rejection> {
        if self.group_validation != GroupValidation::PerItem || self.selection.is_empty() {
            return None;
        }
        self.policy
            .check_group(&self.selection, destination?, &self.registry)
    }

    fn settle(&mut self, session: &DragSession) -> DropOutcome {
        let Some(destination) = session.destination else {
            debug!(item = %session.source.item_id, "drop aborted: no destination");
            return DropOutcome::Aborted {
                abort: AbortReason::NoDestination,
            };
        };

        if let Some(rejection) = &session.rejection {
            debug!(item = %session.source.item_id, %rejection, "drop aborted: destination rejected");
            return DropOutcome::Aborted {
                abort: AbortReason::Rejected {
                    rejection: rejection.clone(),
                },
            };
        }

        match engine::commit(
            &mut self.registry,
            &self.selection,
            &session.source,
            destination,
        ) {
            Ok(commit) => DropOutcome::Committed { commit },
            Err(err) => {
                debug!(error = %err, "drop aborted: stale drag");
                DropOutcome::Aborted { abort: err.into() }
            }
        }
    }

    fn highlight_signal(&self) -> Signal {
        let rejection = match &self.state {
            SessionState::Dragging(session) => session.rejection.clone(),
            SessionState::Idle => None,
        };
        Signal::Highlight {
            invalid_item_id: self.highlighted().cloned(),
            rejection,
        }
    }
}
