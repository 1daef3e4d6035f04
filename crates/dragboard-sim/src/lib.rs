//! dragboard-sim library.
//!
//! Deterministic gesture simulation: a seeded [`gesture::GestureGenerator`]
//! drives a [`Board`], every step is traced, and
//! [`oracle::InvariantOracle`] checks the trace afterwards.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod campaign;
pub mod gesture;
pub mod oracle;
pub mod rng;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use dragboard_core::config::BoardConfig;
use dragboard_core::engine::CommitOutcome;
use dragboard_core::model::ItemId;
use dragboard_core::registry::ListRegistry;
use dragboard_core::selection::SelectionSet;
use dragboard_core::session::{
    AbortReason, Board, BoardSnapshot, DropOutcome, GestureEvent, SessionState, Signal,
};

use crate::gesture::{GestureGenerator, GestureMix};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Gesture events to generate. A drag still in flight when the budget
    /// runs out is played to the end.
    pub gestures: usize,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub mix: GestureMix,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            gestures: 200,
            board: BoardConfig::default(),
            mix: GestureMix::default(),
        }
    }
}

/// One event and the board state around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    pub step: usize,
    pub event: GestureEvent,
    pub signal: Signal,
    pub before: ListRegistry,
    pub after: ListRegistry,
    pub selection_after: SelectionSet,
    pub dragging_after: bool,
    pub highlighted_after: Option<ItemId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub commits: usize,
    pub group_commits: usize,
    pub rejected: usize,
    pub abandoned: usize,
    pub stale: usize,
    pub stray_drops: usize,
    pub ignored: usize,
}

impl SimulationStats {
    fn record(&mut self, signal: &Signal) {
        match signal {
            Signal::Settled(report) => match &report.outcome {
                DropOutcome::Committed { commit } => {
                    self.commits += 1;
                    if matches!(commit, CommitOutcome::GroupMoved { .. }) {
                        self.group_commits += 1;
                    }
                }
                DropOutcome::Aborted { abort } => match abort {
                    AbortReason::Rejected { .. } => self.rejected += 1,
                    AbortReason::NoDestination => self.abandoned += 1,
                    AbortReason::Stale { .. } => self.stale += 1,
                    AbortReason::NoSession => self.stray_drops += 1,
                },
            },
            Signal::Ignored { .. } => self.ignored += 1,
            Signal::Highlight { .. } | Signal::SelectionChanged { .. } => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub initial_items: usize,
    pub trace: Vec<TraceEvent>,
    pub stats: SimulationStats,
    pub final_board: BoardSnapshot,
    /// A group commit and a policy rejection both happened in this run.
    pub interesting_state_reached: bool,
}

pub struct Simulator {
    config: SimulationConfig,
    board: Board,
    generator: GestureGenerator,
}

impl Simulator {
    /// # Errors
    ///
    /// Returns an error if the config asks for zero gestures.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        if config.gestures == 0 {
            bail!("gestures must be > 0");
        }
        let board = Board::new(&config.board);
        let generator = GestureGenerator::new(config.seed, config.mix);
        Ok(Self {
            config,
            board,
            generator,
        })
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Play the configured number of gestures, then settle any open drag.
    pub fn run(&mut self) -> SimulationResult {
        let initial_items = self.board.registry().total_items();
        let mut trace = Vec::with_capacity(self.config.gestures);
        let mut stats = SimulationStats::default();

        for _ in 0..self.config.gestures {
            let event = self.generator.next_event(&self.board);
            self.step(event, &mut trace, &mut stats);
        }
        while self.generator.mid_gesture() {
            let event = self.generator.next_event(&self.board);
            self.step(event, &mut trace, &mut stats);
        }
        if let SessionState::Dragging(session) = self.board.state() {
            let source = session.source().location;
            self.step(
                GestureEvent::Drop {
                    source,
                    destination: None,
                },
                &mut trace,
                &mut stats,
            );
        }

        debug!(
            seed = self.config.seed,
            steps = trace.len(),
            commits = stats.commits,
            rejected = stats.rejected,
            "simulation complete"
        );

        SimulationResult {
            seed: self.config.seed,
            initial_items,
            trace,
            stats,
            final_board: self.board.snapshot(),
            interesting_state_reached: stats.group_commits > 0 && stats.rejected > 0,
        }
    }

    fn step(&mut self, event: GestureEvent, trace: &mut Vec<TraceEvent>, stats: &mut SimulationStats) {
        let before = self.board.registry().clone();
        let signal = self.board.handle(event.clone());
        stats.record(&signal);
        trace!(step = trace.len(), ?event, "simulated gesture");
        trace.push(TraceEvent {
            step: trace.len(),
            event,
            signal,
            before,
            after: self.board.registry().clone(),
            selection_after: self.board.selection().clone(),
            dragging_after: self.board.is_dragging(),
            highlighted_after: self.board.highlighted().cloned(),
        });
    }
}
