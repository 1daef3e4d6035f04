use std::collections::HashSet;

use serde::Serialize;

use dragboard_core::engine::CommitOutcome;
use dragboard_core::model::{ItemId, ListId};
use dragboard_core::policy::ValidationPolicy;
use dragboard_core::session::{DropOutcome, GestureEvent, Signal};

use crate::{SimulationResult, TraceEvent};

// ── Core result types ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleResult {
    pub passed: bool,
    pub violations: Vec<InvariantViolation>,
}

impl OracleResult {
    #[must_use]
    const fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    #[must_use]
    fn from_violations(violations: Vec<InvariantViolation>) -> Self {
        if violations.is_empty() {
            Self::pass()
        } else {
            Self {
                passed: false,
                violations,
            }
        }
    }

    /// Merge another result into this one (failures accumulate).
    #[must_use]
    fn merge(mut self, other: Self) -> Self {
        if !other.passed {
            self.passed = false;
            self.violations.extend(other.violations);
        }
        self
    }
}

// ── Invariant violation diagnostics ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "invariant", rename_all = "kebab-case")]
pub enum InvariantViolation {
    /// The board gained or lost items.
    Conservation {
        step: usize,
        expected: usize,
        actual: usize,
    },
    /// An id is on the board twice.
    DuplicateItem { step: usize, item: ItemId },
    /// A drop settled but the selection survived it.
    SelectionNotCleared { step: usize, remaining: usize },
    /// A drop settled but the board still reports a drag or a highlight.
    SessionStillOpen { step: usize },
    /// The snapshot handed to the renderer disagrees with the registry.
    StaleSnapshot { step: usize },
    /// A drop that aborted, or an event that is not a drop, changed the
    /// registry.
    UncommittedMutation { step: usize },
    /// A single-item commit went through a banned list pair.
    BannedPairCommitted { step: usize, from: ListId, to: ListId },
    /// A single-item move landed an even item on an even occupant.
    ParityClashCommitted {
        step: usize,
        item: ItemId,
        occupant: ItemId,
    },
    /// Something is highlighted while no drag is in progress.
    HighlightWhileIdle { step: usize, item: ItemId },
}

// ── Oracle ────────────────────────────────────────────────────────────────────

/// Checks a simulation trace against the board's invariants.
///
/// # Invariants checked
///
/// 1. **Conservation** (`check_conservation`): item count never changes.
/// 2. **Uniqueness** (`check_uniqueness`): every id is on exactly one list.
/// 3. **Settle hygiene** (`check_settle_hygiene`): after every drop the
///    selection is empty, the session is closed, and the reported snapshot
///    matches the registry.
/// 4. **Commit isolation** (`check_commit_isolation`): only committed drops
///    mutate the registry.
/// 5. **Banned pairs** (`check_banned_pairs`): no single-item commit crosses
///    a banned `(source, destination)` pair.
/// 6. **Parity clashes** (`check_parity_clashes`): no cross-list move lands
///    an even item on the slot of an even occupant.
/// 7. **Idle highlight** (`check_idle_highlight`): nothing is highlighted
///    outside a drag.
pub struct InvariantOracle;

impl InvariantOracle {
    #[must_use]
    pub fn check_conservation(result: &SimulationResult) -> OracleResult {
        let violations = result
            .trace
            .iter()
            .filter(|t| t.after.total_items() != result.initial_items)
            .map(|t| InvariantViolation::Conservation {
                step: t.step,
                expected: result.initial_items,
                actual: t.after.total_items(),
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    #[must_use]
    pub fn check_uniqueness(result: &SimulationResult) -> OracleResult {
        let mut violations = Vec::new();
        for t in &result.trace {
            let mut seen = HashSet::new();
            for (_, items) in t.after.iter() {
                for item in items {
                    if !seen.insert(&item.id) {
                        violations.push(InvariantViolation::DuplicateItem {
                            step: t.step,
                            item: item.id.clone(),
                        });
                    }
                }
            }
        }
        OracleResult::from_violations(violations)
    }

    #[must_use]
    pub fn check_settle_hygiene(result: &SimulationResult) -> OracleResult {
        let mut violations = Vec::new();
        for t in &result.trace {
            let Signal::Settled(report) = &t.signal else {
                continue;
            };
            if !t.selection_after.is_empty() || !report.snapshot.selection.is_empty() {
                violations.push(InvariantViolation::SelectionNotCleared {
                    step: t.step,
                    remaining: t.selection_after.len(),
                });
            }
            if t.dragging_after || t.highlighted_after.is_some() || report.snapshot.dragging {
                violations.push(InvariantViolation::SessionStillOpen { step: t.step });
            }
            if report.snapshot.lists != t.after.views() {
                violations.push(InvariantViolation::StaleSnapshot { step: t.step });
            }
        }
        OracleResult::from_violations(violations)
    }

    #[must_use]
    pub fn check_commit_isolation(result: &SimulationResult) -> OracleResult {
        let violations = result
            .trace
            .iter()
            .filter(|t| !committed(t) && t.before != t.after)
            .map(|t| InvariantViolation::UncommittedMutation { step: t.step })
            .collect();
        OracleResult::from_violations(violations)
    }

    #[must_use]
    pub fn check_banned_pairs(result: &SimulationResult, policy: &ValidationPolicy) -> OracleResult {
        let violations = result
            .trace
            .iter()
            .filter_map(|t| {
                let Signal::Settled(report) = &t.signal else {
                    return None;
                };
                let (from, to) = match &report.outcome {
                    DropOutcome::Committed {
                        commit: CommitOutcome::Moved { from, to, .. },
                    } => (from.list, to.list),
                    DropOutcome::Committed {
                        commit: CommitOutcome::Reordered { list, .. },
                    } => (*list, *list),
                    _ => return None,
                };
                policy
                    .is_banned(from, to)
                    .then_some(InvariantViolation::BannedPairCommitted {
                        step: t.step,
                        from,
                        to,
                    })
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    /// Reorders are skipped: their reported slot is clamped, so the
    /// pre-commit occupant there is not necessarily the one the policy saw.
    #[must_use]
    pub fn check_parity_clashes(result: &SimulationResult, policy: &ValidationPolicy) -> OracleResult {
        if !policy.parity_clash() {
            return OracleResult::pass();
        }
        let violations = result
            .trace
            .iter()
            .filter_map(|t| {
                let Signal::Settled(report) = &t.signal else {
                    return None;
                };
                let DropOutcome::Committed {
                    commit: CommitOutcome::Moved { item, to, .. },
                } = &report.outcome
                else {
                    return None;
                };
                let occupant = t.before.item_at(*to)?;
                (item.is_even() && occupant.id.is_even()).then(|| {
                    InvariantViolation::ParityClashCommitted {
                        step: t.step,
                        item: item.clone(),
                        occupant: occupant.id.clone(),
                    }
                })
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    #[must_use]
    pub fn check_idle_highlight(result: &SimulationResult) -> OracleResult {
        let violations = result
            .trace
            .iter()
            .filter(|t| !t.dragging_after)
            .filter_map(|t| {
                t.highlighted_after
                    .as_ref()
                    .map(|item| InvariantViolation::HighlightWhileIdle {
                        step: t.step,
                        item: item.clone(),
                    })
            })
            .collect();
        OracleResult::from_violations(violations)
    }

    /// Run every check.
    #[must_use]
    pub fn check_all(result: &SimulationResult, policy: &ValidationPolicy) -> OracleResult {
        Self::check_conservation(result)
            .merge(Self::check_uniqueness(result))
            .merge(Self::check_settle_hygiene(result))
            .merge(Self::check_commit_isolation(result))
            .merge(Self::check_banned_pairs(result, policy))
            .merge(Self::check_parity_clashes(result, policy))
            .merge(Self::check_idle_highlight(result))
    }
}

fn committed(t: &TraceEvent) -> bool {
    matches!(t.event, GestureEvent::Drop { .. })
        && matches!(&t.signal, Signal::Settled(report) if report.outcome.is_committed())
}
