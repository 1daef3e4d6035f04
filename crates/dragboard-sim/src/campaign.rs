//! Campaign runner for deterministic simulation campaigns.
//!
//! Executes many seeds with one board and gesture configuration, collecting
//! pass/fail results and identifying the first failing seed for replay.

use std::ops::Range;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dragboard_core::config::BoardConfig;

use crate::gesture::GestureMix;
use crate::oracle::{InvariantOracle, InvariantViolation, OracleResult};
use crate::{SimulationConfig, SimulationResult, Simulator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Range of seeds to execute, e.g., `0..100`.
    pub seed_range: Range<u64>,
    /// Gesture events per seed.
    pub gestures: usize,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub mix: GestureMix,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            seed_range: 0..100,
            gestures: 200,
            board: BoardConfig::default(),
            mix: GestureMix::default(),
        }
    }
}

impl CampaignConfig {
    #[must_use]
    pub fn sim_config_for_seed(&self, seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            gestures: self.gestures,
            board: self.board.clone(),
            mix: self.mix,
        }
    }

    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.seed_range.is_empty() {
            bail!("seed_range must not be empty");
        }
        if self.gestures == 0 {
            bail!("gestures must be > 0");
        }
        if self.board.seed.items_per_list == 0 {
            bail!("board.seed.items_per_list must be > 0");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFailure {
    pub seed: u64,
    pub violations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub seeds_run: usize,
    pub seeds_passed: usize,
    /// First seed that failed (for prioritized replay).
    pub first_failure: Option<u64>,
    pub failures: Vec<SeedFailure>,
    /// Seeds that saw both a group commit and a policy rejection.
    pub interesting_states_reached: usize,
    pub total_commits: usize,
    pub total_rejected: usize,
}

impl CampaignReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Full trace and oracle verdict for one seed.
#[derive(Debug, Clone)]
pub struct DetailedTrace {
    pub result: SimulationResult,
    pub oracle: OracleResult,
}

/// Run a full campaign across all seeds in the config.
///
/// # Errors
///
/// Returns an error if config validation fails.
pub fn run_campaign(config: &CampaignConfig) -> Result<CampaignReport> {
    config.validate()?;

    let mut report = CampaignReport {
        seeds_run: 0,
        seeds_passed: 0,
        first_failure: None,
        failures: Vec::new(),
        interesting_states_reached: 0,
        total_commits: 0,
        total_rejected: 0,
    };

    for seed in config.seed_range.clone() {
        report.seeds_run += 1;
        let trace = simulate(seed, config)?;

        report.total_commits += trace.result.stats.commits;
        report.total_rejected += trace.result.stats.rejected;
        if trace.result.interesting_state_reached {
            report.interesting_states_reached += 1;
        }

        if trace.oracle.passed {
            report.seeds_passed += 1;
        } else {
            warn!(seed, violations = trace.oracle.violations.len(), "seed failed");
            report.first_failure.get_or_insert(seed);
            report.failures.push(SeedFailure {
                seed,
                violations: trace.oracle.violations.iter().map(format_violation).collect(),
            });
        }
    }

    info!(
        seeds = report.seeds_run,
        passed = report.seeds_passed,
        "campaign complete"
    );
    Ok(report)
}

/// Run a single seed and return Ok(()) on pass, Err(violations) on failure.
///
/// # Errors
///
/// Returns an `anyhow::Error` if the simulation cannot be set up. The inner
/// `Result` distinguishes pass from invariant violations.
pub fn run_single_seed(
    seed: u64,
    config: &CampaignConfig,
) -> Result<std::result::Result<(), Vec<InvariantViolation>>> {
    let trace = simulate(seed, config)?;
    if trace.oracle.passed {
        Ok(Ok(()))
    } else {
        Ok(Err(trace.oracle.violations))
    }
}

/// Replay a single seed with full trace details for debugging.
///
/// # Errors
///
/// Returns an error when config validation or simulation setup fails.
pub fn replay_seed(seed: u64, config: &CampaignConfig) -> Result<DetailedTrace> {
    config.validate()?;
    simulate(seed, config)
}

fn simulate(seed: u64, config: &CampaignConfig) -> Result<DetailedTrace> {
    let mut simulator = Simulator::new(config.sim_config_for_seed(seed))?;
    let result = simulator.run();
    let oracle = InvariantOracle::check_all(&result, &config.board.validation_policy());
    Ok(DetailedTrace { result, oracle })
}

/// Format an invariant violation into a human-readable string.
#[must_use]
pub fn format_violation(v: &InvariantViolation) -> String {
    match v {
        InvariantViolation::Conservation {
            step,
            expected,
            actual,
        } => format!("Conservation: step {step} left {actual} items on the board (expected {expected})"),
        InvariantViolation::DuplicateItem { step, item } => {
            format!("DuplicateItem: step {step} left {item} on the board twice")
        }
        InvariantViolation::SelectionNotCleared { step, remaining } => {
            format!("SelectionNotCleared: step {step} settled with {remaining} items still selected")
        }
        InvariantViolation::SessionStillOpen { step } => {
            format!("SessionStillOpen: step {step} settled but the drag is still active")
        }
        InvariantViolation::StaleSnapshot { step } => {
            format!("StaleSnapshot: step {step} reported a board that differs from the registry")
        }
        InvariantViolation::UncommittedMutation { step } => {
            format!("UncommittedMutation: step {step} changed the board without a commit")
        }
        InvariantViolation::BannedPairCommitted { step, from, to } => {
            format!("BannedPairCommitted: step {step} committed a move from {from} to {to}")
        }
        InvariantViolation::ParityClashCommitted {
            step,
            item,
            occupant,
        } => {
            format!("ParityClashCommitted: step {step} moved even {item} onto even {occupant}")
        }
        InvariantViolation::HighlightWhileIdle { step, item } => {
            format!("HighlightWhileIdle: step {step} highlights {item} with no drag in progress")
        }
    }
}
