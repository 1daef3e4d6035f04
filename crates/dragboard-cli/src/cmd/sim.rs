//! `dragboard sim`: deterministic gesture simulation campaigns.
//!
//! `dragboard sim run` executes a campaign across many seeds.
//! `dragboard sim replay` replays a single seed with its step trace.

use std::process;

use anyhow::Result;
use clap::{Args, Subcommand};
use dragboard_core::config::BoardConfig;
use dragboard_core::policy::GroupValidation;
use dragboard_sim::campaign::{CampaignConfig, format_violation, replay_seed, run_campaign};
use dragboard_sim::gesture::GestureMix;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section};

/// Top-level arguments for `dragboard sim`.
#[derive(Args, Debug)]
pub struct SimArgs {
    #[command(subcommand)]
    pub command: SimCommand,
}

#[derive(Subcommand, Debug)]
pub enum SimCommand {
    #[command(
        about = "Run a simulation campaign across multiple seeds",
        long_about = "Drive a fresh board with seeded random gesture streams, checking\n\
                      conservation, uniqueness, settle hygiene, and the drop policy after\n\
                      every step. Reports pass/fail per seed and the first failure for replay.",
        after_help = "EXAMPLES:\n    # Run 100 seeds with defaults\n    dragboard sim run --seeds 100\n\n\
                      # Longer streams, more hostile input\n    dragboard sim run --seeds 500 --gestures 400 --faults 60\n\n\
                      # Machine-readable output\n    dragboard sim run --seeds 100 --format json"
    )]
    Run(SimRunArgs),

    #[command(
        about = "Replay a single seed with detailed trace output",
        long_about = "Replay one seed to get its step trace, oracle verdict, and any\n\
                      violations. Use after a campaign failure to debug.",
        after_help = "EXAMPLES:\n    # Replay seed 42\n    dragboard sim replay --seed 42\n\n\
                      # Show every step\n    dragboard sim replay --seed 42 --trace\n\n\
                      # Machine-readable output\n    dragboard sim replay --seed 42 --format json"
    )]
    Replay(SimReplayArgs),
}

/// Knobs shared by `run` and `replay`.
#[derive(Args, Debug, Clone)]
pub struct SimKnobs {
    /// Gesture events per seed.
    #[arg(long, default_value_t = 200)]
    pub gestures: usize,

    /// Overall fault rate in percent. Scales abandoned drags, stale starts,
    /// unknown items, stray drops, and drops away from the last hover.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub faults: u8,

    /// Chance in percent that a gesture is a selection toggle.
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub toggles: u8,

    /// Validate every selected item on group drops, not just the dragged one.
    #[arg(long)]
    pub per_item: bool,
}

#[derive(Args, Debug)]
pub struct SimRunArgs {
    /// Number of seeds to run.
    #[arg(long, default_value_t = 100)]
    pub seeds: u64,

    /// Starting seed value.
    #[arg(long, default_value_t = 0)]
    pub seed_start: u64,

    #[command(flatten)]
    pub knobs: SimKnobs,
}

#[derive(Args, Debug)]
pub struct SimReplayArgs {
    /// Seed to replay.
    #[arg(long)]
    pub seed: u64,

    /// Print every step of the trace.
    #[arg(long)]
    pub trace: bool,

    #[command(flatten)]
    pub knobs: SimKnobs,
}

#[derive(Debug, Serialize)]
struct RunOutput {
    seeds_run: usize,
    seeds_passed: usize,
    seeds_failed: usize,
    first_failure: Option<u64>,
    interesting_states_reached: usize,
    total_commits: usize,
    total_rejected: usize,
    all_passed: bool,
    failures: Vec<FailureOutput>,
}

#[derive(Debug, Serialize)]
struct FailureOutput {
    seed: u64,
    violations: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    seed: u64,
    steps: usize,
    commits: usize,
    group_commits: usize,
    rejected: usize,
    abandoned: usize,
    stale: usize,
    ignored: usize,
    oracle_passed: bool,
    violations: Vec<String>,
    interesting_state_reached: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<String>,
}

fn build_campaign_config(
    seed_start: u64,
    seeds: u64,
    knobs: &SimKnobs,
    board: &BoardConfig,
) -> CampaignConfig {
    let mut board = board.clone();
    if knobs.per_item {
        board.group.validation = GroupValidation::PerItem;
    }

    CampaignConfig {
        seed_range: seed_start..seed_start.saturating_add(seeds),
        gestures: knobs.gestures,
        board,
        mix: GestureMix {
            toggle_percent: knobs.toggles,
            abandon_percent: scale_fault(knobs.faults, 50),
            stale_start_percent: scale_fault(knobs.faults, 25),
            unknown_item_percent: scale_fault(knobs.faults, 25),
            stray_percent: scale_fault(knobs.faults, 15),
            skip_update_percent: scale_fault(knobs.faults, 50),
            ..GestureMix::default()
        },
    }
}

/// Scale an overall fault percent by a weight percent.
fn scale_fault(faults: u8, weight_pct: u8) -> u8 {
    let scaled = u16::from(faults) * u16::from(weight_pct) / 100;
    u8::try_from(scaled).unwrap_or(100)
}

/// Execute `dragboard sim run`.
pub fn run_sim_run(args: &SimRunArgs, board: &BoardConfig, output: OutputMode) -> Result<()> {
    let config = build_campaign_config(args.seed_start, args.seeds, &args.knobs, board);
    let report = run_campaign(&config)?;

    let out = RunOutput {
        seeds_run: report.seeds_run,
        seeds_passed: report.seeds_passed,
        seeds_failed: report.failures.len(),
        first_failure: report.first_failure,
        interesting_states_reached: report.interesting_states_reached,
        total_commits: report.total_commits,
        total_rejected: report.total_rejected,
        all_passed: report.all_passed(),
        failures: report
            .failures
            .iter()
            .map(|f| FailureOutput {
                seed: f.seed,
                violations: f.violations.clone(),
            })
            .collect(),
    };

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Text => {
            println!(
                "campaign seeds_run={} gestures={} faults_pct={}",
                out.seeds_run, args.knobs.gestures, args.knobs.faults
            );
            println!(
                "results passed={} failed={} commits={} rejected={} interesting_states={} all_passed={}",
                out.seeds_passed,
                out.seeds_failed,
                out.total_commits,
                out.total_rejected,
                out.interesting_states_reached,
                out.all_passed
            );
            if !out.all_passed {
                for failure in out.failures.iter().take(5) {
                    println!(
                        "failure seed={} violations={}",
                        failure.seed,
                        failure.violations.len()
                    );
                }
                if out.failures.len() > 5 {
                    println!("failures_truncated count={}", out.failures.len() - 5);
                }
                println!(
                    "hint replay_seed={} gestures={}",
                    out.first_failure.unwrap_or(0),
                    args.knobs.gestures
                );
            }
        }
        OutputMode::Pretty => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            pretty_section(&mut w, "Simulation Campaign")?;
            pretty_kv(&mut w, "Seeds", out.seeds_run.to_string())?;
            pretty_kv(&mut w, "Gestures", args.knobs.gestures.to_string())?;
            pretty_kv(&mut w, "Fault rate", format!("{}%", args.knobs.faults))?;
            pretty_kv(
                &mut w,
                "Activity",
                format!(
                    "{} commits / {} rejected drops",
                    out.total_commits, out.total_rejected
                ),
            )?;
            pretty_kv(
                &mut w,
                "Results",
                format!(
                    "{} passed / {} failed ({} interesting states)",
                    out.seeds_passed, out.seeds_failed, out.interesting_states_reached
                ),
            )?;

            if out.all_passed {
                pretty_kv(&mut w, "Status", "all seeds passed")?;
            } else {
                pretty_kv(
                    &mut w,
                    "Status",
                    format!(
                        "{} failures (first at seed {})",
                        out.seeds_failed,
                        out.first_failure.unwrap_or(0)
                    ),
                )?;
                println!();
                pretty_section(&mut w, "Failure Samples")?;
                for failure in out.failures.iter().take(5) {
                    println!(
                        "seed {:<8} violations={}",
                        failure.seed,
                        failure.violations.len()
                    );
                    for violation in &failure.violations {
                        println!("  - {violation}");
                    }
                }
                if out.failures.len() > 5 {
                    println!("... and {} more failures", out.failures.len() - 5);
                }
                println!();
                pretty_kv(
                    &mut w,
                    "Replay",
                    format!(
                        "dragboard sim replay --seed {} --gestures {} --faults {}",
                        out.first_failure.unwrap_or(0),
                        args.knobs.gestures,
                        args.knobs.faults
                    ),
                )?;
            }
        }
    }

    // Exit code 1 on any failure for CI integration
    if !report.all_passed() {
        process::exit(1);
    }

    Ok(())
}

/// Execute `dragboard sim replay`.
pub fn run_sim_replay(
    args: &SimReplayArgs,
    board: &BoardConfig,
    output: OutputMode,
) -> Result<()> {
    let config = build_campaign_config(args.seed, 1, &args.knobs, board);
    let trace = replay_seed(args.seed, &config)?;
    let stats = &trace.result.stats;

    let out = ReplayOutput {
        seed: args.seed,
        steps: trace.result.trace.len(),
        commits: stats.commits,
        group_commits: stats.group_commits,
        rejected: stats.rejected,
        abandoned: stats.abandoned,
        stale: stats.stale,
        ignored: stats.ignored,
        oracle_passed: trace.oracle.passed,
        violations: trace.oracle.violations.iter().map(format_violation).collect(),
        interesting_state_reached: trace.result.interesting_state_reached,
        trace: if args.trace {
            trace
                .result
                .trace
                .iter()
                .map(|step| {
                    format!(
                        "{} {}",
                        serde_json::to_string(&step.event).unwrap_or_default(),
                        serde_json::to_string(&step.signal).unwrap_or_default()
                    )
                })
                .collect()
        } else {
            Vec::new()
        },
    };

    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputMode::Text => {
            println!(
                "replay seed={} gestures={} faults_pct={}",
                out.seed, args.knobs.gestures, args.knobs.faults
            );
            println!(
                "result oracle_passed={} steps={} commits={} group_commits={} rejected={} abandoned={} stale={} ignored={} interesting_state_reached={}",
                out.oracle_passed,
                out.steps,
                out.commits,
                out.group_commits,
                out.rejected,
                out.abandoned,
                out.stale,
                out.ignored,
                out.interesting_state_reached
            );
            for violation in &out.violations {
                println!("violation={violation}");
            }
            for (n, line) in out.trace.iter().enumerate() {
                println!("step={n} {line}");
            }
        }
        OutputMode::Pretty => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            pretty_section(&mut w, &format!("Replay Seed {}", out.seed))?;
            pretty_kv(&mut w, "Steps", out.steps.to_string())?;
            pretty_kv(
                &mut w,
                "Commits",
                format!("{} ({} group)", out.commits, out.group_commits),
            )?;
            pretty_kv(&mut w, "Rejected", out.rejected.to_string())?;
            pretty_kv(&mut w, "Abandoned", out.abandoned.to_string())?;
            pretty_kv(&mut w, "Stale", out.stale.to_string())?;
            pretty_kv(&mut w, "Ignored", out.ignored.to_string())?;
            pretty_kv(
                &mut w,
                "Interesting",
                out.interesting_state_reached.to_string(),
            )?;
            pretty_kv(&mut w, "Oracle", out.oracle_passed.to_string())?;

            if !out.oracle_passed {
                println!();
                pretty_section(&mut w, "Invariant Violations")?;
                for violation in &out.violations {
                    println!("- {violation}");
                }
            }

            if !out.trace.is_empty() {
                println!();
                pretty_section(&mut w, "Trace")?;
                for (n, line) in out.trace.iter().enumerate() {
                    println!("{n:>5}  {line}");
                }
            }
        }
    }

    if !trace.oracle.passed {
        process::exit(1);
    }

    Ok(())
}
