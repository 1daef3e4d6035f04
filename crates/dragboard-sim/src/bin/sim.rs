#![forbid(unsafe_code)]

use anyhow::Result;
use dragboard_sim::campaign::{CampaignConfig, run_campaign};

fn main() -> Result<()> {
    let report = run_campaign(&CampaignConfig::default())?;

    println!(
        "campaign complete: seeds={} passed={} commits={} rejected={} interesting={}",
        report.seeds_run,
        report.seeds_passed,
        report.total_commits,
        report.total_rejected,
        report.interesting_states_reached
    );
    if let Some(seed) = report.first_failure {
        anyhow::bail!("seed {seed} violated an invariant");
    }

    Ok(())
}
