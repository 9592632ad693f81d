use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::scenario::{Scenario, ScenarioCtx};
use crate::util::duration_serde;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Run one scenario once per seed.
pub async fn run_scenario(
    scenario: &dyn Scenario,
    seeds: &[u64],
    template: &ScenarioCtx,
) -> Vec<ScenarioResult> {
    let mut results = Vec::with_capacity(seeds.len());
    for &seed in seeds {
        let ctx = ScenarioCtx {
            seed,
            ..template.clone()
        };
        if ctx.verbose {
            println!(
                "🧪 Testing scenario: {} (seed: {seed}, today: {})",
                scenario.name().bright_white(),
                ctx.today
            );
        }
        let start = Instant::now();
        let outcome = scenario.run(&ctx).await;
        let duration = start.elapsed();
        let failures = match outcome {
            Ok(()) => Vec::new(),
            Err(err) => {
                log::warn!("{} failed for seed {seed}: {err:#}", scenario.name());
                vec![format!("{err:#}")]
            }
        };
        results.push(ScenarioResult {
            scenario_name: scenario.name().to_string(),
            seed,
            passed: failures.is_empty(),
            failures,
            duration,
        });
    }
    results
}
