use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::runner::ScenarioResult;

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Booking Flow Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=======================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;

    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", failed.to_string().red())?;
    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let success_rate = (passed as f64 / total as f64) * 100.0;
        writeln!(out, "Success rate: {success_rate:.1}%")?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{status} {} (seed {}) - {:?}",
            result.scenario_name.bold(),
            result.seed,
            result.duration
        )?;
        for failure in &result.failures {
            writeln!(out, "     • {}", failure.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<ScenarioResult> {
        vec![
            ScenarioResult {
                scenario_name: "happy-path".into(),
                seed: 1,
                passed: true,
                failures: Vec::new(),
                duration: Duration::from_millis(3),
            },
            ScenarioResult {
                scenario_name: "expired-card".into(),
                seed: 1,
                passed: false,
                failures: vec!["expired card was accepted".into()],
                duration: Duration::from_millis(2),
            },
        ]
    }

    #[test]
    fn console_report_lists_each_run() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &results(), Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total runs: 2"));
        assert!(text.contains("Success rate: 50.0%"));
        assert!(text.contains("❌ FAIL expired-card (seed 1)"));
        assert!(text.contains("expired card was accepted"));
    }

    #[test]
    fn json_report_round_trips() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &results()).unwrap();
        let parsed: Vec<ScenarioResult> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].duration, Duration::from_millis(3));
        assert!(!parsed[1].passed);
    }
}
