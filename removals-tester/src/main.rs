mod reports;
mod runner;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use runner::{ScenarioResult, run_scenario};
use scenario::{ScenarioCtx, get_scenario, list_scenarios};
use util::{parse_seeds, resolve_today, split_csv};

#[derive(Debug, Parser)]
#[command(name = "removals-tester", version = "0.1.0")]
#[command(about = "Scripted QA walks through the removals booking wizard")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long = "seed", alias = "seeds", default_value = "1337")]
    seeds: String,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Date the wizard treats as today (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    today: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let seeds = parse_seeds(&args.seeds)?;
    let template = ScenarioCtx {
        seed: 0,
        today: resolve_today(args.today.as_deref())?,
        verbose: args.verbose,
    };

    let mut results = Vec::new();
    for name in expand_scenarios(&args.scenarios) {
        if let Some(scenario) = get_scenario(&name) {
            results.extend(run_scenario(scenario.as_ref(), &seeds, &template).await);
        } else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
        }
    }

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:18} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🚚 Removals Booking Tester".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (name, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == name) {
                scenarios.push(name.to_string());
            }
        }
    }
    scenarios
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    if args.report.as_str() == "json" {
        reports::generate_json_report(&mut output_target, results)?;
    } else {
        if results.is_empty() {
            writeln!(&mut output_target, "No scenarios executed.")?;
        } else {
            reports::generate_console_report(&mut output_target, results, start_time.elapsed())?;
        }
        writeln!(&mut output_target)?;
        writeln!(
            &mut output_target,
            "🏁 Total time: {:?}",
            start_time.elapsed()
        )?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_expands_to_every_scenario_once() {
        let expanded = expand_scenarios("route-lookup,all");
        assert_eq!(expanded.first().map(String::as_str), Some("route-lookup"));
        assert_eq!(expanded.len(), list_scenarios().len());
        assert_eq!(expand_scenarios("happy-path"), vec!["happy-path"]);
    }

    #[test]
    fn args_accept_seed_list_and_today() {
        let args = Args::parse_from([
            "removals-tester",
            "--seed",
            "1,2",
            "--today",
            "2026-10-14",
            "--report",
            "json",
        ]);
        assert_eq!(parse_seeds(&args.seeds).unwrap(), vec![1, 2]);
        assert_eq!(args.today.as_deref(), Some("2026-10-14"));
        assert_eq!(args.report, "json");
        assert!(Args::try_parse_from(["removals-tester", "--report", "csv"]).is_err());
    }
}
