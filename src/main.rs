//! pertsim CLI entry point

use anyhow::Result;
use clap::Parser;
use pertsim::report::{self, Histogram};
use pertsim::{CancellationToken, Estimator, Project};
use std::path::PathBuf;
use std::time::Duration;

/// Estimate project completion time with Monte Carlo simulation
#[derive(Parser, Debug)]
#[command(
    name = "pertsim",
    version,
    about = "Estimate project completion time with Monte Carlo simulation",
    long_about = "Samples every task from a Beta-PERT distribution built from its\n\
                  optimistic / likely / pessimistic estimates, replays the dependency\n\
                  graph for each trial, and reports the distribution of total duration."
)]
struct Cli {
    /// Project file (.yml/.yaml, or task lines); auto-detected when omitted
    file: Option<PathBuf>,

    /// Number of trials (invalid values fall back to 10000)
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    trials: Option<String>,

    /// Team velocity factor applied to every task (invalid values fall back to 1.0)
    #[arg(long, allow_hyphen_values = true)]
    velocity: Option<String>,

    /// Hours per sprint point (invalid values fall back to 3.0)
    #[arg(long, allow_hyphen_values = true)]
    sprint_hours: Option<String>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output in JSON format (machine-readable)
    #[arg(long)]
    json: bool,

    /// Include raw trial durations in JSON output
    #[arg(long)]
    samples: bool,

    /// Histogram bins in text output (0 disables the histogram)
    #[arg(long, default_value_t = 20)]
    bins: usize,

    /// Cancel the simulation after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!("pertsim v{}", env!("CARGO_PKG_VERSION"));

    let mut project = match &cli.file {
        Some(path) => {
            log::info!("Loading project from: {}", path.display());
            Project::from_file(path)?
        }
        None => Project::auto_load(&std::env::current_dir()?)?,
    };

    project.config = project
        .config
        .with_raw_trials(cli.trials.as_deref())
        .with_raw_velocity(cli.velocity.as_deref())
        .with_raw_sprint_hours(cli.sprint_hours.as_deref());
    if let Some(seed) = cli.seed {
        project.config = project.config.with_seed(seed);
    }

    if project.dropped > 0 {
        log::warn!("Ignored {} malformed task entries", project.dropped);
    }
    log::info!("Loaded {} tasks", project.tasks.len());

    let name = project.metadata.as_ref().map(|m| m.project.clone());
    let estimator = Estimator::from_project(project)?;

    let token = CancellationToken::new();
    if let Some(secs) = cli.timeout_secs {
        let watchdog = token.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            watchdog.cancel();
        });
    }

    let output = estimator
        .engine()
        .with_cancellation(token)
        .with_progress(|completed, requested| {
            log::debug!("Completed {} of {} trials", completed, requested);
        })
        .run()?;
    let critical_path = estimator.expected_critical_path();

    if cli.json {
        let samples = cli.samples.then_some(output.samples.as_slice());
        println!(
            "{}",
            report::render_json(name.as_deref(), &output.result, &critical_path, samples)?
        );
    } else {
        let histogram = (cli.bins > 0).then(|| Histogram::from_samples(&output.samples, cli.bins));
        print!(
            "{}",
            report::render_text(name.as_deref(), &output.result, &critical_path, histogram.as_ref())
        );
    }

    Ok(())
}
