//! Simulation engine - runs Monte Carlo trials and aggregates the outcomes

use std::fmt;
use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::cancel::CancellationToken;
use super::graph::TaskGraph;
use super::sampler::DurationSampler;
use super::schedule::ScheduleEvaluator;
use super::stats;
use crate::config::SimulationConfig;
use crate::error::SimulationError;

/// Trials executed between cancellation checks
pub const BATCH_SIZE: usize = 1024;

/// Summary of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub num_tasks: usize,
    pub num_trials: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// 2.5th percentile
    pub ci_lower: f64,
    /// 97.5th percentile
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub sprint_points: u64,
    pub velocity_factor: f64,
    pub seed: u64,
}

/// Result summary plus the raw per-trial project durations, in trial order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub result: SimulationResult,
    pub samples: Vec<f64>,
}

/// Callback invoked after each batch with `(completed, requested)`
pub type ProgressFn<'g> = Box<dyn Fn(usize, usize) + Send + Sync + 'g>;

/// Runs independent trials over a fixed, pre-sorted task graph.
///
/// Trial `i` draws from its own generator seeded by `(seed, i)`, so a
/// given seed produces the same outcomes whether trials run on one
/// thread or many.
pub struct SimulationEngine<'g> {
    graph: &'g TaskGraph,
    samplers: Vec<DurationSampler>,
    config: SimulationConfig,
    cancel: Option<CancellationToken>,
    progress: Option<ProgressFn<'g>>,
}

impl fmt::Debug for SimulationEngine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("tasks", &self.graph.len())
            .field("config", &self.config)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl<'g> SimulationEngine<'g> {
    pub fn new(graph: &'g TaskGraph, config: SimulationConfig) -> Self {
        let samplers = graph.estimates().iter().map(DurationSampler::new).collect();
        Self {
            graph,
            samplers,
            config: config.normalized(),
            cancel: None,
            progress: None,
        }
    }

    /// Abort between batches once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report progress after every completed batch
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'g,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run all trials on the rayon thread pool
    pub fn run(&self) -> Result<SimulationOutput, SimulationError> {
        let seed = self.base_seed();
        let samples = self.run_batches(seed, |range| {
            range
                .into_par_iter()
                .map_init(
                    || self.trial_state(),
                    |(evaluator, durations), trial| self.trial(evaluator, durations, seed, trial),
                )
                .collect()
        })?;
        self.finish(samples, seed)
    }

    /// Run all trials on the calling thread
    pub fn run_sequential(&self) -> Result<SimulationOutput, SimulationError> {
        let seed = self.base_seed();
        let (mut evaluator, mut durations) = self.trial_state();
        let samples = self.run_batches(seed, |range| {
            range
                .map(|trial| self.trial(&mut evaluator, &mut durations, seed, trial))
                .collect()
        })?;
        self.finish(samples, seed)
    }

    fn base_seed(&self) -> u64 {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        log::debug!("Simulation base seed: {}", seed);
        seed
    }

    fn run_batches<F>(&self, seed: u64, mut run_batch: F) -> Result<Vec<f64>, SimulationError>
    where
        F: FnMut(Range<usize>) -> Result<Vec<f64>, SimulationError>,
    {
        let requested = self.config.num_trials;
        let mut samples = Vec::with_capacity(requested);

        log::debug!(
            "Running {} trials over {} tasks (seed {}, velocity {})",
            requested,
            self.graph.len(),
            seed,
            self.config.velocity_factor
        );

        while samples.len() < requested {
            if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                log::warn!("Simulation cancelled after {} of {} trials", samples.len(), requested);
                return Err(SimulationError::Cancelled {
                    completed: samples.len(),
                    requested,
                });
            }
            let start = samples.len();
            let end = (start + BATCH_SIZE).min(requested);
            samples.extend(run_batch(start..end)?);
            if let Some(progress) = &self.progress {
                progress(samples.len(), requested);
            }
        }

        Ok(samples)
    }

    fn trial_state(&self) -> (ScheduleEvaluator<'g>, Vec<f64>) {
        (ScheduleEvaluator::new(self.graph), vec![0.0; self.graph.len()])
    }

    fn trial(
        &self,
        evaluator: &mut ScheduleEvaluator<'_>,
        durations: &mut [f64],
        seed: u64,
        trial: usize,
    ) -> Result<f64, SimulationError> {
        let mut rng = StdRng::seed_from_u64(trial_seed(seed, trial));
        for (slot, sampler) in durations.iter_mut().zip(&self.samplers) {
            *slot = sampler.sample(&mut rng);
        }
        let total = evaluator.evaluate(durations, self.config.velocity_factor);
        if !total.is_finite() {
            return Err(SimulationError::NumericOverflow(format!(
                "trial {} project duration",
                trial
            )));
        }
        Ok(total)
    }

    fn finish(&self, samples: Vec<f64>, seed: u64) -> Result<SimulationOutput, SimulationError> {
        let mut sorted = samples.clone();
        sorted.sort_by(f64::total_cmp);

        let mean = stats::mean(&samples);
        let std_dev = stats::population_std_dev(&samples, mean);
        if !mean.is_finite() || !std_dev.is_finite() {
            return Err(SimulationError::NumericOverflow(
                "summary statistics".to_string(),
            ));
        }

        let result = SimulationResult {
            num_tasks: self.graph.len(),
            num_trials: samples.len(),
            mean,
            median: stats::percentile(&sorted, 50.0),
            std_dev,
            ci_lower: stats::percentile(&sorted, 2.5),
            ci_upper: stats::percentile(&sorted, 97.5),
            min: sorted.first().copied().unwrap_or(0.0),
            max: sorted.last().copied().unwrap_or(0.0),
            sprint_points: stats::sprint_points(mean, self.config.sprint_hours),
            velocity_factor: self.config.velocity_factor,
            seed,
        };

        log::info!(
            "Simulated {} trials over {} tasks: mean {:.2}h, 95% interval {:.2}h..{:.2}h",
            result.num_trials,
            result.num_tasks,
            result.mean,
            result.ci_lower,
            result.ci_upper
        );

        Ok(SimulationOutput { result, samples })
    }
}

/// Per-trial generator seed
fn trial_seed(base: u64, trial: usize) -> u64 {
    base ^ (trial as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
