//! Simulation parameters and the tolerant parameter policy
//!
//! Bad parameter values are never errors: absent, unparsable, non-positive
//! or non-finite inputs fall back to the documented defaults.

use serde::{Deserialize, Serialize};

/// Trials per run when none (or an invalid count) is given
pub const DEFAULT_TRIALS: usize = 10_000;
/// Neutral team speed
pub const DEFAULT_VELOCITY: f64 = 1.0;
/// Hours per sprint point
pub const DEFAULT_SPRINT_HOURS: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub num_trials: usize,
    pub velocity_factor: f64,
    pub sprint_hours: f64,
    /// Base seed; `None` draws a fresh one per run
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_trials: DEFAULT_TRIALS,
            velocity_factor: DEFAULT_VELOCITY,
            sprint_hours: DEFAULT_SPRINT_HOURS,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Build a config from raw, user-supplied parameter text
    pub fn from_raw(trials: Option<&str>, velocity: Option<&str>) -> Self {
        Self::default().with_raw_trials(trials).with_raw_velocity(velocity)
    }

    /// Override the trial count from raw text; `None` keeps the current value
    pub fn with_raw_trials(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.num_trials = parse_trials(raw).unwrap_or_else(|| {
                log::warn!("Invalid trial count {:?}, using {}", raw, DEFAULT_TRIALS);
                DEFAULT_TRIALS
            });
        }
        self
    }

    /// Override the velocity factor from raw text; `None` keeps the current value
    pub fn with_raw_velocity(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.velocity_factor = parse_positive(raw).unwrap_or_else(|| {
                log::warn!("Invalid velocity factor {:?}, using {}", raw, DEFAULT_VELOCITY);
                DEFAULT_VELOCITY
            });
        }
        self
    }

    /// Override hours per sprint point from raw text; `None` keeps the current value
    pub fn with_raw_sprint_hours(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.sprint_hours = parse_positive(raw).unwrap_or_else(|| {
                log::warn!("Invalid sprint hours {:?}, using {}", raw, DEFAULT_SPRINT_HOURS);
                DEFAULT_SPRINT_HOURS
            });
        }
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace out-of-range numeric fields with their defaults
    pub fn normalized(mut self) -> Self {
        if self.num_trials == 0 {
            log::warn!("Trial count must be positive, using {}", DEFAULT_TRIALS);
            self.num_trials = DEFAULT_TRIALS;
        }
        if !is_positive(self.velocity_factor) {
            log::warn!(
                "Velocity factor {} is not positive, using {}",
                self.velocity_factor,
                DEFAULT_VELOCITY
            );
            self.velocity_factor = DEFAULT_VELOCITY;
        }
        if !is_positive(self.sprint_hours) {
            log::warn!(
                "Sprint hours {} is not positive, using {}",
                self.sprint_hours,
                DEFAULT_SPRINT_HOURS
            );
            self.sprint_hours = DEFAULT_SPRINT_HOURS;
        }
        self
    }
}

fn parse_trials(raw: &str) -> Option<usize> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| is_positive(*v))
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
