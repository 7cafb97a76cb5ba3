//! Task records and three-point estimates

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SimulationError;

/// A single unit of work with a three-point duration estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub optimistic: f64,
    pub likely: f64,
    pub pessimistic: f64,
    /// IDs of tasks that must finish before this one starts.
    /// IDs that match no task are ignored.
    #[serde(default, deserialize_with = "scalar_strings")]
    pub depends_on: Vec<String>,
}

/// Bare numbers are accepted wherever a task ID is expected (`id: 1`)
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Unsigned(u64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn scalar_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let ids = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}

impl Task {
    /// Create a task without dependencies
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        optimistic: f64,
        likely: f64,
        pessimistic: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            optimistic,
            likely,
            pessimistic,
            depends_on: Vec::new(),
        }
    }

    /// Create a task with a fixed duration (O == M == P)
    pub fn fixed(id: impl Into<String>, name: impl Into<String>, duration: f64) -> Self {
        Self::new(id, name, duration, duration, duration)
    }

    /// Builder-style dependency list
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Validated estimate for this task
    pub fn estimate(&self) -> Result<Estimate, SimulationError> {
        Estimate::new(self.optimistic, self.likely, self.pessimistic).map_err(|reason| {
            SimulationError::InvalidEstimate {
                id: self.id.clone(),
                reason,
            }
        })
    }
}

/// Optimistic / most-likely / pessimistic durations, in hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub optimistic: f64,
    pub likely: f64,
    pub pessimistic: f64,
}

impl Estimate {
    /// Validate a three-point estimate.
    ///
    /// Values must be finite and positive, and either strictly ordered
    /// (`O < M < P`) or all equal (a fixed duration).
    pub fn new(optimistic: f64, likely: f64, pessimistic: f64) -> Result<Self, String> {
        for (label, value) in [
            ("optimistic", optimistic),
            ("likely", likely),
            ("pessimistic", pessimistic),
        ] {
            if !value.is_finite() {
                return Err(format!("{} estimate is not a finite number", label));
            }
            if value <= 0.0 {
                return Err(format!("{} estimate must be positive, got {}", label, value));
            }
        }

        let ordered = optimistic < likely && likely < pessimistic;
        let fixed = optimistic == likely && likely == pessimistic;
        if !ordered && !fixed {
            return Err(format!(
                "estimates must satisfy O < M < P or O == M == P, got {} / {} / {}",
                optimistic, likely, pessimistic
            ));
        }

        Ok(Self {
            optimistic,
            likely,
            pessimistic,
        })
    }

    /// Whether all three estimates coincide
    pub fn is_fixed(&self) -> bool {
        self.pessimistic - self.optimistic == 0.0
    }

    /// Classic PERT expected duration, (O + 4M + P) / 6
    pub fn pert_mean(&self) -> f64 {
        (self.optimistic + 4.0 * self.likely + self.pessimistic) / 6.0
    }
}
