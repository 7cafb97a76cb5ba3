//! Error types for the simulation core

use thiserror::Error;

/// Failures surfaced by graph construction and the simulation engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The dependency graph contains at least one directed cycle.
    ///
    /// `unresolved` lists the tasks that never became ready, in input order.
    /// It is not a partial schedule.
    #[error("dependency cycle detected among tasks: {}", .unresolved.join(", "))]
    CycleDetected { unresolved: Vec<String> },

    #[error("no valid tasks to simulate")]
    NoValidTasks,

    #[error("duplicate task id: {0}")]
    DuplicateTask(String),

    #[error("invalid estimate for task {id}: {reason}")]
    InvalidEstimate { id: String, reason: String },

    /// A duration or statistic exceeded the range of `f64`
    #[error("numeric overflow in {0}")]
    NumericOverflow(String),

    #[error("simulation cancelled after {completed} of {requested} trials")]
    Cancelled { completed: usize, requested: usize },
}
