//! pertsim - Monte Carlo project schedule estimation
//!
//! Propagates Beta-PERT task estimates through a dependency graph to
//! produce a distribution of total project duration.

pub mod config;
pub mod core;
pub mod error;
pub mod project;
pub mod report;

// Re-exports
pub use crate::config::SimulationConfig;
pub use crate::core::{
    CancellationToken, DurationSampler, Estimate, ScheduleEvaluator, SimulationEngine,
    SimulationOutput, SimulationResult, Task, TaskGraph, TopoOrder,
};
pub use crate::error::SimulationError;
pub use crate::project::Project;

/// Result type alias
pub type Result<T> = anyhow::Result<T>;

/// Estimator - main entry point for library usage
///
/// Builds and sorts the task graph once, then runs simulations against it.
#[derive(Debug, Clone)]
pub struct Estimator {
    graph: TaskGraph,
    config: SimulationConfig,
}

impl Estimator {
    /// Validate the task graph; fails on cycles before any sampling
    pub fn new(
        tasks: Vec<Task>,
        config: SimulationConfig,
    ) -> std::result::Result<Self, SimulationError> {
        let graph = TaskGraph::build(tasks)?;
        Ok(Self { graph, config })
    }

    /// Create an estimator from a project file
    pub fn from_project(project: Project) -> Result<Self> {
        Ok(Self::new(project.tasks, project.config)?)
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Engine over this graph, for callers that need cancellation or progress
    pub fn engine(&self) -> SimulationEngine<'_> {
        SimulationEngine::new(&self.graph, self.config.clone())
    }

    pub fn run(&self) -> std::result::Result<SimulationOutput, SimulationError> {
        self.engine().run()
    }

    /// Critical path when every task takes its PERT mean duration
    pub fn expected_critical_path(&self) -> Vec<String> {
        let durations: Vec<f64> = self.graph.estimates().iter().map(Estimate::pert_mean).collect();
        self.graph.critical_path(&durations)
    }
}

/// Build the graph and run one simulation
pub fn simulate(
    tasks: Vec<Task>,
    config: SimulationConfig,
) -> std::result::Result<SimulationOutput, SimulationError> {
    Estimator::new(tasks, config)?.run()
}
