//! Core engine - task graph, duration sampling, schedule evaluation, Monte Carlo runs

mod cancel;
mod engine;
mod graph;
mod sampler;
mod schedule;
pub mod stats;
mod task;

pub use cancel::CancellationToken;
pub use engine::{ProgressFn, SimulationEngine, SimulationOutput, SimulationResult, BATCH_SIZE};
pub use graph::{TaskGraph, TopoOrder};
pub use sampler::DurationSampler;
pub use schedule::ScheduleEvaluator;
pub use task::{Estimate, Task};
