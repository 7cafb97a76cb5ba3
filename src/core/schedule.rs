//! Schedule evaluator - forward pass over the topological order

use super::graph::TaskGraph;

/// Computes per-task finish times for one trial.
///
/// Holds a scratch buffer so repeated trials on the same graph do not
/// allocate. Cost is linear in tasks plus dependency edges.
#[derive(Debug)]
pub struct ScheduleEvaluator<'g> {
    graph: &'g TaskGraph,
    finish: Vec<f64>,
}

impl<'g> ScheduleEvaluator<'g> {
    pub fn new(graph: &'g TaskGraph) -> Self {
        Self {
            graph,
            finish: vec![0.0; graph.len()],
        }
    }

    /// Project duration for one set of sampled durations.
    ///
    /// `durations` is indexed like `TaskGraph::tasks()`. Each task starts
    /// when its last dependency finishes and runs for
    /// `duration * velocity_factor`.
    pub fn evaluate(&mut self, durations: &[f64], velocity_factor: f64) -> f64 {
        debug_assert_eq!(durations.len(), self.graph.len());

        let mut project = 0.0_f64;
        for task in self.graph.order().iter() {
            let start = self
                .graph
                .predecessors(task)
                .iter()
                .map(|&dep| self.finish[dep])
                .fold(0.0_f64, f64::max);
            let end = start + durations[task] * velocity_factor;
            self.finish[task] = end;
            project = project.max(end);
        }
        project
    }
}
