//! Task graph - builds the dependency DAG and its topological order

use std::collections::{HashMap, VecDeque};

use super::task::{Estimate, Task};
use crate::error::SimulationError;

/// Evaluation order over task indices; every task appears after all of
/// its known dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoOrder(Vec<usize>);

impl TopoOrder {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// Immutable dependency graph built once per simulation request
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    estimates: Vec<Estimate>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    order: TopoOrder,
}

impl TaskGraph {
    /// Build the graph and its topological order (Kahn's algorithm).
    ///
    /// Ready tasks are processed first-in first-out: the initial frontier
    /// is in input order, and successors are released in input order, so
    /// identical input always yields an identical order.
    pub fn build(tasks: Vec<Task>) -> Result<Self, SimulationError> {
        if tasks.is_empty() {
            return Err(SimulationError::NoValidTasks);
        }

        let mut index = HashMap::with_capacity(tasks.len());
        let mut estimates = Vec::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id.clone(), i).is_some() {
                return Err(SimulationError::DuplicateTask(task.id.clone()));
            }
            estimates.push(task.estimate()?);
        }

        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for dep_id in &task.depends_on {
                let Some(&dep) = index.get(dep_id) else {
                    log::debug!("Task {} depends on unknown task {}, ignoring", task.id, dep_id);
                    continue;
                };
                if predecessors[i].contains(&dep) {
                    continue;
                }
                predecessors[i].push(dep);
                successors[dep].push(i);
            }
        }

        let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
        let mut frontier: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(tasks.len());
        while let Some(current) = frontier.pop_front() {
            order.push(current);
            for &next in &successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    frontier.push_back(next);
                }
            }
        }

        if order.len() < tasks.len() {
            let unresolved = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &degree)| degree > 0)
                .map(|(i, _)| tasks[i].id.clone())
                .collect();
            return Err(SimulationError::CycleDetected { unresolved });
        }

        log::debug!("Built task graph: {} tasks", tasks.len());

        Ok(Self {
            tasks,
            estimates,
            predecessors,
            successors,
            order: TopoOrder(order),
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in input order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Validated estimates, indexed like `tasks()`
    pub fn estimates(&self) -> &[Estimate] {
        &self.estimates
    }

    pub fn order(&self) -> &TopoOrder {
        &self.order
    }

    /// Task IDs in evaluation order
    pub fn order_ids(&self) -> Vec<&str> {
        self.order.iter().map(|i| self.tasks[i].id.as_str()).collect()
    }

    /// Known dependencies of a task
    pub fn predecessors(&self, task: usize) -> &[usize] {
        &self.predecessors[task]
    }

    /// Tasks that depend on `task`
    pub fn successors(&self, task: usize) -> &[usize] {
        &self.successors[task]
    }

    /// Chain of task IDs that determines the project finish time for one
    /// set of per-task durations (indexed like `tasks()`).
    pub fn critical_path(&self, durations: &[f64]) -> Vec<String> {
        let mut finish = vec![0.0_f64; self.len()];
        let mut via: Vec<Option<usize>> = vec![None; self.len()];

        for task in self.order.iter() {
            let mut start = 0.0_f64;
            for &dep in &self.predecessors[task] {
                if finish[dep] > start || (via[task].is_none() && finish[dep] == start) {
                    start = finish[dep];
                    via[task] = Some(dep);
                }
            }
            finish[task] = start + durations.get(task).copied().unwrap_or(0.0);
        }

        let Some(mut current) = self
            .order
            .iter()
            .fold(None, |best: Option<usize>, task| match best {
                Some(b) if finish[b] >= finish[task] => Some(b),
                _ => Some(task),
            })
        else {
            return Vec::new();
        };

        let mut path = vec![self.tasks[current].id.clone()];
        while let Some(prev) = via[current] {
            path.push(self.tasks[prev].id.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}
