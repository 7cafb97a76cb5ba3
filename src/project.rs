//! Project loading - turns project files into validated task records
//!
//! Two formats are accepted:
//! - YAML (`.yml` / `.yaml`) with `metadata`, `simulation` and `tasks` sections
//! - plain task lines: `id, name, optimistic, likely, pessimistic[, dep dep ...]`
//!
//! Malformed tasks are dropped with a warning. A project with no
//! surviving tasks is rejected.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

use crate::config::SimulationConfig;
use crate::core::{Estimate, Task};
use crate::error::SimulationError;

/// Files probed by `Project::auto_load`, in priority order
pub const DEFAULT_PROJECT_FILES: [&str; 3] = ["pertsim.yml", "pertsim.yaml", "tasks.txt"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub project: String,
    pub description: Option<String>,
}

/// Raw `simulation:` section; numeric fields are checked leniently
#[derive(Debug, Clone, Default, Deserialize)]
struct SimulationSection {
    trials: Option<Value>,
    velocity_factor: Option<Value>,
    sprint_hours: Option<Value>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    metadata: Option<Metadata>,
    #[serde(default)]
    simulation: SimulationSection,
    #[serde(default)]
    tasks: Vec<Value>,
}

/// Tasks plus the run parameters declared alongside them
#[derive(Debug, Clone)]
pub struct Project {
    pub metadata: Option<Metadata>,
    pub config: SimulationConfig,
    pub tasks: Vec<Task>,
    /// Number of task entries dropped as malformed
    pub dropped: usize,
}

impl Project {
    /// Load a project, picking the format from the file extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        );
        let project = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_task_lines(&content)
        };
        project.with_context(|| format!("Invalid project file {}", path.display()))
    }

    /// Auto-detect a project file in `dir`
    pub fn auto_load(dir: &Path) -> Result<Self> {
        for name in DEFAULT_PROJECT_FILES {
            let path = dir.join(name);
            if path.exists() {
                log::info!("Loading project from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        anyhow::bail!(
            "No project file found. Expected one of {} in {}",
            DEFAULT_PROJECT_FILES.join(", "),
            dir.display()
        )
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ProjectFile = serde_yaml::from_str(content)?;

        let mut tasks = Vec::with_capacity(file.tasks.len());
        let mut dropped = 0;
        for (i, raw) in file.tasks.into_iter().enumerate() {
            match serde_yaml::from_value::<Task>(raw)
                .map_err(|e| e.to_string())
                .and_then(validate)
            {
                Ok(task) => tasks.push(task),
                Err(reason) => {
                    log::warn!("Skipping task entry {}: {}", i + 1, reason);
                    dropped += 1;
                }
            }
        }

        let section = file.simulation;
        let mut config = SimulationConfig::default()
            .with_raw_trials(section.trials.as_ref().map(scalar_text).as_deref())
            .with_raw_velocity(section.velocity_factor.as_ref().map(scalar_text).as_deref())
            .with_raw_sprint_hours(section.sprint_hours.as_ref().map(scalar_text).as_deref());
        if let Some(seed) = section.seed {
            config = config.with_seed(seed);
        }

        Self::finish(file.metadata, config, tasks, dropped)
    }

    pub fn from_task_lines(content: &str) -> Result<Self> {
        let mut tasks = Vec::new();
        let mut dropped = 0;
        for (i, line) in content.lines().enumerate() {
            match parse_task_line(line) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {}
                Err(reason) => {
                    log::warn!("Skipping line {}: {}", i + 1, reason);
                    dropped += 1;
                }
            }
        }

        Self::finish(None, SimulationConfig::default(), tasks, dropped)
    }

    fn finish(
        metadata: Option<Metadata>,
        config: SimulationConfig,
        tasks: Vec<Task>,
        dropped: usize,
    ) -> Result<Self> {
        if tasks.is_empty() {
            return Err(SimulationError::NoValidTasks.into());
        }

        log::debug!("Loaded {} tasks ({} dropped)", tasks.len(), dropped);

        Ok(Self {
            metadata,
            config,
            tasks,
            dropped,
        })
    }
}

/// Parse one task line.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_task_line(line: &str) -> std::result::Result<Option<Task>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if !(5..=6).contains(&fields.len()) {
        return Err(format!("expected 5 or 6 comma-separated fields, got {}", fields.len()));
    }

    let number = |field: &str, label: &str| {
        field
            .parse::<f64>()
            .map_err(|_| format!("{} estimate {:?} is not a number", label, field))
    };

    let task = Task {
        id: fields[0].to_string(),
        name: fields[1].to_string(),
        optimistic: number(fields[2], "optimistic")?,
        likely: number(fields[3], "likely")?,
        pessimistic: number(fields[4], "pessimistic")?,
        depends_on: fields
            .get(5)
            .map(|deps| deps.split_whitespace().map(String::from).collect())
            .unwrap_or_default(),
    };

    validate(task).map(Some)
}

fn validate(task: Task) -> std::result::Result<Task, String> {
    if task.id.trim().is_empty() {
        return Err("task id is empty".to_string());
    }
    Estimate::new(task.optimistic, task.likely, task.pessimistic)
        .map_err(|reason| format!("task {}: {}", task.id, reason))?;
    Ok(task)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_line() {
        let task = parse_task_line(" T2, Build API , 2, 4, 9, T1 T0 ").unwrap().unwrap();
        assert_eq!(task.id, "T2");
        assert_eq!(task.name, "Build API");
        assert_eq!((task.optimistic, task.likely, task.pessimistic), (2.0, 4.0, 9.0));
        assert_eq!(task.depends_on, vec!["T1", "T0"]);
    }

    #[test]
    fn test_parse_task_line_without_dependencies() {
        let task = parse_task_line("T1, Design, 1, 2, 3").unwrap().unwrap();
        assert!(task.depends_on.is_empty());
        let task = parse_task_line("T1, , 5, 5, 5,").unwrap().unwrap();
        assert!(task.name.is_empty());
        assert!(task.depends_on.is_empty());
    }

    #[test]
    fn test_parse_task_line_skips_comments() {
        assert_eq!(parse_task_line("   ").unwrap(), None);
        assert_eq!(parse_task_line("# id, name, o, m, p").unwrap(), None);
    }

    #[test]
    fn test_parse_task_line_rejects_malformed() {
        assert!(parse_task_line("T1, Design, 1, 2").is_err());
        assert!(parse_task_line("T1, Design, one, 2, 3").is_err());
        assert!(parse_task_line("T1, Design, 3, 2, 1").is_err());
        assert!(parse_task_line(", Design, 1, 2, 3").is_err());
        assert!(parse_task_line("T1, Design, 0, 2, 3").is_err());
    }

    #[test]
    fn test_task_lines_drop_bad_entries() {
        let project = Project::from_task_lines(
            "# planning\nA, Alpha, 1, 2, 3\nB, Beta, x, 2, 3\nC, Gamma, 2, 3, 5, A\n",
        )
        .unwrap();
        assert_eq!(project.tasks.len(), 2);
        assert_eq!(project.dropped, 1);
        assert_eq!(project.config, SimulationConfig::default());
    }

    #[test]
    fn test_no_valid_tasks() {
        let err = Project::from_task_lines("bad line\nA, Alpha, 3, 2, 1\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimulationError>(),
            Some(&SimulationError::NoValidTasks)
        );
    }

    #[test]
    fn test_yaml_project() {
        let yaml = r#"
metadata:
  project: Website relaunch
simulation:
  trials: 2500
  velocity_factor: "1.2"
  sprint_hours: 4
  seed: 11
tasks:
  - { id: T1, name: Design, optimistic: 1, likely: 2, pessimistic: 4 }
  - { id: T2, name: Build, optimistic: 2, likely: 4, pessimistic: 9, depends_on: [T1] }
  - { id: T3, name: Broken, optimistic: 9, likely: 4, pessimistic: 2 }
  - { name: Missing id, optimistic: 1, likely: 2, pessimistic: 3 }
"#;
        let project = Project::from_yaml_str(yaml).unwrap();
        assert_eq!(project.metadata.unwrap().project, "Website relaunch");
        assert_eq!(project.tasks.len(), 2);
        assert_eq!(project.dropped, 2);
        assert_eq!(project.tasks[1].depends_on, vec!["T1"]);
        assert_eq!(project.config.num_trials, 2500);
        assert_eq!(project.config.velocity_factor, 1.2);
        assert_eq!(project.config.sprint_hours, 4.0);
        assert_eq!(project.config.seed, Some(11));
    }

    #[test]
    fn test_yaml_bad_parameters_fall_back() {
        let yaml = r#"
simulation:
  trials: -10
  velocity_factor: quick
  sprint_hours: lots
tasks:
  - { id: T1, optimistic: 5, likely: 5, pessimistic: 5 }
"#;
        let project = Project::from_yaml_str(yaml).unwrap();
        assert_eq!(project.config.num_trials, crate::config::DEFAULT_TRIALS);
        assert_eq!(project.config.velocity_factor, crate::config::DEFAULT_VELOCITY);
        assert_eq!(project.config.sprint_hours, crate::config::DEFAULT_SPRINT_HOURS);
    }

    #[test]
    fn test_yaml_numeric_task_ids() {
        let yaml = r#"
tasks:
  - { id: 1, name: Design, optimistic: 1, likely: 2, pessimistic: 4 }
  - { id: 2, name: Build, optimistic: 2, likely: 4, pessimistic: 9, depends_on: [1] }
  - { id: 3, name: Ship, optimistic: 1, likely: 1, pessimistic: 1, depends_on: [2, "1"] }
"#;
        let project = Project::from_yaml_str(yaml).unwrap();
        assert_eq!(project.dropped, 0);
        let ids: Vec<&str> = project.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(project.tasks[1].depends_on, vec!["1"]);
        assert_eq!(project.tasks[2].depends_on, vec!["2", "1"]);

        let graph = crate::core::TaskGraph::build(project.tasks).unwrap();
        assert_eq!(graph.order_ids(), vec!["1", "2", "3"]);
    }
}
