//! Result rendering - text summary, ASCII histogram, JSON

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::core::SimulationResult;

/// Equal-width binning of simulated project durations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn from_samples(samples: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let lower = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if samples.is_empty() {
            return Self {
                lower: 0.0,
                width: 0.0,
                counts: Vec::new(),
            };
        }

        if upper <= lower {
            return Self {
                lower,
                width: 0.0,
                counts: vec![samples.len()],
            };
        }

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0; bins];
        for &value in samples {
            let bin = (((value - lower) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Self {
            lower,
            width,
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// One line per bin, bars scaled to `max_bar` characters
    pub fn render(&self, max_bar: usize) -> String {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let mut out = String::new();
        for (i, &count) in self.counts.iter().enumerate() {
            let from = self.lower + self.width * i as f64;
            let to = from + self.width;
            let bar = "#".repeat(count * max_bar / peak);
            let _ = writeln!(
                out,
                "{:>9.2} - {:>9.2} | {:<width$} {}",
                from,
                to,
                bar,
                count,
                width = max_bar
            );
        }
        out
    }
}

/// Human-readable run summary
pub fn render_text(
    project: Option<&str>,
    result: &SimulationResult,
    critical_path: &[String],
    histogram: Option<&Histogram>,
) -> String {
    let mut out = String::new();
    if let Some(name) = project {
        let _ = writeln!(out, "Project: {}", name);
    }
    let _ = writeln!(out, "Tasks: {}", result.num_tasks);
    let _ = writeln!(out, "Trials: {}", result.num_trials);
    let _ = writeln!(out, "Velocity factor: {}", result.velocity_factor);
    let _ = writeln!(out, "Mean: {:.2} hours", result.mean);
    let _ = writeln!(out, "Median: {:.2} hours", result.median);
    let _ = writeln!(out, "Std dev: {:.2} hours", result.std_dev);
    let _ = writeln!(
        out,
        "95% interval: {:.2} - {:.2} hours",
        result.ci_lower, result.ci_upper
    );
    let _ = writeln!(out, "Range: {:.2} - {:.2} hours", result.min, result.max);
    let _ = writeln!(out, "Sprint points: {}", result.sprint_points);
    if !critical_path.is_empty() {
        let _ = writeln!(out, "Critical path (PERT means): {}", critical_path.join(" -> "));
    }
    if let Some(histogram) = histogram {
        out.push('\n');
        out.push_str(&histogram.render(40));
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a str>,
    result: &'a SimulationResult,
    critical_path: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    samples: Option<&'a [f64]>,
}

/// Machine-readable run summary, optionally with the raw samples
pub fn render_json(
    project: Option<&str>,
    result: &SimulationResult,
    critical_path: &[String],
    samples: Option<&[f64]>,
) -> Result<String> {
    let report = JsonReport {
        project,
        result,
        critical_path,
        samples,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
