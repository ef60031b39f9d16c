//! Dashboard configuration.
//!
//! The dataset behind every panel (header stats, improvement percentages,
//! training statistics, live metrics) is explicit typed configuration loaded
//! from a TOML file, with environment variable overrides under the
//! `BLINKBOARD` prefix. Without a file the built-in pilot dataset is used.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{Counter, ValueFormat};
use crate::error::{Error, Result};
use crate::metrics::LiveMetric;

/// One animated counter entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CounterConfig {
    /// Display label
    pub label: String,
    /// Target value; entries without one are skipped, not errors
    #[serde(default)]
    pub value: Option<f64>,
    /// Output format
    #[serde(default)]
    pub format: ValueFormat,
}

impl CounterConfig {
    /// Build the counter, or `None` when the target is missing or not a
    /// finite number.
    pub fn build(&self, duration: Duration) -> Option<Counter> {
        match self.value {
            Some(value) if value.is_finite() => {
                Some(Counter::new(&self.label, value, duration, self.format))
            }
            _ => {
                debug!(label = %self.label, "skipping counter without numeric target");
                None
            }
        }
    }
}

/// One live metric entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricConfig {
    /// Display label
    pub label: String,
    /// Base value the jitter fluctuates around; entries without one are
    /// skipped
    #[serde(default)]
    pub base: Option<f64>,
}

impl MetricConfig {
    /// Build the metric, or `None` when the base is missing or not finite.
    pub fn build(&self) -> Option<LiveMetric> {
        match self.base {
            Some(base) if base.is_finite() => Some(LiveMetric::new(&self.label, base)),
            _ => {
                debug!(label = %self.label, "skipping metric without numeric base");
                None
            }
        }
    }
}

/// Full dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Dashboard title shown in the header
    #[serde(default = "default_title")]
    pub title: String,
    /// Render loop frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Number of junction demo light groups on the network tab
    #[serde(default = "default_demo_groups")]
    pub demo_groups: usize,
    /// Header statistics, animated once at startup
    #[serde(default)]
    pub header_stats: Vec<CounterConfig>,
    /// Improvement percentages on the overview tab
    #[serde(default)]
    pub improvements: Vec<CounterConfig>,
    /// Training statistics on the training tab
    #[serde(default)]
    pub training: Vec<CounterConfig>,
    /// Fluctuating metrics on the analysis tab
    #[serde(default)]
    pub live_metrics: Vec<MetricConfig>,
}

fn default_title() -> String {
    "Project BLINK — Adaptive Signal Control".to_string()
}

fn default_fps() -> u32 {
    30
}

fn default_demo_groups() -> usize {
    3
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let counter = |label: &str, value: f64, format: ValueFormat| CounterConfig {
            label: label.to_string(),
            value: Some(value),
            format,
        };
        let metric = |label: &str, base: f64| MetricConfig {
            label: label.to_string(),
            base: Some(base),
        };
        Self {
            title: default_title(),
            fps: default_fps(),
            demo_groups: default_demo_groups(),
            header_stats: vec![
                counter("City Ranking", 1.0, ValueFormat::Ranked),
                counter("Efficiency Gain", 37.0, ValueFormat::Percent),
                counter("Intersections Online", 412.0, ValueFormat::Integer),
            ],
            improvements: vec![
                counter("Average Wait Time", 42.0, ValueFormat::Percent),
                counter("Peak Throughput", 28.0, ValueFormat::Percent),
                counter("Idle Emissions", 19.0, ValueFormat::Percent),
                counter("Incident Response", 31.0, ValueFormat::Percent),
            ],
            training: vec![
                counter("Training Episodes", 2_847_293.0, ValueFormat::Grouped),
                counter("Simulated Junctions", 1_284.0, ValueFormat::Integer),
                counter("Model Iterations", 18_450.0, ValueFormat::Grouped),
            ],
            live_metrics: vec![
                metric("Vehicles / hour", 1500.0),
                metric("Avg Wait (s)", 42.0),
                metric("Queue Length", 12.5),
                metric("Corridor Flow", 3200.0),
            ],
        }
    }
}

impl DashboardConfig {
    /// Load configuration from an optional TOML file, applying `BLINKBOARD`
    /// environment overrides (e.g. `BLINKBOARD_FPS=60`) on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env = Environment::with_prefix("BLINKBOARD")
            .separator("__")
            .try_parsing(true);
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.display().to_string()));
                }
                let settings = Config::builder()
                    .add_source(File::from(path))
                    .add_source(env)
                    .build()?;
                Ok(settings.try_deserialize()?)
            }
            None => {
                // No file: env overrides layer onto the built-in dataset
                let settings = Config::builder().add_source(env).build()?;
                let mut config = Self::default();
                config.apply_overrides(&settings);
                Ok(config)
            }
        }
    }

    fn apply_overrides(&mut self, settings: &Config) {
        if let Ok(title) = settings.get_string("title") {
            self.title = title;
        }
        if let Ok(fps) = settings.get_int("fps") {
            self.fps = fps.max(1) as u32;
        }
        if let Ok(groups) = settings.get_int("demo_groups") {
            self.demo_groups = groups.max(0) as usize;
        }
    }

    /// Render the configuration as TOML (what `--print-config` emits).
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Frame interval implied by the configured frame rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_dataset_is_complete() {
        let config = DashboardConfig::default();
        assert!(!config.header_stats.is_empty());
        assert!(!config.improvements.is_empty());
        assert!(!config.training.is_empty());
        assert!(!config.live_metrics.is_empty());
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = DashboardConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: DashboardConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.title, config.title);
        assert_eq!(parsed.live_metrics.len(), config.live_metrics.len());
    }

    #[test]
    fn test_counter_without_value_is_skipped() {
        let entry = CounterConfig {
            label: "broken".to_string(),
            value: None,
            format: ValueFormat::Integer,
        };
        assert!(entry.build(Duration::from_millis(100)).is_none());
    }

    #[test]
    fn test_counter_with_nan_is_skipped() {
        let entry = CounterConfig {
            label: "nan".to_string(),
            value: Some(f64::NAN),
            format: ValueFormat::Integer,
        };
        assert!(entry.build(Duration::from_millis(100)).is_none());
    }

    #[test]
    fn test_counter_builds_with_finite_value() {
        let entry = CounterConfig {
            label: "ok".to_string(),
            value: Some(250.0),
            format: ValueFormat::Percent,
        };
        let counter = entry.build(Duration::from_millis(1500)).unwrap();
        assert_eq!(counter.target(), 250.0);
        assert_eq!(counter.render_at(Duration::ZERO), "0%");
    }

    #[test]
    fn test_metric_without_base_is_skipped() {
        let entry = MetricConfig {
            label: "broken".to_string(),
            base: None,
        };
        assert!(entry.build().is_none());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/blinkboard.toml");
        assert!(DashboardConfig::load(Some(missing)).is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
title = "test board"
fps = 15
demo_groups = 2

[[live_metrics]]
label = "flow"
base = 1200.0

[[improvements]]
label = "wait"
value = 10.0
format = "percent"
"#
        )
        .unwrap();
        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.title, "test board");
        assert_eq!(config.fps, 15);
        assert_eq!(config.live_metrics.len(), 1);
        assert_eq!(config.improvements.len(), 1);
        // Unspecified sections fall back to empty, not the default dataset
        assert!(config.header_stats.is_empty());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config.title, default_title());
    }
}
