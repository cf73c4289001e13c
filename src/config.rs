//! Declarative chart configuration.
//!
//! Each chart is a PNG with one or more panels; each panel compares one
//! metric between the baseline and candidate runs. [`Config::default`]
//! reproduces the standard broker comparison set.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::smooth::SmoothingParams;

const ONE_MB: f64 = 1000.0 * 1000.0;
const THOUSAND: f64 = 1000.0;
/// Widest stroke a run may ask for, in pixels.
pub const MAX_LINE_WIDTH: u32 = 20;

/// One broker version's metrics file and how to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub label: String,
    pub path: PathBuf,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

/// One metric comparison inside a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub title: String,
    pub metric: String,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    /// Values are divided by this before plotting.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// The metric starts with missing samples; strip them before smoothing.
    #[serde(default)]
    pub leading_missing: bool,
}

/// One output image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(default)]
    pub title: Option<String>,
    pub output_file: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    pub panels: Vec<PanelSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub time_column: String,
    /// Trailing summary records to drop from each CSV.
    pub skip_footer: usize,
    pub smoothing: SmoothingParams,
    pub baseline: RunSpec,
    pub candidate: RunSpec,
    pub charts: Vec<ChartSpec>,
}

fn default_line_width() -> u32 {
    1
}

fn default_scale() -> f64 {
    1.0
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

impl Config {
    /// Read a JSON config file. Missing top-level fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.smoothing
            .validate()
            .context("invalid smoothing parameters")?;
        for run in [&self.baseline, &self.candidate] {
            if !(1..=MAX_LINE_WIDTH).contains(&run.line_width) {
                bail!(
                    "run '{}' has line width {}, expected 1..={MAX_LINE_WIDTH}",
                    run.label,
                    run.line_width
                );
            }
        }
        if self.charts.is_empty() {
            bail!("config defines no charts");
        }
        for chart in &self.charts {
            if chart.panels.is_empty() {
                bail!("chart '{}' has no panels", chart.output_file);
            }
            if !chart.output_file.ends_with(".png") {
                bail!("chart output '{}' must be a .png file", chart.output_file);
            }
            if chart.width == 0 || chart.height == 0 {
                bail!("chart '{}' has a zero dimension", chart.output_file);
            }
            for panel in &chart.panels {
                if !panel.scale.is_finite() || panel.scale == 0.0 {
                    bail!(
                        "panel '{}' has invalid scale {}",
                        panel.title,
                        panel.scale
                    );
                }
            }
        }
        Ok(())
    }
}

impl PanelSpec {
    fn new(title: &str, metric: &str, y_label: &str, scale: f64) -> Self {
        Self {
            title: title.to_string(),
            metric: metric.to_string(),
            x_label: Some("time (ms)".to_string()),
            y_label: Some(y_label.to_string()),
            scale,
            leading_missing: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let single = |title: &str, metric: &str, y_label: &str, scale: f64, file: &str| ChartSpec {
            title: None,
            output_file: file.to_string(),
            width: default_width(),
            height: default_height(),
            panels: vec![PanelSpec::new(title, metric, y_label, scale)],
        };

        let mut records_per_fetch = PanelSpec::new(
            "Records per Fetch Request",
            "kafka-consumer:records-per-request-avg",
            "records",
            1.0,
        );
        records_per_fetch.leading_missing = true;

        Self {
            output_dir: PathBuf::from("plots"),
            time_column: "time-ms".to_string(),
            skip_footer: 1,
            smoothing: SmoothingParams::default(),
            baseline: RunSpec {
                label: "2.3.1".to_string(),
                path: PathBuf::from("data-kafka231.csv"),
                color: Some("green".to_string()),
                line_width: 1,
            },
            candidate: RunSpec {
                label: "2.4.0".to_string(),
                path: PathBuf::from("data-kafka240.csv"),
                color: Some("blue".to_string()),
                line_width: 1,
            },
            charts: vec![
                single(
                    "Broker to Consumer Network Traffic",
                    "broker:kafka.server:type=BrokerTopicMetrics:name=BytesOutPerSec",
                    "broker bytes out (MB)",
                    ONE_MB,
                    "broker_to_consumer_network_traffic.png",
                ),
                single(
                    "Consumer Record Throughput",
                    "kafka-consumer:records-consumed-total",
                    "consumed records (x1000)",
                    THOUSAND,
                    "consumer_record_throughput.png",
                ),
                ChartSpec {
                    title: None,
                    output_file: "jvm_memory.png".to_string(),
                    width: 1500,
                    height: 500,
                    panels: vec![
                        PanelSpec::new(
                            "JVM Heap Memory Usage",
                            "jvm:heap-bytes:mean",
                            "bytes used (MB)",
                            ONE_MB,
                        ),
                        PanelSpec::new(
                            "JVM Non-Heap Memory Usage",
                            "jvm:non-heap-bytes:mean",
                            "bytes used (MB)",
                            ONE_MB,
                        ),
                        PanelSpec::new(
                            "JVM Direct Memory Usage",
                            "jvm:direct-bytes:mean",
                            "bytes used (MB)",
                            ONE_MB,
                        ),
                    ],
                },
                ChartSpec {
                    title: None,
                    output_file: "fetch_requests.png".to_string(),
                    width: 1000,
                    height: 500,
                    panels: vec![
                        PanelSpec::new(
                            "Fetch Requests",
                            "kafka-consumer:fetch-total",
                            "fetch requests",
                            1.0,
                        ),
                        records_per_fetch,
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.charts.len(), 4);
        let panels: usize = config.charts.iter().map(|c| c.panels.len()).sum();
        assert_eq!(panels, 7);
        assert!(config
            .charts
            .iter()
            .flat_map(|c| &c.panels)
            .any(|p| p.leading_missing));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "output_dir": "out",
            "charts": [
                { "output_file": "heap.png",
                  "panels": [
                    { "title": "Heap", "metric": "jvm:heap-bytes:mean", "scale": 1000000.0 }
                  ] }
            ]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.time_column, "time-ms");
        assert_eq!(config.skip_footer, 1);
        assert_eq!(config.charts[0].width, 640);
        assert!(!config.charts[0].panels[0].leading_missing);
        assert_eq!(config.baseline.label, "2.3.1");
    }

    #[test]
    fn rejects_zero_scale() {
        let mut config = Config::default();
        config.charts[0].panels[0].scale = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_line_width_out_of_range() {
        let mut config = Config::default();
        config.baseline.line_width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.candidate.line_width = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("line width"));

        let mut config = Config::default();
        config.candidate.line_width = MAX_LINE_WIDTH;
        config.validate().unwrap();
    }

    #[test]
    fn rejects_non_png_output() {
        let mut config = Config::default();
        config.charts[0].output_file = "chart.svg".to_string();
        assert!(config.validate().is_err());
    }
}
