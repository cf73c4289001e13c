use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::color::color_or_palette;
use crate::config::{ChartSpec, Config, PanelSpec, RunSpec};
use crate::data::align::{align_pair_skipping_leading_missing_with, align_pair_with};
use crate::data::loader::{column, load_metric_table, time_axis};
use crate::data::model::{MetricTable, NumericSeries};
use crate::data::smooth::SmoothingParams;
use crate::render::plot::render_png;
use crate::render::{Figure, PanelData, PlotSeries, SeriesStyle};

// ---------------------------------------------------------------------------
// Loaded run
// ---------------------------------------------------------------------------

/// One broker version: its metrics table and how its line is drawn.
#[derive(Debug, Clone)]
pub struct Run {
    pub table: MetricTable,
    pub style: SeriesStyle,
}

impl Run {
    /// Load the run's CSV. `slot` picks the fallback palette colour.
    pub fn load(spec: &RunSpec, skip_footer: usize, slot: usize) -> Result<Self> {
        let table = load_metric_table(&spec.path, skip_footer)
            .with_context(|| format!("loading run {}", spec.label))?;
        log::info!(
            "Loaded run {} from {}: {} rows, {} columns",
            spec.label,
            spec.path.display(),
            table.len(),
            table.column_names.len()
        );
        Ok(Self {
            table,
            style: SeriesStyle {
                label: spec.label.clone(),
                color: color_or_palette(spec.color.as_deref(), slot, 2),
                line_width: spec.line_width,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Outcome of a pipeline run.
#[derive(Debug, Default)]
pub struct Report {
    /// Images written.
    pub written: Vec<PathBuf>,
    /// `(output_file, error)` for every chart that was aborted.
    pub failed: Vec<(String, String)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load both runs and render every configured chart.
///
/// A chart that fails is logged and skipped; the rest still render. Only a
/// failure to load the inputs aborts the whole run.
pub fn run(config: &Config) -> Result<Report> {
    config.validate()?;

    let baseline = Run::load(&config.baseline, config.skip_footer, 0)?;
    let candidate = Run::load(&config.candidate, config.skip_footer, 1)?;
    let x = shared_time_axis(&baseline.table, &candidate.table, &config.time_column)?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let mut report = Report::default();
    for chart in &config.charts {
        let path = config.output_dir.join(&chart.output_file);
        let result = build_figure(chart, &baseline, &candidate, &x, config.smoothing)
            .and_then(|figure| render_png(&figure, &path));
        match result {
            Ok(()) => report.written.push(path),
            Err(e) => {
                log::error!("Chart {} failed: {e:#}", chart.output_file);
                report
                    .failed
                    .push((chart.output_file.clone(), format!("{e:#}")));
            }
        }
    }
    Ok(report)
}

/// The x axis comes from whichever run has more rows, so the longer series
/// is fully covered.
pub fn shared_time_axis(
    baseline: &MetricTable,
    candidate: &MetricTable,
    time_column: &str,
) -> Result<NumericSeries> {
    let longer = if candidate.len() > baseline.len() {
        candidate
    } else {
        baseline
    };
    time_axis(longer, time_column)
}

/// Build every panel of `chart`.
pub fn build_figure(
    chart: &ChartSpec,
    baseline: &Run,
    candidate: &Run,
    x: &NumericSeries,
    params: SmoothingParams,
) -> Result<Figure> {
    let panels = chart
        .panels
        .iter()
        .map(|panel| {
            build_panel(panel, baseline, candidate, x, params)
                .with_context(|| format!("panel '{}' ({})", panel.title, panel.metric))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Figure {
        title: chart.title.clone(),
        width: chart.width,
        height: chart.height,
        panels,
    })
}

/// extract → align → scale for one metric.
pub fn build_panel(
    panel: &PanelSpec,
    baseline: &Run,
    candidate: &Run,
    x: &NumericSeries,
    params: SmoothingParams,
) -> Result<PanelData> {
    let raw_candidate = column(&candidate.table, &panel.metric)?;
    let raw_baseline = column(&baseline.table, &panel.metric)?;

    let (aligned_candidate, aligned_baseline) = if panel.leading_missing {
        align_pair_skipping_leading_missing_with(&raw_candidate, &raw_baseline, params)?
    } else {
        align_pair_with(&raw_candidate, &raw_baseline, params)?
    };
    log::debug!(
        "{}: {} vs {} raw rows aligned to {}",
        panel.metric,
        raw_candidate.len(),
        raw_baseline.len(),
        aligned_candidate.len()
    );

    Ok(PanelData {
        title: panel.title.clone(),
        x_label: panel.x_label.clone(),
        y_label: panel.y_label.clone(),
        x: x.clone(),
        series: vec![
            PlotSeries {
                values: aligned_candidate.scaled(panel.scale),
                style: candidate.style.clone(),
            },
            PlotSeries {
                values: aligned_baseline.scaled(panel.scale),
                style: baseline.style.clone(),
            },
        ],
    })
}
