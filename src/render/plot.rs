use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{Figure, PanelData, PlotSeries};
use crate::data::model::NumericSeries;

const FONT: &str = "sans-serif";
const FIGURE_TITLE_SIZE: u32 = 24;
const PANEL_TITLE_SIZE: u32 = 18;
const LABEL_SIZE: u32 = 14;

const MARGIN: u32 = 10;
const X_LABEL_AREA: u32 = 45;
const Y_LABEL_AREA: u32 = 70;
/// Below this a panel has no room for its tick labels.
const MIN_PANEL_WIDTH: u32 = 160;
const MIN_PANEL_HEIGHT: u32 = 120;

const LEGEND_SWATCH: i32 = 20;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// ---------------------------------------------------------------------------
// Figure → PNG
// ---------------------------------------------------------------------------

/// Rasterize `figure` and write it as a PNG.
pub fn render_png(figure: &Figure, path: &Path) -> Result<()> {
    let img = rasterize(figure)?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;

    log::info!(
        "wrote {} ({}x{}, {} panels)",
        path.display(),
        figure.width,
        figure.height,
        figure.panels.len()
    );
    Ok(())
}

/// Draw every panel of `figure` side by side into an in-memory image.
pub fn rasterize(figure: &Figure) -> Result<RgbImage> {
    if figure.panels.is_empty() {
        bail!("figure has no panels");
    }
    let n = figure.panels.len() as u32;
    if figure.width / n < MIN_PANEL_WIDTH || figure.height < MIN_PANEL_HEIGHT {
        bail!(
            "figure {}x{} is too small for {n} panels",
            figure.width,
            figure.height
        );
    }

    let (width, height) = (figure.width, figure.height);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure)?;
        root.present().context("flushing figure")?;
    }
    RgbImage::from_raw(width, height, buffer).context("figure buffer has the wrong size")
}

fn draw_figure(root: &Canvas<'_>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE)?;
    let body = match &figure.title {
        Some(title) => root.titled(title, (FONT, FIGURE_TITLE_SIZE))?,
        None => root.clone(),
    };

    let cells = body.split_evenly((1, figure.panels.len()));
    for (cell, panel) in cells.iter().zip(&figure.panels) {
        draw_panel(cell, panel).with_context(|| format!("panel '{}'", panel.title))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

fn draw_panel(area: &Canvas<'_>, panel: &PanelData) -> Result<()> {
    let ((x_min, x_max), (y_min, y_max)) = bounds(panel)?;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    if !panel.title.is_empty() {
        builder.caption(&panel.title, (FONT, PANEL_TITLE_SIZE));
    }
    let mut chart = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.label_style((FONT, LABEL_SIZE));
        if let Some(label) = &panel.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &panel.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;
    }

    for series in &panel.series {
        let PlotSeries { values, style } = series;
        let [r, g, b] = style.color.0;
        let stroke = RGBColor(r, g, b).stroke_width(style.line_width);

        // One line per stretch of finite points; missing samples leave gaps.
        for (i, run) in finite_runs(&panel.x, values).into_iter().enumerate() {
            let drawn = chart.draw_series(LineSeries::new(run, stroke))?;
            if i == 0 {
                drawn.label(style.label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + LEGEND_SWATCH, y)], stroke)
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, LABEL_SIZE))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Consecutive `(x, y)` points where both are finite.
fn finite_runs(x: &NumericSeries, y: &NumericSeries) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&xv, &yv) in x.iter().zip(y.iter()) {
        if xv.is_finite() && yv.is_finite() {
            current.push((xv, yv));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

type Bounds = (f64, f64);

/// Data bounds from finite values only. The x range covers every position
/// any series reaches, so a gap at the tail stays visible as a gap.
fn bounds(panel: &PanelData) -> Result<(Bounds, Bounds)> {
    let longest = panel.series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    let x_range = panel.x.truncated(longest).finite_range();
    let y_range = panel
        .series
        .iter()
        .filter_map(|s| s.values.truncated(panel.x.len()).finite_range())
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)));

    let (Some(x_range), Some(y_range)) = (x_range, y_range) else {
        bail!("no finite values to plot");
    };
    Ok((pad_degenerate(x_range), pad_degenerate(y_range)))
}

/// A flat range has no extent to map onto pixels.
fn pad_degenerate((lo, hi): Bounds) -> Bounds {
    if (hi - lo).abs() > f64::EPSILON {
        return (lo, hi);
    }
    let pad = if lo.abs() > f64::EPSILON { lo.abs() * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}
