//! Rendering: turn aligned series into PNG figures.
//!
//! A [`Figure`] is one image made of one or more side-by-side panels. Each
//! panel overlays the baseline and candidate series on a shared x axis.

pub mod plot;

use image::Rgb;

use crate::data::model::NumericSeries;

/// How one run's line is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub color: Rgb<u8>,
    pub line_width: u32,
}

/// A labelled series ready to plot.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub values: NumericSeries,
    pub style: SeriesStyle,
}

/// One panel of a figure.
#[derive(Debug, Clone)]
pub struct PanelData {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x: NumericSeries,
    pub series: Vec<PlotSeries>,
}

/// One output image.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    pub panels: Vec<PanelData>,
}
