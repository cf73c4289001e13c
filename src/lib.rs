//! Comparative broker performance charts.
//!
//! Two CSV metric runs (one per broker version) are loaded, each configured
//! metric is smoothed and aligned onto a shared time axis, and the pair is
//! rendered as a PNG. See [`data::align::align_pair`] for the core routine.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;

pub use data::align::{align_pair, pad_with_missing};
pub use data::model::NumericSeries;
pub use data::smooth::smooth;
pub use error::AlignError;
