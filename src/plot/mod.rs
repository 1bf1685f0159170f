//! Plotting collaborator: turns iteration statistics into chart surfaces.

pub mod chart;
pub mod frame_builder;
pub mod layout;
mod plotter;

pub use chart::{ChartKind, ChartSpec, Series, charts_for, stacked_charts};
pub use layout::{DEFAULT_STYLE, GridLayout, Layout};
pub use plotter::{IterationStatisticsPlotter, Surface};

use crate::error::PlotResult;

/// Anything that can display loaded statistics in a named style.
///
/// The style string is passed through as given on the command line; each
/// implementation decides how to interpret it.
pub trait StatisticsPlotter {
    fn show(&mut self, style: &str) -> PlotResult<()>;
}
