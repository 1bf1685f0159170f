//! iterplot: renders the per-iteration statistics of a morph segmentation
//! training run.
//!
//! The crate keeps a strict split between the statistics schema (`stats`),
//! chart construction (`plot`), backend-agnostic drawing (`render`) and the
//! command-line driver (`cli`).

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod plot;
pub mod render;
pub mod stats;
pub mod telemetry;

pub use config::PlotConfig;
pub use error::{PlotError, PlotResult};
pub use plot::{IterationStatisticsPlotter, StatisticsPlotter};
pub use stats::IterationStatistics;
