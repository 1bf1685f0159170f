//! Iteration statistics recorded by a training run, and their on-disk form.

mod contract;
mod model;

pub use contract::{ITERATION_STATISTICS_JSON_SCHEMA_V1, IterationStatisticsJsonContractV1};
pub use model::{BoundaryScores, IterationSample, IterationStatistics};
