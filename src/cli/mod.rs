//! Command-line driver of `plot-iteration-stats`.

mod args;
mod driver;

pub use args::{CliArgs, CliOptions, PROGRAM_NAME, is_bad_invocation, usage};
pub use driver::{DriverError, EXIT_FAILURE, EXIT_USAGE, Invocation, run};
