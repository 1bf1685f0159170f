use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::plot::StatisticsPlotter;
use crate::stats::IterationStatistics;

use super::args::{CliArgs, PROGRAM_NAME, is_bad_invocation, usage};

pub const EXIT_FAILURE: u8 = 1;
/// Distinguished status for a missing or malformed invocation.
pub const EXIT_USAGE: u8 = 2;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("missing or malformed invocation arguments")]
    Usage,

    #[error("{0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

impl DriverError {
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage | Self::InvalidArguments(_) => EXIT_USAGE,
            Self::Plot(_) => EXIT_FAILURE,
        }
    }

    /// Whether the error is about how the program was called.
    #[must_use]
    pub fn is_invocation_error(&self) -> bool {
        self.exit_code() == EXIT_USAGE
    }
}

/// A parsed, validated request to plot one statistics file.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub stats_path: PathBuf,
    pub style: String,
    pub config: PlotConfig,
}

impl Invocation {
    /// Parses `args` (program name first). The usage check must already have
    /// passed.
    pub fn parse(args: &[OsString]) -> Result<Self, DriverError> {
        let cli = CliArgs::try_parse(args)
            .map_err(|err| DriverError::InvalidArguments(err.to_string()))?;
        let config = cli.plot_config()?;
        Ok(Self {
            stats_path: cli.statsfile,
            style: cli.style,
            config,
        })
    }
}

/// Runs one invocation: usage check, load, then a single `show` call.
///
/// `make_plotter` receives the loaded statistics and is only called once
/// loading succeeded. The usage text is the only thing written to `stdout`.
pub fn run<W, P, F>(args: &[OsString], stdout: &mut W, make_plotter: F) -> Result<(), DriverError>
where
    W: Write,
    P: StatisticsPlotter,
    F: FnOnce(IterationStatistics, &Invocation) -> P,
{
    if is_bad_invocation(args) {
        let program = args
            .first()
            .and_then(|arg0| Path::new(arg0).file_name())
            .map_or_else(
                || PROGRAM_NAME.to_owned(),
                |name| name.to_string_lossy().into_owned(),
            );
        // The exit status carries the failure; a closed stdout changes nothing.
        let _ = writeln!(stdout, "{}", usage(&program));
        return Err(DriverError::Usage);
    }

    let invocation = Invocation::parse(args)?;
    debug!(
        path = %invocation.stats_path.display(),
        style = %invocation.style,
        "loading iteration statistics"
    );
    let stats = IterationStatistics::load_file(&invocation.stats_path)?;

    let mut plotter = make_plotter(stats, &invocation);
    plotter.show(&invocation.style)?;
    Ok(())
}
