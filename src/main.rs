use std::ffi::OsString;
use std::process::ExitCode;

use iterplot::cli::{self, DriverError};
use iterplot::plot::IterationStatisticsPlotter;

fn main() -> ExitCode {
    let _ = iterplot::telemetry::init_default_tracing();

    let args: Vec<OsString> = std::env::args_os().collect();
    let mut stdout = std::io::stdout().lock();
    let outcome = cli::run(&args, &mut stdout, |stats, invocation| {
        IterationStatisticsPlotter::for_statistics_file(
            stats,
            invocation.config.clone(),
            &invocation.stats_path,
        )
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(DriverError::Usage) => ExitCode::from(cli::EXIT_USAGE),
        Err(err @ DriverError::InvalidArguments(_)) => {
            eprint!("{err}");
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
