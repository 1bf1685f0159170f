mod support;

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::rc::Rc;

use iterplot::cli::{self, DriverError, EXIT_FAILURE, EXIT_USAGE};
use iterplot::{IterationStatistics, PlotError, PlotResult, StatisticsPlotter};

#[derive(Debug, Default)]
struct Calls {
    constructed: usize,
    styles: Vec<String>,
    records: Vec<usize>,
}

struct RecordingPlotter {
    calls: Rc<RefCell<Calls>>,
    records: usize,
}

impl StatisticsPlotter for RecordingPlotter {
    fn show(&mut self, style: &str) -> PlotResult<()> {
        let mut calls = self.calls.borrow_mut();
        calls.styles.push(style.to_owned());
        calls.records.push(self.records);
        Ok(())
    }
}

fn args(list: &[&str]) -> Vec<OsString> {
    list.iter().map(OsString::from).collect()
}

fn run_recorded(argv: &[OsString]) -> (Result<(), DriverError>, String, Calls) {
    let calls = Rc::new(RefCell::new(Calls::default()));
    let mut stdout = Vec::new();
    let result = cli::run(argv, &mut stdout, |stats: IterationStatistics, _| {
        calls.borrow_mut().constructed += 1;
        RecordingPlotter {
            calls: Rc::clone(&calls),
            records: stats.len(),
        }
    });
    let calls = Rc::try_unwrap(calls)
        .expect("plotter dropped after run")
        .into_inner();
    (
        result,
        String::from_utf8(stdout).expect("utf8 stdout"),
        calls,
    )
}

fn write_statistics(name: &str) -> String {
    let dir = support::scratch_dir(name);
    let path = dir.join("run.json");
    support::sample_statistics(false)
        .write_file(&path)
        .expect("write statistics");
    path.to_string_lossy().into_owned()
}

#[test]
fn missing_arguments_print_usage_and_signal_bad_invocation() {
    for argv in [args(&[]), args(&["plot-iteration-stats"])] {
        let (result, stdout, calls) = run_recorded(&argv);

        let err = result.expect_err("bad invocation");
        assert!(matches!(err, DriverError::Usage));
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert_eq!(stdout.lines().count(), 2);
        assert!(stdout.starts_with("Usage: plot-iteration-stats <statsfile> [style]"));
        assert_eq!(calls.constructed, 0);
    }
}

#[test]
fn help_flag_prints_usage_regardless_of_other_arguments() {
    let stats = write_statistics("help-flag");
    for argv in [
        args(&["/usr/bin/plot-iteration-stats", "--help"]),
        args(&["plot-iteration-stats", "--help", &stats, "separate"]),
    ] {
        let (result, stdout, calls) = run_recorded(&argv);

        assert!(matches!(result, Err(DriverError::Usage)));
        assert_eq!(stdout.lines().count(), 2);
        assert!(stdout.starts_with("Usage: plot-iteration-stats "));
        assert!(calls.styles.is_empty());
    }
}

#[test]
fn style_defaults_to_stacked() {
    let stats = write_statistics("default-style");
    let (result, stdout, calls) = run_recorded(&args(&["plot-iteration-stats", &stats]));

    result.expect("plotted");
    assert!(stdout.is_empty());
    assert_eq!(calls.constructed, 1);
    assert_eq!(calls.styles, vec!["stacked".to_owned()]);
    assert_eq!(calls.records, vec![12]);
}

#[test]
fn separate_style_is_forwarded() {
    let stats = write_statistics("separate-style");
    let (result, _, calls) = run_recorded(&args(&["plot-iteration-stats", &stats, "separate"]));

    result.expect("plotted");
    assert_eq!(calls.styles, vec!["separate".to_owned()]);
}

#[test]
fn unknown_style_is_forwarded_uninterpreted() {
    let stats = write_statistics("unknown-style");
    let (result, _, calls) = run_recorded(&args(&["plot-iteration-stats", &stats, "sideways"]));

    result.expect("plotted");
    assert_eq!(calls.styles, vec!["sideways".to_owned()]);
}

#[test]
fn missing_file_is_fatal_io_error_without_plotting() {
    let dir = support::scratch_dir("missing-file");
    let path = dir.join("absent.json");
    let (result, stdout, calls) = run_recorded(&args(&[
        "plot-iteration-stats",
        &path.to_string_lossy(),
    ]));

    let err = result.expect_err("missing file");
    assert!(matches!(err, DriverError::Plot(PlotError::Io { .. })));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert!(stdout.is_empty());
    assert_eq!(calls.constructed, 0);
}

#[test]
fn corrupt_file_is_fatal_decode_error_without_plotting() {
    let dir = support::scratch_dir("corrupt-file");
    let path = dir.join("corrupt.json");
    fs::write(&path, b"\x80\x04\x95 not a statistics document").expect("write corrupt file");

    let (result, _, calls) = run_recorded(&args(&[
        "plot-iteration-stats",
        &path.to_string_lossy(),
    ]));

    let err = result.expect_err("corrupt file");
    assert!(matches!(err, DriverError::Plot(PlotError::Decode { .. })));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert_eq!(calls.constructed, 0);
}

#[test]
fn unknown_option_is_a_bad_invocation() {
    let stats = write_statistics("unknown-option");
    let (result, _, calls) = run_recorded(&args(&[
        "plot-iteration-stats",
        &stats,
        "separate",
        "--bogus",
    ]));

    let err = result.expect_err("unknown option");
    assert!(matches!(err, DriverError::InvalidArguments(_)));
    assert!(err.is_invocation_error());
    assert_eq!(calls.constructed, 0);
}

#[test]
fn options_resolve_into_plot_config() {
    let dir = support::scratch_dir("options");
    let argv = args(&[
        "plot-iteration-stats",
        "run.json",
        "separate",
        "--output-dir",
        &dir.to_string_lossy(),
        "--width",
        "480",
        "--columns",
        "3",
    ]);
    let invocation = cli::Invocation::parse(&argv).expect("invocation");

    assert_eq!(invocation.style, "separate");
    assert_eq!(invocation.config.cell.width, 480);
    assert_eq!(invocation.config.cell.height, 540);
    assert_eq!(invocation.config.stacked_columns, 3);
    assert_eq!(invocation.config.output_dir.as_deref(), Some(dir.as_path()));
}

#[test]
fn style_with_leading_hyphen_is_forwarded() {
    let stats = write_statistics("hyphen-style");
    let (result, _, calls) = run_recorded(&args(&["plot-iteration-stats", &stats, "-weird"]));

    result.expect("plotted");
    assert_eq!(calls.styles, vec!["-weird".to_owned()]);
}

#[test]
fn arguments_after_the_style_are_ignored() {
    let stats = write_statistics("extra-arguments");
    let (result, _, calls) = run_recorded(&args(&[
        "plot-iteration-stats",
        &stats,
        "separate",
        "extra",
        "more",
    ]));

    result.expect("plotted");
    assert_eq!(calls.styles, vec!["separate".to_owned()]);
}

#[cfg(unix)]
#[test]
fn non_utf8_missing_path_is_fatal_io_error() {
    use std::os::unix::ffi::OsStringExt;

    let dir = support::scratch_dir("non-utf8-path");
    let mut raw = dir.join("stats").into_os_string().into_vec();
    raw.extend_from_slice(b"\xff.json");
    let argv = vec![
        OsString::from("plot-iteration-stats"),
        OsString::from_vec(raw),
    ];

    let (result, _, calls) = run_recorded(&argv);

    let err = result.expect_err("missing file");
    assert!(matches!(err, DriverError::Plot(PlotError::Io { .. })));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert_eq!(calls.constructed, 0);
}

#[test]
fn width_and_height_resolve_together() {
    let argv = args(&[
        "plot-iteration-stats",
        "run.json",
        "--height",
        "300",
        "--width",
        "400",
    ]);
    let invocation = cli::Invocation::parse(&argv).expect("invocation");

    assert_eq!(invocation.style, "stacked");
    assert_eq!(invocation.config.cell.width, 400);
    assert_eq!(invocation.config.cell.height, 300);
}

#[test]
fn width_flag_overrides_config_file_cell() {
    let dir = support::scratch_dir("config-and-width");
    let config_path = dir.join("plot.json");
    fs::write(
        &config_path,
        r#"{"cell": {"width": 400, "height": 300}, "stacked_columns": 3}"#,
    )
    .expect("write config");

    let argv = args(&[
        "plot-iteration-stats",
        "run.json",
        "separate",
        "--config",
        &config_path.to_string_lossy(),
        "--width",
        "640",
    ]);
    let invocation = cli::Invocation::parse(&argv).expect("invocation");

    assert_eq!(invocation.config.cell.width, 640);
    assert_eq!(invocation.config.cell.height, 300);
    assert_eq!(invocation.config.stacked_columns, 3);
}

#[test]
fn plotter_failure_is_fatal() {
    struct FailingPlotter;

    impl StatisticsPlotter for FailingPlotter {
        fn show(&mut self, _style: &str) -> PlotResult<()> {
            Err(PlotError::Backend("surface unavailable".to_owned()))
        }
    }

    let stats = write_statistics("failing-plotter");
    let mut stdout = Vec::new();
    let err = cli::run(
        &args(&["plot-iteration-stats", &stats]),
        &mut stdout,
        |_, _| FailingPlotter,
    )
    .expect_err("plotter failure");

    assert!(matches!(err, DriverError::Plot(PlotError::Backend(_))));
    assert_eq!(err.exit_code(), EXIT_FAILURE);
}
