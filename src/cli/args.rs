use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::Parser;

use crate::config::PlotConfig;
use crate::core::Viewport;
use crate::error::PlotResult;
use crate::plot::DEFAULT_STYLE;
use crate::render::OutputFormat;

pub const PROGRAM_NAME: &str = "plot-iteration-stats";

/// Option names recognized after the statistics path. Any other token in the
/// style position is taken as the style, even when it starts with `-`.
const OPTION_NAMES: [&str; 9] = [
    "-o",
    "--output-dir",
    "-f",
    "--format",
    "--width",
    "--height",
    "--columns",
    "-c",
    "--config",
];

/// Options accepted after `<statsfile> [style]`.
///
/// The help flag is handled before clap sees the arguments, so clap's own
/// help and version flags are disabled.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = PROGRAM_NAME, disable_help_flag = true, disable_version_flag = true)]
pub struct CliOptions {
    /// Directory for the rendered surfaces.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Surface format: svg or png.
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Width of one chart cell in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Height of one chart cell in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of columns of the stacked grid.
    #[arg(long)]
    pub columns: Option<u32>,

    /// JSON plot configuration; other flags override its fields.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Extra positional arguments are accepted and ignored.
    #[arg(hide = true)]
    pub ignored: Vec<OsString>,
}

/// Command-line surface of `plot-iteration-stats`.
///
/// `argv[1]` is always the statistics path and `argv[2]`, unless it names an
/// option, is always the style. Both are taken literally.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub statsfile: PathBuf,
    pub style: String,
    pub options: CliOptions,
}

impl CliArgs {
    /// Splits `args` (program name first) into the positional contract and
    /// the trailing options. The usage check must already have passed.
    pub fn try_parse(args: &[OsString]) -> Result<Self, clap::Error> {
        let statsfile = args.get(1).map(PathBuf::from).unwrap_or_default();
        let mut rest = args.get(2..).unwrap_or_default();

        let style = match rest.first() {
            Some(token) if !is_option_token(token) => {
                rest = &rest[1..];
                token.to_string_lossy().into_owned()
            }
            _ => DEFAULT_STYLE.to_owned(),
        };

        let options = CliOptions::try_parse_from(
            std::iter::once(OsString::from(PROGRAM_NAME)).chain(rest.iter().cloned()),
        )?;
        Ok(Self {
            statsfile,
            style,
            options,
        })
    }

    /// Resolves the plot configuration: config file first, then flags.
    pub fn plot_config(&self) -> PlotResult<PlotConfig> {
        let options = &self.options;
        let mut config = match &options.config {
            Some(path) => PlotConfig::load_file(path)?,
            None => PlotConfig::default(),
        };

        if let Some(dir) = &options.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(format) = options.format {
            config = config.with_format(format);
        }
        if options.width.is_some() || options.height.is_some() {
            let cell = Viewport::new(
                options.width.unwrap_or(config.cell.width),
                options.height.unwrap_or(config.cell.height),
            );
            config = config.with_cell(cell);
        }
        if let Some(columns) = options.columns {
            config = config.with_stacked_columns(columns);
        }

        config.validate()?;
        Ok(config)
    }
}

fn is_option_token(token: &OsStr) -> bool {
    let Some(token) = token.to_str() else {
        return false;
    };
    let name = token.split_once('=').map_or(token, |(name, _)| name);
    OPTION_NAMES.contains(&name)
}

/// Whether `args` (program name first) must be answered with the usage text.
#[must_use]
pub fn is_bad_invocation(args: &[OsString]) -> bool {
    args.len() < 2 || args[1].as_os_str() == OsStr::new("--help")
}

/// Two-line usage text.
#[must_use]
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <statsfile> [style]\n  style: stacked (default) or separate"
    )
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::{CliArgs, is_bad_invocation};

    fn os_args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn second_positional_is_the_style_even_with_leading_hyphen() {
        let args = CliArgs::try_parse(&os_args(&["prog", "-run.json", "-weird"])).expect("args");
        assert_eq!(args.statsfile.to_str(), Some("-run.json"));
        assert_eq!(args.style, "-weird");
    }

    #[test]
    fn option_in_style_position_keeps_default_style() {
        let args =
            CliArgs::try_parse(&os_args(&["prog", "run.json", "--columns=3"])).expect("args");
        assert_eq!(args.style, "stacked");
        assert_eq!(args.options.columns, Some(3));
    }

    #[test]
    fn extra_positionals_are_ignored() {
        let args = CliArgs::try_parse(&os_args(&["prog", "run.json", "separate", "extra", "more"]))
            .expect("args");
        assert_eq!(args.style, "separate");
        assert_eq!(args.options.ignored.len(), 2);
    }

    #[test]
    fn only_leading_help_is_a_bad_invocation() {
        assert!(is_bad_invocation(&os_args(&["prog"])));
        assert!(is_bad_invocation(&os_args(&["prog", "--help", "run.json"])));
        assert!(!is_bad_invocation(&os_args(&["prog", "run.json", "--help"])));
    }
}
