use apbs_opal::workflows::OutputFormat;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Command, CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const CREDIT: &str = "\
----------------------------------------------------------------------
    APBS -- Adaptive Poisson-Boltzmann Solver

    Nathan A. Baker (nathan.baker@pnl.gov)
    Pacific Northwest National Laboratory

    Additional contributing authors listed in the code documentation.

    Please cite your use of APBS as:

    Baker NA, Sept D, Joseph S, Holst MJ, McCammon JA. Electrostatics of
    nanosystems: application to microtubules and the ribosome. Proc.
    Natl. Acad. Sci. USA 98, 10037-10041 2001.
----------------------------------------------------------------------";

#[derive(Parser, Debug)]
#[command(
    author = "Samir Unni, Dave Gohara, Nathan A. Baker, Yong Huang",
    version,
    about = "APBS client - runs Poisson-Boltzmann calculations on a remote Opal service or locally.",
    long_about = None,
    before_long_help = CREDIT,
    help_template = HELP_TEMPLATE,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to the formatted APBS input deck (e.g., apbs.in).
    #[arg(value_name = "DECK", required_unless_present = "job_id")]
    pub deck: Option<PathBuf>,

    // --- Solver Output ---
    /// Enable solver output logging to the given file name.
    #[arg(long, value_name = "NAME")]
    pub output_file: Option<String>,

    /// Format for solver output logging. Flat-file format is used when omitted.
    #[arg(long, value_enum, value_name = "TYPE")]
    pub output_format: Option<OutputFormatArg>,

    // --- Remote Job Control ---
    /// Directory into which result files are downloaded. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub fetch: Option<PathBuf>,

    /// Job ID of a previous run whose results should be downloaded.
    #[arg(long, value_name = "ID", requires = "fetch")]
    pub job_id: Option<String>,

    /// Print the result URLs instead of downloading the files after a blocking run.
    #[arg(long)]
    pub no_fetch: bool,

    /// Return right after submission and print where the results can be retrieved later.
    #[arg(long)]
    pub non_blocking: bool,

    /// URL of the Opal service, overriding automatic service selection.
    #[arg(long, value_name = "URL")]
    pub service_location: Option<String>,

    // --- Local Execution ---
    /// Root of a binary APBS installation (the directory containing bin/apbs).
    #[arg(long, value_name = "DIR")]
    pub library_location: Option<PathBuf>,

    /// Run APBS locally instead of submitting the deck to a remote service.
    #[arg(long, conflicts_with = "job_id")]
    pub local: bool,

    // --- Application ---
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Append a detailed job log (submission, every poll tick, downloads) to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Xml,
    Flat,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Xml => OutputFormat::Xml,
            OutputFormatArg::Flat => OutputFormat::Flat,
        }
    }
}

/// Parses the command line, dropping unrecognized flags instead of failing on them.
///
/// When more than one bare argument is left over, the last one is the deck and the earlier
/// ones are dropped, so a value that followed an unrecognized flag is discarded with it.
/// Returns the parsed arguments together with every argument that was dropped.
pub fn parse_lenient<I, T>(args: I) -> Result<(Cli, Vec<String>), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut ignored = Vec::new();

    loop {
        let err = match Cli::try_parse_from(&args) {
            Ok(cli) => return Ok((cli, ignored)),
            Err(err) if err.kind() == ErrorKind::UnknownArgument => err,
            Err(err) => return Err(err),
        };

        let invalid = err
            .get(ContextKind::InvalidArg)
            .and_then(|value| match value {
                ContextValue::String(arg) => Some(arg.clone()),
                _ => None,
            });
        let Some(invalid) = invalid else {
            return Err(err);
        };

        let position = if invalid.starts_with('-') {
            let with_value = format!("{invalid}=");
            args.iter().skip(1).position(|arg| {
                let arg = arg.to_string_lossy();
                arg == invalid.as_str() || arg.starts_with(&with_value)
            })
        } else {
            earlier_positional(&args, &invalid)
        };
        let Some(position) = position else {
            return Err(err);
        };
        let removed = args.remove(position + 1);
        ignored.push(removed.to_string_lossy().into_owned());
    }
}

/// Index (after the program name) of the first bare argument preceding `surplus`.
fn earlier_positional(args: &[OsString], surplus: &str) -> Option<usize> {
    let command = Cli::command();
    let mut expects_value = false;
    for (index, arg) in args.iter().skip(1).enumerate() {
        let arg = arg.to_string_lossy();
        if expects_value {
            expects_value = false;
            continue;
        }
        if arg == surplus {
            return None;
        }
        if arg.starts_with('-') {
            expects_value = !arg.contains('=') && takes_value(&command, &arg);
            continue;
        }
        return Some(index);
    }
    None
}

fn takes_value(command: &Command, flag: &str) -> bool {
    command.get_arguments().any(|arg| {
        let matches = match flag.strip_prefix("--") {
            Some(long) => arg.get_long() == Some(long),
            None => {
                let mut chars = flag.chars().skip(1);
                match (chars.next(), chars.next()) {
                    (Some(short), None) => arg.get_short() == Some(short),
                    _ => false,
                }
            }
        };
        matches && arg.get_action().takes_values()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_remote_submission_flags() {
        let (cli, ignored) = parse_lenient([
            "apbs-client",
            "--output-file=log.txt",
            "--output-format=xml",
            "--non-blocking",
            "--service-location",
            "http://localhost/apbs",
            "apbs.in",
        ])
        .unwrap();

        assert!(ignored.is_empty());
        assert_eq!(cli.deck, Some(PathBuf::from("apbs.in")));
        assert_eq!(cli.output_file.as_deref(), Some("log.txt"));
        assert_eq!(cli.output_format, Some(OutputFormatArg::Xml));
        assert!(cli.non_blocking);
        assert_eq!(cli.service_location.as_deref(), Some("http://localhost/apbs"));
    }

    #[test]
    fn unknown_flags_are_dropped_and_reported() {
        let (cli, ignored) = parse_lenient([
            "apbs-client",
            "--frobnicate",
            "--colour=blue",
            "-vv",
            "apbs.in",
        ])
        .unwrap();

        assert_eq!(ignored, vec!["--frobnicate", "--colour=blue"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.deck, Some(PathBuf::from("apbs.in")));
    }

    #[test]
    fn value_after_unknown_flag_is_dropped_and_last_argument_is_the_deck() {
        let (cli, ignored) =
            parse_lenient(["apbs-client", "--foo", "bar", "apbs.in", "--local", "-v"]).unwrap();

        assert_eq!(ignored, vec!["--foo", "bar"]);
        assert_eq!(cli.deck, Some(PathBuf::from("apbs.in")));
        assert!(cli.local);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn values_of_known_flags_are_not_mistaken_for_the_deck() {
        let (cli, ignored) = parse_lenient([
            "apbs-client",
            "--output-file",
            "log.txt",
            "--foo",
            "bar",
            "apbs.in",
        ])
        .unwrap();

        assert_eq!(ignored, vec!["--foo", "bar"]);
        assert_eq!(cli.output_file.as_deref(), Some("log.txt"));
        assert_eq!(cli.deck, Some(PathBuf::from("apbs.in")));
    }

    #[test]
    fn job_id_requires_fetch() {
        let err = parse_lenient(["apbs-client", "--job-id", "app123"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn job_id_with_fetch_does_not_need_a_deck() {
        let (cli, _) =
            parse_lenient(["apbs-client", "--job-id", "app123", "--fetch", "results"]).unwrap();
        assert_eq!(cli.job_id.as_deref(), Some("app123"));
        assert_eq!(cli.fetch, Some(PathBuf::from("results")));
        assert!(cli.deck.is_none());
    }

    #[test]
    fn invalid_output_format_is_a_usage_error() {
        let err = parse_lenient(["apbs-client", "--output-format=json", "apbs.in"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = parse_lenient(["apbs-client", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!err.use_stderr());
    }

    #[test]
    fn local_conflicts_with_job_id() {
        let err = parse_lenient([
            "apbs-client",
            "--local",
            "--job-id",
            "app1",
            "--fetch",
            "out",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
