#![forbid(unsafe_code)]

//! Command-line argument parsing for the replay harness.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `PAGEFX_HARNESS_*` prefix.

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
PageFX Replay Harness: run a page fixture against the in-memory DOM

USAGE:
    pagefx-harness [OPTIONS]

OPTIONS:
    --fixture=PATH   Fixture JSON file (default: bundled demo page)
    --seed=N         FAQ shuffle seed (overrides the fixture's seed)
    --log-json       Emit logs to stderr as JSON
    --help, -h       Show this help message
    --version, -V    Show version

OUTPUT:
    One JSON object per line on stdout: a \"step\" line per scripted event,
    then a final \"page_state\" line.

ENVIRONMENT VARIABLES:
    PAGEFX_HARNESS_FIXTURE   Override --fixture
    PAGEFX_HARNESS_SEED      Override --seed
    PAGEFX_LOG_JSON          Set to 1 for --log-json
    PAGEFX_LOG               Log filter directives (default: warn)

    Page configuration overrides, applied over the fixture's config:
    PAGEFX_SCROLL_THRESHOLD, PAGEFX_RESIZE_DEBOUNCE_MS,
    PAGEFX_CONTAINER_SELECTOR, PAGEFX_CONTENT_SELECTOR,
    PAGEFX_ROW_GROUPING, PAGEFX_FAQ_SAMPLE_SIZE";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Opts {
    /// Fixture path; `None` runs the bundled demo.
    pub fixture: Option<PathBuf>,
    /// Seed override.
    pub seed: Option<u64>,
    /// JSON log output.
    pub log_json: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replay with these options.
    Run(Opts),
    /// Print help.
    Help,
    /// Print version.
    Version,
}

/// Argument error, printed before exiting with status 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A flag value failed to parse.
    InvalidValue {
        /// Flag name.
        flag: &'static str,
        /// Offending value.
        value: String,
    },
    /// An argument is not recognized.
    Unknown(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::Unknown(arg) => write!(
                f,
                "Unknown argument: {arg}\nRun with --help for usage information."
            ),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse `args` (without the program name) on top of environment
    /// defaults read through `get_env`.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse_from<I, F>(args: I, get_env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env("PAGEFX_HARNESS_FIXTURE")
            && !val.is_empty()
        {
            opts.fixture = Some(PathBuf::from(val));
        }
        if let Some(val) = get_env("PAGEFX_HARNESS_SEED")
            && let Ok(n) = val.trim().parse()
        {
            opts.seed = Some(n);
        }
        if let Some(val) = get_env("PAGEFX_LOG_JSON") {
            opts.log_json = matches!(val.trim(), "1" | "true" | "yes");
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--log-json" => opts.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--fixture=") {
                        opts.fixture = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        let seed = val.parse().map_err(|_| CliError::InvalidValue {
                            flag: "--seed",
                            value: val.to_string(),
                        })?;
                        opts.seed = Some(seed);
                    } else {
                        return Err(CliError::Unknown(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
