#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args by hand and supports environment variable overrides via the
//! `SUGGEST_DEMO_*` prefix. Flags win over environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
Suggest Demo: file path completion in a terminal text field

USAGE:
    suggest-demo [OPTIONS]

OPTIONS:
    --root=PATH          Directory the field starts in (default: current dir)
    --multiline          Use a multi-line field; the panel opens at the caret
    --caret-driven       Re-query only through caret moves and removals
    --ordered-diff       Treat reordered suggestion lists as changed
    --log=FILE           Append tracing output to FILE
    --exit-after-ms=N    Quit after N milliseconds (for testing)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Down / Up        Move between the field and the suggestions
    Enter            Pick the focused suggestion
    Escape           Close the suggestions
    Ctrl+C / Ctrl+Q  Quit

ENVIRONMENT VARIABLES:
    SUGGEST_DEMO_ROOT           Override --root
    SUGGEST_DEMO_MULTILINE      Set to 1 for --multiline
    SUGGEST_DEMO_CARET_DRIVEN   Set to 1 for --caret-driven
    SUGGEST_DEMO_ORDERED_DIFF   Set to 1 for --ordered-diff
    SUGGEST_DEMO_LOG_FILE       Override --log
    SUGGEST_DEMO_LOG            Log filter directives (e.g. suggest_overlay=trace)
    SUGGEST_DEMO_EXIT_AFTER_MS  Override --exit-after-ms";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Directory the field starts in.
    pub root: PathBuf,
    /// Multi-line field.
    pub multiline: bool,
    /// Skip re-query on pure insertions.
    pub caret_driven: bool,
    /// Order-sensitive change detection.
    pub ordered_diff: bool,
    /// Tracing output file.
    pub log_file: Option<PathBuf>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            multiline: false,
            caret_driven: false,
            ordered_diff: false,
            log_file: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// A command line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Flag value did not parse.
    InvalidValue { flag: &'static str, value: String },
    /// Unrecognized argument.
    Unknown(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::Unknown(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

fn truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or a bad argument.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("suggest-demo {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `var` looking up environment variables.
    pub fn parse_from<I, S, F>(args: I, var: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = var("SUGGEST_DEMO_ROOT") {
            opts.root = PathBuf::from(val);
        }
        if let Some(val) = var("SUGGEST_DEMO_MULTILINE") {
            opts.multiline = truthy(&val);
        }
        if let Some(val) = var("SUGGEST_DEMO_CARET_DRIVEN") {
            opts.caret_driven = truthy(&val);
        }
        if let Some(val) = var("SUGGEST_DEMO_ORDERED_DIFF") {
            opts.ordered_diff = truthy(&val);
        }
        if let Some(val) = var("SUGGEST_DEMO_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = var("SUGGEST_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--multiline" => opts.multiline = true,
                "--caret-driven" => opts.caret_driven = true,
                "--ordered-diff" => opts.ordered_diff = true,
                other => {
                    if let Some(val) = other.strip_prefix("--root=") {
                        opts.root = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = val.parse().map_err(|_| CliError::InvalidValue {
                            flag: "--exit-after-ms",
                            value: val.to_string(),
                        })?;
                    } else {
                        return Err(CliError::Unknown(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
