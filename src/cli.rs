use crate::options::Options;
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Parser)]
#[command(name = "revar")]
#[command(about = "revar is a tool to replace variables in files")]
#[command(long_about = "revar replaces every match of a regular expression in a file, or in
every file of a directory, with a replacement text.

Matches are replaced line by line. The replacement may reference capture
groups with $1 or ${name}; use $$ for a literal dollar sign.

MODES:
  (default)          Replace every match and rewrite the file
  -n, --dry-run      Show what would change, write nothing
  -v, --verbose      Show every matched line while replacing
  -i, --interactive  Ask before each single replacement
  -i -f              Show all matched lines, then ask once per file

EXAMPLES:
  revar foo bar notes.txt                  Replace foo with bar in one file
  revar -n 'v(\\d+)' 'version $1' docs/     Preview changes in a directory
  revar -r -i oldName newName src/         Confirm every change, recursively")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Regular expression to search for
    #[arg(value_name = "REGEX", allow_hyphen_values = true)]
    regex: String,

    /// Replacement text ($1, ${name} expand capture groups)
    #[arg(value_name = "REPLACEMENT", allow_hyphen_values = true)]
    replacement: String,

    /// File or directory to process
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Debug mode (log every step to stderr)
    #[arg(long)]
    debug: bool,

    /// Recursive mode (process subdirectories too)
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Dry run mode (show matches without modifying files)
    #[arg(short = 'n', long = "dry-run", conflicts_with_all = ["interactive", "force"])]
    dry_run: bool,

    /// Interactive mode (ask before each replacement)
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Verbose mode (show every matched line)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Force mode (with --interactive: ask once per file)
    #[arg(short = 'f', long)]
    force: bool,

    /// When to highlight matches
    #[arg(long, value_enum, value_name = "WHEN")]
    color: Option<ColorChoice>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn from_config(value: &str) -> Self {
        match value {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    pub fn should_color(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug)]
pub struct Args {
    pub regex: String,
    pub replacement: String,
    pub path: PathBuf,
    pub options: Options,
    /// `None` when not given on the command line
    pub color: Option<ColorChoice>,
}

/// `<version>-<commit>-<build time>-<arch>-<os>`
pub fn version_string() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        format!(
            "{}-{}-{}-{}-{}",
            env!("CARGO_PKG_VERSION"),
            option_env!("REVAR_GIT_COMMIT").unwrap_or("unknown-commit"),
            option_env!("REVAR_BUILD_TIME").unwrap_or("unknown-buildtime"),
            std::env::consts::ARCH,
            std::env::consts::OS,
        )
    })
}

/// Parse arguments from an explicit iterator (the first item is the binary name).
pub fn try_parse_args_from<I, T>(itr: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command()
        .version(version_string())
        .try_get_matches_from(itr)?;
    let cli = Cli::from_arg_matches(&matches)?;

    Ok(Args {
        regex: cli.regex,
        replacement: cli.replacement,
        path: cli.path,
        options: Options {
            debug: cli.debug,
            recursive: cli.recursive,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            interactive: cli.interactive,
            force: cli.force,
        },
        color: cli.color,
    })
}

/// Parse the process arguments.
pub fn try_parse_args() -> Result<Args, clap::Error> {
    try_parse_args_from(std::env::args_os())
}
