//! cognity CLI: scan paths, score functions, render a report.
//!
//! Options may also come from a `cognity.toml` in the working directory;
//! command-line flags override it field by field. Exit code 2 signals that
//! at least one function exceeds the threshold (unless
//! `--ignore-complexity`), 1 a usage or configuration error.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cognity::config::{self, FileConfig, CONFIG_FILE};
use cognity::error::{CognityError, Result};
use cognity::gsg::Language;
use cognity::output::{self, Detail, SortOrder, Style};

/// Per-function cognitive complexity for Python, C, C++, JavaScript and
/// TypeScript.
#[derive(Parser)]
#[command(
    name = "cognity",
    version,
    about = "Per-function cognitive complexity across languages",
    long_about = r#"
Computes cognitive complexity per function and flags functions exceeding a
configurable threshold.

Examples:
    cognity src/                        # table report for a directory
    cognity src/ -m 10 -s desc          # stricter threshold, worst first
    cognity main.py util.c --json       # machine-readable output
    cognity . -l py,ts -x vendor,dist   # filter languages, skip directories

A cognity.toml in the working directory may provide defaults for the same
options; command-line flags override it.
"#
)]
struct Cli {
    /// Files or directories to scan (directories recurse, honoring .gitignore)
    paths: Vec<PathBuf>,

    /// Comma-separated files or directories to exclude
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<PathBuf>,

    /// Maximum allowed complexity (default 15)
    #[arg(short = 'm', long)]
    max_complexity: Option<u32>,

    /// Only print offenders in the table output
    #[arg(short, long)]
    quiet: bool,

    /// Disable the threshold: no offender notes, exit code stays 0
    #[arg(short, long)]
    ignore_complexity: bool,

    /// Detail level (low = offenders only, all formats)
    #[arg(short, long, value_enum)]
    detail: Option<Detail>,

    /// Row ordering
    #[arg(short, long, value_enum)]
    sort: Option<SortOrder>,

    /// Output CSV instead of the table
    #[arg(long = "csv")]
    output_csv: bool,

    /// Output JSON instead of the table
    #[arg(long = "json")]
    output_json: bool,

    /// Truncate function names to this width in the table
    #[arg(short = 'w', long)]
    max_fn_width: Option<usize>,

    /// Comma-separated language filter (e.g. py,js,cpp)
    #[arg(short, long, value_delimiter = ',')]
    lang: Vec<String>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Effective settings after merging CLI over `cognity.toml` over defaults.
struct Settings {
    paths: Vec<PathBuf>,
    excludes: Vec<PathBuf>,
    max_complexity: u32,
    quiet: bool,
    ignore_complexity: bool,
    detail: Detail,
    sort: SortOrder,
    output_csv: bool,
    output_json: bool,
    max_fn_width: usize,
    languages: Vec<Language>,
}

fn merge(cli: Cli, file: FileConfig) -> Result<Settings> {
    let paths = if cli.paths.is_empty() {
        file.paths
            .unwrap_or_default()
            .into_iter()
            .map(PathBuf::from)
            .collect()
    } else {
        cli.paths
    };

    let excludes = if cli.exclude.is_empty() {
        file.exclude
            .unwrap_or_default()
            .into_iter()
            .map(PathBuf::from)
            .collect()
    } else {
        cli.exclude
    };

    let lang_tokens = if cli.lang.is_empty() {
        file.languages.unwrap_or_default()
    } else {
        cli.lang
    };
    let mut languages = Vec::new();
    for token in &lang_tokens {
        match Language::from_token(token) {
            Language::Unknown => {
                return Err(CognityError::InvalidArgument(format!(
                    "unknown language: {token}"
                )))
            }
            lang => {
                if !languages.contains(&lang) {
                    languages.push(lang);
                }
            }
        }
    }

    Ok(Settings {
        paths,
        excludes,
        max_complexity: cli
            .max_complexity
            .or(file.max_complexity)
            .unwrap_or(15),
        quiet: cli.quiet || file.quiet.unwrap_or(false),
        ignore_complexity: cli.ignore_complexity || file.ignore_complexity.unwrap_or(false),
        detail: cli.detail.or(file.detail).unwrap_or_default(),
        sort: cli.sort.or(file.sort).unwrap_or_default(),
        output_csv: cli.output_csv || file.output_csv.unwrap_or(false),
        output_json: cli.output_json || file.output_json.unwrap_or(false),
        max_fn_width: cli.max_fn_width.or(file.max_fn_width).unwrap_or(0),
        languages,
    })
}

fn run(cli: Cli) -> Result<u8> {
    let file_config = config::load(CONFIG_FILE)?.unwrap_or_default();
    let settings = merge(cli, file_config)?;

    if settings.paths.is_empty() {
        return Err(CognityError::InvalidArgument(
            "expected at least one path (via CLI or cognity.toml)".to_string(),
        ));
    }

    let files = cognity::analyze_paths(&settings.paths, &settings.languages, &settings.excludes)?;
    if files.is_empty() {
        return Err(CognityError::InvalidArgument(
            "no matching source files found".to_string(),
        ));
    }

    let rows = output::rows(files);
    let exceeds = output::any_exceeds(&rows, settings.max_complexity, settings.ignore_complexity);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if settings.output_json {
        output::print_json(
            rows,
            settings.sort,
            settings.max_complexity,
            settings.ignore_complexity,
            settings.detail,
            &mut out,
        )?;
    } else if settings.output_csv {
        output::print_csv(
            rows,
            settings.sort,
            settings.max_complexity,
            settings.ignore_complexity,
            settings.detail,
            &mut out,
        )?;
    } else {
        output::print_table(
            rows,
            settings.sort,
            settings.max_fn_width,
            settings.max_complexity,
            settings.ignore_complexity,
            settings.quiet,
            settings.detail,
            output::colors_enabled(false),
            &mut out,
        )?;
    }

    Ok(if exceeds { 2 } else { 0 })
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report_error(err: &CognityError) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let text = format!("Error: {err}");
    if out.is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        let _ = writeln!(out, "{}{text}{}", Style::Red.code(), Style::Reset.code());
    } else {
        let _ = writeln!(out, "{text}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            report_error(&err);
            ExitCode::from(1)
        }
    }
}
