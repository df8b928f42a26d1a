use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dvdpgc_core::{PgciTable, load_vts_pgci, make_report, ogm_chapters};
use glob::glob;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("DVDPGC_BUILD_COMMIT"),
    ", built ",
    env!("DVDPGC_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  dvdpgc pgci VIDEO_TS/VTS_01_0.IFO -o pgci.json\n  dvdpgc pgci VIDEO_TS/VTS_01_0.IFO --stdout --pretty\n  dvdpgc chapters VIDEO_TS/VTS_01_0.IFO --pgc 2";

#[derive(Parser, Debug)]
#[command(name = "dvdpgc")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode DVD-Video program chain timing (VTS_PGCI) from IFO files.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode the PGCI table and write a versioned JSON report.
    #[command(after_help = EXAMPLES)]
    Pgci {
        /// Path to a VTS_xx_0.IFO (or .BUP) file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Print the chapter start times of one program chain.
    Chapters {
        /// Path to a VTS_xx_0.IFO (or .BUP) file
        input: PathBuf,

        /// Program chain number (1-based)
        #[arg(long, default_value_t = 1)]
        pgc: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = ChapterFormat::Ogm)]
        format: ChapterFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChapterFormat {
    /// OGM chapter text (CHAPTERnn=HH:MM:SS.mmm)
    Ogm,
    /// JSON array of chapters
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Pgci {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_pgci(input, report, stdout, pretty, compact, quiet),
        Commands::Chapters { input, pgc, format } => cmd_chapters(input, pgc, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_pgci(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report = match (stdout, report) {
        (true, _) => None,
        (false, Some(path)) => Some(path),
        (false, None) => {
            return Err(CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            ));
        }
    };

    if let Some(report_path) = report.as_ref() {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    let table = decode_ifo(&resolved_input)?;
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("Failed to format report timestamp")?;
    let rep = make_report(
        &resolved_input.display().to_string(),
        meta.len(),
        &generated_at,
        table,
    );
    let json = serialize_json(&rep, pretty, compact)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn cmd_chapters(input: PathBuf, pgc: usize, format: ChapterFormat) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let table = decode_ifo(&resolved_input)?;

    let count = table.program_chains.len();
    let chain = pgc
        .checked_sub(1)
        .and_then(|index| table.program_chains.get(index))
        .ok_or_else(|| {
            CliError::new(
                format!("program chain {} out of range (table has {})", pgc, count),
                Some(if count == 0 {
                    "this IFO declares no program chains".to_string()
                } else {
                    format!("use --pgc between 1 and {}", count)
                }),
            )
        })?;
    debug!(pgc, programs = chain.programs.len(), "selected program chain");

    match format {
        ChapterFormat::Ogm => print!("{}", ogm_chapters(chain)),
        ChapterFormat::Json => println!("{}", serialize_json(&chain.chapters(), true, false)?),
    }
    Ok(())
}

fn decode_ifo(path: &Path) -> Result<PgciTable, CliError> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let table = load_vts_pgci(&mut reader).map_err(|err| {
        CliError::new(
            format!("PGCI decode failed for {}: {}", path.display(), err),
            Some("expected a title set IFO (VTS_xx_0.IFO), not VIDEO_TS.IFO".to_string()),
        )
    })?;
    info!(
        path = %path.display(),
        chains = table.program_chains.len(),
        "decoded VTS_PGCI"
    );
    Ok(table)
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = report_path
        .parent()
        // A directory that does not exist yet cannot hold the input.
        .filter(|parent| parent.as_os_str().is_empty() || parent.exists())
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    if let Some(report_dir) = report_dir {
        let report_target = report_dir.join(
            report_path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
        );
        if report_target == input_abs {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(())
}

fn serialize_json<T: serde::Serialize>(
    value: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a VTS_xx_0.IFO or VTS_xx_0.BUP file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a VTS_xx_0.IFO or VTS_xx_0.BUP file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "ifo" && ext != "bup" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .IFO or .BUP file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .IFO or .BUP".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single IFO file, or run once per title set".to_string();
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        let message = format!(
            "multiple files match pattern '{}' ({} matches); matches: {}{}",
            pattern,
            matches.len(),
            listed,
            more
        );
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
