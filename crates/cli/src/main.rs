// midp - reconcile this month's MIDP register export against last month's
// snapshot and write the annotated report.

mod exit_codes;
mod logging;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use midp_recon::model::ReconReport;
use midp_recon::{ReconConfig, ReconError, Side, Table};

use exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "midp")]
#[command(about = "Reconcile monthly MIDP document-register exports")]
#[command(version)]
struct Cli {
    /// Log progress (info level) to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress the summary and warnings on stderr
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize this month's export and reconcile it against last month's snapshot
    #[command(after_help = "\
Examples:
  midp run last.csv export.csv
  midp run last.csv export.csv --output 240307.xlsx
  midp run last.csv export.csv --format json --output -")]
    Run {
        /// Last month's reconciled snapshot (canonical columns)
        last: PathBuf,

        /// This month's raw register export
        current: PathBuf,

        /// Run configuration (TOML); defaults to the built-in MIDP register layout
        #[arg(long, short = 'c', env = "MIDP_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (default: today's date as YYMMDD.xlsx). Use - for stdout (csv/json only)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else xlsx)
        #[arg(long, short = 'f')]
        format: Option<ReportFormat>,
    },

    /// Check that both inputs carry their required columns
    Validate {
        last: PathBuf,
        current: PathBuf,

        #[arg(long, short = 'c', env = "MIDP_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Normalize this month's export into the canonical schema (CSV)
    Normalize {
        current: PathBuf,

        #[arg(long, short = 'c', env = "MIDP_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config {
        #[arg(long, short = 'c', env = "MIDP_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(ReportFormat::Xlsx),
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match logging::init(cli.verbose, cli.quiet) {
        Ok(handle) => handle,
        Err(message) => {
            eprintln!("error: {}", message);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Run { last, current, config, output, format } => {
            cmd_run(last, current, config, output, format, cli.quiet)
        }
        Commands::Validate { last, current, config } => cmd_validate(last, current, config, cli.quiet),
        Commands::Normalize { current, config, output } => cmd_normalize(current, config, output),
        Commands::Config { config } => cmd_config(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::Schema { side: Side::Last, .. } => {
                Some("the first file must be last month's reconciled snapshot".to_string())
            }
            ReconError::Schema { side: Side::Current, .. } => {
                Some("the second file must be this month's raw register export".to_string())
            }
            ReconError::AmbiguousKey(_) => {
                Some("each key may appear only once per file; fix the register and re-export".to_string())
            }
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => {
                Some("run `midp config` to see the built-in configuration".to_string())
            }
            ReconError::RowWidth { .. } | ReconError::Csv(_) => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_run(
    last: PathBuf,
    current: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ReportFormat>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let last_table = read_input(&last)?;
    let current_table = read_input(&current)?;

    let report = midp_recon::run(&config, &last_table, &current_table)?;

    let format = format
        .or_else(|| output.as_deref().and_then(ReportFormat::from_path))
        .unwrap_or(ReportFormat::Xlsx);
    let output = output.unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        PathBuf::from(midp_io::default_report_filename(today)).with_extension(format.extension())
    });

    let destination = write_report(&report, &output, format)?;

    if !quiet {
        eprint!("{}", format_summary(&report));
        if let Some(path) = destination {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn cmd_validate(
    last: PathBuf,
    current: PathBuf,
    config: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let last_table = read_input(&last)?;
    let current_table = read_input(&current)?;

    midp_recon::validate_inputs(&config, &last_table, &current_table)?;

    if !quiet {
        eprintln!(
            "ok: {} ({} rows) and {} ({} rows) carry the required columns",
            last.display(),
            last_table.len(),
            current.display(),
            current_table.len()
        );
    }
    Ok(())
}

fn cmd_normalize(
    current: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let raw = read_input(&current)?;
    let normalized = midp_recon::normalize(&raw, &config)?;

    match output {
        Some(path) if !is_stdout(&path) => midp_io::csv::export_table(&normalized, &path)
            .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e))),
        _ => {
            let stdout = io::stdout();
            midp_io::csv::write_table(&normalized, stdout.lock()).map_err(CliError::io)
        }
    }
}

fn cmd_config(config: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let text = config.to_toml()?;
    let mut stdout = io::stdout();
    stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|e| CliError::io(e.to_string()))
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::midp());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("cannot read config {}: {}", path.display(), e)))?;
    let config = ReconConfig::from_toml(&text).map_err(|e| {
        CliError::from(e).with_hint(format!("fix {} or drop --config to use the built-in layout", path.display()))
    })?;
    log::info!("config: {} ({} columns)", config.name, config.columns.len());
    Ok(config)
}

fn read_input(path: &Path) -> Result<Table, CliError> {
    let table = midp_io::read_table(path).map_err(|e| CliError::io(format!("cannot read {}", e)))?;
    log::info!("read {}: {} rows, {} columns", path.display(), table.len(), table.columns().len());
    Ok(table)
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Write the report; returns the file written, or None for stdout.
fn write_report(
    report: &ReconReport,
    output: &Path,
    format: ReportFormat,
) -> Result<Option<PathBuf>, CliError> {
    if is_stdout(output) {
        let stdout = io::stdout();
        return match format {
            ReportFormat::Csv => midp_io::csv::write_report(report, stdout.lock()).map_err(CliError::io),
            ReportFormat::Json => {
                let mut out = stdout.lock();
                midp_io::json::write_report(report, &mut out)
                    .and_then(|_| writeln!(out).map_err(|e| e.to_string()))
                    .map_err(CliError::io)
            }
            ReportFormat::Xlsx => Err(CliError {
                code: exit_codes::EXIT_USAGE,
                message: "cannot write xlsx to stdout".to_string(),
                hint: Some("pass --output <file>.xlsx or --format csv|json".to_string()),
            }),
        }
        .map(|_| None);
    }

    let written = match format {
        ReportFormat::Xlsx => midp_io::xlsx::export_report(report, output).map(|_| ()),
        ReportFormat::Csv => midp_io::csv::export_report(report, output),
        ReportFormat::Json => midp_io::json::export_report(report, output),
    };
    written.map_err(|e| CliError::io(format!("cannot write {}: {}", output.display(), e)))?;
    Ok(Some(output.to_path_buf()))
}

fn format_summary(report: &ReconReport) -> String {
    let s = &report.summary;
    let c = &s.cells;
    format!(
        "{} rows last month, {} rows this month\n  \
         shared {}, added {}, deleted {} ({} shared rows changed)\n  \
         cells: {} modified, {} added, {} deleted, {} unchanged\n",
        s.rows_last, s.rows_current,
        s.shared, s.added, s.deleted, s.rows_with_changes,
        c.modified, c.added, c.deleted, c.unchanged,
    )
}
