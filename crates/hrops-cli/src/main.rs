//! hrops-export - render report rows to CSV, XLSX, PDF or an HTML preview.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hrops_cli::input::{assemble_options, check_filename, ExportInput, OptionOverrides};
use hrops_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use hrops_cli::{CliError, ExitCode, FileSink, Result};
use hrops_config::{load_settings, ExportSettings};
use hrops_export::theme::BUILTIN_THEMES;
use hrops_export::{Exporter, ReportKind};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

/// Render workforce report rows into downloadable files
#[derive(Parser)]
#[command(name = "hrops-export")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Options shared by every command
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (TOML, or JSON by extension); overrides HROPS_EXPORT_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Prefix human log lines with timestamps
    #[arg(long, global = true)]
    log_timestamps: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render rows in one format
    Render(RenderArgs),

    /// List built-in themes as JSON
    Themes,

    /// Print a preset report's fields as JSON
    Fields {
        /// Report kind (attendance, leave, payroll, incident, equipment, project)
        kind: String,
    },

    /// Settings management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Rows as JSON (array, or {"rows": [...], "options": {...}}); `-` reads stdin
    #[arg(long, short = 'i')]
    input: String,

    /// Output format (csv, excel, pdf, preview)
    #[arg(long, short = 'f')]
    format: String,

    /// Download filename without extension
    #[arg(long)]
    filename: Option<String>,

    /// Export options as JSON, or @path to a JSON file
    #[arg(long)]
    options: Option<String>,

    /// Start from a preset report's fields, title and field types
    #[arg(long)]
    report: Option<String>,

    /// Date for the preset's "Generated on" subtitle (default: today)
    #[arg(long, requires = "report")]
    generated_on: Option<NaiveDate>,

    /// Directory for written files; previews print to stdout without it
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    title: Option<String>,

    /// Theme (default, dark, corporate)
    #[arg(long)]
    theme: Option<String>,

    /// PDF page size (A3, A4, A5, Letter, Legal)
    #[arg(long)]
    page_size: Option<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show resolved settings and where they came from
    Show,
    /// Validate a settings file, listing every problem
    Validate {
        /// File to validate (default: the resolved settings file)
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let cli_level = cli
        .global
        .log_level
        .or_else(|| LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet));
    let mut log_config = LogConfig::from_env(cli_level, cli.global.log_format);
    if cli.global.log_timestamps {
        log_config = log_config.with_timestamps(true);
    }
    init_logging(&log_config);

    let result = match &cli.command {
        Commands::Render(args) => run_render(&cli.global, args),
        Commands::Themes => print_json(&BUILTIN_THEMES),
        Commands::Fields { kind } => run_fields(kind),
        Commands::Config(args) => run_config(&cli.global, args),
    };

    let code = match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            debug!(error = %err, code = err.exit_code().code_name(), "Command failed");
            eprintln!("{}", err.to_json());
            err.exit_code()
        }
    };
    std::process::exit(code.as_i32());
}

// ============================================================================
// Commands
// ============================================================================

fn run_render(global: &GlobalOpts, args: &RenderArgs) -> Result<()> {
    let resolved = load_settings(global.config.as_deref())?;
    let report = args
        .report
        .as_deref()
        .map(str::parse::<ReportKind>)
        .transpose()?;

    let filename = match (&args.filename, report) {
        (Some(name), _) => name.clone(),
        (None, Some(kind)) => kind.filename(),
        (None, None) => "export".to_string(),
    };
    check_filename(&filename)?;

    let input = ExportInput::read(&args.input)?;
    let overrides = OptionOverrides {
        options: args.options.clone(),
        title: args.title.clone(),
        theme: args.theme.clone(),
        page_size: args.page_size.clone(),
    };
    let generated_on = args
        .generated_on
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let options = assemble_options(
        report.map(|kind| (kind, generated_on)),
        input.options,
        &overrides,
        &input.rows,
    )?;

    info!(
        format = %args.format,
        rows = input.rows.len(),
        fields = options.fields.len(),
        source = %resolved.source,
        "Rendering export"
    );

    let exporter = Exporter::from_settings(&resolved.settings);
    let mut sink = FileSink::new(args.output_dir.clone(), &filename);
    exporter.export(&input.rows, &args.format, &filename, &mut sink, &options)?;

    let written = sink.finish()?;
    if written.iter().any(|w| w.path.is_some()) {
        print_json(&written)?;
    }
    Ok(())
}

fn run_fields(kind: &str) -> Result<()> {
    let kind: ReportKind = kind.parse()?;
    print_json(&json!({
        "kind": kind,
        "title": kind.title(),
        "filename": kind.filename(),
        "fields": kind.fields(),
    }))
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => print_json(&load_settings(global.config.as_deref())?),
        ConfigCommands::Validate { path: Some(path) } => {
            let settings = ExportSettings::from_file(path)?;
            settings.validate()?;
            print_json(&json!({ "valid": true, "path": path }))
        }
        ConfigCommands::Validate { path: None } => {
            let resolved = load_settings(global.config.as_deref())?;
            print_json(&json!({
                "valid": true,
                "path": resolved.path,
                "source": resolved.source,
            }))
        }
    }
}

// ============================================================================
// Output
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Input(format!("unserializable output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
