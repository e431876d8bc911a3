//! Health Report Generator
//!
//! Builds a PDF health report from a JSON log bundle.
//!
//! Usage:
//!   health-report generate --input <logs.json> --output <report.pdf>
//!       [--days N] [--timezone +HH:MM] [--charts-dir <dir>]
//!   health-report check --input <logs.json> [--days N] [--timezone +HH:MM]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use health_report::build_info;
use health_report::{check_bundle, generate_report, ConfigOverrides, HealthLogBundle, ReportConfig};

#[derive(Parser)]
#[command(name = "health-report")]
#[command(version)]
#[command(about = "Generate a PDF health report from time-stamped health logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Reporting window options shared by every command
#[derive(Args)]
struct WindowArgs {
    /// Input JSON log bundle
    #[arg(short, long)]
    input: PathBuf,

    /// Number of days to include, today included [env: HEALTH_REPORT_DAYS, default: 7]
    #[arg(short, long)]
    days: Option<u32>,

    /// Fixed UTC offset used for calendar days, e.g. "-05:00"
    /// [env: HEALTH_REPORT_TZ, default: +00:00]
    #[arg(short, long, allow_hyphen_values = true)]
    timezone: Option<String>,

    /// Last day of the report (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the PDF report
    Generate {
        #[command(flatten)]
        window: WindowArgs,

        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write each chart as a PNG into this directory
        #[arg(long)]
        charts_dir: Option<PathBuf>,
    },

    /// Load and filter the input, print record counts per section
    Check {
        #[command(flatten)]
        window: WindowArgs,
    },
}

fn load(
    window: WindowArgs,
    charts_dir: Option<PathBuf>,
) -> Result<(HealthLogBundle, ReportConfig), Box<dyn std::error::Error>> {
    let config = ReportConfig::resolve(ConfigOverrides {
        days: window.days,
        timezone: window.timezone,
        today: window.today,
        charts_dir,
    })?;

    info!(path = %window.input.display(), "loading health logs");
    let bundle = HealthLogBundle::from_path(&window.input)?;
    info!(patient = %bundle.patient.name, records = bundle.record_count(), "health logs loaded");

    Ok((bundle, config))
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate { window, output, charts_dir } => {
            let (bundle, config) = load(window, charts_dir)?;
            let response = generate_report(&bundle, &config, &output)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Check { window } => {
            let (bundle, config) = load(window, None)?;
            let timeframe = config.timeframe()?;
            let response = check_bundle(&bundle, &timeframe);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("health_report=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!(error = %e, "report generation failed");
        return Err(e);
    }
    Ok(())
}
