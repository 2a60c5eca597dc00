pub mod commands;
pub mod input;
pub mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use bizpulse_core::config::{AppConfig, LoadOptions, LogFormat};
use clap::{Parser, Subcommand};
use tracing::Level;

use crate::commands::calculate::CalculateRequest;
use crate::commands::{CommandResult, EXIT_RUNTIME};

#[derive(Debug, Parser)]
#[command(
    name = "bizpulse",
    about = "Sales and finance metrics dashboard CLI",
    long_about = "Compute sales and finance metrics from raw inputs, classify them into status bands, and explain every calculation step.",
    after_help = "Examples:\n  bizpulse calculate sales --demo\n  bizpulse calculate finance --input q3.toml --json\n  bizpulse classify sales roi 42\n  bizpulse doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute every metric for a domain and print the report")]
    Calculate {
        #[arg(help = "Metric domain: sales or finance")]
        domain: String,
        #[arg(long, help = "Read field values from a JSON or TOML file")]
        input: Option<PathBuf>,
        #[arg(long = "set", value_name = "FIELD=VALUE", help = "Set one field; repeatable")]
        assignments: Vec<String>,
        #[arg(long, help = "Start from the demo placeholder values")]
        demo: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, value_name = "MS", help = "Override the presentation delay")]
        delay_ms: Option<u64>,
    },
    #[command(about = "Classify a single raw value for a metric")]
    Classify {
        domain: String,
        metric: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long, help = "Reject metric keys the domain does not define")]
        strict: bool,
    },
    #[command(about = "Print the display label for a metric key")]
    Label {
        domain: String,
        metric: String,
        #[arg(long, help = "Reject metric keys the domain does not define")]
        strict: bool,
    },
    #[command(about = "List metric definitions with formulas and explanations")]
    Metrics {
        domain: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List the input fields a domain reads")]
    Fields {
        domain: String,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, engine reference values, and report rendering")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging() {
        let result = CommandResult::failure("startup", "runtime_init", format!("{error:#}"), EXIT_RUNTIME);
        println!("{}", result.output);
        return ExitCode::from(result.exit_code);
    }

    let result = match cli.command {
        Command::Calculate { domain, input, assignments, demo, json, delay_ms } => {
            commands::calculate::run(&CalculateRequest {
                domain,
                input,
                assignments,
                demo,
                json,
                delay_ms,
            })
        }
        Command::Classify { domain, metric, value, strict } => {
            commands::classify::run(&domain, &metric, &value, strict)
        }
        Command::Label { domain, metric, strict } => {
            commands::describe::label(&domain, &metric, strict)
        }
        Command::Metrics { domain, json } => commands::describe::metrics(&domain, json),
        Command::Fields { domain, json } => commands::describe::fields(&domain, json),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays parseable. A broken config falls back to
/// defaults here; the command itself reports the config error.
fn init_logging() -> anyhow::Result<()> {
    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}
