use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use bizpulse_core::config::{AppConfig, ConfigOverrides, LoadOptions, OutputFormat};
use bizpulse_core::insights::InsightSource;
use bizpulse_core::{
    ApplicationError, Domain, FinanceEngine, InputRecord, MetricEngine, ResultBundle, SalesEngine,
};
use tracing::info;
use uuid::Uuid;

use crate::commands::{CommandResult, EXIT_RUNTIME};
use crate::input::build_record;
use crate::report::{render_text, ReportView};

const COMMAND: &str = "calculate";

#[derive(Clone, Debug, Default)]
pub struct CalculateRequest {
    pub domain: String,
    pub input: Option<PathBuf>,
    pub assignments: Vec<String>,
    pub demo: bool,
    pub json: bool,
    pub delay_ms: Option<u64>,
}

pub fn run(request: &CalculateRequest) -> CommandResult {
    let run_id = Uuid::new_v4().to_string();

    let options = LoadOptions {
        overrides: ConfigOverrides { calculation_delay_ms: request.delay_ms, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure(COMMAND, error, &run_id),
    };

    let domain = match request.domain.parse::<Domain>() {
        Ok(domain) => domain,
        Err(error) => return CommandResult::from_error(COMMAND, error.into(), &run_id),
    };

    let record = match build_record(
        domain,
        request.input.as_deref(),
        &request.assignments,
        request.demo,
    ) {
        Ok(record) => record,
        Err(error) => return CommandResult::from_error(COMMAND, error, &run_id),
    };

    if let Err(error) = pause(config.calculation_delay()) {
        return CommandResult::failure(COMMAND, "runtime_init", format!("{error:#}"), EXIT_RUNTIME);
    }

    let json = request.json || config.presentation.output == OutputFormat::Json;
    let started = Instant::now();
    let rendered = match domain {
        Domain::Sales => render(&SalesEngine, &record, &run_id, json),
        Domain::Finance => render(&FinanceEngine, &record, &run_id, json),
    };

    match rendered {
        Ok(output) => {
            info!(
                event_name = "cli.calculate.completed",
                correlation_id = %run_id,
                domain = domain.as_str(),
                field_count = record.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "calculation completed"
            );
            CommandResult::output(output)
        }
        Err(error) => CommandResult::from_error(COMMAND, error, &run_id),
    }
}

fn render<E>(
    engine: &E,
    record: &InputRecord,
    run_id: &str,
    json: bool,
) -> Result<String, ApplicationError>
where
    E: MetricEngine,
    E::Metric: InsightSource,
{
    let bundle = ResultBundle::from_engine(engine, record);
    let view = ReportView::new(run_id, &bundle);

    if json {
        serde_json::to_string_pretty(&view).map_err(|error| {
            ApplicationError::Rendering(format!("could not serialize results: {error}"))
        })
    } else {
        render_text(&view)
    }
}

/// Holds results back for the configured presentation delay.
fn pause(delay: Duration) -> anyhow::Result<()> {
    if delay.is_zero() {
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to initialize async runtime")?;
    runtime.block_on(tokio::time::sleep(delay));
    Ok(())
}
