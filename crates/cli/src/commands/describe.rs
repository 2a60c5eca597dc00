//! Read-only views of the metric tables and input schema.

use bizpulse_core::metrics::format_label;
use bizpulse_core::schema::{sections, FieldKind, FieldSection};
use bizpulse_core::{Domain, FinanceMetric, MetricDefinition, MetricKey, MetricUnit, SalesMetric};
use serde::Serialize;
use uuid::Uuid;

use crate::commands::classify::require_known;
use crate::commands::{CommandResult, EXIT_RENDERING};

#[derive(Debug, Serialize)]
struct MetricRow {
    key: &'static str,
    label: &'static str,
    unit: MetricUnit,
    formula: &'static str,
    explanation: &'static str,
}

impl From<&'static MetricDefinition> for MetricRow {
    fn from(definition: &'static MetricDefinition) -> Self {
        Self {
            key: definition.key,
            label: definition.label,
            unit: definition.unit,
            formula: definition.formula,
            explanation: definition.explanation,
        }
    }
}

fn parse_domain(command: &str, raw: &str) -> Result<Domain, CommandResult> {
    raw.parse::<Domain>().map_err(|error| {
        CommandResult::from_error(command, error.into(), &Uuid::new_v4().to_string())
    })
}

fn definitions(domain: Domain) -> Vec<&'static MetricDefinition> {
    match domain {
        Domain::Sales => SalesMetric::all().iter().map(|metric| metric.definition()).collect(),
        Domain::Finance => FinanceMetric::all().iter().map(|metric| metric.definition()).collect(),
    }
}

fn to_json(command: &str, value: &impl Serialize) -> CommandResult {
    match serde_json::to_string_pretty(value) {
        Ok(output) => CommandResult::output(output),
        Err(error) => CommandResult::failure(command, "rendering", error.to_string(), EXIT_RENDERING),
    }
}

/// Display label for a metric key; unknown keys echo back unchanged unless
/// `strict` is set.
pub fn label(domain: &str, metric: &str, strict: bool) -> CommandResult {
    let domain = match parse_domain("label", domain) {
        Ok(domain) => domain,
        Err(result) => return result,
    };

    if strict {
        if let Err(error) = require_known(domain, metric) {
            return CommandResult::from_error("label", error, &Uuid::new_v4().to_string());
        }
    }

    let label = match domain {
        Domain::Sales => format_label::<SalesMetric>(metric),
        Domain::Finance => format_label::<FinanceMetric>(metric),
    };
    CommandResult::output(label)
}

pub fn metrics(domain: &str, json_output: bool) -> CommandResult {
    let domain = match parse_domain("metrics", domain) {
        Ok(domain) => domain,
        Err(result) => return result,
    };

    let rows: Vec<MetricRow> = definitions(domain).into_iter().map(MetricRow::from).collect();
    if json_output {
        return to_json("metrics", &rows);
    }

    let mut lines = vec![format!("{domain} metrics ({}):", rows.len())];
    for row in &rows {
        lines.push(format!("- {} ({})", row.key, row.label));
        lines.push(format!("    {}", row.formula));
        lines.push(format!("    {}", row.explanation));
    }
    CommandResult::output(lines.join("\n"))
}

pub fn fields(domain: &str, json_output: bool) -> CommandResult {
    let domain = match parse_domain("fields", domain) {
        Ok(domain) => domain,
        Err(result) => return result,
    };

    let layout: &[FieldSection] = sections(domain);
    if json_output {
        return to_json("fields", &layout);
    }

    let mut lines = vec![format!("{domain} input fields:")];
    for section in layout {
        lines.push(format!("{}:", section.title));
        for field in section.fields {
            let detail = match field.kind {
                FieldKind::Number if field.placeholder.is_empty() => "number".to_string(),
                FieldKind::Number => format!("number, e.g. {}", field.placeholder),
                FieldKind::Date => "date, YYYY-MM-DD or RFC 3339".to_string(),
                FieldKind::Choice => format!("one of {}", field.options.join("|")),
            };
            lines.push(format!("- {} ({}): {detail}", field.key, field.label));
        }
    }
    CommandResult::output(lines.join("\n"))
}
