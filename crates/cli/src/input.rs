use std::fs;
use std::path::Path;

use bizpulse_core::schema::{demo_record, unknown_fields};
use bizpulse_core::{ApplicationError, Domain, InputRecord};
use tracing::warn;

/// Builds the record for one calculate run.
///
/// Layers apply in order: demo placeholders, then the input file, then each
/// `key=value` assignment.
pub fn build_record(
    domain: Domain,
    path: Option<&Path>,
    assignments: &[String],
    demo: bool,
) -> Result<InputRecord, ApplicationError> {
    let mut record = if demo { demo_record(domain) } else { InputRecord::new() };

    if let Some(path) = path {
        record.merge(read_record_file(path)?);
    }

    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        record.set(key, value);
    }

    let foreign = unknown_fields(domain, &record);
    if !foreign.is_empty() {
        warn!(
            event_name = "cli.input.unknown_fields",
            domain = domain.as_str(),
            fields = %foreign.join(","),
            "input contains fields the form does not define; they are ignored"
        );
    }

    Ok(record)
}

pub fn read_record_file(path: &Path) -> Result<InputRecord, ApplicationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        ApplicationError::Input(format!("could not read input file `{}`: {error}", path.display()))
    })?;

    let is_toml =
        path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        InputRecord::from_toml_str(&raw)
    } else {
        InputRecord::from_json_str(&raw)
    }
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str), ApplicationError> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(ApplicationError::Input(format!(
            "invalid --set value `{assignment}` (expected key=value)"
        ))),
    }
}
