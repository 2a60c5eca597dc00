use bizpulse_core::metrics::{classify_raw, format_label};
use bizpulse_core::{ApplicationError, Domain, FinanceMetric, MetricKey, SalesMetric, StatusResult};
use serde::Serialize;
use uuid::Uuid;

use crate::commands::{CommandResult, EXIT_RENDERING};

const COMMAND: &str = "classify";

#[derive(Debug, Serialize)]
struct ClassificationPayload<'a> {
    domain: Domain,
    metric: &'a str,
    metric_label: &'a str,
    value: &'a str,
    #[serde(flatten)]
    status: StatusResult,
}

/// Classifies one raw value. Unknown metrics and non-numeric values are not
/// errors; they classify as the gray sentinel. With `strict`, an unknown
/// metric is rejected instead.
pub fn run(domain: &str, metric: &str, value: &str, strict: bool) -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();
    let domain = match domain.parse::<Domain>() {
        Ok(domain) => domain,
        Err(error) => return CommandResult::from_error(COMMAND, error.into(), &correlation_id),
    };

    if strict {
        if let Err(error) = require_known(domain, metric) {
            return CommandResult::from_error(COMMAND, error, &correlation_id);
        }
    }

    let (metric_label, status) = match domain {
        Domain::Sales => (format_label::<SalesMetric>(metric), classify_raw::<SalesMetric>(metric, value)),
        Domain::Finance => {
            (format_label::<FinanceMetric>(metric), classify_raw::<FinanceMetric>(metric, value))
        }
    };

    let payload = ClassificationPayload { domain, metric, metric_label, value, status };
    match serde_json::to_string(&payload) {
        Ok(output) => CommandResult::output(output),
        Err(error) => CommandResult::failure(COMMAND, "rendering", error.to_string(), EXIT_RENDERING),
    }
}

/// Rejects metric keys the domain does not define.
pub(crate) fn require_known(domain: Domain, metric: &str) -> Result<(), ApplicationError> {
    match domain {
        Domain::Sales => SalesMetric::parse_strict(metric).map(|_| ()),
        Domain::Finance => FinanceMetric::parse_strict(metric).map(|_| ()),
    }
    .map_err(ApplicationError::from)
}
