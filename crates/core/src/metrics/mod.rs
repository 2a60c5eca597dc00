//! Metric calculators, classifiers, and label lookup for both domains.

pub mod finance;
pub mod sales;

use tracing::debug;

use crate::domain::input::InputRecord;
use crate::domain::metric::{Computation, MetricKey, ResultBundle};
use crate::domain::status::StatusResult;
use crate::numeric::parse_float;

pub use finance::{compute_finance_metrics, FinanceEngine, FinanceMetric};
pub use sales::{compute_sales_metrics, period_days, SalesEngine, SalesMetric, TimePeriod};

/// A pure calculator for one domain.
pub trait MetricEngine: Send + Sync {
    type Metric: MetricKey;

    fn compute(&self, input: &InputRecord) -> Computation<Self::Metric>;
}

impl<M: MetricKey> ResultBundle<M> {
    /// Runs one calculate action and freezes its output with a copy of the input.
    pub fn from_engine<E>(engine: &E, input: &InputRecord) -> Self
    where
        E: MetricEngine<Metric = M> + ?Sized,
    {
        let computation = engine.compute(input);
        debug!(
            event_name = "core.metrics.computed",
            domain = M::DOMAIN.as_str(),
            metric_count = computation.metrics.len(),
            field_count = input.len(),
            "computed metric bundle"
        );
        Self::new(computation, input.clone())
    }
}

/// Status for a metric named by key; unknown names and NaN are gray.
pub fn classify<M: MetricKey>(name: &str, value: f64) -> StatusResult {
    M::parse(name).map(|metric| metric.classify(value)).unwrap_or(StatusResult::UNKNOWN)
}

/// Status for a raw field value, read with the lenient leading-number parse.
pub fn classify_raw<M: MetricKey>(name: &str, raw: &str) -> StatusResult {
    match parse_float(raw) {
        Some(value) => classify::<M>(name, value),
        None => StatusResult::UNKNOWN,
    }
}

/// Display label for a metric key, or the key itself when it is not known.
pub fn format_label<'a, M: MetricKey>(name: &'a str) -> &'a str {
    match M::parse(name) {
        Some(metric) => metric.label(),
        None => name,
    }
}

pub fn classify_sales(name: &str, value: f64) -> StatusResult {
    classify::<SalesMetric>(name, value)
}

pub fn classify_sales_raw(name: &str, raw: &str) -> StatusResult {
    classify_raw::<SalesMetric>(name, raw)
}

pub fn format_sales_label(name: &str) -> &str {
    format_label::<SalesMetric>(name)
}

pub fn classify_finance(name: &str, value: f64) -> StatusResult {
    classify::<FinanceMetric>(name, value)
}

pub fn classify_finance_raw(name: &str, raw: &str) -> StatusResult {
    classify_raw::<FinanceMetric>(name, raw)
}

pub fn format_finance_label(name: &str) -> &str {
    format_label::<FinanceMetric>(name)
}
