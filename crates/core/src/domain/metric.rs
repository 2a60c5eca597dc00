//! Metric identity, canonical metric tables, and computed results.

use std::fmt;
use std::hash::Hash;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::input::InputRecord;
use crate::domain::status::{StatusResult, StatusTally, ThresholdRule};
use crate::domain::Domain;
use crate::errors::DomainError;
use crate::numeric::fixed;

/// Currency marker used in calculation strings and display values.
pub const CURRENCY_SYMBOL: &str = "₹";

/// How a metric value is rendered for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    Percent,
    Days,
    Currency,
    Count,
    Multiple,
}

impl MetricUnit {
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Percent => format!("{}%", fixed(value, 2)),
            Self::Days => format!("{} days", fixed(value, 1)),
            Self::Currency => format!("{CURRENCY_SYMBOL}{}", fixed(value, 2)),
            Self::Count => fixed(value, 1),
            Self::Multiple => format!("{}x", fixed(value, 2)),
        }
    }
}

/// One row of a domain's canonical metric table.
///
/// The formula and explanation here are the only copies of that text; the
/// step explainer and every display surface read them from this table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub formula: &'static str,
    pub explanation: &'static str,
    pub unit: MetricUnit,
    pub rule: ThresholdRule,
}

/// A member of a domain's fixed metric enumeration.
pub trait MetricKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const DOMAIN: Domain;

    /// Every metric in display order.
    fn all() -> &'static [Self];

    fn definition(self) -> &'static MetricDefinition;

    fn key(self) -> &'static str {
        self.definition().key
    }

    fn label(self) -> &'static str {
        self.definition().label
    }

    fn unit(self) -> MetricUnit {
        self.definition().unit
    }

    fn classify(self, value: f64) -> StatusResult {
        self.definition().rule.evaluate(value)
    }

    fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|metric| metric.key() == name)
    }

    fn parse_strict(name: &str) -> Result<Self, DomainError> {
        Self::parse(name)
            .ok_or_else(|| DomainError::UnknownMetric { domain: Self::DOMAIN, name: name.to_string() })
    }
}

/// Formula, substituted arithmetic, and prose recorded for one metric.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub formula: String,
    pub calculation: String,
    pub explanation: String,
}

/// Insertion-ordered map keyed by metric.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricMap<M, V> {
    entries: Vec<(M, V)>,
}

pub type MetricSet<M> = MetricMap<M, f64>;
pub type CalculationSteps<M> = MetricMap<M, CalculationStep>;

impl<M: MetricKey, V> MetricMap<M, V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert(&mut self, metric: M, value: V) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == metric) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((metric, value)),
        }
    }

    pub fn get(&self, metric: M) -> Option<&V> {
        self.entries.iter().find(|(existing, _)| *existing == metric).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (M, &V)> {
        self.entries.iter().map(|(metric, value)| (*metric, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = M> + '_ {
        self.entries.iter().map(|(metric, _)| *metric)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: MetricKey, V> Default for MetricMap<M, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MetricKey, V: Serialize> Serialize for MetricMap<M, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (metric, value) in &self.entries {
            map.serialize_entry(metric.key(), value)?;
        }
        map.end()
    }
}

/// Output of one calculator pass: values and their narrative, in step.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Computation<M: MetricKey> {
    pub metrics: MetricSet<M>,
    pub calculation_steps: CalculationSteps<M>,
}

impl<M: MetricKey> Computation<M> {
    pub fn new() -> Self {
        Self { metrics: MetricSet::new(), calculation_steps: CalculationSteps::new() }
    }

    /// Records a metric value with its substituted calculation, pulling the
    /// formula and explanation from the canonical table.
    pub fn record(&mut self, metric: M, value: f64, calculation: String) {
        let definition = metric.definition();
        self.metrics.insert(metric, value);
        self.calculation_steps.insert(
            metric,
            CalculationStep {
                formula: definition.formula.to_string(),
                calculation,
                explanation: definition.explanation.to_string(),
            },
        );
    }

    pub fn value(&self, metric: M) -> f64 {
        self.metrics.get(metric).copied().unwrap_or(f64::NAN)
    }
}

impl<M: MetricKey> Default for Computation<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete output of one calculate action. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct ResultBundle<M: MetricKey> {
    pub metrics: MetricSet<M>,
    pub calculation_steps: CalculationSteps<M>,
    pub input_data: InputRecord,
}

/// Display-time view of one metric: value, label, and status.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricAssessment {
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub display_value: String,
    pub status: StatusResult,
}

impl<M: MetricKey> ResultBundle<M> {
    pub fn new(computation: Computation<M>, input_data: InputRecord) -> Self {
        Self {
            metrics: computation.metrics,
            calculation_steps: computation.calculation_steps,
            input_data,
        }
    }

    pub fn value(&self, metric: M) -> Option<f64> {
        self.metrics.get(metric).copied()
    }

    /// Classifies a metric on demand; a metric absent from the bundle is gray.
    pub fn status(&self, metric: M) -> StatusResult {
        self.value(metric).map(|value| metric.classify(value)).unwrap_or(StatusResult::UNKNOWN)
    }

    pub fn assessments(&self) -> Vec<MetricAssessment> {
        self.metrics
            .iter()
            .map(|(metric, value)| MetricAssessment {
                key: metric.key(),
                label: metric.label(),
                value: *value,
                display_value: metric.unit().format(*value),
                status: metric.classify(*value),
            })
            .collect()
    }

    pub fn status_tally(&self) -> StatusTally {
        let mut tally = StatusTally::default();
        for (metric, value) in self.metrics.iter() {
            tally.record(metric.classify(*value).category);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::MetricUnit;

    #[test]
    fn units_render_with_their_precision() {
        assert_eq!(MetricUnit::Percent.format(20.0), "20.00%");
        assert_eq!(MetricUnit::Days.format(1.5), "1.5 days");
        assert_eq!(MetricUnit::Currency.format(333.333), "₹333.33");
        assert_eq!(MetricUnit::Count.format(16.666), "16.7");
        assert_eq!(MetricUnit::Multiple.format(4.0), "4.00x");
        assert_eq!(MetricUnit::Currency.format(0.125), "₹0.13");
        assert_eq!(MetricUnit::Count.format(2.25), "2.3");
    }
}
