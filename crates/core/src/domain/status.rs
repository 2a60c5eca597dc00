//! Status classification primitives shared by both metric tables.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Green,
    Orange,
    Red,
    Gray,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Gray => "gray",
        }
    }
}

/// A display label paired with its severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub label: &'static str,
    pub category: StatusCategory,
}

impl StatusResult {
    /// Returned for values that are not numbers and for unknown metrics.
    pub const UNKNOWN: StatusResult = StatusResult { label: "--", category: StatusCategory::Gray };

    pub const fn green(label: &'static str) -> Self {
        Self { label, category: StatusCategory::Green }
    }

    pub const fn orange(label: &'static str) -> Self {
        Self { label, category: StatusCategory::Orange }
    }

    pub const fn red(label: &'static str) -> Self {
        Self { label, category: StatusCategory::Red }
    }
}

/// A numeric region a value can fall into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Band {
    AtLeast(f64),
    Above(f64),
    AtMost(f64),
    Below(f64),
    /// Magnitude at most the bound, in either direction.
    WithinAbs(f64),
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::AtLeast(bound) => value >= bound,
            Self::Above(bound) => value > bound,
            Self::AtMost(bound) => value <= bound,
            Self::Below(bound) => value < bound,
            Self::WithinAbs(bound) => value.abs() <= bound,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusTier {
    pub band: Band,
    pub status: StatusResult,
}

/// Ordered tiers for one metric. The first tier whose band contains the value
/// wins; `otherwise` applies when none does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdRule {
    pub tiers: &'static [StatusTier],
    pub otherwise: StatusResult,
}

impl ThresholdRule {
    pub fn evaluate(&self, value: f64) -> StatusResult {
        if value.is_nan() {
            return StatusResult::UNKNOWN;
        }

        self.tiers
            .iter()
            .find(|tier| tier.band.contains(value))
            .map(|tier| tier.status)
            .unwrap_or(self.otherwise)
    }
}

/// Count of classified metrics per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub green: usize,
    pub orange: usize,
    pub red: usize,
    pub gray: usize,
}

impl StatusTally {
    pub fn record(&mut self, category: StatusCategory) {
        match category {
            StatusCategory::Green => self.green += 1,
            StatusCategory::Orange => self.orange += 1,
            StatusCategory::Red => self.red += 1,
            StatusCategory::Gray => self.gray += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.green + self.orange + self.red + self.gray
    }
}

#[cfg(test)]
mod tests {
    use super::{Band, StatusCategory, StatusResult, StatusTally, StatusTier, ThresholdRule};

    const TIERED: ThresholdRule = ThresholdRule {
        tiers: &[
            StatusTier { band: Band::AtMost(1000.0), status: StatusResult::green("⬆️ Low Cost") },
            StatusTier { band: Band::AtMost(5000.0), status: StatusResult::orange("⬆️ Moderate") },
        ],
        otherwise: StatusResult::red("⬇️ High Cost"),
    };

    #[test]
    fn first_matching_tier_wins() {
        assert_eq!(TIERED.evaluate(10.0).category, StatusCategory::Green);
        assert_eq!(TIERED.evaluate(1000.0).category, StatusCategory::Green);
        assert_eq!(TIERED.evaluate(1000.01).category, StatusCategory::Orange);
        assert_eq!(TIERED.evaluate(5000.01).category, StatusCategory::Red);
    }

    #[test]
    fn nan_is_unknown() {
        assert_eq!(TIERED.evaluate(f64::NAN), StatusResult::UNKNOWN);
    }

    #[test]
    fn bands_respect_strictness() {
        assert!(Band::AtLeast(20.0).contains(20.0));
        assert!(!Band::Above(0.0).contains(0.0));
        assert!(Band::Below(4.0).contains(3.99));
        assert!(Band::WithinAbs(20.0).contains(-20.0));
        assert!(!Band::WithinAbs(20.0).contains(20.5));
    }

    #[test]
    fn tally_counts_each_category() {
        let mut tally = StatusTally::default();
        tally.record(StatusCategory::Green);
        tally.record(StatusCategory::Green);
        tally.record(StatusCategory::Red);

        assert_eq!(tally.green, 2);
        assert_eq!(tally.red, 1);
        assert_eq!(tally.total(), 3);
    }
}
