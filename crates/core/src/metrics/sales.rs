//! Sales funnel metrics: conversion rates, marketing return, and timing.

use serde::{Deserialize, Serialize};

use crate::calendar::day_difference;
use crate::domain::input::InputRecord;
use crate::domain::metric::{
    Computation, MetricDefinition, MetricKey, MetricUnit, CURRENCY_SYMBOL,
};
use crate::domain::status::{Band, StatusResult, StatusTier, ThresholdRule};
use crate::domain::Domain;
use crate::numeric::{fixed, parse_int, plain};

use super::MetricEngine;

/// Days assumed when no usable period is supplied.
pub const DEFAULT_PERIOD_DAYS: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    Monthly,
    Quarterly,
    Yearly,
}

impl TimePeriod {
    pub fn days(&self) -> f64 {
        match self {
            Self::Monthly => 30.0,
            Self::Quarterly => 90.0,
            Self::Yearly => 365.0,
        }
    }

    /// Exact, case-sensitive match on the form's option values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Monthly" => Some(Self::Monthly),
            "Quarterly" => Some(Self::Quarterly),
            "Yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Length of the reporting period in days.
///
/// A named period wins; otherwise the custom day count is read as a leading
/// integer, and a missing or zero count falls back to 30.
pub fn period_days(input: &InputRecord) -> f64 {
    if let Some(period) = input.get("timePeriod").and_then(TimePeriod::parse) {
        return period.days();
    }

    input
        .get("timePeriodDays")
        .and_then(parse_int)
        .filter(|days| *days != 0.0)
        .unwrap_or(DEFAULT_PERIOD_DAYS)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SalesMetric {
    LeadToEnquiry,
    EnquiryToSales,
    LeadToSales,
    Revenue,
    Roi,
    Cac,
    LeadResponseTime,
    SalesCycleTime,
    EnquiryToConversionTime,
    LeadsPerTimePeriod,
    SalesPerTimePeriod,
}

const ALL: [SalesMetric; 11] = [
    SalesMetric::LeadToEnquiry,
    SalesMetric::EnquiryToSales,
    SalesMetric::LeadToSales,
    SalesMetric::Revenue,
    SalesMetric::Roi,
    SalesMetric::Cac,
    SalesMetric::LeadResponseTime,
    SalesMetric::SalesCycleTime,
    SalesMetric::EnquiryToConversionTime,
    SalesMetric::LeadsPerTimePeriod,
    SalesMetric::SalesPerTimePeriod,
];

const fn tier(band: Band, status: StatusResult) -> StatusTier {
    StatusTier { band, status }
}

// Indexed by `SalesMetric as usize`; order must match the enum.
static DEFINITIONS: [MetricDefinition; 11] = [
    MetricDefinition {
        key: "leadToEnquiry",
        label: "Lead to Enquiry Rate",
        formula: "Lead to Enquiry Rate = (Total Enquiries / Total Leads) × 100",
        explanation: "This shows what percentage of leads convert to enquiries, indicating the quality of your lead generation.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[tier(Band::AtLeast(20.0), StatusResult::green("⬆️ Good"))],
            otherwise: StatusResult::red("⬇️ Low"),
        },
    },
    MetricDefinition {
        key: "enquiryToSales",
        label: "Enquiry to Sales Rate",
        formula: "Enquiry to Sales Rate = (Total Sales / Total Enquiries) × 100",
        explanation: "This shows what percentage of enquiries convert to actual sales, reflecting your closing effectiveness.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[tier(Band::AtLeast(25.0), StatusResult::green("⬆️ Strong"))],
            otherwise: StatusResult::red("⬇️ Weak"),
        },
    },
    MetricDefinition {
        key: "leadToSales",
        label: "Overall Lead to Sales Rate",
        formula: "Lead to Sales Rate = (Total Sales / Total Leads) × 100",
        explanation: "This shows the overall conversion rate from leads to sales, your complete funnel efficiency.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[tier(Band::AtLeast(5.0), StatusResult::green("⬆️ Excellent"))],
            otherwise: StatusResult::red("⬇️ Needs Work"),
        },
    },
    MetricDefinition {
        key: "revenue",
        label: "Total Revenue Generated",
        formula: "Total Revenue = Total Sales × Average Bill Value",
        explanation: "This is the total revenue generated from all sales during the period.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[tier(Band::Above(0.0), StatusResult::green("⬆️ Positive"))],
            otherwise: StatusResult::red("⬇️ No Revenue"),
        },
    },
    MetricDefinition {
        key: "roi",
        label: "Marketing Return on Investment",
        formula: "ROI = ((Revenue - Marketing Spend) / Marketing Spend) × 100",
        explanation: "This shows the return on investment for your marketing spend, indicating campaign profitability.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::Above(100.0), StatusResult::green("⬆️ Excellent")),
                tier(Band::Above(0.0), StatusResult::green("⬆️ Positive")),
            ],
            otherwise: StatusResult::red("⬇️ Negative"),
        },
    },
    MetricDefinition {
        key: "cac",
        label: "Customer Acquisition Cost",
        formula: "Customer Acquisition Cost = Marketing Spend / Total Customers",
        explanation: "This is the average cost to acquire each customer through your marketing efforts.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::AtMost(1000.0), StatusResult::green("⬆️ Low Cost")),
                tier(Band::AtMost(5000.0), StatusResult::orange("⬆️ Moderate")),
            ],
            otherwise: StatusResult::red("⬇️ High Cost"),
        },
    },
    MetricDefinition {
        key: "leadResponseTime",
        label: "Lead Response Time",
        formula: "Lead Response Time = Enquiry Date - Lead Entry Date",
        explanation: "Time taken to respond to leads after they are generated. Faster response improves conversion rates.",
        unit: MetricUnit::Days,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::AtMost(1.0), StatusResult::green("⬆️ Fast")),
                tier(Band::AtMost(3.0), StatusResult::green("⬆️ Good")),
            ],
            otherwise: StatusResult::red("⬇️ Slow"),
        },
    },
    MetricDefinition {
        key: "salesCycleTime",
        label: "Complete Sales Cycle Time",
        formula: "Sales Cycle Time = Conversion Date - Lead Entry Date",
        explanation: "Total time from lead generation to final sale. Shorter cycles indicate efficient sales processes.",
        unit: MetricUnit::Days,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::AtMost(30.0), StatusResult::green("⬆️ Quick")),
                tier(Band::AtMost(60.0), StatusResult::orange("⬆️ Moderate")),
            ],
            otherwise: StatusResult::red("⬇️ Long"),
        },
    },
    MetricDefinition {
        key: "enquiryToConversionTime",
        label: "Enquiry to Conversion Time",
        formula: "Enquiry to Conversion Time = Conversion Date - Enquiry Date",
        explanation: "Time taken to convert enquiries to sales. This measures your sales team's closing speed.",
        unit: MetricUnit::Days,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::AtMost(7.0), StatusResult::green("⬆️ Fast")),
                tier(Band::AtMost(14.0), StatusResult::green("⬆️ Good")),
            ],
            otherwise: StatusResult::red("⬇️ Slow"),
        },
    },
    MetricDefinition {
        key: "leadsPerTimePeriod",
        label: "Leads per Month",
        formula: "Leads per Month = Total Leads / (Period Days / 30)",
        explanation: "Average number of leads generated per month, showing your lead generation capacity.",
        unit: MetricUnit::Count,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::AtLeast(50.0), StatusResult::green("⬆️ High Volume")),
                tier(Band::AtLeast(20.0), StatusResult::green("⬆️ Good")),
            ],
            otherwise: StatusResult::red("⬇️ Low Volume"),
        },
    },
    MetricDefinition {
        key: "salesPerTimePeriod",
        label: "Sales per Month",
        formula: "Sales per Month = Total Sales / (Period Days / 30)",
        explanation: "Average number of sales completed per month, indicating your sales team's productivity.",
        unit: MetricUnit::Count,
        rule: ThresholdRule {
            tiers: &[
                tier(Band::AtLeast(10.0), StatusResult::green("⬆️ High Volume")),
                tier(Band::AtLeast(5.0), StatusResult::green("⬆️ Good")),
            ],
            otherwise: StatusResult::red("⬇️ Low Volume"),
        },
    },
];

impl MetricKey for SalesMetric {
    const DOMAIN: Domain = Domain::Sales;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn definition(self) -> &'static MetricDefinition {
        &DEFINITIONS[self as usize]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SalesEngine;

impl MetricEngine for SalesEngine {
    type Metric = SalesMetric;

    fn compute(&self, input: &InputRecord) -> Computation<SalesMetric> {
        compute_sales_metrics(input)
    }
}

fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Derives every sales metric and its calculation step in one pass.
pub fn compute_sales_metrics(input: &InputRecord) -> Computation<SalesMetric> {
    let customers = input.number("totalCustomers");
    let leads = input.number("totalLeads");
    let enquiries = input.number("totalEnquiry");
    let sales = input.number("totalSales");
    let market_spend = input.number("totalMarketSpend");
    let average_bill = input.number("averageBillValue");

    let lead_to_enquiry = ratio_percent(enquiries, leads);
    let enquiry_to_sales = ratio_percent(sales, enquiries);
    let lead_to_sales = ratio_percent(sales, leads);

    let revenue = sales * average_bill;
    let roi = ratio_percent(revenue - market_spend, market_spend);
    let cac = if customers > 0.0 { market_spend / customers } else { 0.0 };

    let lead_entry = input.get("leadEntryDate");
    let enquiry = input.get("enquiryDate");
    let conversion = input.get("conversionDate");
    let lead_response_time = day_difference(lead_entry, enquiry);
    let sales_cycle_time = day_difference(lead_entry, conversion);
    let enquiry_to_conversion_time = day_difference(enquiry, conversion);

    let period_days = period_days(input);
    let months = period_days / 30.0;
    let leads_per_period = leads / months;
    let sales_per_period = sales / months;

    let mut computation = Computation::new();
    computation.record(
        SalesMetric::LeadToEnquiry,
        lead_to_enquiry,
        format!("({} / {}) × 100 = {}%", plain(enquiries), plain(leads), fixed(lead_to_enquiry, 2)),
    );
    computation.record(
        SalesMetric::EnquiryToSales,
        enquiry_to_sales,
        format!("({} / {}) × 100 = {}%", plain(sales), plain(enquiries), fixed(enquiry_to_sales, 2)),
    );
    computation.record(
        SalesMetric::LeadToSales,
        lead_to_sales,
        format!("({} / {}) × 100 = {}%", plain(sales), plain(leads), fixed(lead_to_sales, 2)),
    );
    computation.record(
        SalesMetric::Revenue,
        revenue,
        format!("{} × {} = {CURRENCY_SYMBOL}{}", plain(sales), plain(average_bill), fixed(revenue, 2)),
    );
    computation.record(
        SalesMetric::Roi,
        roi,
        format!(
            "(({} - {}) / {}) × 100 = {}%",
            fixed(revenue, 2),
            plain(market_spend),
            plain(market_spend),
            fixed(roi, 2)
        ),
    );
    computation.record(
        SalesMetric::Cac,
        cac,
        format!("{} / {} = {CURRENCY_SYMBOL}{}", plain(market_spend), plain(customers), fixed(cac, 2)),
    );
    computation.record(
        SalesMetric::LeadResponseTime,
        lead_response_time,
        format!("{} days", fixed(lead_response_time, 1)),
    );
    computation.record(
        SalesMetric::SalesCycleTime,
        sales_cycle_time,
        format!("{} days", fixed(sales_cycle_time, 1)),
    );
    computation.record(
        SalesMetric::EnquiryToConversionTime,
        enquiry_to_conversion_time,
        format!("{} days", fixed(enquiry_to_conversion_time, 1)),
    );
    computation.record(
        SalesMetric::LeadsPerTimePeriod,
        leads_per_period,
        format!("{} / ({} / 30) = {}", plain(leads), plain(period_days), fixed(leads_per_period, 1)),
    );
    computation.record(
        SalesMetric::SalesPerTimePeriod,
        sales_per_period,
        format!("{} / ({} / 30) = {}", plain(sales), plain(period_days), fixed(sales_per_period, 1)),
    );

    computation
}

#[cfg(test)]
mod tests {
    use super::{compute_sales_metrics, period_days, SalesMetric, TimePeriod};
    use crate::domain::input::InputRecord;
    use crate::domain::metric::MetricKey;
    use crate::domain::status::StatusCategory;
    use crate::metrics::classify_sales;
    use crate::numeric::round2;

    fn funnel() -> InputRecord {
        InputRecord::from_pairs([
            ("totalLeads", "500"),
            ("totalEnquiry", "100"),
            ("totalSales", "25"),
            ("totalCustomers", "150"),
            ("totalMarketSpend", "50000"),
            ("averageBillValue", "2000"),
        ])
    }

    #[test]
    fn funnel_rates_and_money_metrics() {
        let computation = compute_sales_metrics(&funnel());

        assert_eq!(round2(computation.value(SalesMetric::LeadToEnquiry)), 20.0);
        assert_eq!(round2(computation.value(SalesMetric::EnquiryToSales)), 25.0);
        assert_eq!(round2(computation.value(SalesMetric::LeadToSales)), 5.0);
        assert_eq!(round2(computation.value(SalesMetric::Revenue)), 50_000.0);
        assert_eq!(round2(computation.value(SalesMetric::Roi)), 0.0);
        assert_eq!(round2(computation.value(SalesMetric::Cac)), 333.33);
    }

    #[test]
    fn steps_substitute_operands_from_the_same_pass() {
        let computation = compute_sales_metrics(&funnel());
        let steps = &computation.calculation_steps;

        let step = |metric| steps.get(metric).expect("step recorded").calculation.as_str();
        assert_eq!(step(SalesMetric::LeadToEnquiry), "(100 / 500) × 100 = 20.00%");
        assert_eq!(step(SalesMetric::Revenue), "25 × 2000 = ₹50000.00");
        assert_eq!(step(SalesMetric::Roi), "((50000.00 - 50000) / 50000) × 100 = 0.00%");
        assert_eq!(step(SalesMetric::Cac), "50000 / 150 = ₹333.33");
        assert_eq!(step(SalesMetric::LeadsPerTimePeriod), "500 / (30 / 30) = 500.0");
        assert_eq!(step(SalesMetric::LeadResponseTime), "0.0 days");
    }

    #[test]
    fn steps_carry_formula_and_explanation_from_table() {
        let computation = compute_sales_metrics(&funnel());
        let step = computation.calculation_steps.get(SalesMetric::Cac).expect("cac step");

        assert_eq!(step.formula, SalesMetric::Cac.definition().formula);
        assert_eq!(step.explanation, SalesMetric::Cac.definition().explanation);
    }

    #[test]
    fn metrics_follow_display_order() {
        let computation = compute_sales_metrics(&funnel());
        let keys: Vec<_> = computation.metrics.keys().map(SalesMetric::key).collect();

        assert_eq!(keys.len(), 11);
        assert_eq!(keys.first(), Some(&"leadToEnquiry"));
        assert_eq!(keys.last(), Some(&"salesPerTimePeriod"));
    }

    #[test]
    fn empty_input_yields_zero_for_guarded_and_time_metrics() {
        let computation = compute_sales_metrics(&InputRecord::new());

        for (_, value) in computation.metrics.iter() {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn timeline_metrics_use_absolute_day_distance() {
        let input = InputRecord::from_pairs([
            ("leadEntryDate", "2024-01-01"),
            ("enquiryDate", "2024-01-03"),
            ("conversionDate", "2023-12-02"),
        ]);
        let computation = compute_sales_metrics(&input);

        assert_eq!(computation.value(SalesMetric::LeadResponseTime), 2.0);
        assert_eq!(computation.value(SalesMetric::SalesCycleTime), 30.0);
        assert_eq!(computation.value(SalesMetric::EnquiryToConversionTime), 32.0);
    }

    #[test]
    fn period_prefers_named_option_over_custom_days() {
        let quarterly = InputRecord::from_pairs([("timePeriod", "Quarterly"), ("timePeriodDays", "7")]);
        assert_eq!(period_days(&quarterly), 90.0);

        let custom = InputRecord::from_pairs([("timePeriod", ""), ("timePeriodDays", "45.9")]);
        assert_eq!(period_days(&custom), 45.0);

        let zero = InputRecord::from_pairs([("timePeriodDays", "0")]);
        assert_eq!(period_days(&zero), 30.0);

        let lowercase = InputRecord::from_pairs([("timePeriod", "yearly")]);
        assert_eq!(period_days(&lowercase), 30.0);
        assert_eq!(TimePeriod::Yearly.days(), 365.0);
    }

    #[test]
    fn per_period_volume_scales_to_months() {
        let input = InputRecord::from_pairs([
            ("totalLeads", "900"),
            ("totalSales", "45"),
            ("timePeriod", "Quarterly"),
        ]);
        let computation = compute_sales_metrics(&input);

        assert_eq!(computation.value(SalesMetric::LeadsPerTimePeriod), 300.0);
        assert_eq!(computation.value(SalesMetric::SalesPerTimePeriod), 15.0);
    }

    #[test]
    fn roi_tiers_distinguish_excellent_from_positive() {
        assert_eq!(SalesMetric::Roi.classify(100.5).label, "⬆️ Excellent");
        assert_eq!(SalesMetric::Roi.classify(100.0).label, "⬆️ Positive");
        assert_eq!(SalesMetric::Roi.classify(0.0).category, StatusCategory::Red);
    }

    #[test]
    fn sales_cycle_has_an_orange_band() {
        assert_eq!(SalesMetric::SalesCycleTime.classify(30.0).category, StatusCategory::Green);
        assert_eq!(SalesMetric::SalesCycleTime.classify(45.0).category, StatusCategory::Orange);
        assert_eq!(SalesMetric::SalesCycleTime.classify(60.5).category, StatusCategory::Red);
    }

    #[test]
    fn steps_round_exact_ties_up() {
        let input = InputRecord::from_pairs([
            ("totalMarketSpend", "1"),
            ("totalCustomers", "8"),
            ("leadEntryDate", "2024-01-01T00:00"),
            ("enquiryDate", "2024-01-02T06:00"),
        ]);
        let computation = compute_sales_metrics(&input);
        let step = |metric| {
            computation.calculation_steps.get(metric).map(|step| step.calculation.clone())
        };

        assert_eq!(step(SalesMetric::Cac).as_deref(), Some("1 / 8 = ₹0.13"));
        assert_eq!(step(SalesMetric::LeadResponseTime).as_deref(), Some("1.3 days"));
    }

    #[test]
    fn every_threshold_boundary_is_placed_on_the_right_side() {
        // (key, value at the bound, label at the bound, value just past it, label past it)
        let rows: [(&str, f64, &str, f64, &str); 13] = [
            ("leadToEnquiry", 20.0, "⬆️ Good", 19.99, "⬇️ Low"),
            ("enquiryToSales", 25.0, "⬆️ Strong", 24.99, "⬇️ Weak"),
            ("leadToSales", 5.0, "⬆️ Excellent", 4.99, "⬇️ Needs Work"),
            ("revenue", 0.0, "⬇️ No Revenue", 0.01, "⬆️ Positive"),
            ("roi", 100.0, "⬆️ Positive", 100.01, "⬆️ Excellent"),
            ("leadResponseTime", 1.0, "⬆️ Fast", 1.01, "⬆️ Good"),
            ("leadResponseTime", 3.0, "⬆️ Good", 3.01, "⬇️ Slow"),
            ("enquiryToConversionTime", 7.0, "⬆️ Fast", 7.01, "⬆️ Good"),
            ("enquiryToConversionTime", 14.0, "⬆️ Good", 14.01, "⬇️ Slow"),
            ("leadsPerTimePeriod", 50.0, "⬆️ High Volume", 49.99, "⬆️ Good"),
            ("leadsPerTimePeriod", 20.0, "⬆️ Good", 19.99, "⬇️ Low Volume"),
            ("salesPerTimePeriod", 10.0, "⬆️ High Volume", 9.99, "⬆️ Good"),
            ("salesPerTimePeriod", 5.0, "⬆️ Good", 4.99, "⬇️ Low Volume"),
        ];

        for (key, at_bound, at_label, past, past_label) in rows {
            assert_eq!(classify_sales(key, at_bound).label, at_label, "{key} at {at_bound}");
            assert_eq!(classify_sales(key, past).label, past_label, "{key} at {past}");
        }
    }

    #[test]
    fn definitions_line_up_with_enum_order() {
        for metric in SalesMetric::all() {
            assert_eq!(SalesMetric::parse(metric.key()), Some(*metric));
        }
    }
}
