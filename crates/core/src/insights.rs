//! Key insights and the grouped performance summary shown beside results.

use serde::Serialize;

use crate::domain::metric::{MetricKey, ResultBundle};
use crate::domain::status::{Band, StatusResult};
use crate::metrics::{FinanceMetric, SalesMetric};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Strength,
    Improvement,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub metric: &'static str,
    pub message: &'static str,
}

/// Fires `message` when the metric's value falls inside `band`.
#[derive(Clone, Copy, Debug)]
pub struct InsightRule<M: 'static> {
    pub metric: M,
    pub band: Band,
    pub kind: InsightKind,
    pub message: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct SummarySection<M: 'static> {
    pub title: &'static str,
    pub items: &'static [(M, &'static str)],
}

/// Insight rules and summary layout for one metric domain.
pub trait InsightSource: MetricKey {
    fn insight_rules() -> &'static [InsightRule<Self>];
    fn summary_sections() -> &'static [SummarySection<Self>];
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryItem {
    pub caption: &'static str,
    pub key: &'static str,
    pub display_value: String,
    pub status: StatusResult,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryView {
    pub title: &'static str,
    pub items: Vec<SummaryItem>,
}

static SALES_INSIGHTS: [InsightRule<SalesMetric>; 8] = [
    InsightRule {
        metric: SalesMetric::LeadToSales,
        band: Band::AtLeast(5.0),
        kind: InsightKind::Strength,
        message: "Excellent overall conversion rate from leads to sales",
    },
    InsightRule {
        metric: SalesMetric::Roi,
        band: Band::Above(100.0),
        kind: InsightKind::Strength,
        message: "Strong marketing ROI indicates profitable campaigns",
    },
    InsightRule {
        metric: SalesMetric::LeadResponseTime,
        band: Band::AtMost(3.0),
        kind: InsightKind::Strength,
        message: "Quick lead response time improves conversion chances",
    },
    InsightRule {
        metric: SalesMetric::SalesCycleTime,
        band: Band::AtMost(30.0),
        kind: InsightKind::Strength,
        message: "Efficient sales cycle enables faster revenue generation",
    },
    InsightRule {
        metric: SalesMetric::LeadToEnquiry,
        band: Band::Below(20.0),
        kind: InsightKind::Improvement,
        message: "Low lead to enquiry rate suggests poor lead quality or targeting",
    },
    InsightRule {
        metric: SalesMetric::EnquiryToSales,
        band: Band::Below(25.0),
        kind: InsightKind::Improvement,
        message: "Poor enquiry to sales conversion needs sales training focus",
    },
    InsightRule {
        metric: SalesMetric::SalesCycleTime,
        band: Band::Above(60.0),
        kind: InsightKind::Improvement,
        message: "Long sales cycle may indicate complex process or objection handling issues",
    },
    InsightRule {
        metric: SalesMetric::Cac,
        band: Band::Above(5000.0),
        kind: InsightKind::Improvement,
        message: "High customer acquisition cost requires marketing optimization",
    },
];

static SALES_SUMMARY: [SummarySection<SalesMetric>; 3] = [
    SummarySection {
        title: "Conversion Health",
        items: &[
            (SalesMetric::LeadToEnquiry, "Lead to Enquiry"),
            (SalesMetric::EnquiryToSales, "Enquiry to Sales"),
            (SalesMetric::LeadToSales, "Overall Conversion"),
        ],
    },
    SummarySection {
        title: "Revenue Health",
        items: &[
            (SalesMetric::Revenue, "Total Revenue"),
            (SalesMetric::Roi, "Marketing ROI"),
            (SalesMetric::Cac, "Acquisition Cost"),
        ],
    },
    SummarySection {
        title: "Time Efficiency",
        items: &[
            (SalesMetric::LeadResponseTime, "Lead Response"),
            (SalesMetric::SalesCycleTime, "Sales Cycle"),
            (SalesMetric::LeadsPerTimePeriod, "Leads per Month"),
        ],
    },
];

static FINANCE_INSIGHTS: [InsightRule<FinanceMetric>; 6] = [
    InsightRule {
        metric: FinanceMetric::GrossProfit,
        band: Band::Above(0.0),
        kind: InsightKind::Strength,
        message: "Positive gross profit indicates healthy core operations",
    },
    InsightRule {
        metric: FinanceMetric::NetCashFlow,
        band: Band::Above(0.0),
        kind: InsightKind::Strength,
        message: "Positive cash flow supports business sustainability",
    },
    InsightRule {
        metric: FinanceMetric::InventoryTurnover,
        band: Band::AtLeast(4.0),
        kind: InsightKind::Strength,
        message: "Efficient inventory management with good turnover ratio",
    },
    InsightRule {
        metric: FinanceMetric::OperatingExpenseRatio,
        band: Band::Above(30.0),
        kind: InsightKind::Improvement,
        message: "Operating expenses are high relative to revenue",
    },
    InsightRule {
        metric: FinanceMetric::NetProfit,
        band: Band::Below(0.0),
        kind: InsightKind::Improvement,
        message: "Net loss indicates need for cost reduction or revenue increase",
    },
    InsightRule {
        metric: FinanceMetric::InventoryTurnover,
        band: Band::Below(4.0),
        kind: InsightKind::Improvement,
        message: "Slow inventory turnover may indicate excess stock or poor sales",
    },
];

static FINANCE_SUMMARY: [SummarySection<FinanceMetric>; 3] = [
    SummarySection {
        title: "Profitability Health",
        items: &[
            (FinanceMetric::GrossProfit, "Gross Profit"),
            (FinanceMetric::NetProfit, "Net Profit"),
            (FinanceMetric::GrossMarginPercent, "Gross Margin"),
        ],
    },
    SummarySection {
        title: "Cash Flow Health",
        items: &[
            (FinanceMetric::NetCashFlow, "Net Cash Flow"),
            (FinanceMetric::CashBalance, "Cash Balance"),
            (FinanceMetric::NetWorkingCapital, "Working Capital"),
        ],
    },
    SummarySection {
        title: "Efficiency Metrics",
        items: &[
            (FinanceMetric::InventoryTurnover, "Inventory Turnover"),
            (FinanceMetric::OperatingExpenseRatio, "Operating Ratio"),
            (FinanceMetric::ChangePercent, "Growth Rate"),
        ],
    },
];

impl InsightSource for SalesMetric {
    fn insight_rules() -> &'static [InsightRule<Self>] {
        &SALES_INSIGHTS
    }

    fn summary_sections() -> &'static [SummarySection<Self>] {
        &SALES_SUMMARY
    }
}

impl InsightSource for FinanceMetric {
    fn insight_rules() -> &'static [InsightRule<Self>] {
        &FINANCE_INSIGHTS
    }

    fn summary_sections() -> &'static [SummarySection<Self>] {
        &FINANCE_SUMMARY
    }
}

impl<M: InsightSource> ResultBundle<M> {
    /// Strengths first, then improvements, each in rule order.
    pub fn insights(&self) -> Vec<Insight> {
        let fired: Vec<Insight> = M::insight_rules()
            .iter()
            .filter(|rule| self.value(rule.metric).is_some_and(|value| rule.band.contains(value)))
            .map(|rule| Insight { kind: rule.kind, metric: rule.metric.key(), message: rule.message })
            .collect();

        let (mut strengths, improvements): (Vec<_>, Vec<_>) =
            fired.into_iter().partition(|insight| insight.kind == InsightKind::Strength);
        strengths.extend(improvements);
        strengths
    }

    pub fn summary(&self) -> Vec<SummaryView> {
        M::summary_sections()
            .iter()
            .map(|section| SummaryView {
                title: section.title,
                items: section
                    .items
                    .iter()
                    .map(|&(metric, caption)| {
                        let value = self.value(metric).unwrap_or(f64::NAN);
                        SummaryItem {
                            caption,
                            key: metric.key(),
                            display_value: metric.unit().format(value),
                            status: metric.classify(value),
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}
