//! Finance metrics: profitability, cash position, inventory, and growth.

use crate::domain::input::InputRecord;
use crate::domain::metric::{Computation, MetricDefinition, MetricKey, MetricUnit};
use crate::domain::status::{Band, StatusResult, StatusTier, ThresholdRule};
use crate::domain::Domain;
use crate::numeric::{fixed, plain};

use super::MetricEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinanceMetric {
    GrossProfit,
    NetProfit,
    GrossMarginPercent,
    NetProfitMarginPercent,
    TotalDirectCost,
    ContributionMargin,
    OperatingProfit,
    NetCashFlow,
    CashBalance,
    AdjustedCogs,
    InventoryTurnover,
    ChangePercent,
    BreakEvenRevenue,
    ForecastAccuracy,
    VariableCostPercent,
    OperatingExpenseRatio,
    InventoryChange,
    NetWorkingCapital,
    TotalExpense,
}

const ALL: [FinanceMetric; 19] = [
    FinanceMetric::GrossProfit,
    FinanceMetric::NetProfit,
    FinanceMetric::GrossMarginPercent,
    FinanceMetric::NetProfitMarginPercent,
    FinanceMetric::TotalDirectCost,
    FinanceMetric::ContributionMargin,
    FinanceMetric::OperatingProfit,
    FinanceMetric::NetCashFlow,
    FinanceMetric::CashBalance,
    FinanceMetric::AdjustedCogs,
    FinanceMetric::InventoryTurnover,
    FinanceMetric::ChangePercent,
    FinanceMetric::BreakEvenRevenue,
    FinanceMetric::ForecastAccuracy,
    FinanceMetric::VariableCostPercent,
    FinanceMetric::OperatingExpenseRatio,
    FinanceMetric::InventoryChange,
    FinanceMetric::NetWorkingCapital,
    FinanceMetric::TotalExpense,
];

const fn good(band: Band, label: &'static str) -> StatusTier {
    StatusTier { band, status: StatusResult::green(label) }
}

// Indexed by `FinanceMetric as usize`; order must match the enum. Bands on the
// absolute-amount metrics are kept as the dashboard shipped them.
static DEFINITIONS: [MetricDefinition; 19] = [
    MetricDefinition {
        key: "grossProfit",
        label: "Gross Profit",
        formula: "Gross Profit = Selling Price - COGS",
        explanation: "Gross profit measures the profitability of core business operations before considering operating expenses.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Good")],
            otherwise: StatusResult::red("⬇️ Loss"),
        },
    },
    MetricDefinition {
        key: "netProfit",
        label: "Net Profit",
        formula: "Net Profit = Total Revenue - Total Expenses",
        explanation: "Net profit is the final profit after all expenses have been deducted from total revenue.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Healthy")],
            otherwise: StatusResult::red("⬇️ Loss"),
        },
    },
    MetricDefinition {
        key: "grossMarginPercent",
        label: "Gross Margin %",
        formula: "Gross Margin % = (Gross Profit / Selling Price) × 100",
        explanation: "Gross margin percentage shows what portion of each sale remains after paying direct costs.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(15.0), "⬆️ Strong")],
            otherwise: StatusResult::red("⬇️ Weak"),
        },
    },
    MetricDefinition {
        key: "netProfitMarginPercent",
        label: "Net Profit Margin %",
        formula: "Net Profit Margin % = (Net Profit / Total Revenue) × 100",
        explanation: "Net profit margin shows what percentage of revenue becomes actual profit.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(5.0), "⬆️ Good")],
            otherwise: StatusResult::red("⬇️ Low"),
        },
    },
    MetricDefinition {
        key: "totalDirectCost",
        label: "Total Direct Cost",
        formula: "Total Direct Cost = Raw Materials + Labour + Other Direct Cost",
        explanation: "Total direct costs are expenses directly attributable to producing goods or services.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(60.0), "⬆️ Efficient")],
            otherwise: StatusResult::red("⬇️ High"),
        },
    },
    MetricDefinition {
        key: "contributionMargin",
        label: "Contribution Margin",
        formula: "Contribution Margin = Selling Price - Variable Cost",
        explanation: "Contribution margin shows how much each unit contributes to covering fixed costs and profit.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Profitable")],
            otherwise: StatusResult::red("⬇️ Unprofitable"),
        },
    },
    MetricDefinition {
        key: "operatingProfit",
        label: "Operating Profit (EBIT)",
        formula: "Operating Profit (EBIT) = Total Revenue - Operating Expenses",
        explanation: "Operating profit measures earnings from core business operations before interest and taxes.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Strong")],
            otherwise: StatusResult::red("⬇️ Weak"),
        },
    },
    MetricDefinition {
        key: "netCashFlow",
        label: "Net Cash Flow",
        formula: "Net Cash Flow = Cash Inflow - Cash Outflow",
        explanation: "Net cash flow shows the actual cash generated or consumed by the business.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Healthy")],
            otherwise: StatusResult::red("⬇️ Negative"),
        },
    },
    MetricDefinition {
        key: "cashBalance",
        label: "Cash Balance",
        formula: "Cash Balance = Cash in Hand + Net Cash Flow",
        explanation: "Cash balance represents the total cash available after accounting for cash flows.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Safe")],
            otherwise: StatusResult::red("⬇️ Risk"),
        },
    },
    MetricDefinition {
        key: "adjustedCogs",
        label: "Cost of Goods Sold (COGS)",
        formula: "COGS (Adjusted) = Opening Inventory + Total Direct Cost - Closing Inventory",
        explanation: "Adjusted COGS accounts for inventory changes to show actual cost of goods sold during the period.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(70.0), "⬆️ Controlled")],
            otherwise: StatusResult::red("⬇️ High"),
        },
    },
    MetricDefinition {
        key: "inventoryTurnover",
        label: "Inventory Turnover Ratio",
        formula: "Inventory Turnover Ratio = COGS / Average Inventory",
        explanation: "Inventory turnover measures how efficiently inventory is being converted into sales.",
        unit: MetricUnit::Multiple,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(4.0), "⬆️ Efficient")],
            otherwise: StatusResult::red("⬇️ Slow"),
        },
    },
    MetricDefinition {
        key: "changePercent",
        label: "Change % Between Quarters",
        formula: "Change % = ((Current - Previous) / Previous) × 100",
        explanation: "Change percentage shows the growth or decline compared to the previous period.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[good(Band::Above(0.0), "⬆️ Growth")],
            otherwise: StatusResult::red("⬇️ Decline"),
        },
    },
    MetricDefinition {
        key: "breakEvenRevenue",
        label: "Break-even Point (Revenue)",
        formula: "Break-even Revenue = Fixed Cost / (Contribution Margin / Selling Price)",
        explanation: "Break-even revenue is the minimum revenue needed to cover all costs without making a loss.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(80.0), "⬆️ Low")],
            otherwise: StatusResult::red("⬇️ High"),
        },
    },
    MetricDefinition {
        key: "forecastAccuracy",
        label: "Forecast Accuracy %",
        formula: "Forecast Accuracy = |Forecast - Actual| / Actual × 100",
        explanation: "Forecast accuracy measures how close predictions were to actual results.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(10.0), "⬆️ Accurate")],
            otherwise: StatusResult::red("⬇️ Inaccurate"),
        },
    },
    MetricDefinition {
        key: "variableCostPercent",
        label: "Variable Cost % of Sales",
        formula: "Variable Cost % = (Variable Cost / Selling Price) × 100",
        explanation: "Variable cost percentage shows what portion of the selling price goes to variable costs.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(50.0), "⬆️ Good")],
            otherwise: StatusResult::red("⬇️ High"),
        },
    },
    MetricDefinition {
        key: "operatingExpenseRatio",
        label: "Operating Expense Ratio %",
        formula: "Operating Expense Ratio = (Operating Expenses / Total Revenue) × 100",
        explanation: "Operating expense ratio shows what percentage of revenue is consumed by operating expenses.",
        unit: MetricUnit::Percent,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(30.0), "⬆️ Lean")],
            otherwise: StatusResult::red("⬇️ Heavy"),
        },
    },
    MetricDefinition {
        key: "inventoryChange",
        label: "Inventory Value Change",
        formula: "Inventory Value Change = Closing Inventory - Opening Inventory",
        explanation: "Inventory change shows whether inventory levels increased or decreased during the period.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::WithinAbs(20.0), "⬆️ Balanced")],
            otherwise: StatusResult::red("⬇️ Extreme"),
        },
    },
    MetricDefinition {
        key: "netWorkingCapital",
        label: "Net Working Capital",
        formula: "Net Working Capital = (Cash Balance + Closing Inventory) - Current Liabilities",
        explanation: "Net working capital measures the company's short-term financial health and liquidity.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtLeast(0.0), "⬆️ Good")],
            otherwise: StatusResult::red("⬇️ Tight"),
        },
    },
    MetricDefinition {
        key: "totalExpense",
        label: "Total Expense",
        formula: "Total Expense = Fixed + Variable + Operating + Other Direct Costs",
        explanation: "Total expense represents all costs incurred by the business during the period.",
        unit: MetricUnit::Currency,
        rule: ThresholdRule {
            tiers: &[good(Band::AtMost(80.0), "⬆️ Efficient")],
            otherwise: StatusResult::red("⬇️ High"),
        },
    },
];

impl MetricKey for FinanceMetric {
    const DOMAIN: Domain = Domain::Finance;

    fn all() -> &'static [Self] {
        &ALL
    }

    fn definition(self) -> &'static MetricDefinition {
        &DEFINITIONS[self as usize]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FinanceEngine;

impl MetricEngine for FinanceEngine {
    type Metric = FinanceMetric;

    fn compute(&self, input: &InputRecord) -> Computation<FinanceMetric> {
        compute_finance_metrics(input)
    }
}

fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Derives every finance metric in dependency order.
///
/// Later metrics read earlier ones at full precision; a step that shows an
/// intermediate renders it rounded to two decimals.
pub fn compute_finance_metrics(input: &InputRecord) -> Computation<FinanceMetric> {
    let selling_price = input.number("sellingPrice");
    let cogs = input.number("cogs");
    let raw_materials = input.number("rawMaterials");
    let labour = input.number("labour");
    let other_direct_cost = input.number("otherDirectCost");
    let total_revenue = input.number("totalRevenue");
    let total_expenses = input.number("totalExpenses");
    let previous = input.number("preQuarterValue");
    let current = input.number("currentValue");
    let cash_inflow = input.number("cashInflow");
    let cash_outflow = input.number("cashOutflow");
    let cash_in_hand = input.number("cashInHand");
    let fixed_cost = input.number("fixedCost");
    let variable_cost = input.number("variableCost");
    let operating_expenses = input.number("operatingExpenses");
    let opening_inventory = input.number("openingInventory");
    let closing_inventory = input.number("closingInventory");
    let average_inventory = input.number("averageInventory");
    let forecast = input.number("forecast");

    let gross_profit = selling_price - cogs;
    let net_profit = total_revenue - total_expenses;
    let gross_margin_percent = guarded_div(gross_profit, selling_price) * 100.0;
    let net_profit_margin_percent = guarded_div(net_profit, total_revenue) * 100.0;
    let total_direct_cost = raw_materials + labour + other_direct_cost;
    let contribution_margin = selling_price - variable_cost;
    let operating_profit = total_revenue - operating_expenses;
    let net_cash_flow = cash_inflow - cash_outflow;
    let cash_balance = cash_in_hand + net_cash_flow;
    let adjusted_cogs = opening_inventory + total_direct_cost - closing_inventory;
    let inventory_turnover = guarded_div(adjusted_cogs, average_inventory);
    let change_percent = guarded_div(current - previous, previous) * 100.0;
    let contribution_margin_ratio = guarded_div(contribution_margin, selling_price);
    let break_even_revenue = guarded_div(fixed_cost, contribution_margin_ratio);
    let forecast_accuracy = guarded_div((forecast - current).abs(), current) * 100.0;
    let variable_cost_percent = guarded_div(variable_cost, selling_price) * 100.0;
    let operating_expense_ratio = guarded_div(operating_expenses, total_revenue) * 100.0;
    let inventory_change = closing_inventory - opening_inventory;
    let net_working_capital = (cash_balance + closing_inventory) - fixed_cost;
    let total_expense = fixed_cost + variable_cost + operating_expenses + other_direct_cost;

    let mut computation = Computation::new();
    computation.record(
        FinanceMetric::GrossProfit,
        gross_profit,
        format!("{} - {} = {}", plain(selling_price), plain(cogs), fixed(gross_profit, 2)),
    );
    computation.record(
        FinanceMetric::NetProfit,
        net_profit,
        format!("{} - {} = {}", plain(total_revenue), plain(total_expenses), fixed(net_profit, 2)),
    );
    computation.record(
        FinanceMetric::GrossMarginPercent,
        gross_margin_percent,
        format!(
            "({} / {}) × 100 = {}%",
            fixed(gross_profit, 2),
            plain(selling_price),
            fixed(gross_margin_percent, 2)
        ),
    );
    computation.record(
        FinanceMetric::NetProfitMarginPercent,
        net_profit_margin_percent,
        format!(
            "({} / {}) × 100 = {}%",
            fixed(net_profit, 2),
            plain(total_revenue),
            fixed(net_profit_margin_percent, 2)
        ),
    );
    computation.record(
        FinanceMetric::TotalDirectCost,
        total_direct_cost,
        format!(
            "{} + {} + {} = {}",
            plain(raw_materials),
            plain(labour),
            plain(other_direct_cost),
            fixed(total_direct_cost, 2)
        ),
    );
    computation.record(
        FinanceMetric::ContributionMargin,
        contribution_margin,
        format!(
            "{} - {} = {}",
            plain(selling_price),
            plain(variable_cost),
            fixed(contribution_margin, 2)
        ),
    );
    computation.record(
        FinanceMetric::OperatingProfit,
        operating_profit,
        format!(
            "{} - {} = {}",
            plain(total_revenue),
            plain(operating_expenses),
            fixed(operating_profit, 2)
        ),
    );
    computation.record(
        FinanceMetric::NetCashFlow,
        net_cash_flow,
        format!("{} - {} = {}", plain(cash_inflow), plain(cash_outflow), fixed(net_cash_flow, 2)),
    );
    computation.record(
        FinanceMetric::CashBalance,
        cash_balance,
        format!("{} + {} = {}", plain(cash_in_hand), fixed(net_cash_flow, 2), fixed(cash_balance, 2)),
    );
    computation.record(
        FinanceMetric::AdjustedCogs,
        adjusted_cogs,
        format!(
            "{} + {} - {} = {}",
            plain(opening_inventory),
            fixed(total_direct_cost, 2),
            plain(closing_inventory),
            fixed(adjusted_cogs, 2)
        ),
    );
    computation.record(
        FinanceMetric::InventoryTurnover,
        inventory_turnover,
        format!(
            "{} / {} = {}",
            fixed(adjusted_cogs, 2),
            plain(average_inventory),
            fixed(inventory_turnover, 2)
        ),
    );
    computation.record(
        FinanceMetric::ChangePercent,
        change_percent,
        format!(
            "(({} - {}) / {}) × 100 = {}%",
            plain(current),
            plain(previous),
            plain(previous),
            fixed(change_percent, 2)
        ),
    );
    computation.record(
        FinanceMetric::BreakEvenRevenue,
        break_even_revenue,
        format!(
            "{} / ({} / {}) = {}",
            plain(fixed_cost),
            fixed(contribution_margin, 2),
            plain(selling_price),
            fixed(break_even_revenue, 2)
        ),
    );
    computation.record(
        FinanceMetric::ForecastAccuracy,
        forecast_accuracy,
        format!(
            "|{} - {}| / {} × 100 = {}%",
            plain(forecast),
            plain(current),
            plain(current),
            fixed(forecast_accuracy, 2)
        ),
    );
    computation.record(
        FinanceMetric::VariableCostPercent,
        variable_cost_percent,
        format!(
            "({} / {}) × 100 = {}%",
            plain(variable_cost),
            plain(selling_price),
            fixed(variable_cost_percent, 2)
        ),
    );
    computation.record(
        FinanceMetric::OperatingExpenseRatio,
        operating_expense_ratio,
        format!(
            "({} / {}) × 100 = {}%",
            plain(operating_expenses),
            plain(total_revenue),
            fixed(operating_expense_ratio, 2)
        ),
    );
    computation.record(
        FinanceMetric::InventoryChange,
        inventory_change,
        format!(
            "{} - {} = {}",
            plain(closing_inventory),
            plain(opening_inventory),
            fixed(inventory_change, 2)
        ),
    );
    computation.record(
        FinanceMetric::NetWorkingCapital,
        net_working_capital,
        format!(
            "({} + {}) - {} = {}",
            fixed(cash_balance, 2),
            plain(closing_inventory),
            plain(fixed_cost),
            fixed(net_working_capital, 2)
        ),
    );
    computation.record(
        FinanceMetric::TotalExpense,
        total_expense,
        format!(
            "{} + {} + {} + {} = {}",
            plain(fixed_cost),
            plain(variable_cost),
            plain(operating_expenses),
            plain(other_direct_cost),
            fixed(total_expense, 2)
        ),
    );

    computation
}

#[cfg(test)]
mod tests {
    use super::{compute_finance_metrics, FinanceMetric};
    use crate::domain::input::InputRecord;
    use crate::domain::metric::MetricKey;
    use crate::domain::status::StatusCategory;
    use crate::metrics::classify_finance;
    use crate::numeric::round2;

    fn statement() -> InputRecord {
        InputRecord::from_pairs([
            ("sellingPrice", "100"),
            ("cogs", "60"),
            ("totalRevenue", "10000"),
            ("totalExpenses", "8000"),
            ("rawMaterials", "30"),
            ("labour", "20"),
            ("otherDirectCost", "5"),
            ("variableCost", "40"),
            ("fixedCost", "1000"),
            ("operatingExpenses", "2000"),
        ])
    }

    #[test]
    fn profitability_metrics_from_a_simple_statement() {
        let computation = compute_finance_metrics(&statement());

        assert_eq!(round2(computation.value(FinanceMetric::GrossProfit)), 40.0);
        assert_eq!(round2(computation.value(FinanceMetric::GrossMarginPercent)), 40.0);
        assert_eq!(round2(computation.value(FinanceMetric::NetProfit)), 2000.0);
        assert_eq!(round2(computation.value(FinanceMetric::NetProfitMarginPercent)), 20.0);
        assert_eq!(round2(computation.value(FinanceMetric::TotalDirectCost)), 55.0);
        assert_eq!(round2(computation.value(FinanceMetric::ContributionMargin)), 60.0);
        assert_eq!(round2(computation.value(FinanceMetric::OperatingProfit)), 8000.0);
        assert_eq!(round2(computation.value(FinanceMetric::OperatingExpenseRatio)), 20.0);
        assert_eq!(round2(computation.value(FinanceMetric::TotalExpense)), 3045.0);
    }

    #[test]
    fn break_even_divides_fixed_cost_by_margin_ratio() {
        let computation = compute_finance_metrics(&statement());

        assert_eq!(round2(computation.value(FinanceMetric::BreakEvenRevenue)), 1666.67);
        assert_eq!(
            computation.calculation_steps.get(FinanceMetric::BreakEvenRevenue).map(|s| s.calculation.as_str()),
            Some("1000 / (60.00 / 100) = 1666.67")
        );
    }

    #[test]
    fn zero_denominators_produce_zero() {
        let computation = compute_finance_metrics(&InputRecord::from_pairs([("fixedCost", "500")]));

        for metric in [
            FinanceMetric::GrossMarginPercent,
            FinanceMetric::NetProfitMarginPercent,
            FinanceMetric::InventoryTurnover,
            FinanceMetric::ChangePercent,
            FinanceMetric::BreakEvenRevenue,
            FinanceMetric::ForecastAccuracy,
            FinanceMetric::VariableCostPercent,
            FinanceMetric::OperatingExpenseRatio,
        ] {
            assert_eq!(computation.value(metric), 0.0, "{metric:?}");
        }
        assert_eq!(computation.value(FinanceMetric::NetWorkingCapital), -500.0);
    }

    #[test]
    fn negative_denominators_still_divide() {
        let input = InputRecord::from_pairs([("preQuarterValue", "-200"), ("currentValue", "-100")]);
        let computation = compute_finance_metrics(&input);

        assert_eq!(computation.value(FinanceMetric::ChangePercent), -50.0);
    }

    #[test]
    fn cash_and_inventory_chain_through_intermediates() {
        let input = InputRecord::from_pairs([
            ("cashInflow", "5000"),
            ("cashOutflow", "4500"),
            ("cashInHand", "2000"),
            ("openingInventory", "1500"),
            ("closingInventory", "1800"),
            ("averageInventory", "1650"),
            ("rawMaterials", "30"),
            ("labour", "20"),
            ("otherDirectCost", "5"),
            ("fixedCost", "1000"),
        ]);
        let computation = compute_finance_metrics(&input);
        let step = |metric| {
            computation.calculation_steps.get(metric).map(|s| s.calculation.clone()).unwrap_or_default()
        };

        assert_eq!(computation.value(FinanceMetric::CashBalance), 2500.0);
        assert_eq!(computation.value(FinanceMetric::AdjustedCogs), -245.0);
        assert_eq!(computation.value(FinanceMetric::InventoryChange), 300.0);
        assert_eq!(computation.value(FinanceMetric::NetWorkingCapital), 3300.0);
        assert_eq!(step(FinanceMetric::CashBalance), "2000 + 500.00 = 2500.00");
        assert_eq!(step(FinanceMetric::AdjustedCogs), "1500 + 55.00 - 1800 = -245.00");
        assert_eq!(step(FinanceMetric::NetWorkingCapital), "(2500.00 + 1800) - 1000 = 3300.00");
    }

    #[test]
    fn intermediates_are_rounded_only_in_the_narrative() {
        let input = InputRecord::from_pairs([("sellingPrice", "10"), ("cogs", "3.333")]);
        let computation = compute_finance_metrics(&input);

        let step = computation.calculation_steps.get(FinanceMetric::GrossMarginPercent).expect("step");
        assert_eq!(step.calculation, "(6.67 / 10) × 100 = 66.67%");
        assert!((computation.value(FinanceMetric::GrossMarginPercent) - 66.67).abs() < 1e-9);
    }

    #[test]
    fn forecast_accuracy_is_an_error_magnitude() {
        let input = InputRecord::from_pairs([("forecast", "10500"), ("currentValue", "10000")]);
        let computation = compute_finance_metrics(&input);
        let value = computation.value(FinanceMetric::ForecastAccuracy);

        assert_eq!(round2(value), 5.0);
        assert_eq!(FinanceMetric::ForecastAccuracy.classify(value).label, "⬆️ Accurate");
    }

    #[test]
    fn inventory_change_band_is_symmetric() {
        let rule = FinanceMetric::InventoryChange;
        assert_eq!(rule.classify(-20.0).category, StatusCategory::Green);
        assert_eq!(rule.classify(20.0).category, StatusCategory::Green);
        assert_eq!(rule.classify(300.0).label, "⬇️ Extreme");
    }

    #[test]
    fn change_percent_requires_strict_growth() {
        assert_eq!(FinanceMetric::ChangePercent.classify(0.0).label, "⬇️ Decline");
        assert_eq!(FinanceMetric::ChangePercent.classify(0.01).label, "⬆️ Growth");
    }

    #[test]
    fn every_threshold_boundary_is_placed_on_the_right_side() {
        // (key, value at the bound, label at the bound, value just past it, label past it)
        let rows: [(&str, f64, &str, f64, &str); 19] = [
            ("grossProfit", 0.0, "⬆️ Good", -0.01, "⬇️ Loss"),
            ("netProfit", 0.0, "⬆️ Healthy", -0.01, "⬇️ Loss"),
            ("grossMarginPercent", 15.0, "⬆️ Strong", 14.99, "⬇️ Weak"),
            ("netProfitMarginPercent", 5.0, "⬆️ Good", 4.99, "⬇️ Low"),
            ("totalDirectCost", 60.0, "⬆️ Efficient", 60.01, "⬇️ High"),
            ("contributionMargin", 0.0, "⬆️ Profitable", -0.01, "⬇️ Unprofitable"),
            ("operatingProfit", 0.0, "⬆️ Strong", -0.01, "⬇️ Weak"),
            ("netCashFlow", 0.0, "⬆️ Healthy", -0.01, "⬇️ Negative"),
            ("cashBalance", 0.0, "⬆️ Safe", -0.01, "⬇️ Risk"),
            ("adjustedCogs", 70.0, "⬆️ Controlled", 70.01, "⬇️ High"),
            ("inventoryTurnover", 4.0, "⬆️ Efficient", 3.99, "⬇️ Slow"),
            ("changePercent", 0.0, "⬇️ Decline", 0.01, "⬆️ Growth"),
            ("breakEvenRevenue", 80.0, "⬆️ Low", 80.01, "⬇️ High"),
            ("forecastAccuracy", 10.0, "⬆️ Accurate", 10.01, "⬇️ Inaccurate"),
            ("variableCostPercent", 50.0, "⬆️ Good", 50.01, "⬇️ High"),
            ("operatingExpenseRatio", 30.0, "⬆️ Lean", 30.01, "⬇️ Heavy"),
            ("inventoryChange", -20.0, "⬆️ Balanced", -20.01, "⬇️ Extreme"),
            ("netWorkingCapital", 0.0, "⬆️ Good", -0.01, "⬇️ Tight"),
            ("totalExpense", 80.0, "⬆️ Efficient", 80.01, "⬇️ High"),
        ];

        for (key, at_bound, at_label, past, past_label) in rows {
            assert_eq!(classify_finance(key, at_bound).label, at_label, "{key} at {at_bound}");
            assert_eq!(classify_finance(key, past).label, past_label, "{key} at {past}");
        }
    }

    #[test]
    fn definitions_line_up_with_enum_order() {
        assert_eq!(FinanceMetric::all().len(), 19);
        for metric in FinanceMetric::all() {
            assert_eq!(FinanceMetric::parse(metric.key()), Some(*metric));
        }
    }
}
