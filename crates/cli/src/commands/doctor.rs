use bizpulse_core::config::{AppConfig, LoadOptions};
use bizpulse_core::numeric::round2;
use bizpulse_core::schema::demo_record;
use bizpulse_core::{
    compute_finance_metrics, compute_sales_metrics, Domain, FinanceMetric, InputRecord,
    MetricKey, ResultBundle, SalesEngine, SalesMetric,
};
use serde::Serialize;

use crate::commands::{escape_json, CommandResult, EXIT_CONFIG, EXIT_OK, EXIT_RENDERING, EXIT_RUNTIME};
use crate::report::{render_text, ReportView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    fn failed(&self, name: &str) -> bool {
        self.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
    }

    /// Config failures win over template failures, which win over engine failures.
    fn exit_code(&self) -> u8 {
        if self.overall_status == CheckStatus::Pass {
            EXIT_OK
        } else if self.failed("config_validation") || self.failed("presentation_settings") {
            EXIT_CONFIG
        } else if self.failed("report_template") {
            EXIT_RENDERING
        } else {
            EXIT_RUNTIME
        }
    }
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = report.exit_code();

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_presentation(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "presentation_settings",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    checks.push(check_golden_vectors());
    checks.push(check_report_template());

    // Skipped checks only follow a failure, so they never make a run pass.
    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_presentation(config: &AppConfig) -> DoctorCheck {
    DoctorCheck {
        name: "presentation_settings",
        status: CheckStatus::Pass,
        details: format!(
            "calculation delay {}ms, {} output, {} logs at `{}`",
            config.presentation.calculation_delay_ms,
            config.presentation.output.as_str(),
            config.logging.format.as_str(),
            config.logging.level
        ),
    }
}

fn check_golden_vectors() -> DoctorCheck {
    let sales = compute_sales_metrics(&InputRecord::from_pairs([
        ("totalLeads", "500"),
        ("totalEnquiry", "100"),
        ("totalSales", "25"),
        ("totalCustomers", "150"),
        ("totalMarketSpend", "50000"),
        ("averageBillValue", "2000"),
    ]));
    let finance = compute_finance_metrics(&InputRecord::from_pairs([
        ("sellingPrice", "100"),
        ("cogs", "60"),
        ("variableCost", "40"),
        ("fixedCost", "1000"),
    ]));

    let expectations = [
        (SalesMetric::LeadToSales.key(), round2(sales.value(SalesMetric::LeadToSales)), 5.0),
        (SalesMetric::Cac.key(), round2(sales.value(SalesMetric::Cac)), 333.33),
        (
            FinanceMetric::GrossMarginPercent.key(),
            round2(finance.value(FinanceMetric::GrossMarginPercent)),
            40.0,
        ),
        (
            FinanceMetric::BreakEvenRevenue.key(),
            round2(finance.value(FinanceMetric::BreakEvenRevenue)),
            1666.67,
        ),
    ];

    let mismatches: Vec<String> = expectations
        .iter()
        .filter(|(_, actual, expected)| actual != expected)
        .map(|(key, actual, expected)| format!("{key} = {actual} (expected {expected})"))
        .collect();

    if mismatches.is_empty() {
        DoctorCheck {
            name: "engine_golden_vectors",
            status: CheckStatus::Pass,
            details: format!("{} reference values matched", expectations.len()),
        }
    } else {
        DoctorCheck {
            name: "engine_golden_vectors",
            status: CheckStatus::Fail,
            details: mismatches.join("; "),
        }
    }
}

fn check_report_template() -> DoctorCheck {
    let bundle = ResultBundle::from_engine(&SalesEngine, &demo_record(Domain::Sales));
    match render_text(&ReportView::new("doctor", &bundle)) {
        Ok(text) => DoctorCheck {
            name: "report_template",
            status: CheckStatus::Pass,
            details: format!("demo report rendered ({} lines)", text.lines().count()),
        },
        Err(error) => DoctorCheck {
            name: "report_template",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
