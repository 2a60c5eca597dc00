use std::env;
use std::sync::{Mutex, OnceLock};

use bizpulse_cli::commands::calculate::{self, CalculateRequest};
use bizpulse_cli::commands::{classify, config, describe, doctor};
use serde_json::Value;

fn funnel_request(json: bool) -> CalculateRequest {
    CalculateRequest {
        domain: "sales".to_string(),
        assignments: [
            "totalLeads=500",
            "totalEnquiry=100",
            "totalSales=25",
            "totalCustomers=150",
            "totalMarketSpend=50000",
            "averageBillValue=2000",
        ]
        .iter()
        .map(|assignment| assignment.to_string())
        .collect(),
        json,
        ..CalculateRequest::default()
    }
}

#[test]
fn calculate_sales_json_reports_metrics_and_steps() {
    with_env(&[], || {
        let result = calculate::run(&funnel_request(true));
        assert_eq!(result.exit_code, 0, "expected successful calculation: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["domain"], "sales");
        assert_eq!(payload["bundle"]["metrics"]["leadToEnquiry"], 20.0);
        assert_eq!(payload["bundle"]["metrics"]["revenue"], 50_000.0);
        assert_eq!(
            payload["bundle"]["calculationSteps"]["cac"]["calculation"],
            "50000 / 150 = ₹333.33"
        );
        assert_eq!(payload["bundle"]["inputData"]["totalLeads"], "500");
        assert!(payload["run_id"].as_str().is_some_and(|id| !id.is_empty()));
    });
}

#[test]
fn output_setting_switches_calculate_to_json() {
    with_env(&[("BIZPULSE_PRESENTATION_OUTPUT", "json")], || {
        let result = calculate::run(&funnel_request(false));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["bundle"]["metrics"]["leadToSales"], 5.0);
    });
}

#[test]
fn calculate_finance_renders_text_report() {
    with_env(&[], || {
        let request = CalculateRequest {
            domain: "finance".to_string(),
            assignments: vec!["averageInventory=10".to_string(), "rawMaterials=40".to_string()],
            ..CalculateRequest::default()
        };
        let result = calculate::run(&request);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("Finance Metrics Report"));
        assert!(result.output.contains("Inventory Turnover Ratio: 4.00x"));
        assert!(result.output.contains("Calculation Steps"));
    });
}

#[test]
fn calculate_demo_uses_placeholder_values() {
    with_env(&[], || {
        let request = CalculateRequest {
            domain: "sales".to_string(),
            demo: true,
            json: true,
            ..CalculateRequest::default()
        };
        let result = calculate::run(&request);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["bundle"]["inputData"]["totalLeads"], "500");
    });
}

#[test]
fn calculate_rejects_unknown_domain() {
    with_env(&[], || {
        let request = CalculateRequest { domain: "hr".to_string(), ..CalculateRequest::default() };
        let result = calculate::run(&request);
        assert_eq!(result.exit_code, 3, "expected input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "calculate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "domain_validation");
        assert!(payload["correlation_id"].as_str().is_some());
    });
}

#[test]
fn calculate_rejects_malformed_assignment() {
    with_env(&[], || {
        let request = CalculateRequest {
            domain: "sales".to_string(),
            assignments: vec!["totalLeads".to_string()],
            ..CalculateRequest::default()
        };
        let result = calculate::run(&request);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "input");
    });
}

#[test]
fn calculate_returns_config_failure_for_excessive_delay() {
    with_env(&[("BIZPULSE_PRESENTATION_CALCULATION_DELAY_MS", "20000")], || {
        let result = calculate::run(&funnel_request(true));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn delay_flag_overrides_config() {
    with_env(&[], || {
        let request = CalculateRequest { delay_ms: Some(60_000), ..funnel_request(true) };
        let result = calculate::run(&request);
        assert_eq!(result.exit_code, 2);
    });
}

#[test]
fn classify_reports_band_and_falls_back_to_gray() {
    with_env(&[], || {
        let result = classify::run("sales", "roi", "42", false);
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["metric_label"], "Marketing Return on Investment");
        assert_eq!(payload["category"], "green");

        let unknown = parse_payload(&classify::run("finance", "ebitda", "10", false).output);
        assert_eq!(unknown["category"], "gray");
        assert_eq!(unknown["metric_label"], "ebitda");

        let garbage = parse_payload(&classify::run("sales", "roi", "n/a", false).output);
        assert_eq!(garbage["category"], "gray");
    });
}

#[test]
fn label_echoes_unknown_keys() {
    assert_eq!(describe::label("finance", "grossProfit", false).output, "Gross Profit");
    assert_eq!(describe::label("sales", "mystery", false).output, "mystery");
    assert_eq!(describe::label("ops", "mystery", false).exit_code, 3);
}

#[test]
fn strict_mode_rejects_unknown_metrics() {
    let classified = classify::run("finance", "ebitda", "10", true);
    assert_eq!(classified.exit_code, 3);
    let payload = parse_payload(&classified.output);
    assert_eq!(payload["error_class"], "domain_validation");
    assert_eq!(payload["message"], "unknown finance metric `ebitda`");

    let labelled = describe::label("sales", "mystery", true);
    assert_eq!(labelled.exit_code, 3);
    assert_eq!(parse_payload(&labelled.output)["command"], "label");

    assert_eq!(describe::label("sales", "cac", true).output, "Customer Acquisition Cost");
    assert_eq!(classify::run("sales", "cac", "900", true).exit_code, 0);
}

#[test]
fn metrics_and_fields_list_domain_tables() {
    let metrics = parse_payload(&describe::metrics("finance", true).output);
    assert_eq!(metrics.as_array().map(Vec::len), Some(19));
    assert_eq!(metrics[0]["key"], "grossProfit");

    let fields = describe::fields("sales", false);
    assert_eq!(fields.exit_code, 0);
    assert!(fields.output.contains("- timePeriod (Time Period): one of Monthly|Quarterly|Yearly"));
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("BIZPULSE_LOG_LEVEL", "warn")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("- logging.level = warn (source: env (BIZPULSE_LOG_LEVEL))"));
        assert!(result.output.contains("- presentation.output = text (source: default)"));
    });
}

#[test]
fn doctor_passes_with_default_config() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "{}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        assert_eq!(payload["checks"].as_array().map(Vec::len), Some(4));
    });
}

#[test]
fn doctor_fails_on_invalid_config() {
    with_env(&[("BIZPULSE_LOGGING_FORMAT", "xml")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "BIZPULSE_PRESENTATION_CALCULATION_DELAY_MS",
        "BIZPULSE_PRESENTATION_OUTPUT",
        "BIZPULSE_LOGGING_LEVEL",
        "BIZPULSE_LOGGING_FORMAT",
        "BIZPULSE_LOG_LEVEL",
        "BIZPULSE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
