//! Plain-text results report rendered with tera.

use std::collections::HashMap;

use bizpulse_core::insights::{Insight, InsightSource, SummaryView};
use bizpulse_core::{ApplicationError, Domain, MetricAssessment, MetricKey, ResultBundle, StatusTally};
use serde::Serialize;
use tera::{Context, Tera};

const REPORT_TEMPLATE_NAME: &str = "report.txt";

const REPORT_TEMPLATE: &str = r#"{{ title }}
run: {{ run_id }}
status: {{ tally.green }} green, {{ tally.orange }} orange, {{ tally.red }} red, {{ tally.gray }} unknown

Metrics
{% for row in assessments %}{{ row.status.category | marker }} {{ row.label }}: {{ row.display_value }} ({{ row.status.label }})
{% endfor %}
Performance Summary
{% for section in summary %}{{ section.title }}
{% for item in section.items %}  {{ item.caption }}: {{ item.display_value }}
{% endfor %}{% endfor %}
Key Insights
{% for insight in insights %}{% if insight.kind == "strength" %}  + {% else %}  ! {% endif %}{{ insight.message }}
{% endfor %}
Calculation Steps
{% for step in steps %}{{ step.label }}
  Formula:     {{ step.formula }}
  Calculation: {{ step.calculation }}
  {{ step.explanation }}
{% endfor %}"#;

/// Everything the report template reads, also used for `--json` output.
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct ReportView<'a, M: MetricKey> {
    pub run_id: &'a str,
    pub domain: Domain,
    pub title: String,
    pub bundle: &'a ResultBundle<M>,
    pub assessments: Vec<MetricAssessment>,
    pub insights: Vec<Insight>,
    pub summary: Vec<SummaryView>,
    pub tally: StatusTally,
    pub steps: Vec<StepView>,
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub key: &'static str,
    pub label: &'static str,
    pub formula: String,
    pub calculation: String,
    pub explanation: String,
}

impl<'a, M: InsightSource> ReportView<'a, M> {
    pub fn new(run_id: &'a str, bundle: &'a ResultBundle<M>) -> Self {
        let steps = bundle
            .calculation_steps
            .iter()
            .map(|(metric, step)| StepView {
                key: metric.key(),
                label: metric.label(),
                formula: step.formula.clone(),
                calculation: step.calculation.clone(),
                explanation: step.explanation.clone(),
            })
            .collect();

        Self {
            run_id,
            domain: M::DOMAIN,
            title: format!("{} Metrics Report", capitalize(M::DOMAIN.as_str())),
            bundle,
            assessments: bundle.assessments(),
            insights: bundle.insights(),
            summary: bundle.summary(),
            tally: bundle.status_tally(),
            steps,
        }
    }
}

/// Register custom filters used by the report template.
///
/// - `marker`: status category to a fixed-width tag, e.g. `"green" | marker`
pub fn register_template_filters(tera: &mut Tera) {
    tera.register_filter("marker", marker_filter);
}

fn marker_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let category =
        value.as_str().ok_or_else(|| tera::Error::msg("marker filter expects a string input"))?;
    let marker = match category {
        "green" => "[ok]",
        "orange" => "[~~]",
        "red" => "[!!]",
        _ => "[--]",
    };
    Ok(tera::Value::String(marker.to_string()))
}

fn report_engine() -> Result<Tera, ApplicationError> {
    let mut tera = Tera::default();
    register_template_filters(&mut tera);
    tera.add_raw_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)
        .map_err(|error| ApplicationError::Rendering(format!("report template is invalid: {error}")))?;
    Ok(tera)
}

pub fn render_text<M: InsightSource>(view: &ReportView<'_, M>) -> Result<String, ApplicationError> {
    let tera = report_engine()?;
    let context = Context::from_serialize(view)
        .map_err(|error| ApplicationError::Rendering(format!("report context failed: {error}")))?;

    tera.render(REPORT_TEMPLATE_NAME, &context)
        .map_err(|error| ApplicationError::Rendering(format!("report rendering failed: {error}")))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use bizpulse_core::schema::demo_record;
    use bizpulse_core::{Domain, FinanceEngine, InputRecord, ResultBundle, SalesEngine};

    use super::{render_text, ReportView};

    #[test]
    fn sales_report_lists_metrics_summary_and_steps() -> Result<(), String> {
        let bundle = ResultBundle::from_engine(&SalesEngine, &demo_record(Domain::Sales));
        let text = render_text(&ReportView::new("run-1", &bundle)).map_err(|err| err.to_string())?;

        assert!(text.starts_with("Sales Metrics Report\nrun: run-1\n"));
        assert!(text.contains("[ok] Customer Acquisition Cost: ₹333.33 (⬆️ Low Cost)"));
        assert!(text.contains("Conversion Health\n  Lead to Enquiry: 20.00%"));
        assert!(text.contains("  + Excellent overall conversion rate from leads to sales"));
        assert!(text.contains("  Calculation: 50000 / 150 = ₹333.33"));
        assert!(text.contains("sales team's closing speed"));
        Ok(())
    }

    #[test]
    fn finance_report_marks_turnover_strength() -> Result<(), String> {
        let input = InputRecord::from_pairs([("averageInventory", "10"), ("rawMaterials", "40")]);
        let bundle = ResultBundle::from_engine(&FinanceEngine, &input);
        let text = render_text(&ReportView::new("run-2", &bundle)).map_err(|err| err.to_string())?;

        assert!(text.starts_with("Finance Metrics Report"));
        assert!(text.contains("[ok] Inventory Turnover Ratio: 4.00x (⬆️ Efficient)"));
        assert!(text.contains("[ok] Total Direct Cost: ₹40.00 (⬆️ Efficient)"));
        assert!(text.contains("Key Insights\n  + Efficient inventory management with good turnover ratio"));
        Ok(())
    }

    #[test]
    fn view_serializes_bundle_and_tally() -> Result<(), String> {
        let bundle = ResultBundle::from_engine(&SalesEngine, &InputRecord::new());
        let json = serde_json::to_value(ReportView::new("run-3", &bundle)).map_err(|err| err.to_string())?;

        assert_eq!(json["domain"], "sales");
        assert_eq!(json["bundle"]["metrics"]["roi"], 0.0);
        assert_eq!(json["tally"]["red"].as_u64(), Some(7));
        assert_eq!(json["tally"]["green"].as_u64(), Some(4));
        Ok(())
    }
}
