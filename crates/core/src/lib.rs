pub mod calendar;
pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod metrics;
pub mod numeric;
pub mod schema;

pub use domain::input::InputRecord;
pub use domain::metric::{
    CalculationStep, Computation, MetricAssessment, MetricDefinition, MetricKey, MetricUnit,
    ResultBundle,
};
pub use domain::status::{StatusCategory, StatusResult, StatusTally};
pub use domain::Domain;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use insights::{Insight, InsightKind, InsightSource, SummaryView};
pub use metrics::{
    classify_finance, classify_finance_raw, classify_sales, classify_sales_raw,
    compute_finance_metrics, compute_sales_metrics, format_finance_label, format_sales_label,
    FinanceEngine, FinanceMetric, MetricEngine, SalesEngine, SalesMetric,
};
