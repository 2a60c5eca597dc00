//! Input form layout per domain: sections, field kinds, and demo values.

use serde::Serialize;

use crate::domain::input::InputRecord;
use crate::domain::Domain;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Number,
    Date,
    Choice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Example value shown in the empty form; doubles as the demo value.
    pub placeholder: &'static str,
    pub options: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSection {
    pub title: &'static str,
    pub fields: &'static [InputField],
}

const fn number(key: &'static str, label: &'static str, placeholder: &'static str) -> InputField {
    InputField { key, label, kind: FieldKind::Number, placeholder, options: &[] }
}

const fn date(key: &'static str, label: &'static str) -> InputField {
    InputField { key, label, kind: FieldKind::Date, placeholder: "", options: &[] }
}

pub const TIME_PERIOD_OPTIONS: [&str; 3] = ["Monthly", "Quarterly", "Yearly"];

pub static SALES_SECTIONS: [FieldSection; 4] = [
    FieldSection {
        title: "Core Sales Data",
        fields: &[
            number("totalCustomers", "Total Customers", "150"),
            number("totalLeads", "Total Leads", "500"),
            number("totalEnquiry", "Total Enquiries", "100"),
            number("totalSales", "Total Sales", "25"),
        ],
    },
    FieldSection {
        title: "Financial Metrics",
        fields: &[
            number("totalMarketSpend", "Total Marketing Spend", "50000.00"),
            number("averageBillValue", "Average Bill Value", "2000.00"),
        ],
    },
    FieldSection {
        title: "Time Period Settings",
        fields: &[
            InputField {
                key: "timePeriod",
                label: "Time Period",
                kind: FieldKind::Choice,
                placeholder: "",
                options: &TIME_PERIOD_OPTIONS,
            },
            number("timePeriodDays", "Custom Period (Days)", "30"),
        ],
    },
    FieldSection {
        title: "Important Dates",
        fields: &[
            date("leadEntryDate", "Lead Entry Date"),
            date("enquiryDate", "Enquiry Date"),
            date("conversionDate", "Conversion Date"),
        ],
    },
];

pub static FINANCE_SECTIONS: [FieldSection; 6] = [
    FieldSection {
        title: "Revenue & Pricing",
        fields: &[
            number("sellingPrice", "Selling Price", "100.00"),
            number("totalRevenue", "Total Revenue", "10000.00"),
            number("cogs", "COGS (Cost of Goods Sold)", "60.00"),
        ],
    },
    FieldSection {
        title: "Production Costs",
        fields: &[
            number("rawMaterials", "Raw Materials", "30.00"),
            number("labour", "Labour Cost", "20.00"),
            number("otherDirectCost", "Other Direct Cost", "5.00"),
        ],
    },
    FieldSection {
        title: "Operating Expenses",
        fields: &[
            number("fixedCost", "Fixed Cost", "1000.00"),
            number("variableCost", "Variable Cost", "40.00"),
            number("operatingExpenses", "Operating Expenses", "2000.00"),
            number("totalExpenses", "Total Expenses", "8000.00"),
        ],
    },
    FieldSection {
        title: "Cash Flow",
        fields: &[
            number("cashInflow", "Cash Inflow", "5000.00"),
            number("cashOutflow", "Cash Outflow", "4500.00"),
            number("cashInHand", "Cash in Hand", "2000.00"),
        ],
    },
    FieldSection {
        title: "Inventory",
        fields: &[
            number("openingInventory", "Opening Inventory", "1500.00"),
            number("closingInventory", "Closing Inventory", "1800.00"),
            number("averageInventory", "Average Inventory", "1650.00"),
        ],
    },
    FieldSection {
        title: "Performance Tracking",
        fields: &[
            number("preQuarterValue", "Previous Quarter Value", "9000.00"),
            number("currentValue", "Current Value", "10000.00"),
            number("forecast", "Forecast Value", "10500.00"),
        ],
    },
];

pub fn sections(domain: Domain) -> &'static [FieldSection] {
    match domain {
        Domain::Sales => &SALES_SECTIONS,
        Domain::Finance => &FINANCE_SECTIONS,
    }
}

pub fn fields(domain: Domain) -> impl Iterator<Item = &'static InputField> {
    sections(domain).iter().flat_map(|section| section.fields.iter())
}

pub fn find_field(domain: Domain, key: &str) -> Result<&'static InputField, DomainError> {
    fields(domain)
        .find(|field| field.key == key)
        .ok_or_else(|| DomainError::UnknownField { domain, name: key.to_string() })
}

/// A record filled with every non-empty placeholder of the domain's form.
pub fn demo_record(domain: Domain) -> InputRecord {
    InputRecord::from_pairs(
        fields(domain)
            .filter(|field| !field.placeholder.is_empty())
            .map(|field| (field.key, field.placeholder)),
    )
}

/// Keys in `input` that the domain's form does not define, in key order.
pub fn unknown_fields(domain: Domain, input: &InputRecord) -> Vec<String> {
    input
        .iter()
        .filter(|(key, _)| find_field(domain, key).is_err())
        .map(|(key, _)| key.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{demo_record, fields, find_field, unknown_fields, FieldKind};
    use crate::domain::input::InputRecord;
    use crate::domain::Domain;
    use crate::errors::DomainError;

    #[test]
    fn field_counts_match_calculator_inputs() {
        assert_eq!(fields(Domain::Sales).count(), 11);
        assert_eq!(fields(Domain::Finance).count(), 19);
    }

    #[test]
    fn field_keys_are_unique_per_domain() {
        for domain in Domain::ALL {
            let mut keys: Vec<_> = fields(domain).map(|field| field.key).collect();
            let total = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), total, "{domain}");
        }
    }

    #[test]
    fn demo_record_skips_fields_without_placeholders() {
        let demo = demo_record(Domain::Sales);

        assert_eq!(demo.get("totalLeads"), Some("500"));
        assert_eq!(demo.get("timePeriodDays"), Some("30"));
        assert_eq!(demo.get("timePeriod"), None);
        assert_eq!(demo.get("leadEntryDate"), None);
    }

    #[test]
    fn find_field_reports_unknown_keys() {
        assert_eq!(find_field(Domain::Sales, "enquiryDate").map(|f| f.kind), Ok(FieldKind::Date));
        assert_eq!(
            find_field(Domain::Finance, "totalLeads"),
            Err(DomainError::UnknownField { domain: Domain::Finance, name: "totalLeads".into() })
        );
    }

    #[test]
    fn unknown_fields_lists_foreign_keys() {
        let input = InputRecord::from_pairs([("cogs", "1"), ("totalLeads", "5"), ("zeta", "")]);

        assert_eq!(unknown_fields(Domain::Finance, &input), vec!["totalLeads", "zeta"]);
    }
}
