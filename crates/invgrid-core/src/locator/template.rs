//! Ordered matcher sets describing one spreadsheet layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::models::record::Field;

use super::matcher::{AmountRule, Extraction, Matcher, Scope, TextMatch, Trigger, Window};
use super::rules::noise_threshold;

/// Column holding invoice number, invoice date and the vendor/PO values.
const VALUE_COLUMN: usize = 5;
/// Column holding the vendor/PO labels.
const LABEL_COLUMN: usize = 3;
/// Column holding the `Name  :` and `GSTIN :` lines.
const PARTY_COLUMN: usize = 0;
/// How far right of a label a total may sit, and how many trailing columns
/// the fallback looks at.
const TOTALS_REACH: usize = 3;

const GROSS_MARKER: &str = "GROSS TOTAL AFTER";
const COMPANY_LABEL: &str = "Name  :";
const GSTIN_LABEL: &str = "GSTIN :";

/// A named, ordered list of matchers.
///
/// Order matters: within a row, matchers run in list order and the first
/// value committed to a field is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub matchers: Vec<Matcher>,
}

impl Template {
    /// Layout of the tax-invoice exports this tool was built for.
    pub fn standard() -> Self {
        let total_amount = AmountRule::new(2).above(noise_threshold());

        let matchers = vec![
            Matcher {
                name: "invoice_number".to_string(),
                field: Field::InvoiceNumber,
                scope: Scope::Column(VALUE_COLUMN),
                trigger: Trigger::Contains(TextMatch::all(["SSH", "/"])),
                row_context: None,
                window: Window::SameCell,
                extraction: Extraction::Text { longer_than: 0 },
            },
            Matcher {
                name: "invoice_date".to_string(),
                field: Field::InvoiceDate,
                scope: Scope::Column(VALUE_COLUMN),
                trigger: Trigger::IsoDate,
                row_context: None,
                window: Window::SameCell,
                extraction: Extraction::IsoDatePrefix,
            },
            // Label-based totals
            Matcher {
                name: "gross_total_label".to_string(),
                field: Field::GrossTotalAfterTax,
                scope: Scope::EveryCell,
                trigger: Trigger::Contains(TextMatch::all([GROSS_MARKER, "TAX"]).ignore_case()),
                row_context: None,
                window: Window::Right(TOTALS_REACH),
                extraction: Extraction::Amount(AmountRule::new(2)),
            },
            Matcher {
                name: "total_label".to_string(),
                field: Field::TotalValue,
                scope: Scope::EveryCell,
                trigger: Trigger::Contains(
                    TextMatch::any(["TOTAL VALUE", "TOTAL AMOUNT", "TOTAL", "AMOUNT", "VALUE"])
                        .excluding(["GROSS"])
                        .ignore_case(),
                ),
                row_context: None,
                window: Window::Right(TOTALS_REACH),
                extraction: Extraction::Amount(total_amount.clone()),
            },
            // Trailing-column fallback, after every label-based total
            Matcher {
                name: "gross_total_trailing".to_string(),
                field: Field::GrossTotalAfterTax,
                scope: Scope::TrailingColumns(TOTALS_REACH),
                trigger: Trigger::Amount(total_amount.clone()),
                row_context: Some(TextMatch::all(["GROSS", "TOTAL"]).ignore_case()),
                window: Window::SameCell,
                extraction: Extraction::Amount(total_amount.clone()),
            },
            Matcher {
                name: "total_trailing".to_string(),
                field: Field::TotalValue,
                scope: Scope::TrailingColumns(TOTALS_REACH),
                trigger: Trigger::Amount(total_amount.clone()),
                row_context: Some(
                    TextMatch::any(["TOTAL", "AMOUNT", "VALUE"])
                        .unless_all(["GROSS", "TOTAL"])
                        .ignore_case(),
                ),
                window: Window::SameCell,
                extraction: Extraction::Amount(total_amount),
            },
            Matcher {
                name: "company_name".to_string(),
                field: Field::CompanyName,
                scope: Scope::Column(PARTY_COLUMN),
                trigger: Trigger::StartsWith(COMPANY_LABEL.to_string()),
                row_context: None,
                window: Window::SameCell,
                extraction: Extraction::StripPrefix {
                    prefix: COMPANY_LABEL.to_string(),
                    longer_than: 0,
                },
            },
            Matcher {
                name: "gstin".to_string(),
                field: Field::Gstin,
                scope: Scope::Column(PARTY_COLUMN),
                trigger: Trigger::StartsWith(GSTIN_LABEL.to_string()),
                row_context: None,
                window: Window::SameCell,
                extraction: Extraction::StripPrefix {
                    prefix: GSTIN_LABEL.to_string(),
                    longer_than: 10,
                },
            },
            Matcher {
                name: "vendor_code".to_string(),
                field: Field::VendorCode,
                scope: Scope::Column(LABEL_COLUMN),
                trigger: Trigger::Contains(TextMatch::all(["Vendor Code"])),
                row_context: None,
                window: Window::Column(VALUE_COLUMN),
                extraction: Extraction::Text { longer_than: 0 },
            },
            // The template prints the PO number under a "PO Date" label.
            Matcher {
                name: "po_number".to_string(),
                field: Field::PoNumber,
                scope: Scope::Column(LABEL_COLUMN),
                trigger: Trigger::Contains(TextMatch::all(["PO Date"])),
                row_context: None,
                window: Window::Column(VALUE_COLUMN),
                extraction: Extraction::Text { longer_than: 0 },
            },
            Matcher {
                name: "po_date".to_string(),
                field: Field::PoDate,
                scope: Scope::Column(LABEL_COLUMN),
                trigger: Trigger::Contains(TextMatch::all(["Purchase Order No"])),
                row_context: None,
                window: Window::Column(VALUE_COLUMN),
                extraction: Extraction::IsoDatePrefix,
            },
        ];

        Self {
            name: "standard".to_string(),
            matchers,
        }
    }

    /// Parse and validate a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: Template = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Load a template from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Serialize the template as pretty JSON.
    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject matcher sets that can never produce a value.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let invalid = |reason: String| TemplateError::Invalid {
            template: self.name.clone(),
            reason,
        };

        if self.matchers.is_empty() {
            return Err(invalid("no matchers".to_string()));
        }

        for matcher in &self.matchers {
            if matches!(matcher.scope, Scope::TrailingColumns(0)) {
                return Err(invalid(format!("matcher '{}' scans zero columns", matcher.name)));
            }
            if matches!(matcher.window, Window::Right(0)) {
                return Err(invalid(format!("matcher '{}' has an empty window", matcher.name)));
            }
            match &matcher.trigger {
                Trigger::Contains(m) if m.all.is_empty() && m.any.is_empty() => {
                    return Err(invalid(format!(
                        "matcher '{}' has no trigger text",
                        matcher.name
                    )));
                }
                Trigger::StartsWith(prefix) if prefix.is_empty() => {
                    return Err(invalid(format!(
                        "matcher '{}' has an empty prefix",
                        matcher.name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Matchers that fill `field`, in evaluation order.
    pub fn matchers_for(&self, field: Field) -> impl Iterator<Item = &Matcher> {
        self.matchers.iter().filter(move |m| m.field == field)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_is_valid() {
        Template::standard().validate().unwrap();
    }

    #[test]
    fn test_label_totals_precede_fallback() {
        let template = Template::standard();
        let names: Vec<&str> = template
            .matchers_for(Field::TotalValue)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["total_label", "total_trailing"]);

        let position = |name: &str| {
            template
                .matchers
                .iter()
                .position(|m| m.name == name)
                .unwrap()
        };
        assert!(position("gross_total_label") < position("gross_total_trailing"));
        assert!(position("total_label") < position("gross_total_trailing"));
    }

    #[test]
    fn test_json_round_trip() {
        let template = Template::standard();
        let json = template.to_json().unwrap();
        assert_eq!(Template::from_json(&json).unwrap(), template);
    }

    #[test]
    fn test_rejects_empty_window() {
        let mut template = Template::standard();
        template.matchers[2].window = Window::Right(0);
        assert!(matches!(
            template.validate(),
            Err(TemplateError::Invalid { .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Template::from_json(r#"{"name": "x"}"#),
            Err(TemplateError::Parse(_))
        ));
        assert!(matches!(
            Template::from_json(r#"{"name": "x", "matchers": []}"#),
            Err(TemplateError::Invalid { .. })
        ));
    }
}
