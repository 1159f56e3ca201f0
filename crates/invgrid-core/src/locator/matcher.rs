//! Declarative matchers: one record per heuristic.
//!
//! A matcher names the cells it looks at ([`Scope`]), the test a cell must
//! pass to trigger it ([`Trigger`]), an optional test on the whole row
//! ([`TextMatch`] as row context), where the value is read from
//! ([`Window`]) and how the value is derived ([`Extraction`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::record::Field;

use super::rules::{is_iso_date, iso_date_part, parse_amount, parse_amount_above};

/// Which cells of a row a matcher tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// A single fixed column.
    Column(usize),
    /// Every cell, left to right.
    EveryCell,
    /// The last `n` columns of the grid.
    TrailingColumns(usize),
}

impl Scope {
    /// Column indices covered in a row of `width` cells, left to right.
    pub fn columns(&self, width: usize) -> std::ops::Range<usize> {
        match self {
            Scope::Column(col) if *col < width => *col..*col + 1,
            Scope::Column(_) => 0..0,
            Scope::EveryCell => 0..width,
            Scope::TrailingColumns(n) => width.saturating_sub(*n)..width,
        }
    }
}

/// Substring test over a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMatch {
    /// Every needle must occur.
    pub all: Vec<String>,
    /// At least one needle must occur (ignored when empty).
    pub any: Vec<String>,
    /// No needle may occur.
    pub none: Vec<String>,
    /// Rejects the text when all of these occur together.
    pub unless_all: Vec<String>,
    /// Compare upper-cased text against upper-cased needles.
    pub case_insensitive: bool,
}

impl TextMatch {
    pub fn all<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all: needles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any: needles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn excluding<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.none = needles.into_iter().map(Into::into).collect();
        self
    }

    pub fn unless_all<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unless_all = needles.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn matches(&self, text: &str) -> bool {
        let haystack = if self.case_insensitive {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        let contains = |needle: &String| {
            if self.case_insensitive {
                haystack.contains(&needle.to_uppercase())
            } else {
                haystack.contains(needle.as_str())
            }
        };

        self.all.iter().all(contains)
            && (self.any.is_empty() || self.any.iter().any(contains))
            && !self.none.iter().any(contains)
            && (self.unless_all.is_empty() || !self.unless_all.iter().all(contains))
    }
}

/// Numeric acceptance rule for totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRule {
    /// The cell text must have more characters than this.
    #[serde(default)]
    pub longer_than: usize,
    /// The value must exceed this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<Decimal>,
}

impl AmountRule {
    pub fn new(longer_than: usize) -> Self {
        Self {
            longer_than,
            above: None,
        }
    }

    pub fn above(mut self, threshold: Decimal) -> Self {
        self.above = Some(threshold);
        self
    }

    pub fn accepts(&self, text: &str) -> bool {
        if text.chars().count() <= self.longer_than {
            return false;
        }
        match self.above {
            Some(threshold) => parse_amount_above(text, threshold).is_some(),
            None => parse_amount(text).is_some(),
        }
    }
}

/// Test that makes a scoped cell a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Contains(TextMatch),
    StartsWith(String),
    IsoDate,
    Amount(AmountRule),
}

impl Trigger {
    pub fn matches(&self, cell: &str) -> bool {
        match self {
            Trigger::Contains(m) => m.matches(cell),
            Trigger::StartsWith(prefix) => cell.starts_with(prefix.as_str()),
            Trigger::IsoDate => is_iso_date(cell),
            Trigger::Amount(rule) => rule.accepts(cell),
        }
    }
}

/// Where the value of a triggered matcher is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// The triggering cell itself.
    SameCell,
    /// Up to `n` cells to the right of the trigger; the first accepted wins.
    Right(usize),
    /// A fixed value column on the same row.
    Column(usize),
}

impl Window {
    /// Candidate columns for a trigger at `col` in a row of `width` cells.
    pub fn columns(&self, col: usize, width: usize) -> std::ops::Range<usize> {
        match self {
            Window::SameCell => col..col + 1,
            Window::Right(n) => {
                let start = col.saturating_add(1).min(width);
                start..col.saturating_add(1).saturating_add(*n).min(width)
            }
            Window::Column(c) if *c < width => *c..*c + 1,
            Window::Column(_) => 0..0,
        }
    }
}

/// How a value is derived from the window cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extraction {
    /// The trimmed cell text, if longer than `longer_than` characters.
    Text { longer_than: usize },
    /// The text after `prefix`, trimmed, if longer than `longer_than` characters.
    StripPrefix { prefix: String, longer_than: usize },
    /// The `YYYY-MM-DD` part of a date cell.
    IsoDatePrefix,
    /// The cell text, if it passes the amount rule.
    Amount(AmountRule),
}

impl Extraction {
    pub fn apply(&self, cell: &str) -> Option<String> {
        let cell = cell.trim();
        match self {
            Extraction::Text { longer_than } => {
                (cell.chars().count() > *longer_than).then(|| cell.to_string())
            }
            Extraction::StripPrefix {
                prefix,
                longer_than,
            } => {
                let rest = cell.strip_prefix(prefix.as_str()).unwrap_or(cell).trim();
                (rest.chars().count() > *longer_than).then(|| rest.to_string())
            }
            Extraction::IsoDatePrefix => iso_date_part(cell),
            Extraction::Amount(rule) => rule.accepts(cell).then(|| cell.to_string()),
        }
    }
}

/// One heuristic of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    /// Short identifier used in logs and traces.
    pub name: String,
    /// Field filled by this matcher.
    pub field: Field,
    pub scope: Scope,
    pub trigger: Trigger,
    /// Test on the row's cells joined with spaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_context: Option<TextMatch>,
    pub window: Window,
    pub extraction: Extraction,
}

impl Matcher {
    /// Scan one row. Returns `(column, value)` of the first accepted value.
    pub fn scan_row(&self, row: &[String], row_text: &str) -> Option<(usize, String)> {
        if let Some(context) = &self.row_context {
            if !context.matches(row_text) {
                return None;
            }
        }

        let width = row.len();
        for col in self.scope.columns(width) {
            if !self.trigger.matches(row[col].trim()) {
                continue;
            }
            for value_col in self.window.columns(col, width) {
                if let Some(value) = self.extraction.apply(&row[value_col]) {
                    return Some((value_col, value));
                }
            }
        }
        None
    }
}
