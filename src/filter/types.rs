use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Comparison operators understood by the list search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "eq")] Eq,
    #[serde(rename = "co")] Co,
    #[serde(rename = "sw")] Sw,
    #[serde(rename = "ew")] Ew,
}

impl FilterOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "eq" => Some(FilterOp::Eq),
            "co" => Some(FilterOp::Co),
            "sw" => Some(FilterOp::Sw),
            "ew" => Some(FilterOp::Ew),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Co => "co",
            FilterOp::Sw => "sw",
            FilterOp::Ew => "ew",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal on the right-hand side of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    /// Numeric token; `raw` keeps the text as typed (`0003`, `1.0`)
    Number { value: f64, raw: String },
    String(String),
}

impl FilterValue {
    /// Interpret an unquoted token: numbers and booleans are typed, the rest is text
    pub fn from_bare(token: &str) -> Self {
        if token.eq_ignore_ascii_case("true") {
            FilterValue::Bool(true)
        } else if token.eq_ignore_ascii_case("false") {
            FilterValue::Bool(false)
        } else if let Ok(n) = token.parse::<f64>() {
            if n.is_finite() {
                FilterValue::Number { value: n, raw: token.to_string() }
            } else {
                FilterValue::String(token.to_string())
            }
        } else {
            FilterValue::String(token.to_string())
        }
    }

    /// Lowercased text form used by the string operators
    pub fn text(&self) -> String {
        match self {
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Number { raw, .. } => raw.to_lowercase(),
            FilterValue::String(s) => s.to_lowercase(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number { value: n, raw: format_number(n) }
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// Render numbers the way they appear in JSON payloads (`3` rather than `3.0`)
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Text form of a scalar JSON value, or None for null/arrays/objects
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A single `attribute operator value` predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub attribute: String,
    pub operator: FilterOp,
    pub value: FilterValue,
}

/// Parsed search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpression {
    Condition(FilterCondition),
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
}

impl FilterExpression {
    pub fn condition(attribute: impl Into<String>, operator: FilterOp, value: impl Into<FilterValue>) -> Self {
        FilterExpression::Condition(FilterCondition {
            attribute: attribute.into(),
            operator,
            value: value.into(),
        })
    }

    /// Every attribute referenced by the expression
    pub fn attributes(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpression::Condition(c) => out.push(&c.attribute),
            FilterExpression::And(children) | FilterExpression::Or(children) => {
                for child in children {
                    child.collect_attributes(out);
                }
            }
        }
    }
}

/// Field names a view declares as searchable or sortable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    /// None accepts any attribute name
    names: Option<BTreeSet<String>>,
}

impl AttributeSet {
    pub fn any() -> Self {
        Self { names: None }
    }

    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: Some(names.into_iter().map(Into::into).collect()) }
    }

    pub fn contains(&self, name: &str) -> bool {
        match &self.names {
            None => true,
            Some(names) => names.contains(name),
        }
    }

    pub fn is_any(&self) -> bool {
        self.names.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { SortDirection::Asc } else { SortDirection::Desc }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub attribute: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(attribute: impl Into<String>, ascending: bool) -> Self {
        Self { attribute: attribute.into(), direction: SortDirection::from_ascending(ascending) }
    }

    pub fn asc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, true)
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, false)
    }
}

/// Visible slice of a list: `[offset, offset + limit)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// One-based page number to window; page 0 is read as page 1
    pub fn from_page(page: usize, limit: usize) -> Self {
        Self { offset: page.max(1).saturating_sub(1).saturating_mul(limit), limit }
    }

    /// One-based page the offset falls on
    pub fn page(&self) -> usize {
        if self.limit == 0 { 1 } else { self.offset / self.limit + 1 }
    }
}

/// Request body shape for one-shot list queries (CLI `--filter-json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    pub order: Option<Value>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub page: Option<usize>,
}
