use serde::{Deserialize, Serialize};
use std::fmt;

/// Versioned rule catalog.
///
/// Pure data: categories, rules, conditions and the weights that turn
/// rule statuses into points. Loaded once and shared read-only.
///
/// Example YAML:
/// ```yaml
/// version: "1.0.0"
/// engine: seo-health
/// scoring:
///   severityWeights: { HIGH: 3, MEDIUM: 2, LOW: 1 }
///   statusScores: { PASS: 1.0, WARNING: 0.5, FAIL: 0.0 }
/// categories:
///   - id: speed
///     name: Speed & Performance
///     maxPoints: 25
///     rules:
///       - id: html_size
///         severity: MEDIUM
///         message: HTML document is too large
///         recommendation: Minify markup and move inline assets out
///         thresholds:
///           pass: { field: html.sizeKb, operator: lt, value: 100 }
///           warning: { field: html.sizeKb, operator: lt, value: 250 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleCatalog {
    pub version: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub scoring: ScoringWeights,
    pub categories: Vec<Category>,
}

impl RuleCatalog {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Sum of every category's maxPoints, widened so it cannot overflow.
    pub fn total_max_points(&self) -> u64 {
        self.categories.iter().map(|c| u64::from(c.max_points)).sum()
    }

    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }

    /// Every condition in the catalog with a human-readable location,
    /// in declaration order.
    pub fn conditions(&self) -> Vec<(String, &Condition)> {
        let mut out = Vec::new();
        for (ci, category) in self.categories.iter().enumerate() {
            for (ri, rule) in category.rules.iter().enumerate() {
                let base = format!("categories[{}].rules[{}]", ci, ri);
                if let Some(ref checks) = rule.checks {
                    for (k, condition) in checks.iter().enumerate() {
                        out.push((format!("{}.checks[{}]", base, k), condition));
                    }
                }
                if let Some(ref thresholds) = rule.thresholds {
                    out.push((format!("{}.thresholds.pass", base), &thresholds.pass));
                    if let Some(ref warning) = thresholds.warning {
                        out.push((format!("{}.thresholds.warning", base), warning));
                    }
                }
            }
        }
        out
    }
}

/// Weight tables converting severities and statuses into points.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ScoringWeights {
    #[serde(default)]
    pub severity_weights: SeverityWeights,
    #[serde(default)]
    pub status_scores: StatusScores,
}

/// Relative importance of each severity (default 3/2/1).
/// Only ratios inside a category matter.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeverityWeights {
    #[serde(rename = "HIGH")]
    pub high: f64,
    #[serde(rename = "MEDIUM")]
    pub medium: f64,
    #[serde(rename = "LOW")]
    pub low: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            high: 3.0,
            medium: 2.0,
            low: 1.0,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Fraction of a rule's points awarded per status (default 1.0/0.5/0.0).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StatusScores {
    #[serde(rename = "PASS")]
    pub pass: f64,
    #[serde(rename = "WARNING")]
    pub warning: f64,
    #[serde(rename = "FAIL")]
    pub fail: f64,
}

impl Default for StatusScores {
    fn default() -> Self {
        Self {
            pass: 1.0,
            warning: 0.5,
            fail: 0.0,
        }
    }
}

impl StatusScores {
    pub fn multiplier(&self, status: Status) -> f64 {
        match status {
            Status::Pass => self.pass,
            Status::Warning => self.warning,
            Status::Fail => self.fail,
        }
    }
}

/// Named group of rules sharing a point budget.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub max_points: u32,
    pub rules: Vec<Rule>,
}

/// A single testable criterion.
///
/// Exactly one of `checks` (all must hold, PASS or FAIL) and `thresholds`
/// (PASS, WARNING or FAIL) is expected. Validation enforces it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<Condition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
}

impl Rule {
    pub fn with_checks(
        id: &str,
        severity: Severity,
        message: &str,
        recommendation: &str,
        checks: Vec<Condition>,
    ) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.to_string(),
            recommendation: recommendation.to_string(),
            checks: Some(checks),
            thresholds: None,
        }
    }

    pub fn with_thresholds(
        id: &str,
        severity: Severity,
        message: &str,
        recommendation: &str,
        pass: Condition,
        warning: Option<Condition>,
    ) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.to_string(),
            recommendation: recommendation.to_string(),
            checks: None,
            thresholds: Some(Thresholds { pass, warning }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    pub pass: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Condition>,
}

/// Atomic comparison of a facts field against an expected value.
///
/// `operator` stays a string so that unknown names survive loading and
/// can be reported; the matcher treats them as non-matching.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(field: &str, operator: &str, value: impl Into<ConditionValue>) -> Self {
        Self {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        }
    }
}

/// Expected value of a condition: a scalar or an inclusive `[min, max]` range.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Range([f64; 2]),
}

impl ConditionValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ConditionValue::Bool(_) => "boolean",
            ConditionValue::Number(_) => "number",
            ConditionValue::Text(_) => "string",
            ConditionValue::Range(_) => "range",
        }
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<[f64; 2]> for ConditionValue {
    fn from(value: [f64; 2]) -> Self {
        ConditionValue::Range(value)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Warning,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warning => "WARNING",
            Status::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
