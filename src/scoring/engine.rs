use serde::{Serialize, Serializer};
use tracing::debug;

use super::catalog::{Category, Rule, RuleCatalog, ScoringWeights, Severity, Status};
use super::conditions::condition_matches;
use crate::facts::Facts;

/// Score and presentation label for one category.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    #[serde(skip_serializing)]
    pub id: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub label: String,
}

/// Remediation entry for a rule that did not pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub severity: Severity,
    pub category: String,
    pub status: Status,
    pub message: String,
    pub recommendation: String,
    pub points_lost: f64,
}

/// How a single rule resolved and what it was worth.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub status: Status,
    pub max_points: f64,
    pub points_earned: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusSummary {
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

impl StatusSummary {
    fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.passed += 1,
            Status::Warning => self.warnings += 1,
            Status::Fail => self.failed += 1,
        }
    }
}

/// Result of scoring one facts object against a catalog.
///
/// `category_scores`, `recommendations` and `rules` all follow catalog
/// declaration order (category, then rule).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub catalog_version: String,
    pub health_score: u8,
    #[serde(serialize_with = "serialize_category_scores")]
    pub category_scores: Vec<CategoryScore>,
    pub recommendations: Vec<Recommendation>,
    pub summary: StatusSummary,
    pub rules: Vec<RuleOutcome>,
}

impl EvaluationResult {
    pub fn category(&self, id: &str) -> Option<&CategoryScore> {
        self.category_scores.iter().find(|c| c.id == id)
    }

    pub fn rule(&self, category: &str, id: &str) -> Option<&RuleOutcome> {
        self.rules
            .iter()
            .find(|r| r.category == category && r.id == id)
    }
}

// Keyed by category id, in declaration order.
fn serialize_category_scores<S>(scores: &[CategoryScore], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(scores.iter().map(|c| (c.id.as_str(), c)))
}

/// Resolve a rule's status: thresholds first, then checks.
///
/// Thresholds give PASS, WARNING or FAIL. Checks are an AND gate with no
/// WARNING tier. A rule with neither mode fails. An empty check list also
/// fails rather than passing vacuously; validation rejects it at load.
pub fn rule_status(rule: &Rule, facts: &Facts) -> Status {
    if let Some(ref thresholds) = rule.thresholds {
        if condition_matches(&thresholds.pass, facts) {
            Status::Pass
        } else if thresholds
            .warning
            .as_ref()
            .is_some_and(|warning| condition_matches(warning, facts))
        {
            Status::Warning
        } else {
            Status::Fail
        }
    } else if let Some(ref checks) = rule.checks {
        if !checks.is_empty() && checks.iter().all(|c| condition_matches(c, facts)) {
            Status::Pass
        } else {
            Status::Fail
        }
    } else {
        Status::Fail
    }
}

/// Total severity weight of a category's rules.
/// Negative or NaN weights count as zero.
pub fn category_weight(category: &Category, scoring: &ScoringWeights) -> f64 {
    category
        .rules
        .iter()
        .map(|r| rule_weight(r, scoring))
        .sum()
}

fn rule_weight(rule: &Rule, scoring: &ScoringWeights) -> f64 {
    scoring.severity_weights.weight(rule.severity).max(0.0)
}

/// Share of `max_points` a rule owns: its weight over the category weight.
fn max_rule_points(weight: f64, category_weight: f64, max_points: u32) -> f64 {
    if category_weight > 0.0 {
        weight / category_weight * f64::from(max_points)
    } else {
        0.0
    }
}

fn round_points(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// Score `facts` against `catalog`.
///
/// Pure and deterministic. Missing or mistyped facts make the affected
/// conditions fail; nothing about the facts can make this panic or error.
pub fn evaluate(catalog: &RuleCatalog, facts: &Facts) -> EvaluationResult {
    let scoring = &catalog.scoring;

    let mut category_scores = Vec::with_capacity(catalog.categories.len());
    let mut recommendations = Vec::new();
    let mut rules = Vec::with_capacity(catalog.rule_count());
    let mut summary = StatusSummary::default();

    let mut total_score = 0.0;
    let mut total_max_points = 0.0;

    for category in &catalog.categories {
        let total_weight = category_weight(category, scoring);
        let mut category_score = 0.0;

        for rule in &category.rules {
            let status = rule_status(rule, facts);
            let max_points = max_rule_points(rule_weight(rule, scoring), total_weight, category.max_points);
            let multiplier = scoring.status_scores.multiplier(status).clamp(0.0, 1.0);
            let points_earned = max_points * multiplier;

            debug!(
                category = %category.id,
                rule = %rule.id,
                %status,
                max_points,
                points_earned,
                "rule evaluated"
            );

            category_score += points_earned;
            summary.record(status);

            if status != Status::Pass {
                recommendations.push(Recommendation {
                    id: rule.id.clone(),
                    severity: rule.severity,
                    category: category.id.clone(),
                    status,
                    message: rule.message.clone(),
                    recommendation: rule.recommendation.clone(),
                    points_lost: (max_points - points_earned).max(0.0),
                });
            }

            rules.push(RuleOutcome {
                id: rule.id.clone(),
                category: category.id.clone(),
                severity: rule.severity,
                status,
                max_points,
                points_earned,
            });
        }

        let percentage = if category.max_points > 0 {
            round_points(category_score / f64::from(category.max_points) * 100.0)
        } else {
            0
        };

        category_scores.push(CategoryScore {
            id: category.id.clone(),
            score: round_points(category_score),
            max_score: category.max_points,
            percentage,
            label: category.name.clone(),
        });

        total_score += category_score;
        total_max_points += f64::from(category.max_points);
    }

    let health_score = if total_max_points > 0.0 {
        round_points(total_score / total_max_points * 100.0).min(100) as u8
    } else {
        0
    };

    debug!(
        health_score,
        passed = summary.passed,
        warnings = summary.warnings,
        failed = summary.failed,
        "catalog evaluated"
    );

    EvaluationResult {
        catalog_version: catalog.version.clone(),
        health_score,
        category_scores,
        recommendations,
        summary,
        rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Condition, StatusScores, Thresholds};

    const TOLERANCE: f64 = 1e-9;

    fn parse_catalog(yaml: &str) -> RuleCatalog {
        serde_saphyr::from_str(yaml).unwrap()
    }

    fn speed_catalog() -> RuleCatalog {
        parse_catalog(
            r#"
version: "1.0.0"
engine: test
categories:
  - id: speed
    name: Speed & Performance
    maxPoints: 25
    rules:
      - id: html_size
        severity: MEDIUM
        message: HTML too large
        recommendation: Minify HTML
        thresholds:
          pass: { field: html.sizeKb, operator: lt, value: 100 }
          warning: { field: html.sizeKb, operator: lt, value: 250 }
      - id: compression
        severity: HIGH
        message: Compression disabled
        recommendation: Enable gzip
        checks:
          - { field: performance.compressionEnabled, operator: equals, value: true }
      - id: headers
        severity: LOW
        message: Missing cache headers
        recommendation: Send Cache-Control
        checks:
          - { field: performance.cacheControl, operator: equals, value: true }
          - { field: performance.etag, operator: equals, value: true }
"#,
        )
    }

    fn all_passing_speed_facts() -> Facts {
        Facts::new()
            .with("html.sizeKb", 40.0)
            .with("performance.compressionEnabled", true)
            .with("performance.cacheControl", true)
            .with("performance.etag", true)
    }

    #[test]
    fn test_all_rules_pass() {
        let result = evaluate(&speed_catalog(), &all_passing_speed_facts());
        assert_eq!(result.health_score, 100);

        let speed = result.category("speed").unwrap();
        assert_eq!(speed.score, 25);
        assert_eq!(speed.max_score, 25);
        assert_eq!(speed.percentage, 100);
        assert_eq!(speed.label, "Speed & Performance");
        assert!(result.recommendations.is_empty());
        assert_eq!(result.summary.passed, 3);
    }

    #[test]
    fn test_threshold_warning_tier() {
        let facts = all_passing_speed_facts().with("html.sizeKb", 150.0);
        let result = evaluate(&speed_catalog(), &facts);

        let outcome = result.rule("speed", "html_size").unwrap();
        assert_eq!(outcome.status, Status::Warning);
        // MEDIUM (2) out of 2 + 3 + 1 = 6 of 25 points
        let max_points = 2.0 / 6.0 * 25.0;
        assert!((outcome.max_points - max_points).abs() < TOLERANCE);
        assert!((outcome.points_earned - max_points * 0.5).abs() < TOLERANCE);

        assert_eq!(result.recommendations.len(), 1);
        let rec = &result.recommendations[0];
        assert_eq!(rec.id, "html_size");
        assert_eq!(rec.status, Status::Warning);
        assert_eq!(rec.category, "speed");
        assert!((rec.points_lost - max_points * 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_threshold_fail_when_neither_matches() {
        let facts = all_passing_speed_facts().with("html.sizeKb", 400.0);
        let result = evaluate(&speed_catalog(), &facts);
        assert_eq!(result.rule("speed", "html_size").unwrap().status, Status::Fail);
    }

    #[test]
    fn test_threshold_without_warning_fails() {
        let rule = Rule::with_thresholds(
            "ttfb",
            Severity::High,
            "m",
            "r",
            Condition::new("performance.ttfbMs", "lt", 600.0),
            None,
        );
        let facts = Facts::new().with("performance.ttfbMs", 700.0);
        assert_eq!(rule_status(&rule, &facts), Status::Fail);
    }

    #[test]
    fn test_checks_are_all_or_nothing() {
        // One of two checks fails: no partial credit
        let facts = all_passing_speed_facts().with("performance.etag", false);
        let result = evaluate(&speed_catalog(), &facts);

        let outcome = result.rule("speed", "headers").unwrap();
        assert_eq!(outcome.status, Status::Fail);
        assert_eq!(outcome.points_earned, 0.0);
    }

    #[test]
    fn test_thresholds_take_precedence_over_checks() {
        let mut rule = Rule::with_thresholds(
            "both",
            Severity::Low,
            "m",
            "r",
            Condition::new("a", "equals", true),
            None,
        );
        rule.checks = Some(vec![Condition::new("b", "equals", true)]);

        let facts = Facts::new().with("a", true).with("b", false);
        assert_eq!(rule_status(&rule, &facts), Status::Pass);
    }

    #[test]
    fn test_rule_without_mode_fails() {
        let mut rule = Rule::with_checks("none", Severity::Low, "m", "r", vec![]);
        assert_eq!(rule_status(&rule, &Facts::new()), Status::Fail);
        rule.checks = None;
        assert_eq!(rule_status(&rule, &Facts::new().with("a", true)), Status::Fail);
    }

    #[test]
    fn test_empty_checks_do_not_pass_vacuously() {
        let rule = Rule::with_checks("empty", Severity::High, "m", "r", vec![]);
        let facts = Facts::new().with("a", true).with("b", 1.0);
        assert_eq!(rule_status(&rule, &facts), Status::Fail);
    }

    #[test]
    fn test_empty_facts_fail_everything() {
        let result = evaluate(&speed_catalog(), &Facts::new());
        assert_eq!(result.health_score, 0);
        assert_eq!(result.summary.failed, 3);
        assert_eq!(result.recommendations.len(), 3);
        assert_eq!(result.category("speed").unwrap().percentage, 0);
    }

    #[test]
    fn test_recommendations_follow_catalog_order() {
        let catalog = parse_catalog(
            r#"
version: "1.0.0"
categories:
  - id: first
    name: First
    maxPoints: 10
    rules:
      - { id: low_rule, severity: LOW, message: m, recommendation: r,
          checks: [{ field: x, operator: equals, value: true }] }
      - { id: high_rule, severity: HIGH, message: m, recommendation: r,
          checks: [{ field: x, operator: equals, value: true }] }
  - id: second
    name: Second
    maxPoints: 90
    rules:
      - { id: medium_rule, severity: MEDIUM, message: m, recommendation: r,
          checks: [{ field: x, operator: equals, value: true }] }
"#,
        );
        let result = evaluate(&catalog, &Facts::new());
        let ids: Vec<&str> = result.recommendations.iter().map(|r| r.id.as_str()).collect();
        // Not sorted by severity or points lost
        assert_eq!(ids, vec!["low_rule", "high_rule", "medium_rule"]);
    }

    #[test]
    fn test_weight_distribution_sums_to_category_budget() {
        let catalog = RuleCatalog::default();
        let result = evaluate(&catalog, &Facts::new());

        for category in &catalog.categories {
            let total: f64 = result
                .rules
                .iter()
                .filter(|r| r.category == category.id)
                .map(|r| r.max_points)
                .sum();
            assert!(
                (total - f64::from(category.max_points)).abs() < 1e-6,
                "category {} distributes {} of {}",
                category.id,
                total,
                category.max_points
            );
        }
    }

    #[test]
    fn test_single_high_rule_takes_whole_budget() {
        let catalog = parse_catalog(
            r#"
version: "1.0.0"
scoring:
  severityWeights: { HIGH: 3, MEDIUM: 2, LOW: 1 }
categories:
  - id: security
    name: Security
    maxPoints: 20
    rules:
      - id: https
        severity: HIGH
        message: Not HTTPS
        recommendation: Use HTTPS
        checks:
          - { field: security.https, operator: equals, value: true }
"#,
        );
        let result = evaluate(&catalog, &Facts::new().with("security.https", true));
        let outcome = result.rule("security", "https").unwrap();
        assert_eq!(outcome.max_points, 20.0);
        assert_eq!(result.category("security").unwrap().score, 20);
    }

    #[test]
    fn test_health_normalized_by_present_max_points() {
        // 10 + 30 = 40 points total, not 100
        let catalog = parse_catalog(
            r#"
version: "1.0.0"
categories:
  - id: a
    name: A
    maxPoints: 10
    rules:
      - { id: r1, severity: HIGH, message: m, recommendation: r,
          checks: [{ field: a, operator: equals, value: true }] }
  - id: b
    name: B
    maxPoints: 30
    rules:
      - { id: r2, severity: HIGH, message: m, recommendation: r,
          checks: [{ field: b, operator: equals, value: true }] }
"#,
        );
        let result = evaluate(&catalog, &Facts::new().with("a", true));
        // 10 / 40 = 25%
        assert_eq!(result.health_score, 25);
        assert_eq!(result.category("a").unwrap().percentage, 100);
        assert_eq!(result.category("b").unwrap().percentage, 0);
    }

    #[test]
    fn test_rounding_half_up() {
        // Three LOW rules share 10 points: 3.333... each
        let catalog = parse_catalog(
            r#"
version: "1.0.0"
categories:
  - id: a
    name: A
    maxPoints: 10
    rules:
      - { id: r1, severity: LOW, message: m, recommendation: r,
          checks: [{ field: x, operator: equals, value: true }] }
      - { id: r2, severity: LOW, message: m, recommendation: r,
          checks: [{ field: y, operator: equals, value: true }] }
      - { id: r3, severity: LOW, message: m, recommendation: r,
          thresholds: { pass: { field: z, operator: gt, value: 5 },
                        warning: { field: z, operator: gt, value: 1 } } }
"#,
        );
        let facts = Facts::new().with("x", true).with("z", 3.0);
        let result = evaluate(&catalog, &facts);
        // 3.333 + 1.667 = 5.0 points -> 50%
        let a = result.category("a").unwrap();
        assert_eq!(a.score, 5);
        assert_eq!(a.percentage, 50);
        assert_eq!(result.health_score, 50);

        let facts = Facts::new().with("x", true).with("y", true);
        let result = evaluate(&catalog, &facts);
        // 6.667 points -> 7, 66.67% -> 67
        let a = result.category("a").unwrap();
        assert_eq!(a.score, 7);
        assert_eq!(a.percentage, 67);
        assert_eq!(result.health_score, 67);
    }

    #[test]
    fn test_monotonic_in_rule_status() {
        let catalog = speed_catalog();
        let base = all_passing_speed_facts();
        let fail = evaluate(&catalog, &base.clone().with("html.sizeKb", 900.0));
        let warn = evaluate(&catalog, &base.clone().with("html.sizeKb", 200.0));
        let pass = evaluate(&catalog, &base.with("html.sizeKb", 20.0));

        let speed = |r: &EvaluationResult| r.rules.iter().map(|o| o.points_earned).sum::<f64>();
        assert!(speed(&fail) <= speed(&warn));
        assert!(speed(&warn) <= speed(&pass));
        assert!(fail.health_score <= warn.health_score);
        assert!(warn.health_score <= pass.health_score);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let catalog = RuleCatalog::default();
        let facts = Facts::new()
            .with("title.length", 45.0)
            .with("html.sizeKb", 150.0)
            .with("security.https", true);
        assert_eq!(evaluate(&catalog, &facts), evaluate(&catalog, &facts));
    }

    #[test]
    fn test_mistyped_facts_degrade_to_fail() {
        let facts = Facts::new()
            .with("html.sizeKb", "150")
            .with("performance.compressionEnabled", "true")
            .with("performance.cacheControl", 1.0);
        let result = evaluate(&speed_catalog(), &facts);
        assert_eq!(result.summary.failed, 3);
        assert_eq!(result.health_score, 0);
    }

    #[test]
    fn test_zero_weight_category_degrades_safely() {
        let mut catalog = speed_catalog();
        catalog.scoring.severity_weights.high = 0.0;
        catalog.scoring.severity_weights.medium = 0.0;
        catalog.scoring.severity_weights.low = 0.0;

        let result = evaluate(&catalog, &all_passing_speed_facts());
        assert_eq!(result.health_score, 0);
        assert!(result.rules.iter().all(|r| r.max_points == 0.0));
    }

    #[test]
    fn test_empty_catalog_scores_zero() {
        let catalog = RuleCatalog {
            categories: vec![],
            ..speed_catalog()
        };
        let result = evaluate(&catalog, &Facts::new());
        assert_eq!(result.health_score, 0);
        assert!(result.category_scores.is_empty());
    }

    #[test]
    fn test_custom_status_scores() {
        let mut catalog = speed_catalog();
        catalog.scoring.status_scores = StatusScores {
            pass: 1.0,
            warning: 0.25,
            fail: 0.0,
        };
        let facts = all_passing_speed_facts().with("html.sizeKb", 150.0);
        let result = evaluate(&catalog, &facts);
        let outcome = result.rule("speed", "html_size").unwrap();
        assert!((outcome.points_earned - outcome.max_points * 0.25).abs() < TOLERANCE);
    }

    #[test]
    fn test_unknown_operator_fails_only_its_rule() {
        let mut catalog = speed_catalog();
        catalog.categories[0].rules[0].thresholds = Some(Thresholds {
            pass: Condition::new("html.sizeKb", "smaller_than", 100.0),
            warning: None,
        });
        let result = evaluate(&catalog, &all_passing_speed_facts());
        assert_eq!(result.summary.failed, 1);
        assert_eq!(result.summary.passed, 2);
        assert_eq!(result.rule("speed", "html_size").unwrap().status, Status::Fail);
    }

    #[test]
    fn test_json_shape() {
        let result = evaluate(&speed_catalog(), &Facts::new().with("html.sizeKb", 150.0));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["healthScore"], 17);
        assert_eq!(json["categoryScores"]["speed"]["maxScore"], 25);
        assert_eq!(json["categoryScores"]["speed"]["label"], "Speed & Performance");
        assert!(json["categoryScores"]["speed"].get("id").is_none());
        assert_eq!(json["recommendations"][0]["severity"], "MEDIUM");
        assert_eq!(json["recommendations"][0]["status"], "WARNING");
        assert!(json["recommendations"][0]["pointsLost"].is_number());
    }
}
