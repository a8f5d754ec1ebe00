use std::collections::HashSet;

use super::catalog::{Condition, ConditionValue, Rule, RuleCatalog, Severity};
use super::conditions::Operator;

/// Validate a rule catalog at load time.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &RuleCatalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if catalog.version.trim().is_empty() {
        errors.push("version: must not be empty".to_string());
    }

    // Severity weights
    let weights = &catalog.scoring.severity_weights;
    for severity in [Severity::High, Severity::Medium, Severity::Low] {
        let weight = weights.weight(severity);
        if !weight.is_finite() || weight < 0.0 {
            errors.push(format!(
                "scoring.severityWeights.{}: must be a non-negative number, got {}",
                severity, weight
            ));
        }
    }

    // Status multipliers
    let scores = &catalog.scoring.status_scores;
    for (name, value) in [("PASS", scores.pass), ("WARNING", scores.warning), ("FAIL", scores.fail)] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            errors.push(format!(
                "scoring.statusScores.{}: must be between 0.0 and 1.0, got {}",
                name, value
            ));
        }
    }
    if scores.pass < scores.warning {
        errors.push(format!(
            "scoring.statusScores: PASS ({}) must not be lower than WARNING ({})",
            scores.pass, scores.warning
        ));
    }
    if scores.warning < scores.fail {
        errors.push(format!(
            "scoring.statusScores: WARNING ({}) must not be lower than FAIL ({})",
            scores.warning, scores.fail
        ));
    }

    // Categories
    if catalog.categories.is_empty() {
        errors.push("categories: at least one category is required".to_string());
    } else if catalog.total_max_points() == 0 {
        errors.push("categories: total maxPoints across all categories must be greater than 0".to_string());
    }

    let mut category_ids = HashSet::new();
    for (ci, category) in catalog.categories.iter().enumerate() {
        let prefix = format!("categories[{}]", ci);

        if category.id.trim().is_empty() {
            errors.push(format!("{}.id: must not be empty", prefix));
        } else if !category_ids.insert(category.id.as_str()) {
            errors.push(format!("{}.id: duplicate category id '{}'", prefix, category.id));
        }

        if category.rules.is_empty() {
            errors.push(format!("{}.rules: category '{}' has no rules", prefix, category.id));
            continue;
        }

        let total_weight: f64 = category
            .rules
            .iter()
            .map(|r| weights.weight(r.severity))
            .sum();
        if total_weight <= 0.0 {
            errors.push(format!(
                "{}: severity weights of the rules in '{}' sum to zero, points cannot be distributed",
                prefix, category.id
            ));
        }

        let mut rule_ids = HashSet::new();
        for (ri, rule) in category.rules.iter().enumerate() {
            let rule_prefix = format!("{}.rules[{}]", prefix, ri);

            if rule.id.trim().is_empty() {
                errors.push(format!("{}.id: must not be empty", rule_prefix));
            } else if !rule_ids.insert(rule.id.as_str()) {
                errors.push(format!(
                    "{}.id: duplicate rule id '{}' in category '{}'",
                    rule_prefix, rule.id, category.id
                ));
            }

            validate_rule_mode(rule, &rule_prefix, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rule_mode(rule: &Rule, prefix: &str, errors: &mut Vec<String>) {
    match (&rule.checks, &rule.thresholds) {
        (None, None) => errors.push(format!(
            "{}: rule '{}' must declare either checks or thresholds",
            prefix, rule.id
        )),
        (Some(_), Some(_)) => errors.push(format!(
            "{}: rule '{}' declares both checks and thresholds, pick one",
            prefix, rule.id
        )),
        (Some(checks), None) => {
            if checks.is_empty() {
                errors.push(format!("{}.checks: must contain at least one condition", prefix));
            }
            for (k, condition) in checks.iter().enumerate() {
                validate_condition(condition, &format!("{}.checks[{}]", prefix, k), errors);
            }
        }
        (None, Some(thresholds)) => {
            validate_condition(&thresholds.pass, &format!("{}.thresholds.pass", prefix), errors);
            if let Some(ref warning) = thresholds.warning {
                validate_condition(warning, &format!("{}.thresholds.warning", prefix), errors);
            }
        }
    }
}

fn validate_condition(condition: &Condition, prefix: &str, errors: &mut Vec<String>) {
    if condition.field.trim().is_empty() {
        errors.push(format!("{}.field: must not be empty", prefix));
    } else if condition.field.split('.').any(|segment| segment.is_empty()) {
        errors.push(format!(
            "{}.field: invalid path '{}' - empty segment",
            prefix, condition.field
        ));
    }
}

/// Non-fatal findings about a catalog. None of these block loading.
pub fn lint_catalog(catalog: &RuleCatalog) -> Vec<String> {
    let mut warnings = Vec::new();

    if semver::Version::parse(&catalog.version).is_err() {
        warnings.push(format!(
            "version: '{}' is not a semantic version (e.g. 1.2.0)",
            catalog.version
        ));
    }

    for (location, condition) in catalog.conditions() {
        let op = match Operator::parse(&condition.operator) {
            Ok(op) => op,
            Err(e) => {
                warnings.push(format!("{}.operator: {} - condition will never match", location, e));
                continue;
            }
        };

        if !op.accepts(&condition.value) {
            let wanted = if op.expects_range() {
                "a [min, max] range"
            } else if op == Operator::Equals {
                "a boolean, number or string"
            } else {
                "a number"
            };
            warnings.push(format!(
                "{}.value: '{}' expects {}, got {} - condition will never match",
                location,
                op.as_str(),
                wanted,
                condition.value.kind()
            ));
        }

        if let ConditionValue::Range([min, max]) = &condition.value {
            if min > max {
                warnings.push(format!(
                    "{}.value: range minimum {} is greater than maximum {}",
                    location, min, max
                ));
            }
        }
    }

    warnings
}
