use anyhow::{bail, Result};

use super::catalog::{Condition, ConditionValue};
use crate::facts::{FactValue, Facts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    Between, // Inclusive: min <= x <= max
    Outside, // Complement of Between
}

impl Operator {
    /// Parse an operator name exactly as written in the catalog.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "equals" => Ok(Operator::Equals),
            "gt" => Ok(Operator::GreaterThan),
            "gte" => Ok(Operator::GreaterEqual),
            "lt" => Ok(Operator::LessThan),
            "lte" => Ok(Operator::LessEqual),
            "between" => Ok(Operator::Between),
            "outside" => Ok(Operator::Outside),
            other => bail!("Unknown operator: {}", other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::GreaterThan => "gt",
            Operator::GreaterEqual => "gte",
            Operator::LessThan => "lt",
            Operator::LessEqual => "lte",
            Operator::Between => "between",
            Operator::Outside => "outside",
        }
    }

    /// Whether this operator takes a `[min, max]` range rather than a scalar.
    pub fn expects_range(&self) -> bool {
        matches!(self, Operator::Between | Operator::Outside)
    }

    /// Whether `expected` has a shape this operator can use.
    pub fn accepts(&self, expected: &ConditionValue) -> bool {
        match self {
            Operator::Equals => !matches!(expected, ConditionValue::Range(_)),
            Operator::Between | Operator::Outside => matches!(expected, ConditionValue::Range(_)),
            _ => matches!(expected, ConditionValue::Number(_)),
        }
    }

    /// Compare an actual value against the expected one.
    ///
    /// An absent value never matches, whatever the operator. Type
    /// mismatches never match either; nothing is coerced.
    pub fn matches(&self, actual: Option<&FactValue>, expected: &ConditionValue) -> bool {
        let actual = match actual {
            Some(value) => value,
            None => return false,
        };

        match self {
            Operator::Equals => strict_equals(actual, expected),
            Operator::GreaterThan => compare_numbers(actual, expected, |a, b| a > b),
            Operator::GreaterEqual => compare_numbers(actual, expected, |a, b| a >= b),
            Operator::LessThan => compare_numbers(actual, expected, |a, b| a < b),
            Operator::LessEqual => compare_numbers(actual, expected, |a, b| a <= b),
            Operator::Between => {
                compare_range(actual, expected, |x, min, max| x >= min && x <= max)
            }
            Operator::Outside => compare_range(actual, expected, |x, min, max| x < min || x > max),
        }
    }
}

fn strict_equals(actual: &FactValue, expected: &ConditionValue) -> bool {
    match (actual, expected) {
        (FactValue::Bool(a), ConditionValue::Bool(b)) => a == b,
        (FactValue::Number(a), ConditionValue::Number(b)) => a == b,
        (FactValue::Text(a), ConditionValue::Text(b)) => a == b,
        _ => false,
    }
}

fn compare_numbers(actual: &FactValue, expected: &ConditionValue, cmp: fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), expected) {
        (Some(a), ConditionValue::Number(b)) => cmp(a, *b),
        _ => false,
    }
}

fn compare_range(
    actual: &FactValue,
    expected: &ConditionValue,
    cmp: fn(f64, f64, f64) -> bool,
) -> bool {
    match (actual.as_number(), expected) {
        (Some(x), ConditionValue::Range([min, max])) => cmp(x, *min, *max),
        _ => false,
    }
}

/// Evaluate one catalog condition against the facts.
/// Unknown operators degrade to a non-match.
pub fn condition_matches(condition: &Condition, facts: &Facts) -> bool {
    match Operator::parse(&condition.operator) {
        Ok(op) => op.matches(facts.lookup(&condition.field), &condition.value),
        Err(_) => false,
    }
}
