pub mod catalog;
pub mod conditions;
pub mod defaults;
pub mod engine;
pub mod validation;

pub use catalog::*;
pub use conditions::{condition_matches, Operator};
pub use engine::{evaluate, rule_status, CategoryScore, EvaluationResult, Recommendation, RuleOutcome, StatusSummary};
pub use validation::{lint_catalog, validate_catalog};
