pub mod config;
pub mod facts;
pub mod output;
pub mod scoring;
pub mod telemetry;

pub use facts::{FactValue, Facts};
pub use scoring::{evaluate, EvaluationResult, RuleCatalog};
