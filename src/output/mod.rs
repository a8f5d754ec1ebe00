pub mod formatter;
pub mod report;

pub use formatter::{
    format_health_score, format_points, format_report_table, format_tsv, should_use_colors,
};
pub use report::{format_json, save_report, ScoreReport};
