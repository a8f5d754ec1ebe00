use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{CategoryScore, EvaluationResult, Recommendation, Severity, Status};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Points with one decimal, trailing ".0" dropped (3.3, 5, 0.5)
pub fn format_points(points: f64) -> String {
    let formatted = format!("{:.1}", points);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

enum Band {
    Good,
    Fair,
    Poor,
}

fn band(percentage: u32) -> Band {
    if percentage >= 80 {
        Band::Good
    } else if percentage >= 50 {
        Band::Fair
    } else {
        Band::Poor
    }
}

fn paint_percentage(text: &str, percentage: u32, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match band(percentage) {
        Band::Good => text.green().to_string(),
        Band::Fair => text.yellow().to_string(),
        Band::Poor => text.red().to_string(),
    }
}

/// Format the overall score line: "Health score: 72/100"
pub fn format_health_score(result: &EvaluationResult, use_colors: bool) -> String {
    let score = format!("{}/100", result.health_score);
    let painted = paint_percentage(&score, u32::from(result.health_score), use_colors);
    if use_colors {
        format!("{} {}", "Health score:".bold(), painted.bold())
    } else {
        format!("Health score: {}", painted)
    }
}

/// Format one category row: label, score/max and percentage
fn format_category_line(category: &CategoryScore, label_width: usize, use_colors: bool) -> String {
    let points = format!("{:>3}/{:<3}", category.score, category.max_score);
    let percentage = format!("{:>4}", format!("{}%", category.percentage));
    let percentage = paint_percentage(&percentage, category.percentage, use_colors);
    format!(
        "  {:<width$}  {}  {}",
        category.label,
        points,
        percentage,
        width = label_width
    )
}

fn format_severity(severity: Severity, use_colors: bool) -> String {
    let tag = format!("{:<6}", severity.as_str());
    if !use_colors {
        return tag;
    }
    match severity {
        Severity::High => tag.red().bold().to_string(),
        Severity::Medium => tag.yellow().to_string(),
        Severity::Low => tag.dimmed().to_string(),
    }
}

fn format_status(status: Status, use_colors: bool) -> String {
    let tag = format!("{:<7}", status.as_str());
    if !use_colors {
        return tag;
    }
    match status {
        Status::Pass => tag.green().to_string(),
        Status::Warning => tag.yellow().to_string(),
        Status::Fail => tag.red().to_string(),
    }
}

/// Format one recommendation as two lines: tags + message, then remediation
fn format_recommendation(
    index: usize,
    rec: &Recommendation,
    term_width: Option<usize>,
    use_colors: bool,
) -> String {
    let index_str = format!("{:>2}.", index + 1);
    let lost = format!("-{}", format_points(rec.points_lost));
    let lost = format!("{:>6}", lost);

    // index(3) + space + severity(6) + space + status(7) + space + lost(6) + 2 spaces
    let fixed_width = 3 + 1 + 6 + 1 + 7 + 1 + 6 + 2;
    let message = match term_width {
        Some(width) if width > fixed_width + 10 => truncate_text(&rec.message, width - fixed_width),
        Some(_) => truncate_text(&rec.message, 20),
        None => rec.message.clone(),
    };
    let advice = match term_width {
        Some(width) if width > 16 => truncate_text(&rec.recommendation, width - 6),
        _ => rec.recommendation.clone(),
    };

    if use_colors {
        format!(
            "{} {} {} {}  {}\n      {}",
            index_str.dimmed(),
            format_severity(rec.severity, true),
            format_status(rec.status, true),
            lost.bold(),
            message,
            advice.dimmed()
        )
    } else {
        format!(
            "{} {} {} {}  {}\n      {}",
            index_str,
            format_severity(rec.severity, false),
            format_status(rec.status, false),
            lost,
            message,
            advice
        )
    }
}

/// Format an evaluation as a human-readable report
pub fn format_report_table(result: &EvaluationResult, use_colors: bool) -> String {
    let term_width = get_terminal_width();
    let mut lines = Vec::new();

    lines.push(format!(
        "{}  (catalog {})",
        format_health_score(result, use_colors),
        result.catalog_version
    ));
    lines.push(String::new());

    let label_width = result
        .category_scores
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0);
    for category in &result.category_scores {
        lines.push(format_category_line(category, label_width, use_colors));
    }

    lines.push(String::new());
    let summary = &result.summary;
    lines.push(format!(
        "{} passed, {} warnings, {} failed",
        summary.passed, summary.warnings, summary.failed
    ));

    if result.recommendations.is_empty() {
        lines.push("No recommendations. Every rule passed.".to_string());
    } else {
        lines.push(String::new());
        let heading = format!("Recommendations ({})", result.recommendations.len());
        if use_colors {
            lines.push(heading.bold().to_string());
        } else {
            lines.push(heading);
        }
        for (idx, rec) in result.recommendations.iter().enumerate() {
            lines.push(format_recommendation(idx, rec, term_width, use_colors));
        }
    }

    lines.join("\n")
}

/// Format an evaluation as tab-separated values for scripting
/// Category rows: category, score, max, percentage
/// Recommendation rows: category/rule, severity, status, points lost
/// No headers, no colors
pub fn format_tsv(result: &EvaluationResult) -> String {
    let categories = result.category_scores.iter().map(|c| {
        format!("{}\t{}\t{}\t{}", c.id, c.score, c.max_score, c.percentage)
    });
    let recommendations = result.recommendations.iter().map(|r| {
        format!(
            "{}/{}\t{}\t{}\t{}",
            r.category,
            r.id,
            r.severity,
            r.status,
            format_points(r.points_lost)
        )
    });

    categories
        .chain(recommendations)
        .collect::<Vec<_>>()
        .join("\n")
}
