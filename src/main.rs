use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use seo_health::facts::{load_facts, Facts};
use seo_health::output::{self, ScoreReport};
use seo_health::scoring::{evaluate, lint_catalog, validate_catalog};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_BELOW_THRESHOLD: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    /// Human-readable report
    #[default]
    Table,
    /// Pretty-printed JSON report
    Json,
    /// Tab-separated rows for scripting
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a facts file against the rule catalog
    Score {
        /// Path to the facts JSON produced by page analysis ("-" reads stdin)
        facts: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit with a non-zero status when the health score is below N
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=100))]
        fail_under: Option<u8>,
    },
    /// Validate the rule catalog and report warnings
    Validate,
    /// Write the built-in catalog to the config directory for tuning
    Init {
        /// Overwrite an existing catalog file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective catalog as YAML
    Catalog,
}

#[derive(Parser, Debug)]
#[command(name = "seo-health")]
#[command(about = "Weighted SEO health scoring from extracted page facts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to catalog file (defaults to ~/.config/seo-health/catalog.yaml, then the built-in catalog)
    #[arg(short, long, global = true)]
    catalog: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

fn read_facts(source: &str) -> anyhow::Result<Facts> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Facts::from_json_str(&buffer)
    } else {
        load_facts(&PathBuf::from(source))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = seo_health::telemetry::init(cli.verbose) {
        eprintln!("Logging error: {}", e);
    }

    let catalog_path = cli.catalog.map(PathBuf::from);
    let use_colors = !cli.no_color && output::should_use_colors();

    match cli.command {
        Commands::Score {
            facts,
            format,
            output: output_path,
            fail_under,
        } => {
            let catalog = match seo_health::config::load_catalog(catalog_path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Catalog error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let loaded_facts = match read_facts(&facts) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Facts error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if loaded_facts.is_empty() {
                tracing::warn!("facts from {} are empty, every rule will fail", facts);
            }

            let start_time = Instant::now();
            let result = evaluate(&catalog, &loaded_facts);
            tracing::info!(
                health_score = result.health_score,
                elapsed = ?start_time.elapsed(),
                "evaluation finished"
            );

            let report = ScoreReport::new(facts.as_str(), &result);

            match format {
                OutputFormat::Table => {
                    println!("{}", output::format_report_table(&result, use_colors));
                }
                OutputFormat::Tsv => {
                    println!("{}", output::format_tsv(&result));
                }
                OutputFormat::Json => match output::format_json(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            }

            if let Some(path) = output_path {
                if let Err(e) = output::save_report(&path, &report) {
                    eprintln!("Failed to write report: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                if cli.verbose {
                    eprintln!("Report written to {}", path.display());
                }
            }

            if let Some(threshold) = fail_under {
                if result.health_score < threshold {
                    eprintln!(
                        "Health score {} is below the required {}",
                        result.health_score, threshold
                    );
                    std::process::exit(EXIT_BELOW_THRESHOLD);
                }
            }
        }
        Commands::Validate => {
            // Parse without the load-time check so every finding is listed here
            let catalog = match seo_health::config::read_catalog(catalog_path) {
                Ok((c, _)) => c,
                Err(e) => {
                    eprintln!("Catalog error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let warnings = lint_catalog(&catalog);
            for warning in &warnings {
                eprintln!("warning: {}", warning);
            }

            if let Err(errors) = validate_catalog(&catalog) {
                eprintln!("Catalog errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }

            println!(
                "Catalog {} is valid: {} categories, {} rules, {} points, {} warning(s)",
                catalog.version,
                catalog.categories.len(),
                catalog.rule_count(),
                catalog.total_max_points(),
                warnings.len()
            );
        }
        Commands::Init { force } => {
            let path = catalog_path.unwrap_or_else(seo_health::config::get_catalog_path);
            if let Err(e) = seo_health::config::write_default_catalog(&path, force) {
                eprintln!("Init error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Wrote default catalog to {}", path.display());
        }
        Commands::Catalog => {
            let catalog = match seo_health::config::load_catalog(catalog_path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Catalog error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            match seo_health::config::init::render_catalog_yaml(&catalog) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Catalog error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
