pub mod init;

pub use init::write_default_catalog;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::scoring::{lint_catalog, validate_catalog, RuleCatalog};

/// Get the config directory path (e.g. ~/.config/seo-health/)
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("seo-health"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.config/seo-health",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Get the default catalog file path (e.g. ~/.config/seo-health/catalog.yaml)
pub fn get_catalog_path() -> PathBuf {
    get_config_dir().join("catalog.yaml")
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from the file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Yaml,
        }
    }
}

/// Parse a catalog document without validating it.
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<RuleCatalog> {
    let catalog = match format {
        CatalogFormat::Yaml => serde_saphyr::from_str(content).context("Invalid catalog YAML")?,
        CatalogFormat::Json => serde_json::from_str(content).context("Invalid catalog JSON")?,
    };
    Ok(catalog)
}

/// Reject a catalog with structural errors and log lint warnings.
pub fn check_catalog(catalog: &RuleCatalog) -> Result<()> {
    if let Err(errors) = validate_catalog(catalog) {
        anyhow::bail!(
            "Catalog {} has {} error(s):\n  - {}",
            catalog.version,
            errors.len(),
            errors.join("\n  - ")
        );
    }

    for warning in lint_catalog(catalog) {
        warn!("catalog: {}", warning);
    }

    Ok(())
}

/// Resolve and parse the rule catalog without validating it.
///
/// Returns the catalog together with the file it came from, or `None` when
/// the built-in catalog was used.
pub fn read_catalog(path: Option<PathBuf>) -> Result<(RuleCatalog, Option<PathBuf>)> {
    let catalog_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Catalog file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_catalog_path();
            if !default_path.exists() {
                debug!(path = %default_path.display(), "no catalog file, using built-in catalog");
                return Ok((RuleCatalog::default(), None));
            }
            default_path
        }
    };

    let content = fs::read_to_string(&catalog_path)
        .with_context(|| format!("Failed to read catalog file at {}", catalog_path.display()))?;

    let catalog = parse_catalog(&content, CatalogFormat::from_path(&catalog_path))
        .with_context(|| format!("Failed to parse catalog at {}", catalog_path.display()))?;

    Ok((catalog, Some(catalog_path)))
}

/// Resolve and load the rule catalog.
///
/// # Arguments
///
/// * `path` - Optional path to a catalog file. If None, uses the default
///   path, falling back to the built-in catalog when that file is absent.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given catalog file does not exist
/// - The catalog file cannot be read or parsed
/// - The catalog fails validation
pub fn load_catalog(path: Option<PathBuf>) -> Result<RuleCatalog> {
    let (catalog, source) = read_catalog(path)?;

    let Some(catalog_path) = source else {
        check_catalog(&catalog)?;
        return Ok(catalog);
    };

    check_catalog(&catalog)
        .with_context(|| format!("Invalid catalog at {}", catalog_path.display()))?;

    info!(
        path = %catalog_path.display(),
        version = %catalog.version,
        categories = catalog.categories.len(),
        rules = catalog.rule_count(),
        "catalog loaded"
    );

    Ok(catalog)
}
