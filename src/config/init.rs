use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::ensure_parent_dir;
use crate::scoring::RuleCatalog;

const CATALOG_HEADER: &str = "\
# seo-health rule catalog
#
# severityWeights split each category's maxPoints between its rules.
# statusScores is the share of a rule's points awarded per status.
# Operators: equals, gt, gte, lt, lte, between [min, max], outside [min, max]
";

/// Render a catalog as commented YAML.
pub fn render_catalog_yaml(catalog: &RuleCatalog) -> Result<String> {
    let body = serde_saphyr::to_string(catalog).context("Failed to serialize catalog")?;
    Ok(format!("{}\n{}", CATALOG_HEADER, body))
}

/// Write the built-in catalog to `path` atomically.
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_catalog(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Catalog already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    ensure_parent_dir(path)?;

    let yaml = render_catalog_yaml(&RuleCatalog::default())?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(yaml.as_bytes())
        .context("Failed to write catalog")?;

    file.commit().context("Failed to save catalog")?;

    Ok(())
}
