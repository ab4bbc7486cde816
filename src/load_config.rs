use crate::config::{default_categories, validate_category_name, CategorySpec, CombineConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    source_root: Option<PathBuf>,
    #[serde(default)]
    public_root: Option<PathBuf>,
    #[serde(default)]
    categories: Option<Vec<CategorySpec>>,
}

/// Loads a YAML layout file. Every field is optional and falls back to the
/// built-in layout; an explicit `root` argument wins over the file's `root`.
pub fn load_config<P: AsRef<Path>>(path: P, root: Option<PathBuf>) -> Result<CombineConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e)
    })?;

    let static_conf: StaticConfig = serde_yaml::from_str(&config_content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML: {e}")
    })?;

    let defaults = CombineConfig::default();
    let categories = static_conf.categories.unwrap_or_else(default_categories);
    validate_categories(&categories)
        .with_context(|| format!("Invalid categories in {}", path_ref.display()))?;

    let config = CombineConfig {
        root: root.or(static_conf.root).unwrap_or(defaults.root),
        source_root: static_conf.source_root.unwrap_or(defaults.source_root),
        public_root: static_conf.public_root.unwrap_or(defaults.public_root),
        categories,
    };

    info!(
        root = %config.root.display(),
        categories_count = config.categories.len(),
        "Config loaded and merged successfully"
    );
    Ok(config)
}

fn validate_categories(categories: &[CategorySpec]) -> Result<()> {
    if categories.is_empty() {
        anyhow::bail!("categories must not be empty");
    }
    let mut seen = HashSet::new();
    for category in categories {
        let name = category.name.as_str();
        validate_category_name(name)?;
        if !seen.insert(name) {
            anyhow::bail!("category {name:?} is listed more than once");
        }
    }
    Ok(())
}
