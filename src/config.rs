// content-combine/src/config.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::contract::SourceShape;

/// Version tag written into every combined document.
pub const ENVELOPE_VERSION: &str = "1.0.0";
/// Extension of source files considered for combining.
pub const SOURCE_EXTENSION: &str = "json";
/// File that lives next to source files but is never an item.
pub const MANIFEST_FILENAME: &str = "manifest.json";

pub const DEFAULT_SOURCE_ROOT: &str = "data";
pub const DEFAULT_PUBLIC_ROOT: &str = "client/public/data";

/// A named content category and the shape of its source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    /// True when each source file holds an array of items.
    #[serde(default)]
    pub array: bool,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, shape: SourceShape) -> Self {
        Self {
            name: name.into(),
            array: shape.is_array(),
        }
    }

    pub fn shape(&self) -> SourceShape {
        SourceShape::from_array_flag(self.array)
    }

    /// File name of the combined document, e.g. `items.json`.
    pub fn output_filename(&self) -> String {
        format!("{}.{}", self.name, SOURCE_EXTENSION)
    }

    /// Singular noun used in diagnostics: the name minus its last character.
    pub fn singular(&self) -> &str {
        match self.name.char_indices().last() {
            Some((idx, _)) => &self.name[..idx],
            None => "",
        }
    }

    pub fn trace_loaded(&self) {
        debug!(category = %self.name, shape = self.shape().as_str(), "Loaded category");
    }
}

/// Rejects names that would not resolve to a directory of their own below
/// the source root: empty, `.`, `..`, or containing a path separator.
pub fn validate_category_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!("invalid category name {name:?}");
    }
    Ok(())
}

/// The categories combined by a batch run, in order.
pub fn default_categories() -> Vec<CategorySpec> {
    [
        ("classes", SourceShape::Object),
        ("monsters", SourceShape::Object),
        ("skills", SourceShape::Object),
        ("dungeons", SourceShape::Object),
        ("quests", SourceShape::Object),
        ("mercenaries", SourceShape::Object),
        ("upgrades", SourceShape::Object),
        ("achievements", SourceShape::Array),
        ("items", SourceShape::Object),
    ]
    .into_iter()
    .map(|(name, shape)| CategorySpec::new(name, shape))
    .collect()
}

/// Directory layout and category list for a combine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineConfig {
    /// Project root; `source_root` and `public_root` are resolved against it.
    pub root: PathBuf,
    pub source_root: PathBuf,
    pub public_root: PathBuf,
    pub categories: Vec<CategorySpec>,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            public_root: PathBuf::from(DEFAULT_PUBLIC_ROOT),
            categories: default_categories(),
        }
    }
}

impl CombineConfig {
    /// Default layout rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Directory holding the hand-authored files of `category`.
    pub fn source_dir(&self, category: &str) -> PathBuf {
        self.root.join(&self.source_root).join(category)
    }

    /// Distribution directory that receives a copy of the output when present.
    pub fn public_dir(&self, category: &str) -> PathBuf {
        self.root.join(&self.public_root).join(category)
    }

    pub fn category(&self, name: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category `name`, using its configured shape unless `shape` overrides it.
    /// Unknown categories default to object-shaped files.
    pub fn resolve_category(&self, name: &str, shape: Option<SourceShape>) -> CategorySpec {
        let configured = self
            .category(name)
            .map(CategorySpec::shape)
            .unwrap_or(SourceShape::Object);
        CategorySpec::new(name, shape.unwrap_or(configured))
    }

    pub fn trace_loaded(&self) {
        info!(
            root = %self.root.display(),
            source_root = %self.source_root.display(),
            public_root = %self.public_root.display(),
            categories_count = self.categories.len(),
            "Loaded CombineConfig"
        );
        for category in &self.categories {
            category.trace_loaded();
        }
    }
}

/// Path of the combined document inside `dir`.
pub fn output_path(dir: &Path, category: &CategorySpec) -> PathBuf {
    dir.join(category.output_filename())
}
