//! Parsing, normalization and first-wins merging of category source files.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::CategorySpec;
use crate::contract::{ErrorRecord, SourceShape};

/// The parsed top-level value of one source file.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Single(Value),
    Many(Vec<Value>),
}

impl SourceRecord {
    /// Arrays always become `Many` and anything else `Single`, whatever the
    /// category declares; a mismatch is tolerated, not reported.
    pub fn normalize(value: Value, declared: SourceShape) -> Self {
        match value {
            Value::Array(items) => {
                if !declared.is_array() {
                    debug!("Array-shaped file in object-shaped category");
                }
                SourceRecord::Many(items)
            }
            other => {
                if declared.is_array() {
                    debug!("Single object in array-shaped category");
                }
                SourceRecord::Single(other)
            }
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            SourceRecord::Single(value) => vec![value],
            SourceRecord::Many(values) => values,
        }
    }
}

/// Key under which `item` is stored, or `None` when it has no usable `id`.
///
/// Strings are used verbatim; numbers, booleans and `null` use their JSON
/// text, which is what they become as object keys. Arrays and objects are
/// rejected.
pub fn item_key(item: &Value) -> Option<String> {
    match item.as_object()?.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Items of one category keyed by id, in insertion order.
///
/// An id is never overwritten once inserted. The file that contributed each id
/// is remembered for duplicate diagnostics but never stored in the item.
#[derive(Debug, Default, Clone)]
pub struct CombinedCollection {
    items: Map<String, Value>,
    origins: HashMap<String, String>,
}

impl CombinedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.items.get(id)
    }

    /// Source file that first introduced `id`.
    pub fn origin(&self, id: &str) -> Option<&str> {
        self.origins.get(id).map(String::as_str)
    }

    pub fn items(&self) -> &Map<String, Value> {
        &self.items
    }

    /// Inserts `item` unless `id` is already present, in which case the file
    /// that holds the existing entry is returned and nothing changes.
    pub fn insert(&mut self, id: String, item: Value, file: &str) -> Result<(), String> {
        if let Some(first) = self.origins.get(&id) {
            return Err(first.clone());
        }
        self.origins.insert(id.clone(), file.to_string());
        self.items.insert(id, item);
        Ok(())
    }

    pub fn into_items(self) -> Map<String, Value> {
        self.items
    }
}

/// What a merge over a category's files produced.
#[derive(Debug, Default)]
pub struct MergeResult {
    pub collection: CombinedCollection,
    pub errors: Vec<ErrorRecord>,
}

/// Merges `files` in the given order. Failures are recorded, never raised.
pub fn merge_sources(category: &CategorySpec, files: &[PathBuf]) -> MergeResult {
    let mut result = MergeResult::default();
    for path in files {
        merge_file(category, path, &mut result);
    }
    info!(
        category = %category.name,
        items = result.collection.len(),
        errors = result.errors.len(),
        "Merged category sources"
    );
    result
}

fn merge_file(category: &CategorySpec, path: &Path, result: &mut MergeResult) {
    let file = display_name(path);

    let record = match read_record(path, &file, category.shape()) {
        Ok(record) => record,
        Err(e) => {
            warn!(file = %file, error = %e, "Skipping source file");
            result.errors.push(e);
            return;
        }
    };

    for item in record.into_items() {
        let Some(id) = item_key(&item) else {
            debug!(file = %file, "Item without usable id");
            result.errors.push(ErrorRecord::InvalidItem { file: file.clone() });
            continue;
        };
        if let Err(first_file) = result.collection.insert(id.clone(), item, &file) {
            debug!(file = %file, id = %id, first_file = %first_file, "Duplicate id skipped");
            result.errors.push(ErrorRecord::DuplicateId {
                file: file.clone(),
                kind: category.singular().to_string(),
                id,
                first_file,
            });
        }
    }
}

fn read_record(path: &Path, file: &str, shape: SourceShape) -> Result<SourceRecord, ErrorRecord> {
    let content = fs::read_to_string(path).map_err(|e| ErrorRecord::Unreadable {
        file: file.to_string(),
        detail: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| ErrorRecord::InvalidJson {
        file: file.to_string(),
        detail: e.to_string(),
    })?;
    Ok(SourceRecord::normalize(value, shape))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
