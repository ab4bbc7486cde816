//! The versioned document written for each category.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::config::ENVELOPE_VERSION;

/// `{ "version", "total_<category>", "<category>" }`, in that key order.
#[derive(Debug, Clone, Copy)]
pub struct OutputEnvelope<'a> {
    category: &'a str,
    items: &'a Map<String, Value>,
}

impl<'a> OutputEnvelope<'a> {
    pub fn new(category: &'a str, items: &'a Map<String, Value>) -> Self {
        Self { category, items }
    }

    pub fn total_key(&self) -> String {
        format!("total_{}", self.category)
    }

    /// Two-space indented JSON with non-ASCII text left unescaped and no
    /// trailing newline. Identical input yields identical bytes.
    pub fn to_pretty_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}

impl Serialize for OutputEnvelope<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("version", ENVELOPE_VERSION)?;
        map.serialize_entry(&self.total_key(), &self.items.len())?;
        map.serialize_entry(self.category, self.items)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_keys_are_ordered_and_counted() {
        let mut items = Map::new();
        items.insert("sword".into(), json!({"id": "sword", "value": 10}));
        let bytes = OutputEnvelope::new("items", &items).to_pretty_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let version = text.find("\"version\"").unwrap();
        let total = text.find("\"total_items\"").unwrap();
        let body = text.find("\"items\"").unwrap();
        assert!(version < total && total < body);

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({"version": "1.0.0", "total_items": 1, "items": {"sword": {"id": "sword", "value": 10}}})
        );
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let mut items = Map::new();
        items.insert("épée".into(), json!({"id": "épée", "name": "剣"}));
        let bytes = OutputEnvelope::new("items", &items).to_pretty_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"name\": \"剣\""));
        assert!(!text.contains("\\u"));
        assert!(text.starts_with("{\n  \"version\": \"1.0.0\","));
        assert!(!text.ends_with('\n'));
    }
}
