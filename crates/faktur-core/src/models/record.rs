//! Extracted records and the per-document bundles that carry them.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::invoice::rules::PLACEHOLDER;

/// Output column holding the name a document was uploaded with.
pub const ORIGINAL_NAME: &str = "OriginalName";

/// Field name to value mapping, in catalog declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    fields: Vec<(String, String)>,
}

impl ExtractedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, keeping its original position if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of fields holding the placeholder.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| *v == PLACEHOLDER)
            .map(|(n, _)| n)
            .collect()
    }

    /// True when no field could be extracted at all.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, v)| v == PLACEHOLDER)
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One input document: its name, raw bytes and rendered text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub original_name: String,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl SourceDocument {
    pub fn new(original_name: impl Into<String>, bytes: Vec<u8>, text: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes,
            text: text.into(),
        }
    }
}

/// An extracted record paired with the document it came from.
#[derive(Debug, Clone)]
pub struct DocumentBundle {
    /// Name the document was uploaded with.
    pub original_name: String,
    /// Raw document content, passed through untouched.
    pub bytes: Vec<u8>,
    pub record: ExtractedRecord,
}
