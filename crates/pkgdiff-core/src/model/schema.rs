//! Dictionary (schema) document model.
//!
//! A dictionary file is a single JSON object mapping field name to a
//! descriptor. Only the declared `type` takes part in comparison; any other
//! descriptor keys are retained verbatim in [`FieldDescriptor::extra`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field definitions of one record category, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    fields: BTreeMap<String, FieldDescriptor>,
}

/// Declared shape of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FieldDescriptor {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl SchemaDocument {
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDescriptor)> for SchemaDocument {
    fn from_iter<I: IntoIterator<Item = (K, FieldDescriptor)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
