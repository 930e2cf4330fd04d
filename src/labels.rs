//! Label table extraction from BITMAP status range metadata.

use crate::bitmap;
use crate::dptype::metadata_object;
use log::debug;
use serde_json::Value;

const KEY_LABEL: &str = "label";

/// Ordered flag labels of a BITMAP data point; index is the bit position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the table from vendor metadata. Never fails: unusable metadata gives an empty table.
    pub fn from_metadata(metadata: &Value) -> Self {
        Self {
            labels: extract_labels(metadata),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for a bit position, if the table covers it.
    pub fn get(&self, bit: usize) -> Option<&str> {
        self.labels.get(bit).map(String::as_str)
    }

    /// Decodes a bitmask against this table.
    pub fn decode(&self, value: u64) -> String {
        bitmap::decode(value, &self.labels)
    }

    /// Decodes a raw status value (number or numeric string) against this table.
    pub fn decode_value(&self, raw: &Value) -> Option<String> {
        bitmap::decode_value(raw, &self.labels)
    }
}

/// Extracts the `label` array from metadata given as an object or a JSON-encoded string.
///
/// String elements are kept as-is, anything else uses its compact JSON text.
pub fn extract_labels(metadata: &Value) -> Vec<String> {
    let Some(object) = metadata_object(metadata) else {
        debug!("Bitmap metadata is not a JSON object, using empty label table");
        return Vec::new();
    };

    match object.get(KEY_LABEL) {
        Some(items) => coerce_labels(items),
        None => Vec::new(),
    }
}

/// Converts a label list (JSON array) to strings, the same way [`extract_labels`] does.
/// Anything other than an array yields an empty list.
pub fn coerce_labels(items: &Value) -> Vec<String> {
    let Value::Array(items) = items else {
        debug!("Bitmap label list is not an array, using empty label table");
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}
