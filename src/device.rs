//! Read-only snapshot of a Tuya device as seen by the host integration.
//! Holds the reported status map and the per-code status range descriptors.

use crate::dptype::StatusRange;
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A Tuya device: identity, product category, current DP values and their descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Tuya product category (e.g. "dbl", "ggq").
    #[serde(default)]
    pub category: String,
    /// Current values keyed by DP code.
    #[serde(default)]
    pub status: HashMap<String, Value>,
    /// Status range descriptors keyed by DP code.
    #[serde(default, deserialize_with = "deserialize_status_range")]
    pub status_range: HashMap<String, StatusRange>,
}

/// Accepts status ranges either keyed by code or as a list of descriptors.
fn deserialize_status_range<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, StatusRange>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ranges {
        Map(HashMap<String, StatusRange>),
        List(Vec<StatusRange>),
    }

    Ok(match Ranges::deserialize(deserializer)? {
        Ranges::Map(map) => map,
        Ranges::List(list) => list.into_iter().map(|sr| (sr.code.clone(), sr)).collect(),
    })
}

impl Device {
    pub fn new<I, C>(id: I, category: C) -> Self
    where
        I: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    /// Parses a device snapshot from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds a status range descriptor, replacing any previous one for the same code.
    pub fn with_status_range(mut self, status_range: StatusRange) -> Self {
        self.status_range
            .insert(status_range.code.clone(), status_range);
        self
    }

    /// Sets the current value of a DP code.
    pub fn with_status<C: Into<String>>(mut self, code: C, value: Value) -> Self {
        self.status.insert(code.into(), value);
        self
    }

    pub fn status_value(&self, dpcode: &str) -> Option<&Value> {
        self.status.get(dpcode).filter(|v| !v.is_null())
    }

    pub fn status_range(&self, dpcode: &str) -> Option<&StatusRange> {
        self.status_range.get(dpcode)
    }
}
