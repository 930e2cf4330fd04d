//! Entity descriptions and per-category descriptor tables.
//!
//! A description is immutable configuration: build it once with
//! [`EntityDescriptionBuilder`] or load it from JSON, then share it.

use crate::device::Device;
use crate::error::{DpError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Host entity platform a description targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Number,
    Sensor,
    Switch,
}

impl FromStr for Platform {
    type Err = DpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "number" => Ok(Platform::Number),
            "sensor" => Ok(Platform::Sensor),
            "switch" => Ok(Platform::Switch),
            _ => Err(DpError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Classification of a non-primary entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

/// Display mode of a number entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberMode {
    #[default]
    Auto,
    Box,
    Slider,
}

/// Describes one entity created for a DP code.
///
/// Defaults: no translation key, category, device class, icon or unit;
/// `mode` is [`NumberMode::Auto`]; `override_tuya` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    key: String,
    platform: Platform,
    #[serde(default)]
    translation_key: Option<String>,
    #[serde(default)]
    entity_category: Option<EntityCategory>,
    #[serde(default)]
    device_class: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    native_unit: Option<String>,
    #[serde(default)]
    mode: NumberMode,
    /// Switches only: replace the entity the stock integration would create.
    #[serde(default)]
    override_tuya: bool,
}

impl EntityDescription {
    pub fn builder<K: Into<String>>(key: K, platform: Platform) -> EntityDescriptionBuilder {
        EntityDescriptionBuilder::new(key, platform)
    }

    /// DP code this entity reads.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn translation_key(&self) -> Option<&str> {
        self.translation_key.as_deref()
    }

    pub fn entity_category(&self) -> Option<EntityCategory> {
        self.entity_category
    }

    pub fn device_class(&self) -> Option<&str> {
        self.device_class.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn native_unit(&self) -> Option<&str> {
        self.native_unit.as_deref()
    }

    pub fn mode(&self) -> NumberMode {
        self.mode
    }

    pub fn override_tuya(&self) -> bool {
        self.override_tuya
    }
}

/// Builder for [`EntityDescription`].
#[derive(Debug, Clone)]
pub struct EntityDescriptionBuilder {
    inner: EntityDescription,
}

impl EntityDescriptionBuilder {
    pub fn new<K: Into<String>>(key: K, platform: Platform) -> Self {
        Self {
            inner: EntityDescription {
                key: key.into(),
                platform,
                translation_key: None,
                entity_category: None,
                device_class: None,
                icon: None,
                native_unit: None,
                mode: NumberMode::default(),
                override_tuya: false,
            },
        }
    }

    #[must_use]
    pub fn translation_key<S: Into<String>>(mut self, key: S) -> Self {
        self.inner.translation_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn entity_category(mut self, category: EntityCategory) -> Self {
        self.inner.entity_category = Some(category);
        self
    }

    #[must_use]
    pub fn device_class<S: Into<String>>(mut self, class: S) -> Self {
        self.inner.device_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn icon<S: Into<String>>(mut self, icon: S) -> Self {
        self.inner.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn native_unit<S: Into<String>>(mut self, unit: S) -> Self {
        self.inner.native_unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: NumberMode) -> Self {
        self.inner.mode = mode;
        self
    }

    #[must_use]
    pub fn override_tuya(mut self, value: bool) -> Self {
        self.inner.override_tuya = value;
        self
    }

    pub fn build(self) -> EntityDescription {
        self.inner
    }
}

/// Entity descriptions keyed by Tuya product category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorTable {
    categories: HashMap<String, Vec<EntityDescription>>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from JSON: `{"<category>": [<description>, ...], ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_category<C, I>(mut self, category: C, descriptions: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = EntityDescription>,
    {
        self.categories
            .insert(category.into(), descriptions.into_iter().collect());
        self
    }

    /// Makes `alias` share the descriptions of `target`. Returns false if `target` is unknown.
    pub fn alias(&mut self, alias: &str, target: &str) -> bool {
        match self.categories.get(target).cloned() {
            Some(descriptions) => {
                self.categories.insert(alias.to_string(), descriptions);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, category: &str) -> Option<&[EntityDescription]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Descriptions for the device's category whose DP code the device reports.
    pub fn discover<'a>(&'a self, device: &Device) -> Vec<&'a EntityDescription> {
        let Some(descriptions) = self.get(&device.category) else {
            debug!(
                "No descriptors for category '{}' (device {})",
                device.category, device.id
            );
            return Vec::new();
        };
        descriptions
            .iter()
            .filter(|d| device.status.contains_key(d.key()))
            .collect()
    }

    /// Like [`discover`](Self::discover), restricted to one platform.
    pub fn discover_platform<'a>(
        &'a self,
        device: &Device,
        platform: Platform,
    ) -> Vec<&'a EntityDescription> {
        self.discover(device)
            .into_iter()
            .filter(|d| d.platform() == platform)
            .collect()
    }
}

/// Merges `new` into a copy of `base`.
///
/// New categories are added. Within a shared category a description replaces
/// the one with the same key, otherwise it is appended.
pub fn merge_device_descriptors(base: &DescriptorTable, new: &DescriptorTable) -> DescriptorTable {
    let mut merged = base.clone();
    for (category, descriptions) in &new.categories {
        let target = merged.categories.entry(category.clone()).or_default();
        for description in descriptions {
            match target.iter_mut().find(|d| d.key == description.key) {
                Some(existing) => *existing = description.clone(),
                None => target.push(description.clone()),
            }
        }
    }
    merged
}
