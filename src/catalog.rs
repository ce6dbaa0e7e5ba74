//! Catalog items and JSON loading.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArError, Result};

/// Opaque item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry backed by a 3D asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Primary GLB asset.
    pub model_path: String,
    /// USDZ asset for Quick Look. Derived from `model_path` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios_model_path: Option<String>,
    #[serde(default)]
    pub image_path: String,
}

impl Item {
    pub fn new(id: u64, name: &str, model_path: &str) -> Self {
        Self {
            id: ItemId(id),
            name: name.to_string(),
            model_path: model_path.to_string(),
            ios_model_path: None,
            image_path: String::new(),
        }
    }

    pub fn with_ios_model(mut self, path: &str) -> Self {
        self.ios_model_path = Some(path.to_string());
        self
    }

    pub fn with_image(mut self, path: &str) -> Self {
        self.image_path = path.to_string();
        self
    }
}

/// Ordered, validated list of items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Validate and wrap a list of items. Order is kept as given.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.model_path.trim().is_empty() {
                return Err(ArError::Catalog(format!(
                    "item {} ({}) has an empty modelPath",
                    item.id, item.name
                )));
            }
            if !seen.insert(item.id) {
                return Err(ArError::Catalog(format!("duplicate item id {}", item.id)));
            }
        }
        Ok(Self { items })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<Item> =
            serde_json::from_str(json).map_err(|e| ArError::Catalog(e.to_string()))?;
        Self::new(items)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ArError::Catalog(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&json)?;
        log::info!("Loaded {} items from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Items in catalog order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for a catalog with no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_catalog() {
        let json = r#"[
            {"id": 1, "name": "Pizza", "modelPath": "/models/pizza.glb", "imagePath": "/images/pizza.jpg"},
            {"id": 2, "name": "Sushi", "modelPath": "/models/sushi.glb", "iosModelPath": "/models/sushi-ar.usdz"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].name, "Pizza");
        assert_eq!(catalog.items()[0].ios_model_path, None);
        assert_eq!(
            catalog.get(ItemId(2)).unwrap().ios_model_path.as_deref(),
            Some("/models/sushi-ar.usdz")
        );
        assert_eq!(catalog.items()[1].image_path, "");
    }

    #[test]
    fn rejects_empty_model_path() {
        let err = Catalog::new(vec![Item::new(3, "Soup", "  ")]).unwrap_err();
        assert!(matches!(err, ArError::Catalog(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let items = vec![
            Item::new(1, "A", "/a.glb"),
            Item::new(1, "B", "/b.glb"),
        ];
        assert!(Catalog::new(items).is_err());
    }

    #[test]
    fn malformed_json_is_a_catalog_error() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, ArError::Catalog(_)));
    }
}
