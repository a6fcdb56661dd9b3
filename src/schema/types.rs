use crate::inventory::types::{EquipSlot, ItemCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static definition of one inventory category.
///
/// Loaded once from the schema document and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: ItemCategory,
    pub stackable: bool,
    /// Maximum entries the category collection may hold.
    pub category_limit: usize,
    /// How many items of this category may be equipped at once.
    /// Zero means the category is never equippable.
    pub max_equipped: u32,
    /// Slot shared by every item of the category. `None` for categories
    /// whose items carry their own sub-slot (clothing).
    #[serde(default)]
    pub equip_slot: Option<EquipSlot>,
}

/// Declared value shape for a metadata property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    String,
    Integer,
    Boolean,
    Object,
    Array,
}

/// Validation rule for one metadata field of a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRule {
    pub field: String,
    pub kind: PropertyKind,
    #[serde(default)]
    pub required: bool,
    /// Inclusive numeric bounds, only meaningful for `Integer` properties.
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
}

/// One failed check from `validate_properties`. Never fatal by itself;
/// callers decide what to do with the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyViolation {
    pub field: String,
    pub message: String,
}

impl PropertyViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// The versioned configuration document the registry is built from.
///
/// Produced by an external data loader; this core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub version: u32,
    /// Global stack cap for stackable categories.
    pub max_stack_size: u32,
    pub categories: Vec<CategoryDefinition>,
    /// Per-category metadata property rules.
    #[serde(default)]
    pub properties: BTreeMap<ItemCategory, Vec<PropertyRule>>,
}
