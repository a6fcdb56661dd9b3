//! Read-only category/property lookups backed by the schema document.
//!
//! The registry never mutates and never fails: unknown categories fall back
//! to conservative defaults and `validate_properties` reports violations
//! instead of erroring, leaving fatality decisions to callers.

use super::types::{
    CategoryDefinition, PropertyKind, PropertyRule, PropertyViolation, SchemaDocument,
};
use crate::constants::{MAX_STACK_SIZE, RARITY_MAX, RARITY_MIN};
use crate::errors::InventoryError;
use crate::inventory::types::{EquipSlot, InventoryItem, ItemCategory};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    max_stack_size: u32,
    categories: BTreeMap<ItemCategory, CategoryDefinition>,
    properties: BTreeMap<ItemCategory, Vec<PropertyRule>>,
}

impl SchemaRegistry {
    /// Builds a registry from a loaded schema document.
    pub fn from_document(doc: SchemaDocument) -> Self {
        let categories = doc
            .categories
            .into_iter()
            .map(|def| (def.id, def))
            .collect();
        Self {
            max_stack_size: doc.max_stack_size,
            categories,
            properties: doc.properties,
        }
    }

    /// Parses a schema document from its JSON source.
    pub fn from_json(json: &str) -> Result<Self, InventoryError> {
        let doc: SchemaDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(doc))
    }

    /// Built-in definitions for the standard fishing-game categories, used
    /// when the host supplies no schema document of its own.
    pub fn default_schema() -> Self {
        let def = |id, stackable, category_limit, max_equipped, equip_slot| CategoryDefinition {
            id,
            stackable,
            category_limit,
            max_equipped,
            equip_slot,
        };
        let categories = vec![
            def(ItemCategory::Rod, false, 20, 1, Some(EquipSlot::Rod)),
            def(ItemCategory::Reel, false, 20, 1, Some(EquipSlot::Reel)),
            def(ItemCategory::Lure, true, 40, 1, Some(EquipSlot::Lure)),
            def(ItemCategory::Line, true, 30, 1, Some(EquipSlot::Line)),
            def(ItemCategory::Bait, true, 40, 1, Some(EquipSlot::Bait)),
            // Clothing items carry their own sub-slot (head/upper/lower)
            def(ItemCategory::Clothing, false, 30, 3, None),
            def(ItemCategory::Consumable, true, 50, 0, None),
            def(ItemCategory::Material, true, 100, 0, None),
        ];
        Self::from_document(SchemaDocument {
            version: 1,
            max_stack_size: MAX_STACK_SIZE,
            categories,
            properties: BTreeMap::new(),
        })
    }

    pub fn category_limit(&self, category: ItemCategory) -> usize {
        self.categories
            .get(&category)
            .map(|def| def.category_limit)
            .unwrap_or(0)
    }

    pub fn is_stackable(&self, category: ItemCategory) -> bool {
        self.categories
            .get(&category)
            .map(|def| def.stackable)
            .unwrap_or(false)
    }

    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    pub fn max_equipped(&self, category: ItemCategory) -> u32 {
        self.categories
            .get(&category)
            .map(|def| def.max_equipped)
            .unwrap_or(0)
    }

    pub fn equip_slot(&self, category: ItemCategory) -> Option<EquipSlot> {
        self.categories.get(&category).and_then(|def| def.equip_slot)
    }

    /// Checks an item against the intrinsic field rules and the declared
    /// metadata properties of its category. Returns every violation found;
    /// an empty list means the item is clean.
    pub fn validate_properties(&self, item: &InventoryItem) -> Vec<PropertyViolation> {
        let mut violations = Vec::new();

        if item.rarity < RARITY_MIN || item.rarity > RARITY_MAX {
            violations.push(PropertyViolation::new(
                "rarity",
                format!(
                    "rarity {} outside [{RARITY_MIN}, {RARITY_MAX}]",
                    item.rarity
                ),
            ));
        }
        if item.quantity == 0 {
            violations.push(PropertyViolation::new("quantity", "quantity must be >= 1"));
        }
        if let (Some(condition), Some(durability)) = (item.condition, item.durability) {
            if condition > durability {
                violations.push(PropertyViolation::new(
                    "condition",
                    format!("condition {condition} exceeds durability {durability}"),
                ));
            }
        }

        let Some(rules) = self.properties.get(&item.category) else {
            return violations;
        };
        for rule in rules {
            match item.metadata.get(&rule.field) {
                None => {
                    if rule.required {
                        violations
                            .push(PropertyViolation::new(&rule.field, "required field missing"));
                    }
                }
                Some(value) => Self::check_value(rule, value, &mut violations),
            }
        }
        violations
    }

    fn check_value(
        rule: &PropertyRule,
        value: &serde_json::Value,
        violations: &mut Vec<PropertyViolation>,
    ) {
        let type_ok = match rule.kind {
            PropertyKind::String => value.is_string(),
            PropertyKind::Integer => value.is_i64() || value.is_u64(),
            PropertyKind::Boolean => value.is_boolean(),
            PropertyKind::Object => value.is_object(),
            PropertyKind::Array => value.is_array(),
        };
        if !type_ok {
            violations.push(PropertyViolation::new(
                &rule.field,
                format!("expected {:?} value", rule.kind),
            ));
            return;
        }
        if rule.kind == PropertyKind::Integer {
            if let Some(n) = value.as_i64() {
                if let Some(min) = rule.min {
                    if n < min {
                        violations.push(PropertyViolation::new(
                            &rule.field,
                            format!("{n} below minimum {min}"),
                        ));
                    }
                }
                if let Some(max) = rule.max {
                    if n > max {
                        violations.push(PropertyViolation::new(
                            &rule.field,
                            format!("{n} above maximum {max}"),
                        ));
                    }
                }
            }
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::default_schema()
    }
}
