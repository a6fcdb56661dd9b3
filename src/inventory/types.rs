use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inventory categories. Each category owns one collection in the store and
/// maps to one [`CategoryDefinition`](crate::schema::types::CategoryDefinition)
/// in the schema registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Rod,
    Reel,
    Lure,
    Line,
    Bait,
    Clothing,
    Consumable,
    Material,
}

impl ItemCategory {
    pub fn all() -> [ItemCategory; 8] {
        [
            ItemCategory::Rod,
            ItemCategory::Reel,
            ItemCategory::Lure,
            ItemCategory::Line,
            ItemCategory::Bait,
            ItemCategory::Clothing,
            ItemCategory::Consumable,
            ItemCategory::Material,
        ]
    }

    /// Returns the display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            ItemCategory::Rod => "Rods",
            ItemCategory::Reel => "Reels",
            ItemCategory::Lure => "Lures",
            ItemCategory::Line => "Lines",
            ItemCategory::Bait => "Bait",
            ItemCategory::Clothing => "Clothing",
            ItemCategory::Consumable => "Consumables",
            ItemCategory::Material => "Materials",
        }
    }

    /// Maps a recipe result/ingredient kind to its inventory category.
    ///
    /// Legacy recipe data keys results by singular kind strings rather than
    /// category names, so both spellings are accepted.
    pub fn from_kind(kind: &str) -> Option<ItemCategory> {
        match kind {
            "rod" | "rods" => Some(ItemCategory::Rod),
            "reel" | "reels" => Some(ItemCategory::Reel),
            "lure" | "lures" => Some(ItemCategory::Lure),
            "line" | "lines" => Some(ItemCategory::Line),
            "bait" | "baits" => Some(ItemCategory::Bait),
            "clothing" | "clothes" => Some(ItemCategory::Clothing),
            "consumable" | "consumables" => Some(ItemCategory::Consumable),
            "material" | "materials" | "fish" => Some(ItemCategory::Material),
            _ => None,
        }
    }
}

/// Named attachment points for equipped items.
///
/// Most categories map 1:1 to a slot; clothing subdivides into three
/// sub-slots that coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Rod,
    Reel,
    Lure,
    Line,
    Bait,
    Head,
    UpperBody,
    LowerBody,
}

/// Sort keys accepted by [`InventoryStore::sort_items`](crate::inventory::store::InventoryStore::sort_items).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Rarity,
    Quantity,
    Cost,
}

/// A concrete item held in the inventory.
///
/// `id` is unique within the store; `definition_id` identifies the item kind
/// and is the merge key for stackable categories. Category-specific extras
/// live in `metadata` and are validated against the schema registry's
/// property rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub definition_id: String,
    pub category: ItemCategory,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rarity: u8,
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub equip_slot: Option<EquipSlot>,
    #[serde(default)]
    pub durability: Option<u32>,
    #[serde(default)]
    pub condition: Option<u32>,
    #[serde(default)]
    pub cost: u64,
    #[serde(default)]
    pub unlock_level: u32,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl InventoryItem {
    /// Sets condition, clamped to `[0, durability]`. No-op for items
    /// without durability.
    pub fn set_condition(&mut self, value: u32) {
        if let Some(durability) = self.durability {
            self.condition = Some(value.min(durability));
        }
    }

    /// Alternate id some legacy data rows carry in metadata.
    pub fn alt_id(&self) -> Option<&str> {
        self.metadata.get("alt_id").and_then(|v| v.as_str())
    }
}

/// Input to [`InventoryStore::add_item`](crate::inventory::store::InventoryStore::add_item).
///
/// Optional fields are defaulted during validation; `id` and `name` are
/// mandatory and must not be legacy placeholder values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDraft {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub definition_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rarity: Option<u8>,
    #[serde(default)]
    pub equip_slot: Option<EquipSlot>,
    #[serde(default)]
    pub durability: Option<u32>,
    #[serde(default)]
    pub condition: Option<u32>,
    #[serde(default)]
    pub cost: u64,
    #[serde(default)]
    pub unlock_level: u32,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ItemDraft {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn rarity(mut self, rarity: u8) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn cost(mut self, cost: u64) -> Self {
        self.cost = cost;
        self
    }

    pub fn unlock_level(mut self, level: u32) -> Self {
        self.unlock_level = level;
        self
    }

    pub fn equip_slot(mut self, slot: EquipSlot) -> Self {
        self.equip_slot = Some(slot);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_kind_mapping() {
        assert_eq!(ItemCategory::from_kind("lure"), Some(ItemCategory::Lure));
        assert_eq!(ItemCategory::from_kind("lures"), Some(ItemCategory::Lure));
        assert_eq!(ItemCategory::from_kind("fish"), Some(ItemCategory::Material));
        assert_eq!(ItemCategory::from_kind("unknown"), None);
    }

    #[test]
    fn test_set_condition_clamps_to_durability() {
        let mut item = InventoryItem {
            id: "rod_1".to_string(),
            definition_id: "rod_1".to_string(),
            category: ItemCategory::Rod,
            name: "Bamboo Rod".to_string(),
            description: String::new(),
            rarity: 1,
            quantity: 1,
            equipped: false,
            equip_slot: None,
            durability: Some(100),
            condition: Some(100),
            cost: 0,
            unlock_level: 0,
            metadata: BTreeMap::new(),
        };
        item.set_condition(250);
        assert_eq!(item.condition, Some(100));
        item.set_condition(40);
        assert_eq!(item.condition, Some(40));
    }

    #[test]
    fn test_set_condition_noop_without_durability() {
        let mut item = InventoryItem {
            id: "worm".to_string(),
            definition_id: "worm".to_string(),
            category: ItemCategory::Bait,
            name: "Worm".to_string(),
            description: String::new(),
            rarity: 1,
            quantity: 3,
            equipped: false,
            equip_slot: None,
            durability: None,
            condition: None,
            cost: 0,
            unlock_level: 0,
            metadata: BTreeMap::new(),
        };
        item.set_condition(10);
        assert_eq!(item.condition, None);
    }

    #[test]
    fn test_alt_id_reads_metadata() {
        let mut item = InventoryItem {
            id: "spoon_1".to_string(),
            definition_id: "spoon_1".to_string(),
            category: ItemCategory::Lure,
            name: "Spoon".to_string(),
            description: String::new(),
            rarity: 2,
            quantity: 1,
            equipped: false,
            equip_slot: None,
            durability: None,
            condition: None,
            cost: 0,
            unlock_level: 0,
            metadata: BTreeMap::new(),
        };
        assert_eq!(item.alt_id(), None);
        item.metadata.insert(
            "alt_id".to_string(),
            serde_json::Value::String("lure_spoon".to_string()),
        );
        assert_eq!(item.alt_id(), Some("lure_spoon"));
    }
}
