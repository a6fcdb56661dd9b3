//! Equip/unequip rules layered on top of the inventory store.
//!
//! Exclusivity rules by category shape:
//! - `max_equipped == 1`, shared slot: equipping displaces every other
//!   equipped item in the category.
//! - items with their own sub-slot (clothing): equipping displaces only the
//!   occupant of the same sub-slot; distinct sub-slots coexist.
//! - `max_equipped == N > 1`, no sub-slot: equipping is rejected once N
//!   items are equipped, unless the target is already one of them.

use crate::errors::InventoryError;
use crate::events::InventoryEvent;
use crate::inventory::store::InventoryStore;
use crate::inventory::types::ItemCategory;
use tracing::warn;

impl InventoryStore {
    pub fn equip_item(
        &mut self,
        category: ItemCategory,
        id: &str,
        player_level: u32,
    ) -> Result<(), InventoryError> {
        let max_equipped = self.schema.max_equipped(category);
        if max_equipped == 0 {
            return Err(InventoryError::IllegalState(format!(
                "category {category:?} is not equippable"
            )));
        }
        let entries = self
            .items
            .get_mut(&category)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        let index = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        if entries[index].equipped {
            return Ok(());
        }
        let unlock_level = entries[index].unlock_level;
        if player_level < unlock_level {
            return Err(InventoryError::IllegalState(format!(
                "item '{id}' requires level {unlock_level} (player is {player_level})"
            )));
        }
        let target_slot = entries[index].equip_slot;
        let slot_scoped = max_equipped > 1 && target_slot.is_some();

        let mut displaced = Vec::new();
        if max_equipped == 1 {
            for entry in entries.iter_mut().filter(|entry| entry.equipped) {
                entry.equipped = false;
                displaced.push(entry.id.clone());
            }
        } else if slot_scoped {
            for entry in entries
                .iter_mut()
                .filter(|entry| entry.equipped && entry.equip_slot == target_slot)
            {
                entry.equipped = false;
                displaced.push(entry.id.clone());
            }
        } else {
            let equipped = entries.iter().filter(|entry| entry.equipped).count();
            if equipped as u32 >= max_equipped {
                return Err(InventoryError::IllegalState(format!(
                    "category {category:?} already has {equipped} of {max_equipped} items equipped"
                )));
            }
        }

        entries[index].equipped = true;

        self.touch();
        for item_id in displaced {
            self.emit(InventoryEvent::ItemUnequipped { category, item_id });
        }
        self.emit(InventoryEvent::ItemEquipped {
            category,
            item_id: id.to_string(),
            slot: target_slot,
        });
        Ok(())
    }

    /// Clears the equipped flag. Unequipping an item that is not equipped is
    /// a warned no-op rather than an error.
    pub fn unequip_item(&mut self, category: ItemCategory, id: &str) -> Result<(), InventoryError> {
        let entries = self
            .items
            .get_mut(&category)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        let item = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        if !item.equipped {
            warn!(item = id, ?category, "unequip requested for an item that is not equipped");
            return Ok(());
        }
        item.equipped = false;
        self.touch();
        self.emit(InventoryEvent::ItemUnequipped {
            category,
            item_id: id.to_string(),
        });
        Ok(())
    }

    /// Currently equipped items in a category, in storage order.
    pub fn equipped_items(&self, category: ItemCategory) -> Vec<&crate::inventory::types::InventoryItem> {
        self.items_in(category)
            .iter()
            .filter(|entry| entry.equipped)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::types::{EquipSlot, ItemDraft};

    fn store_with_rods() -> InventoryStore {
        let mut store = InventoryStore::with_default_schema();
        for (id, name) in [("rod_1", "Bamboo Rod"), ("rod_2", "Carbon Rod")] {
            store
                .add_item(ItemCategory::Rod, ItemDraft::new(id, name), 1)
                .unwrap();
        }
        store
    }

    #[test]
    fn test_single_slot_category_displaces_previous() {
        let mut store = store_with_rods();
        store.equip_item(ItemCategory::Rod, "rod_1", 1).unwrap();
        store.equip_item(ItemCategory::Rod, "rod_2", 1).unwrap();

        assert!(!store.find_item(ItemCategory::Rod, "rod_1").unwrap().equipped);
        assert!(store.find_item(ItemCategory::Rod, "rod_2").unwrap().equipped);
        assert_eq!(store.equipped_items(ItemCategory::Rod).len(), 1);
    }

    #[test]
    fn test_equip_already_equipped_is_noop() {
        let mut store = store_with_rods();
        store.equip_item(ItemCategory::Rod, "rod_1", 1).unwrap();
        store.equip_item(ItemCategory::Rod, "rod_1", 1).unwrap();
        assert_eq!(store.equipped_items(ItemCategory::Rod).len(), 1);
    }

    #[test]
    fn test_unequippable_category_rejected() {
        let mut store = InventoryStore::with_default_schema();
        store
            .add_item(ItemCategory::Material, ItemDraft::new("scrap", "Scrap"), 1)
            .unwrap();
        let result = store.equip_item(ItemCategory::Material, "scrap", 99);
        assert!(matches!(result, Err(InventoryError::IllegalState(_))));
    }

    #[test]
    fn test_unlock_level_gate() {
        let mut store = InventoryStore::with_default_schema();
        store
            .add_item(
                ItemCategory::Rod,
                ItemDraft::new("rod_pro", "Pro Rod").unlock_level(10),
                1,
            )
            .unwrap();
        assert!(matches!(
            store.equip_item(ItemCategory::Rod, "rod_pro", 9),
            Err(InventoryError::IllegalState(_))
        ));
        store.equip_item(ItemCategory::Rod, "rod_pro", 10).unwrap();
    }

    #[test]
    fn test_clothing_sub_slots_coexist() {
        let mut store = InventoryStore::with_default_schema();
        for (id, name, slot) in [
            ("cap", "Cap", EquipSlot::Head),
            ("vest", "Vest", EquipSlot::UpperBody),
            ("waders", "Waders", EquipSlot::LowerBody),
        ] {
            store
                .add_item(
                    ItemCategory::Clothing,
                    ItemDraft::new(id, name).equip_slot(slot),
                    1,
                )
                .unwrap();
            store.equip_item(ItemCategory::Clothing, id, 1).unwrap();
        }
        assert_eq!(store.equipped_items(ItemCategory::Clothing).len(), 3);
    }

    #[test]
    fn test_clothing_same_sub_slot_displaces() {
        let mut store = InventoryStore::with_default_schema();
        for (id, name) in [("cap", "Cap"), ("beanie", "Beanie")] {
            store
                .add_item(
                    ItemCategory::Clothing,
                    ItemDraft::new(id, name).equip_slot(EquipSlot::Head),
                    1,
                )
                .unwrap();
        }
        store.equip_item(ItemCategory::Clothing, "cap", 1).unwrap();
        store.equip_item(ItemCategory::Clothing, "beanie", 1).unwrap();

        assert!(!store.find_item(ItemCategory::Clothing, "cap").unwrap().equipped);
        assert!(store.find_item(ItemCategory::Clothing, "beanie").unwrap().equipped);
    }

    #[test]
    fn test_unequip_non_equipped_is_warned_noop() {
        let mut store = store_with_rods();
        assert!(store.unequip_item(ItemCategory::Rod, "rod_1").is_ok());
        assert!(matches!(
            store.unequip_item(ItemCategory::Rod, "ghost"),
            Err(InventoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_unequip_clears_flag_and_emits() {
        let mut store = store_with_rods();
        store.equip_item(ItemCategory::Rod, "rod_1", 1).unwrap();

        let unequips = std::rc::Rc::new(std::cell::RefCell::new(0));
        {
            let unequips = std::rc::Rc::clone(&unequips);
            store.subscribe(move |event| {
                if matches!(event, InventoryEvent::ItemUnequipped { .. }) {
                    *unequips.borrow_mut() += 1;
                }
            });
        }
        store.unequip_item(ItemCategory::Rod, "rod_1").unwrap();
        assert!(!store.find_item(ItemCategory::Rod, "rod_1").unwrap().equipped);
        assert_eq!(*unequips.borrow(), 1);
    }

    #[test]
    fn test_slot_exclusivity_holds_after_any_sequence() {
        let mut store = InventoryStore::with_default_schema();
        for i in 0..4 {
            store
                .add_item(
                    ItemCategory::Lure,
                    ItemDraft::new(&format!("lure_{i}"), &format!("Lure {i}")),
                    1,
                )
                .unwrap();
        }
        for id in ["lure_0", "lure_2", "lure_1", "lure_3", "lure_1"] {
            store.equip_item(ItemCategory::Lure, id, 1).unwrap();
        }
        assert_eq!(store.equipped_items(ItemCategory::Lure).len(), 1);
        assert!(store.find_item(ItemCategory::Lure, "lure_1").unwrap().equipped);
    }
}
