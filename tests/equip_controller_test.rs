//! Integration test: Equip Controller
//!
//! Verifies slot exclusivity across arbitrary equip sequences, clothing
//! sub-slot coexistence, the multi-equip cap for categories without
//! sub-slots, and the unlock-level gate.

use std::collections::BTreeMap;
use std::collections::HashSet;

use tacklebox::schema::types::{CategoryDefinition, SchemaDocument};
use tacklebox::{
    EquipSlot, InventoryError, InventoryStore, ItemCategory, ItemDraft, SchemaRegistry,
};

fn clothing(store: &mut InventoryStore, id: &str, name: &str, slot: EquipSlot) {
    store
        .add_item(
            ItemCategory::Clothing,
            ItemDraft::new(id, name).equip_slot(slot),
            1,
        )
        .unwrap();
}

// =========================================================================
// Exclusivity property: no two equipped items share (category, slot)
// =========================================================================

#[test]
fn test_no_slot_ever_double_occupied() {
    let mut store = InventoryStore::with_default_schema();
    for i in 0..3 {
        store
            .add_item(
                ItemCategory::Rod,
                ItemDraft::new(&format!("rod_{i}"), &format!("Rod {i}")),
                1,
            )
            .unwrap();
    }
    clothing(&mut store, "cap", "Cap", EquipSlot::Head);
    clothing(&mut store, "beanie", "Beanie", EquipSlot::Head);
    clothing(&mut store, "vest", "Vest", EquipSlot::UpperBody);

    let sequence = [
        (ItemCategory::Rod, "rod_0"),
        (ItemCategory::Clothing, "cap"),
        (ItemCategory::Rod, "rod_2"),
        (ItemCategory::Clothing, "vest"),
        (ItemCategory::Clothing, "beanie"),
        (ItemCategory::Rod, "rod_1"),
        (ItemCategory::Clothing, "cap"),
    ];
    for (category, id) in sequence {
        store.equip_item(category, id, 1).unwrap();

        // Invariant must hold after every single step
        for check in [ItemCategory::Rod, ItemCategory::Clothing] {
            let mut occupied = HashSet::new();
            for item in store.equipped_items(check) {
                assert!(
                    occupied.insert(item.equip_slot),
                    "slot {:?} double-occupied in {check:?}",
                    item.equip_slot
                );
            }
        }
    }

    // Final state: one rod, head + upper body clothing
    assert_eq!(store.equipped_items(ItemCategory::Rod).len(), 1);
    assert_eq!(store.equipped_items(ItemCategory::Clothing).len(), 2);
}

#[test]
fn test_clothing_sub_slots_coexist_but_displace_within_slot() {
    let mut store = InventoryStore::with_default_schema();
    clothing(&mut store, "cap", "Cap", EquipSlot::Head);
    clothing(&mut store, "vest", "Vest", EquipSlot::UpperBody);
    clothing(&mut store, "waders", "Waders", EquipSlot::LowerBody);
    clothing(&mut store, "sunhat", "Sun Hat", EquipSlot::Head);

    for id in ["cap", "vest", "waders"] {
        store.equip_item(ItemCategory::Clothing, id, 1).unwrap();
    }
    assert_eq!(store.equipped_items(ItemCategory::Clothing).len(), 3);

    // The sun hat displaces only the cap
    store.equip_item(ItemCategory::Clothing, "sunhat", 1).unwrap();
    let equipped: Vec<&str> = store
        .equipped_items(ItemCategory::Clothing)
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(equipped.len(), 3);
    assert!(equipped.contains(&"sunhat"));
    assert!(!equipped.contains(&"cap"));
    assert!(equipped.contains(&"vest"));
    assert!(equipped.contains(&"waders"));
}

// =========================================================================
// Multi-equip cap without sub-slots
// =========================================================================

fn schema_with_multi_equip_consumables() -> SchemaRegistry {
    let def = |id, stackable, category_limit, max_equipped, equip_slot| CategoryDefinition {
        id,
        stackable,
        category_limit,
        max_equipped,
        equip_slot,
    };
    SchemaRegistry::from_document(SchemaDocument {
        version: 1,
        max_stack_size: 10,
        categories: vec![
            // Two charms may be worn at once; they have no sub-slot
            def(ItemCategory::Consumable, false, 50, 2, None),
            def(ItemCategory::Rod, false, 20, 1, Some(EquipSlot::Rod)),
        ],
        properties: BTreeMap::new(),
    })
}

#[test]
fn test_multi_equip_rejected_at_cap() {
    let mut store = InventoryStore::new(schema_with_multi_equip_consumables());
    for (id, name) in [
        ("charm_1", "Lucky Charm"),
        ("charm_2", "River Charm"),
        ("charm_3", "Storm Charm"),
    ] {
        store
            .add_item(ItemCategory::Consumable, ItemDraft::new(id, name), 1)
            .unwrap();
    }

    store.equip_item(ItemCategory::Consumable, "charm_1", 1).unwrap();
    store.equip_item(ItemCategory::Consumable, "charm_2", 1).unwrap();
    let result = store.equip_item(ItemCategory::Consumable, "charm_3", 1);
    assert!(matches!(result, Err(InventoryError::IllegalState(_))));

    // The two already-equipped charms stay equipped; re-equipping one is fine
    assert_eq!(store.equipped_items(ItemCategory::Consumable).len(), 2);
    store.equip_item(ItemCategory::Consumable, "charm_1", 1).unwrap();
    assert_eq!(store.equipped_items(ItemCategory::Consumable).len(), 2);
}

// =========================================================================
// Gates and no-ops
// =========================================================================

#[test]
fn test_unlock_level_gate_blocks_then_allows() {
    let mut store = InventoryStore::with_default_schema();
    store
        .add_item(
            ItemCategory::Reel,
            ItemDraft::new("reel_pro", "Pro Reel").unlock_level(12),
            1,
        )
        .unwrap();
    assert!(matches!(
        store.equip_item(ItemCategory::Reel, "reel_pro", 11),
        Err(InventoryError::IllegalState(_))
    ));
    assert!(store.equipped_items(ItemCategory::Reel).is_empty());
    store.equip_item(ItemCategory::Reel, "reel_pro", 12).unwrap();
    assert_eq!(store.equipped_items(ItemCategory::Reel).len(), 1);
}

#[test]
fn test_unequip_unknown_and_non_equipped() {
    let mut store = InventoryStore::with_default_schema();
    store
        .add_item(ItemCategory::Rod, ItemDraft::new("rod_1", "Bamboo Rod"), 1)
        .unwrap();

    // Not equipped: warned no-op, not an error
    assert!(store.unequip_item(ItemCategory::Rod, "rod_1").is_ok());
    // Unknown id: NotFound
    assert!(matches!(
        store.unequip_item(ItemCategory::Rod, "ghost"),
        Err(InventoryError::NotFound(_))
    ));
}
