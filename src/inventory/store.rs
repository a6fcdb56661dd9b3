//! The inventory store: per-category item collections with schema-driven
//! validation, stacking, and capacity enforcement.
//!
//! Every mutating call marks the owning session dirty and emits a typed
//! [`InventoryEvent`]. Validation happens completely before any mutation,
//! so a returned error always means the store is unchanged.

use crate::constants::{DEFAULT_DESCRIPTION, PLACEHOLDER_VALUES, RARITY_MIN};
use crate::errors::InventoryError;
use crate::events::{EventBus, InventoryEvent, ListenerId};
use crate::inventory::types::{InventoryItem, ItemCategory, ItemDraft, SortField};
use crate::schema::registry::SchemaRegistry;
use crate::schema::types::PropertyViolation;
use std::collections::BTreeMap;

/// Per-category aggregate returned by [`InventoryStore::inventory_stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    /// Number of entries (stacks count once).
    pub entries: usize,
    /// Total units across all stacks.
    pub total_quantity: u32,
    /// Number of currently equipped entries.
    pub equipped: u32,
    /// Sum of `cost * quantity` across entries.
    pub total_value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub categories: BTreeMap<ItemCategory, CategoryStats>,
}

#[derive(Debug)]
pub struct InventoryStore {
    pub(crate) schema: SchemaRegistry,
    pub(crate) items: BTreeMap<ItemCategory, Vec<InventoryItem>>,
    pub(crate) events: EventBus,
    dirty: bool,
}

impl InventoryStore {
    pub fn new(schema: SchemaRegistry) -> Self {
        Self {
            schema,
            items: BTreeMap::new(),
            events: EventBus::new(),
            dirty: false,
        }
    }

    pub fn with_default_schema() -> Self {
        Self::new(SchemaRegistry::default_schema())
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&InventoryEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Direct access to the event bus, e.g. for boost tracking hosted
    /// outside the store.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// True when any mutation happened since the last save/load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn touch(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn emit(&mut self, event: InventoryEvent) {
        self.events.emit(&event);
    }

    /// Adds `qty` units of the drafted item to a category.
    ///
    /// Returns the number of units actually added, which may be less than
    /// `qty` when a stack hits `max_stack_size` (the excess is silently not
    /// added) and is always 1 for non-stackable categories. Rejects drafts
    /// with missing or placeholder name/id, out-of-range rarity, or schema
    /// property violations; optional fields are defaulted.
    pub fn add_item(
        &mut self,
        category: ItemCategory,
        draft: ItemDraft,
        qty: u32,
    ) -> Result<u32, InventoryError> {
        self.add_item_traced(category, draft, qty)
            .map(|(added, _)| added)
    }

    /// Like [`InventoryStore::add_item`], but also reports the id of the
    /// entry the units landed in: the merged stack, or the freshly created
    /// entry. `None` when nothing was added.
    pub(crate) fn add_item_traced(
        &mut self,
        category: ItemCategory,
        draft: ItemDraft,
        qty: u32,
    ) -> Result<(u32, Option<String>), InventoryError> {
        if qty == 0 {
            return Ok((0, None));
        }
        let mut item = self.build_item(category, draft)?;
        let stackable = self.schema.is_stackable(category);
        let max_stack = self.schema.max_stack_size();
        let limit = self.schema.category_limit(category);

        if stackable {
            if let Some(existing) = self
                .items
                .get_mut(&category)
                .and_then(|entries| {
                    entries
                        .iter_mut()
                        .find(|entry| entry.definition_id == item.definition_id)
                })
            {
                let added = qty.min(max_stack.saturating_sub(existing.quantity));
                if added == 0 {
                    return Ok((0, None));
                }
                existing.quantity += added;
                let item_id = existing.id.clone();
                self.touch();
                self.emit(InventoryEvent::ItemAdded {
                    category,
                    item_id: item_id.clone(),
                    quantity: added,
                });
                return Ok((added, Some(item_id)));
            }
        }

        if self.find_anywhere(&item.id).is_some() {
            return Err(InventoryError::Validation(vec![PropertyViolation::new(
                "id",
                format!("duplicate item id '{}'", item.id),
            )]));
        }
        let entries = self.items.entry(category).or_default();
        if entries.len() >= limit {
            return Err(InventoryError::CapacityExceeded(category));
        }
        let added = if stackable { qty.min(max_stack) } else { 1 };
        item.quantity = added;
        let item_id = item.id.clone();
        entries.push(item);
        self.touch();
        self.emit(InventoryEvent::ItemAdded {
            category,
            item_id: item_id.clone(),
            quantity: added,
        });
        Ok((added, Some(item_id)))
    }

    /// Units a single deposit of `definition_id` could accept right now:
    /// the open room in its stack for stackable categories, otherwise
    /// whether a new entry still fits under the category limit.
    pub fn stack_room(&self, category: ItemCategory, definition_id: &str) -> u32 {
        let stackable = self.schema.is_stackable(category);
        if stackable {
            if let Some(existing) = self.find_by_definition(category, definition_id) {
                return self.schema.max_stack_size().saturating_sub(existing.quantity);
            }
        }
        if self.items_in(category).len() >= self.schema.category_limit(category) {
            return 0;
        }
        if stackable {
            self.schema.max_stack_size()
        } else {
            1
        }
    }

    /// Removes `qty` units of an item.
    ///
    /// Stackable entries are decremented and deleted when the quantity
    /// reaches zero; non-stackable entries are always deleted. An equipped
    /// item is auto-unequipped before deletion. Returns true when the entry
    /// was deleted, false when only decremented.
    pub fn remove_item(
        &mut self,
        category: ItemCategory,
        id: &str,
        qty: u32,
    ) -> Result<bool, InventoryError> {
        if qty == 0 {
            return Ok(false);
        }
        let stackable = self.schema.is_stackable(category);
        let entries = self
            .items
            .get_mut(&category)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;
        let index = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| InventoryError::NotFound(id.to_string()))?;

        let mut pending = Vec::new();
        let deleted = if stackable && entries[index].quantity > qty {
            entries[index].quantity -= qty;
            pending.push(InventoryEvent::ItemRemoved {
                category,
                item_id: id.to_string(),
                quantity: qty,
            });
            false
        } else {
            let removed = entries.remove(index);
            if removed.equipped {
                pending.push(InventoryEvent::ItemUnequipped {
                    category,
                    item_id: removed.id.clone(),
                });
            }
            pending.push(InventoryEvent::ItemRemoved {
                category,
                item_id: removed.id,
                quantity: removed.quantity,
            });
            true
        };

        self.touch();
        for event in pending {
            self.emit(event);
        }
        Ok(deleted)
    }

    pub fn find_item(&self, category: ItemCategory, id: &str) -> Option<&InventoryItem> {
        self.items_in(category).iter().find(|entry| entry.id == id)
    }

    /// Finds the entry holding a given definition (the stack, for stackable
    /// categories).
    pub fn find_by_definition(
        &self,
        category: ItemCategory,
        definition_id: &str,
    ) -> Option<&InventoryItem> {
        self.items_in(category)
            .iter()
            .find(|entry| entry.definition_id == definition_id)
    }

    pub(crate) fn find_anywhere(&self, id: &str) -> Option<&InventoryItem> {
        self.iter_all().find(|entry| entry.id == id)
    }

    /// Case-insensitive substring search over name, description, and id.
    pub fn search_items(&self, query: &str, category: Option<ItemCategory>) -> Vec<&InventoryItem> {
        let needle = query.to_lowercase();
        let matches = |entry: &&InventoryItem| {
            entry.name.to_lowercase().contains(&needle)
                || entry.description.to_lowercase().contains(&needle)
                || entry.id.to_lowercase().contains(&needle)
        };
        match category {
            Some(category) => self.items_in(category).iter().filter(matches).collect(),
            None => self.iter_all().filter(matches).collect(),
        }
    }

    /// Sorts a category collection in place. Unknown categories are a no-op.
    pub fn sort_items(&mut self, category: ItemCategory, field: SortField, ascending: bool) {
        let Some(entries) = self.items.get_mut(&category) else {
            return;
        };
        entries.sort_by(|a, b| {
            let ordering = match field {
                SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortField::Rarity => a.rarity.cmp(&b.rarity),
                SortField::Quantity => a.quantity.cmp(&b.quantity),
                SortField::Cost => a.cost.cmp(&b.cost),
            };
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        self.touch();
    }

    /// Bounds-checked positional swap within a category collection.
    pub fn swap_items(
        &mut self,
        category: ItemCategory,
        i: usize,
        j: usize,
    ) -> Result<(), InventoryError> {
        let entries = self
            .items
            .get_mut(&category)
            .ok_or_else(|| InventoryError::NotFound(format!("category {category:?} is empty")))?;
        if i >= entries.len() || j >= entries.len() {
            return Err(InventoryError::IllegalState(format!(
                "swap indices ({i}, {j}) out of bounds for {} entries",
                entries.len()
            )));
        }
        if i != j {
            entries.swap(i, j);
            self.touch();
        }
        Ok(())
    }

    /// Aggregates entry/quantity/equipped/value counts per category.
    pub fn inventory_stats(&self) -> InventoryStats {
        let mut stats = InventoryStats::default();
        for (category, entries) in &self.items {
            let bucket = stats.categories.entry(*category).or_default();
            bucket.entries = entries.len();
            for entry in entries {
                bucket.total_quantity += entry.quantity;
                if entry.equipped {
                    bucket.equipped += 1;
                }
                bucket.total_value += entry.cost * u64::from(entry.quantity);
            }
        }
        stats
    }

    pub fn items_in(&self, category: ItemCategory) -> &[InventoryItem] {
        self.items
            .get(&category)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter_all(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.values().flatten()
    }

    /// Replaces the entire inventory, e.g. when loading a save. Clears the
    /// dirty flag.
    pub fn restore(&mut self, items: BTreeMap<ItemCategory, Vec<InventoryItem>>) {
        self.items = items;
        self.dirty = false;
    }

    pub fn snapshot(&self) -> BTreeMap<ItemCategory, Vec<InventoryItem>> {
        self.items.clone()
    }

    /// Validates a draft and fills in defaults, producing a store-ready item
    /// with a placeholder quantity.
    fn build_item(
        &self,
        category: ItemCategory,
        draft: ItemDraft,
    ) -> Result<InventoryItem, InventoryError> {
        let mut violations = Vec::new();
        let id = draft.id.trim().to_string();
        let name = draft.name.trim().to_string();
        if id.is_empty() || Self::is_placeholder(&id) {
            violations.push(PropertyViolation::new("id", "missing or placeholder id"));
        }
        if name.is_empty() || Self::is_placeholder(&name) {
            violations.push(PropertyViolation::new("name", "missing or placeholder name"));
        }
        if !violations.is_empty() {
            return Err(InventoryError::Validation(violations));
        }

        let definition_id = draft
            .definition_id
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        let description = draft
            .description
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let durability = draft.durability;
        // A fresh item starts at full condition unless the draft says otherwise
        let condition = match (draft.condition, durability) {
            (Some(condition), Some(durability)) => Some(condition.min(durability)),
            (None, Some(durability)) => Some(durability),
            _ => None,
        };
        let item = InventoryItem {
            id,
            definition_id,
            category,
            name,
            description,
            rarity: draft.rarity.unwrap_or(RARITY_MIN),
            quantity: 1,
            equipped: false,
            equip_slot: draft.equip_slot.or_else(|| self.schema.equip_slot(category)),
            durability,
            condition,
            cost: draft.cost,
            unlock_level: draft.unlock_level,
            metadata: draft.metadata,
        };

        let violations = self.schema.validate_properties(&item);
        if !violations.is_empty() {
            return Err(InventoryError::Validation(violations));
        }
        Ok(item)
    }

    fn is_placeholder(value: &str) -> bool {
        PLACEHOLDER_VALUES
            .iter()
            .any(|placeholder| value.eq_ignore_ascii_case(placeholder))
    }
}
