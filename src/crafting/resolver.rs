//! Fuzzy ingredient resolution.
//!
//! Recipe data inherited from the legacy game keys ingredients
//! inconsistently: some rows use the item id, some an alternate id, some a
//! display name or a fragment of one. Resolution therefore tries four
//! strategies in priority order; the first strategy that matches anything
//! determines the matched set, and quantities are summed across every entry
//! matched at that tier. Later tiers are never mixed in.

use crate::crafting::types::Ingredient;
use crate::inventory::store::InventoryStore;
use crate::inventory::types::{InventoryItem, ItemCategory};

/// The strategy tier that produced a match, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStrategy {
    ExactId,
    AlternateId,
    ExactName,
    NameSubstring,
}

impl MatchStrategy {
    pub fn all() -> [MatchStrategy; 4] {
        [
            MatchStrategy::ExactId,
            MatchStrategy::AlternateId,
            MatchStrategy::ExactName,
            MatchStrategy::NameSubstring,
        ]
    }
}

/// One concrete inventory entry matched for an ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    pub category: ItemCategory,
    pub item_id: String,
    pub quantity: u32,
}

/// The resolved set for one ingredient reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientMatch {
    pub strategy: MatchStrategy,
    pub entries: Vec<MatchedEntry>,
    pub total_quantity: u32,
}

/// Resolves an abstract `(kind, id)` reference against the store.
///
/// When the ingredient kind maps to a known category only that category is
/// scanned; unknown kinds scan the whole store. Returns `None` when no
/// strategy matches anything.
pub fn resolve_ingredient(
    store: &InventoryStore,
    ingredient: &Ingredient,
) -> Option<IngredientMatch> {
    let candidates: Vec<&InventoryItem> = match ItemCategory::from_kind(&ingredient.kind) {
        Some(category) => store.items_in(category).iter().collect(),
        None => store.iter_all().collect(),
    };

    for strategy in MatchStrategy::all() {
        let entries: Vec<MatchedEntry> = candidates
            .iter()
            .filter(|item| matches_strategy(item, &ingredient.id, strategy))
            .map(|item| MatchedEntry {
                category: item.category,
                item_id: item.id.clone(),
                quantity: item.quantity,
            })
            .collect();
        if !entries.is_empty() {
            let total_quantity = entries.iter().map(|entry| entry.quantity).sum();
            return Some(IngredientMatch {
                strategy,
                entries,
                total_quantity,
            });
        }
    }
    None
}

fn matches_strategy(item: &InventoryItem, reference: &str, strategy: MatchStrategy) -> bool {
    match strategy {
        MatchStrategy::ExactId => item.id == reference,
        MatchStrategy::AlternateId => item.alt_id() == Some(reference),
        MatchStrategy::ExactName => item.name.eq_ignore_ascii_case(reference),
        MatchStrategy::NameSubstring => item
            .name
            .to_lowercase()
            .contains(&reference.to_lowercase()),
    }
}
