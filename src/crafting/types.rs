use crate::errors::InventoryError;
use crate::inventory::types::ItemCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Abstract ingredient reference as written in recipe data.
///
/// `kind` and `id` are resolved against concrete inventory entries by the
/// ingredient resolver; legacy rows are inconsistently keyed, which is why
/// resolution is fuzzy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub kind: String,
    pub id: String,
    pub quantity: u32,
    /// Display name used when re-creating refunded units; falls back to the
    /// id when absent.
    #[serde(default)]
    pub name: Option<String>,
}

/// Template for the item a recipe produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Result kind; mapped to an inventory category on collection.
    pub kind: String,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rarity: u8,
    #[serde(default)]
    pub cost: u64,
    #[serde(default = "default_result_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub unlock_level: u32,
}

fn default_result_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub category: ItemCategory,
    pub ingredients: Vec<Ingredient>,
    /// Soft-currency cost, debited on start.
    pub cost: u64,
    pub craft_duration_ms: u64,
    pub result: ItemTemplate,
}

/// Crafting job lifecycle. `Collected` and `Cancelled` are terminal; a job
/// leaves the active queue on entering either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Ready,
    Collected,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingJob {
    pub id: String,
    pub recipe_id: String,
    pub started_at_ms: u64,
    pub ready_at_ms: u64,
    pub state: JobState,
}

impl CraftingJob {
    /// Whole minutes left until ready, rounded up. Zero once due.
    pub fn minutes_remaining(&self, now_ms: u64) -> u64 {
        let remaining = self.ready_at_ms.saturating_sub(now_ms);
        remaining.div_ceil(60_000)
    }
}

/// What a cancelled job gave back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub money: u64,
    pub ingredients: Vec<IngredientRefund>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRefund {
    pub id: String,
    pub quantity: u32,
}

/// Immutable recipe catalog, loaded once from recipe data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeCatalog {
    recipes: BTreeMap<String, Recipe>,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: recipes
                .into_iter()
                .map(|recipe| (recipe.id.clone(), recipe))
                .collect(),
        }
    }

    /// Parses a catalog from its JSON source, rejecting recipes whose result
    /// kind has no category mapping or whose numbers are degenerate.
    pub fn from_json(json: &str) -> Result<Self, InventoryError> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)?;
        for recipe in &recipes {
            if ItemCategory::from_kind(&recipe.result.kind).is_none() {
                return Err(InventoryError::Persistence(format!(
                    "recipe '{}' has unmapped result kind '{}'",
                    recipe.id, recipe.result.kind
                )));
            }
            if recipe.craft_duration_ms == 0 {
                return Err(InventoryError::Persistence(format!(
                    "recipe '{}' has zero craft duration",
                    recipe.id
                )));
            }
            if recipe.ingredients.iter().any(|ing| ing.quantity == 0) {
                return Err(InventoryError::Persistence(format!(
                    "recipe '{}' has a zero-quantity ingredient",
                    recipe.id
                )));
            }
        }
        Ok(Self::new(recipes))
    }

    pub fn get(&self, recipe_id: &str) -> Option<&Recipe> {
        self.recipes.get(recipe_id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }
}
