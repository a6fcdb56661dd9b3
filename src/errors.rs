//! Error taxonomy for the inventory and crafting core.
//!
//! Every public operation returns an explicit `Result` with one of these
//! variants; nothing in the library panics on bad input. Operations validate
//! completely before mutating, so an `Err` always means the store, queue,
//! and economy are unchanged.

use crate::inventory::types::ItemCategory;
use crate::schema::types::PropertyViolation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single ingredient that could not be covered from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientShortfall {
    /// Ingredient kind from the recipe (e.g. "fish", "item").
    pub kind: String,
    /// Ingredient id as written in the recipe.
    pub id: String,
    pub required: u32,
    pub available: u32,
}

/// Which resource ran out, with exact amounts for the UI to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceShortfall {
    Money { required: u64, available: u64 },
    Gems { required: u64, available: u64 },
    Ingredients(Vec<IngredientShortfall>),
}

#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// Schema or field validation failed on add; the store is unchanged.
    #[error("item failed validation: {0:?}")]
    Validation(Vec<PropertyViolation>),

    /// The category already holds `category_limit` entries, or the stack is full.
    #[error("category {0:?} is at capacity")]
    CapacityExceeded(ItemCategory),

    /// Unknown item, recipe, or job id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Currency or ingredient shortfall; nothing was consumed.
    #[error("insufficient resources")]
    InsufficientResource(ResourceShortfall),

    /// Operation is not valid for the current state of the target.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Persisted blob could not be read or written.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_carries_exact_amounts() {
        let err = InventoryError::InsufficientResource(ResourceShortfall::Gems {
            required: 3,
            available: 2,
        });
        match err {
            InventoryError::InsufficientResource(ResourceShortfall::Gems {
                required,
                available,
            }) => {
                assert_eq!(required, 3);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_maps_to_persistence() {
        let bad = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: InventoryError = bad.into();
        assert!(matches!(err, InventoryError::Persistence(_)));
    }
}
