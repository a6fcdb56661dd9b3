//! Persisted-state blob production and consumption.
//!
//! The core owns the shape of the saved data (inventory map plus crafting
//! queue); the storage medium, compression, and backup rotation belong to
//! an external save/load collaborator that passes blobs in and out.

use crate::constants::SAVE_VERSION;
use crate::crafting::engine::CraftingEngine;
use crate::crafting::types::CraftingJob;
use crate::errors::InventoryError;
use crate::inventory::store::InventoryStore;
use crate::inventory::types::{InventoryItem, ItemCategory};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    /// Unix timestamp (seconds) when the blob was produced.
    pub saved_at: i64,
    pub inventory: BTreeMap<ItemCategory, Vec<InventoryItem>>,
    #[serde(default)]
    pub crafting_queue: Vec<CraftingJob>,
}

/// Serializes the current inventory and crafting queue to a JSON blob and
/// clears the store's dirty flag.
pub fn save(store: &mut InventoryStore, engine: &CraftingEngine) -> Result<String, InventoryError> {
    let state = PersistedState {
        version: SAVE_VERSION,
        saved_at: Utc::now().timestamp(),
        inventory: store.snapshot(),
        crafting_queue: engine.queue_snapshot(),
    };
    let blob = serde_json::to_string(&state)?;
    store.mark_clean();
    Ok(blob)
}

/// Restores the inventory and crafting queue from a blob produced by
/// [`save`]. The store comes back clean.
pub fn load(
    blob: &str,
    store: &mut InventoryStore,
    engine: &mut CraftingEngine,
) -> Result<(), InventoryError> {
    let state: PersistedState = serde_json::from_str(blob)?;
    if state.version > SAVE_VERSION {
        return Err(InventoryError::Persistence(format!(
            "save version {} is newer than supported version {SAVE_VERSION}",
            state.version
        )));
    }
    store.restore(state.inventory);
    engine.restore_queue(state.crafting_queue);
    Ok(())
}
