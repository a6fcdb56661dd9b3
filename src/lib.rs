//! Tacklebox - Inventory and Crafting Core for a Fishing RPG
//!
//! This library owns item storage, equip slots, stacking, and the timed
//! crafting queue. Rendering, input, the game loop, and the save-file
//! transport are external collaborators: they call into the store and
//! engine, drive the completion sweep with their own clock, and move the
//! persisted blob to and from disk.

pub mod boosts;
pub mod constants;
pub mod crafting;
pub mod economy;
pub mod errors;
pub mod events;
pub mod inventory;
pub mod persistence;
pub mod schema;

pub use boosts::{BoostTracker, BoostType, TemporaryBoost};
pub use crafting::engine::CraftingEngine;
pub use crafting::types::{CraftingJob, JobState, Recipe, RecipeCatalog, Refund};
pub use economy::{EconomyPort, PlayerWallet};
pub use errors::{IngredientShortfall, InventoryError, ResourceShortfall};
pub use events::{EventBus, InventoryEvent, ListenerId};
pub use inventory::store::InventoryStore;
pub use inventory::types::{EquipSlot, InventoryItem, ItemCategory, ItemDraft, SortField};
pub use schema::registry::SchemaRegistry;
