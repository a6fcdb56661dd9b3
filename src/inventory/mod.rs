//! Inventory system: item types, the store, and equip rules.

pub mod equip;
pub mod store;
pub mod types;

pub use store::*;
pub use types::*;
