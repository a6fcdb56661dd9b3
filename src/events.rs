//! Typed event surface for inventory and crafting mutations.
//!
//! Events are synchronous, best-effort notifications delivered in listener
//! registration order. A panicking listener is isolated: it is logged and
//! skipped, and never aborts the mutation that produced the event or the
//! delivery to later listeners.

use crate::boosts::BoostType;
use crate::inventory::types::{EquipSlot, ItemCategory};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// A single notification produced by a store or engine mutation.
///
/// UI collaborators map these to log lines and panel refreshes; the core
/// never touches presentation types directly.
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEvent {
    // ── Inventory ───────────────────────────────────────────────
    ItemAdded {
        category: ItemCategory,
        item_id: String,
        quantity: u32,
    },
    ItemRemoved {
        category: ItemCategory,
        item_id: String,
        quantity: u32,
    },
    ItemEquipped {
        category: ItemCategory,
        item_id: String,
        slot: Option<EquipSlot>,
    },
    ItemUnequipped {
        category: ItemCategory,
        item_id: String,
    },

    // ── Crafting ────────────────────────────────────────────────
    CraftingStarted {
        job_id: String,
        recipe_id: String,
        ready_at_ms: u64,
    },
    CraftingReady {
        job_id: String,
        recipe_id: String,
    },
    CraftingCompleted {
        job_id: String,
        recipe_id: String,
        item_id: String,
    },
    CraftingCancelled {
        job_id: String,
        recipe_id: String,
        refund_money: u64,
    },
    CraftingInstantCompleted {
        job_id: String,
        gems_spent: u64,
    },

    // ── Boosts ──────────────────────────────────────────────────
    TemporaryBoostApplied {
        boost_type: BoostType,
        value: f64,
        expires_at_ms: u64,
    },
    TemporaryBoostExpired {
        boost_type: BoostType,
    },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&InventoryEvent)>;

/// Ordered listener registry with per-listener fault isolation.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: ListenerId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&InventoryEvent) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers an event to every listener in registration order.
    pub fn emit(&mut self, event: &InventoryEvent) {
        for (id, listener) in &mut self.listeners {
            let delivery = catch_unwind(AssertUnwindSafe(|| listener(event)));
            if delivery.is_err() {
                warn!(listener = *id, ?event, "event listener panicked; skipping");
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
