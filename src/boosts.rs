//! Temporary, time-limited player boosts (consumable effects).
//!
//! Boosts of the same type stack additively and extend the expiry to the
//! later of the two. Expiry is checked against the host-supplied logical
//! clock in the same sweep pattern as crafting completion.

use crate::events::{EventBus, InventoryEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostType {
    CatchRate,
    SellPrice,
    CraftSpeed,
    Experience,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryBoost {
    pub boost_type: BoostType,
    pub value: f64,
    pub expires_at_ms: u64,
}

/// Tracks the set of currently active boosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoostTracker {
    active: Vec<TemporaryBoost>,
}

impl BoostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a boost. An existing boost of the same type absorbs the new
    /// value additively and keeps the later expiry.
    pub fn apply(&mut self, boost: TemporaryBoost, now_ms: u64, events: &mut EventBus) {
        if boost.expires_at_ms <= now_ms {
            return;
        }
        let merged = match self
            .active
            .iter_mut()
            .find(|active| active.boost_type == boost.boost_type)
        {
            Some(existing) => {
                existing.value += boost.value;
                existing.expires_at_ms = existing.expires_at_ms.max(boost.expires_at_ms);
                existing.clone()
            }
            None => {
                self.active.push(boost.clone());
                boost
            }
        };
        events.emit(&InventoryEvent::TemporaryBoostApplied {
            boost_type: merged.boost_type,
            value: merged.value,
            expires_at_ms: merged.expires_at_ms,
        });
    }

    /// Drops expired boosts, emitting one event per expiry. Safe to call
    /// redundantly or late.
    pub fn sweep(&mut self, now_ms: u64, events: &mut EventBus) {
        let mut expired = Vec::new();
        self.active.retain(|boost| {
            if boost.expires_at_ms <= now_ms {
                expired.push(boost.boost_type);
                false
            } else {
                true
            }
        });
        for boost_type in expired {
            events.emit(&InventoryEvent::TemporaryBoostExpired { boost_type });
        }
    }

    /// Total live bonus for a boost type at the given instant.
    pub fn active_bonus(&self, boost_type: BoostType, now_ms: u64) -> f64 {
        self.active
            .iter()
            .filter(|boost| boost.boost_type == boost_type && boost.expires_at_ms > now_ms)
            .map(|boost| boost.value)
            .sum()
    }

    pub fn active_boosts(&self) -> &[TemporaryBoost] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boost(boost_type: BoostType, value: f64, expires_at_ms: u64) -> TemporaryBoost {
        TemporaryBoost {
            boost_type,
            value,
            expires_at_ms,
        }
    }

    #[test]
    fn test_same_type_boosts_stack_additively() {
        let mut tracker = BoostTracker::new();
        let mut events = EventBus::new();
        tracker.apply(boost(BoostType::CatchRate, 0.10, 60_000), 0, &mut events);
        tracker.apply(boost(BoostType::CatchRate, 0.05, 30_000), 0, &mut events);
        assert!((tracker.active_bonus(BoostType::CatchRate, 0) - 0.15).abs() < f64::EPSILON);
        // Expiry extends to the max of existing/new
        assert_eq!(tracker.active_boosts()[0].expires_at_ms, 60_000);
    }

    #[test]
    fn test_distinct_types_tracked_separately() {
        let mut tracker = BoostTracker::new();
        let mut events = EventBus::new();
        tracker.apply(boost(BoostType::CatchRate, 0.10, 60_000), 0, &mut events);
        tracker.apply(boost(BoostType::SellPrice, 0.25, 60_000), 0, &mut events);
        assert!((tracker.active_bonus(BoostType::SellPrice, 0) - 0.25).abs() < f64::EPSILON);
        assert!((tracker.active_bonus(BoostType::CatchRate, 0) - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sweep_expires_and_notifies() {
        let mut tracker = BoostTracker::new();
        let mut events = EventBus::new();
        tracker.apply(boost(BoostType::CraftSpeed, 0.5, 10_000), 0, &mut events);

        let expired = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        {
            let expired = std::rc::Rc::clone(&expired);
            events.subscribe(move |event| {
                if let InventoryEvent::TemporaryBoostExpired { boost_type } = event {
                    expired.borrow_mut().push(*boost_type);
                }
            });
        }

        tracker.sweep(5_000, &mut events);
        assert!(expired.borrow().is_empty());

        tracker.sweep(10_000, &mut events);
        assert_eq!(*expired.borrow(), vec![BoostType::CraftSpeed]);
        assert_eq!(tracker.active_bonus(BoostType::CraftSpeed, 10_000), 0.0);

        // Redundant sweep is a no-op
        tracker.sweep(20_000, &mut events);
        assert_eq!(expired.borrow().len(), 1);
    }

    #[test]
    fn test_already_expired_boost_is_ignored() {
        let mut tracker = BoostTracker::new();
        let mut events = EventBus::new();
        tracker.apply(boost(BoostType::Experience, 1.0, 1_000), 5_000, &mut events);
        assert!(tracker.active_boosts().is_empty());
    }
}
