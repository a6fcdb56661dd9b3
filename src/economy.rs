//! Economy port: the core's window onto player-owned currency and level.
//!
//! The core never owns money, gems, or level; it reads and debits them
//! through this trait so hosts can plug in their own player state instead
//! of threading a shared mutable game-state object through every manager.

/// External player/economy collaborator.
pub trait EconomyPort {
    fn level(&self) -> u32;
    fn money(&self) -> u64;
    fn gems(&self) -> u64;

    /// Debits soft currency. Returns false (without mutating) when the
    /// balance is insufficient.
    fn spend_money(&mut self, amount: u64) -> bool;
    fn add_money(&mut self, amount: u64);

    /// Debits premium currency. Returns false (without mutating) when the
    /// balance is insufficient.
    fn spend_gems(&mut self, amount: u64) -> bool;
}

/// Plain in-memory wallet. Suitable for hosts without their own player
/// state and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerWallet {
    pub level: u32,
    pub money: u64,
    pub gems: u64,
}

impl PlayerWallet {
    pub fn new(level: u32, money: u64, gems: u64) -> Self {
        Self { level, money, gems }
    }
}

impl EconomyPort for PlayerWallet {
    fn level(&self) -> u32 {
        self.level
    }

    fn money(&self) -> u64 {
        self.money
    }

    fn gems(&self) -> u64 {
        self.gems
    }

    fn spend_money(&mut self, amount: u64) -> bool {
        if self.money < amount {
            return false;
        }
        self.money -= amount;
        true
    }

    fn add_money(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    fn spend_gems(&mut self, amount: u64) -> bool {
        if self.gems < amount {
            return false;
        }
        self.gems -= amount;
        true
    }
}
