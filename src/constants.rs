// Stacking constants
pub const MAX_STACK_SIZE: u32 = 10;

// Rarity tiers are 1 (common) through 6 (legendary)
pub const RARITY_MIN: u8 = 1;
pub const RARITY_MAX: u8 = 6;

// Crafting constants
pub const DEFAULT_REFUND_FRACTION: f64 = 0.5;
pub const PREMIUM_COST_MS_PER_UNIT: u64 = 60_000; // 1 gem per started minute

// Save system constants
pub const SAVE_VERSION: u32 = 1;

// Item ids/names that legacy data used as "no value" markers; rejected on add
pub const PLACEHOLDER_VALUES: [&str; 2] = ["undefined", "null"];

// Fallback description for items added without one
pub const DEFAULT_DESCRIPTION: &str = "No description available";
