//! Crafting system: recipes, the timed job queue, and ingredient resolution.

pub mod engine;
pub mod resolver;
pub mod types;

pub use engine::*;
pub use resolver::*;
pub use types::*;
