//! Schema registry: static category/property definitions.

pub mod registry;
pub mod types;

pub use registry::*;
pub use types::*;
