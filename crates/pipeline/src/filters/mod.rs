//! Filter implementations for the candidate pipeline.

pub mod minimum_inventory;

// Re-export for convenience
pub use minimum_inventory::MinimumInventoryFilter;
