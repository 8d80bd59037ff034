//! Shared types for candidate generation and filtering.

use data_loader::CustomerId;

/// Default number of neighbors and of returned items
pub const DEFAULT_TOP_N: usize = 5;

/// Default minimum inventory threshold (everything qualifies)
pub const DEFAULT_MIN_INVENTORY: f64 = 0.0;

/// Parameters of one recommendation query
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub customer_id: CustomerId,
    /// Size of the neighborhood and maximum number of items returned
    pub top_n: usize,
    /// Items qualify when some transaction has at least this inventory value
    pub min_inventory: f64,
}

impl RecommendationRequest {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            top_n: DEFAULT_TOP_N,
            min_inventory: DEFAULT_MIN_INVENTORY,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_min_inventory(mut self, min_inventory: f64) -> Self {
        self.min_inventory = min_inventory;
        self
    }
}

/// An item scored by the neighborhood of a customer
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCandidate {
    pub item_name: String,
    /// Mean quantity bought across the neighborhood
    pub score: f64,
    /// How many neighbors bought the item at all
    pub purchasing_neighbors: u32,
}

impl ItemCandidate {
    pub fn new(item_name: impl Into<String>, score: f64) -> Self {
        Self {
            item_name: item_name.into(),
            score,
            purchasing_neighbors: 0,
        }
    }
}
