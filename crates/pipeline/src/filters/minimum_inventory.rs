//! Filter to ensure recommended items are in stock.
//!
//! An item qualifies when ANY transaction in the dataset recorded an
//! inventory value at or above the request's threshold. Availability is
//! item-level, not limited to the neighborhood's own transactions.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::DataIndex;
use similarity::{ItemCandidate, RecommendationRequest};
use std::sync::Arc;

/// Removes candidates without enough recorded inventory.
///
/// ## Algorithm
/// For each candidate:
/// 1. Get ItemStats from DataIndex
/// 2. Keep it if `max_inventory_value >= request.min_inventory`
///
/// Items unknown to the index never qualify.
pub struct MinimumInventoryFilter {
    data_index: Arc<DataIndex>,
}

impl MinimumInventoryFilter {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }
}

impl Filter for MinimumInventoryFilter {
    fn name(&self) -> &str {
        "MinimumInventoryFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ItemCandidate>,
        request: &RecommendationRequest,
    ) -> Result<Vec<ItemCandidate>> {
        let filtered: Vec<ItemCandidate> = candidates
            .into_iter()
            .filter(|candidate| {
                self.data_index
                    .get_item_stats(&candidate.item_name)
                    .is_some_and(|stats| stats.is_available(request.min_inventory))
            })
            .collect();

        Ok(filtered)
    }
}
