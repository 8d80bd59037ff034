//! # Recommendation Engine
//!
//! The immutable context every query runs against. Built once at startup:
//! 1. Build customer profiles and the customer × item matrix
//! 2. Build the customer similarity matrix
//! 3. Wire the neighborhood source and the inventory filter
//!
//! A query then:
//! 1. Checks the customer is in the similarity index
//! 2. Ranks every item by the neighborhood's mean quantity
//! 3. Keeps items with enough recorded inventory
//! 4. Truncates to `top_n`
//!
//! Cloning is cheap (everything is behind `Arc`) and queries never mutate
//! state, so one engine serves concurrent requests without locking.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::error::{RecommendError, Result};
use data_loader::{CustomerId, DataIndex};
use pipeline::FilterPipeline;
use pipeline::filters::MinimumInventoryFilter;
use similarity::{
    CustomerItemMatrix, ItemCandidate, NeighborhoodSource, RecommendationRequest,
    SimilarityMatrix, build_profiles,
};

#[derive(Clone)]
pub struct RecommendationEngine {
    data_index: Arc<DataIndex>,
    similarity: Arc<SimilarityMatrix>,
    item_matrix: Arc<CustomerItemMatrix>,
    neighborhood: NeighborhoodSource,
    filter_pipeline: Arc<FilterPipeline>,
}

impl RecommendationEngine {
    /// Build profiles, the similarity matrix and the filter pipeline
    #[instrument(skip_all)]
    pub fn build(data_index: Arc<DataIndex>) -> Self {
        let start_time = Instant::now();

        let built = build_profiles(&data_index);
        let similarity = Arc::new(SimilarityMatrix::from_profiles(&built.profiles));
        let item_matrix = Arc::new(built.item_matrix);

        let neighborhood = NeighborhoodSource::new(similarity.clone(), item_matrix.clone());
        let filter_pipeline = Arc::new(
            FilterPipeline::new().add_filter(MinimumInventoryFilter::new(data_index.clone())),
        );

        if similarity.is_empty() {
            warn!("Dataset has no purchasing customers, every request will be NotFound");
        }

        let (customers, items) = item_matrix.shape();
        info!(
            customers,
            items,
            elapsed = ?start_time.elapsed(),
            "Built similarity index"
        );

        Self {
            data_index,
            similarity,
            item_matrix,
            neighborhood,
            filter_pipeline,
        }
    }

    /// Recommended item names for a customer, best first
    ///
    /// Fails with `NotFound` when the customer is not in the similarity index.
    /// Returns an empty list when no item meets `min_inventory`.
    pub fn recommend(
        &self,
        customer_id: CustomerId,
        top_n: usize,
        min_inventory: f64,
    ) -> Result<Vec<String>> {
        let request = RecommendationRequest::new(customer_id)
            .with_top_n(top_n)
            .with_min_inventory(min_inventory);

        Ok(self
            .recommend_scored(&request)?
            .into_iter()
            .map(|candidate| candidate.item_name)
            .collect())
    }

    /// Same as [`recommend`](Self::recommend), keeping each item's score
    #[instrument(skip(self, request), fields(customer_id = request.customer_id, top_n = request.top_n))]
    pub fn recommend_scored(&self, request: &RecommendationRequest) -> Result<Vec<ItemCandidate>> {
        let candidates = self
            .neighborhood
            .get_candidates(request)
            .ok_or(RecommendError::NotFound(request.customer_id))?;
        debug!("Ranked {} candidate items", candidates.len());

        let mut filtered = self.filter_pipeline.apply(candidates, request)?;
        debug!("{} items remain after filtering", filtered.len());

        filtered.truncate(request.top_n);
        Ok(filtered)
    }

    /// The `limit` most similar customers, with similarity scores
    pub fn neighbors(
        &self,
        customer_id: CustomerId,
        limit: usize,
    ) -> Result<Vec<(CustomerId, f64)>> {
        self.neighborhood
            .neighborhood(customer_id, limit)
            .ok_or(RecommendError::NotFound(customer_id))
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn item_matrix(&self) -> &CustomerItemMatrix {
        &self.item_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_test_engine;
    use std::collections::HashSet;

    #[test]
    fn test_similar_customer_items_rank_first() {
        let engine = build_test_engine();

        assert!(engine.similarity().get(1, 2).unwrap() > engine.similarity().get(1, 3).unwrap());

        let items = engine.recommend(1, 2, 0.0).unwrap();
        assert_eq!(items, vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_customer_is_not_found() {
        let engine = build_test_engine();

        let err = engine.recommend(999, 5, 0.0).unwrap_err();
        assert!(matches!(err, RecommendError::NotFound(999)));
        assert_eq!(err.to_string(), "Customer ID 999 not found.");
        assert!(matches!(engine.neighbors(999, 3), Err(RecommendError::NotFound(999))));
    }

    #[test]
    fn test_results_bounded_and_unique() {
        let engine = build_test_engine();

        for &customer in engine.similarity().customers() {
            for top_n in 1..=4 {
                let items = engine.recommend(customer, top_n, 0.0).unwrap();
                assert!(items.len() <= top_n);
                let unique: HashSet<&String> = items.iter().collect();
                assert_eq!(unique.len(), items.len());
            }
        }
    }

    #[test]
    fn test_inventory_threshold() {
        let engine = build_test_engine();

        // Only "C" was ever stocked at 500
        assert_eq!(engine.recommend(1, 5, 500.0).unwrap(), vec!["C"]);
        assert!(engine.recommend(1, 5, 500.5).unwrap().is_empty());
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let engine = build_test_engine();

        let first = engine.recommend(3, 3, 10.0).unwrap();
        let second = engine.recommend(3, 3, 10.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let engine = build_test_engine();

        let neighbors = engine.neighbors(1, 5).unwrap();
        let ids: Vec<CustomerId> = neighbors.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
