//! Neighborhood Source - similarity-based candidate generation
//!
//! "Customers who buy like you also buy these items"
//!
//! ## Algorithm
//! 1. Take the `top_n` most similar other customers (the neighborhood)
//! 2. Score every item by its mean quantity across the neighborhood rows of
//!    the customer × item matrix (items no neighbor bought score 0)
//! 3. Sort by score descending, ties by ascending item name

use crate::matrix::SimilarityMatrix;
use crate::profile::CustomerItemMatrix;
use crate::types::{ItemCandidate, RecommendationRequest};
use data_loader::CustomerId;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ranks items by what a customer's nearest neighbors buy
#[derive(Debug, Clone)]
pub struct NeighborhoodSource {
    /// Shared, read-only; no Mutex needed
    similarity: Arc<SimilarityMatrix>,
    item_matrix: Arc<CustomerItemMatrix>,
}

impl NeighborhoodSource {
    pub fn new(similarity: Arc<SimilarityMatrix>, item_matrix: Arc<CustomerItemMatrix>) -> Self {
        Self {
            similarity,
            item_matrix,
        }
    }

    /// The `top_n` most similar customers, with scores
    ///
    /// `None` if the customer is not in the similarity index.
    pub fn neighborhood(
        &self,
        customer_id: CustomerId,
        top_n: usize,
    ) -> Option<Vec<(CustomerId, f64)>> {
        self.similarity.most_similar(customer_id, top_n)
    }

    /// Every item, scored and ranked by the request's neighborhood
    ///
    /// `None` if the customer is not in the similarity index.
    #[instrument(skip(self, request), fields(customer_id = request.customer_id))]
    pub fn get_candidates(&self, request: &RecommendationRequest) -> Option<Vec<ItemCandidate>> {
        let neighbors = self.neighborhood(request.customer_id, request.top_n)?;
        debug!("Found {} neighbors", neighbors.len());

        let items = self.item_matrix.items();
        let mut totals = vec![0.0; items.len()];
        let mut buyers = vec![0u32; items.len()];

        for &(neighbor, _) in &neighbors {
            // Every similarity row has a matrix row; both come from the same profiles
            let Some(row) = self.item_matrix.row(neighbor) else {
                continue;
            };
            for (col, &quantity) in row.iter().enumerate() {
                totals[col] += quantity;
                if quantity > 0.0 {
                    buyers[col] += 1;
                }
            }
        }

        let size = neighbors.len();
        let mut candidates: Vec<ItemCandidate> = items
            .iter()
            .zip(totals)
            .zip(buyers)
            .map(|((item_name, total), purchasing_neighbors)| ItemCandidate {
                item_name: item_name.clone(),
                score: if size > 0 { total / size as f64 } else { 0.0 },
                purchasing_neighbors,
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item_name.cmp(&b.item_name))
        });

        debug!("Scored {} candidate items", candidates.len());
        Some(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::build_profiles;
    use crate::test_support::index_from_purchases;

    fn source_for(purchases: &[(CustomerId, &str, f64)]) -> NeighborhoodSource {
        let index = index_from_purchases(purchases);
        let built = build_profiles(&index);
        let similarity = SimilarityMatrix::from_profiles(&built.profiles);
        NeighborhoodSource::new(Arc::new(similarity), Arc::new(built.item_matrix))
    }

    #[test]
    fn test_neighbors_items_rank_first() {
        let source = source_for(&[
            (1, "A", 1.0),
            (1, "B", 1.0),
            (2, "A", 3.0),
            (2, "B", 2.0),
            (3, "C", 10.0),
        ]);

        let request = RecommendationRequest::new(1).with_top_n(1);
        let candidates = source.get_candidates(&request).unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.item_name.as_str()).collect();

        // Only customer 2 is in the neighborhood
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(candidates[0].score, 3.0);
        assert_eq!(candidates[0].purchasing_neighbors, 1);
        assert_eq!(candidates[2].score, 0.0);
    }

    #[test]
    fn test_scores_are_neighborhood_means() {
        let source = source_for(&[
            (1, "Quinoa", 1.0),
            (2, "Quinoa", 4.0),
            (3, "Quinoa", 2.0),
            (3, "Oatmeal", 6.0),
        ]);

        let request = RecommendationRequest::new(1).with_top_n(2);
        let candidates = source.get_candidates(&request).unwrap();

        let oatmeal = candidates.iter().find(|c| c.item_name == "Oatmeal").unwrap();
        let quinoa = candidates.iter().find(|c| c.item_name == "Quinoa").unwrap();
        assert_eq!(oatmeal.score, 3.0);
        assert_eq!(quinoa.score, 3.0);
        assert_eq!(quinoa.purchasing_neighbors, 2);
        // Equal means fall back to item name order
        assert_eq!(candidates[0].item_name, "Oatmeal");
    }

    #[test]
    fn test_single_customer_scores_everything_zero() {
        let source = source_for(&[(1, "Quinoa", 2.0), (1, "Oatmeal", 1.0)]);

        let candidates = source.get_candidates(&RecommendationRequest::new(1)).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.score == 0.0));
        assert_eq!(candidates[0].item_name, "Oatmeal");
    }

    #[test]
    fn test_unknown_customer() {
        let source = source_for(&[(1, "Quinoa", 1.0)]);
        assert!(source.get_candidates(&RecommendationRequest::new(42)).is_none());
        assert!(source.neighborhood(42, 5).is_none());
    }
}
