//! Similarity Engine
//!
//! Builds the customer × customer cosine similarity matrix from TF-IDF
//! vectors of the customer profiles. The matrix is computed once and is
//! read-only afterwards.
//!
//! ## Guarantees
//! - `get(c, c) == 1.0` for every customer
//! - `get(a, b) == get(b, a)` bit-for-bit (upper triangle computed, then mirrored)
//! - every score is in [0, 1]

use crate::profile::CustomerProfile;
use crate::tfidf::{SparseVector, TfidfVectorizer, cosine_similarity};
use data_loader::CustomerId;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Dense symmetric similarity matrix indexed by customer id
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    customers: Vec<CustomerId>,
    index: HashMap<CustomerId, usize>,
    /// Row-major, `n * n` cells
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Vectorize the profiles and compute every pairwise similarity
    #[instrument(skip_all, fields(customers = profiles.len()))]
    pub fn from_profiles(profiles: &[CustomerProfile]) -> Self {
        let documents: Vec<String> = profiles.iter().map(|p| p.text()).collect();
        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(&documents);
        debug!(
            vocabulary = vectorizer.vocabulary_len(),
            "Vectorized customer profiles"
        );

        Self::from_vectors(profiles.iter().map(|p| p.customer_id).zip(vectors).collect())
    }

    /// Compute the matrix from one vector per customer, in matrix order
    pub fn from_vectors(labeled: Vec<(CustomerId, SparseVector)>) -> Self {
        let (customers, vectors): (Vec<CustomerId>, Vec<SparseVector>) =
            labeled.into_iter().unzip();
        let n = customers.len();

        // Row i holds similarities to customers i+1..n
        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| cosine_similarity(&vectors[i], &vectors[j]))
                    .collect()
            })
            .collect();

        let mut scores = vec![0.0; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            scores[i * n + i] = 1.0;
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                scores[i * n + j] = score;
                scores[j * n + i] = score;
            }
        }

        let index = customers
            .iter()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect();

        Self {
            customers,
            index,
            scores,
        }
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Customer ids in matrix order
    pub fn customers(&self) -> &[CustomerId] {
        &self.customers
    }

    /// Similarity of two customers, `None` if either is unknown
    pub fn get(&self, a: CustomerId, b: CustomerId) -> Option<f64> {
        let i = *self.index.get(&a)?;
        let j = *self.index.get(&b)?;
        Some(self.scores[i * self.len() + j])
    }

    /// Similarities of one customer to every customer, in matrix order
    pub fn row(&self, customer_id: CustomerId) -> Option<&[f64]> {
        let i = *self.index.get(&customer_id)?;
        let n = self.len();
        Some(&self.scores[i * n..(i + 1) * n])
    }

    /// The `limit` most similar other customers
    ///
    /// The customer itself is never included. Sorted by score descending,
    /// ties broken by ascending customer id. `None` if the customer is unknown.
    pub fn most_similar(
        &self,
        customer_id: CustomerId,
        limit: usize,
    ) -> Option<Vec<(CustomerId, f64)>> {
        let row = self.row(customer_id)?;

        let mut neighbors: Vec<(CustomerId, f64)> = self
            .customers
            .iter()
            .copied()
            .zip(row.iter().copied())
            .filter(|&(other, _)| other != customer_id)
            .collect();

        neighbors.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        neighbors.truncate(limit);

        Some(neighbors)
    }
}
