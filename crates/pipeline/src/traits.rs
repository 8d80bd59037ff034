//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to ranked item candidates.

use anyhow::Result;
use similarity::{ItemCandidate, RecommendationRequest};

/// Core trait for filtering candidates.
///
/// Filters take ownership of the ranked candidates and must preserve the
/// relative order of the ones they keep.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a ranked set of candidates.
    fn apply(
        &self,
        candidates: Vec<ItemCandidate>,
        request: &RecommendationRequest,
    ) -> Result<Vec<ItemCandidate>>;
}
