//! Query-time errors of the recommendation engine.

use data_loader::CustomerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// The customer has no row in the similarity index
    #[error("Customer ID {0} not found.")]
    NotFound(CustomerId),

    /// A filter in the pipeline failed
    #[error("Filter pipeline failed: {0}")]
    Pipeline(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
