//! # Similarity Crate
//!
//! Customer profiles, customer-to-customer similarity, and the
//! neighborhood-based item candidates built on top of them.
//!
//! ## Components
//!
//! ### Profile Builder (`profile`)
//! - Text profile per customer: purchased item names in dataset order
//! - Customer × item matrix of summed quantities
//!
//! ### Similarity Engine (`tfidf`, `matrix`)
//! - TF-IDF vectors over the profiles, one document per customer
//! - Symmetric cosine similarity matrix, built once at startup
//!
//! ### Neighborhood Source (`neighborhood`)
//! - Most similar other customers to a target
//! - Items ranked by mean quantity across that neighborhood
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{build_profiles, NeighborhoodSource, RecommendationRequest, SimilarityMatrix};
//! use std::sync::Arc;
//!
//! let built = build_profiles(&data_index);
//! let matrix = SimilarityMatrix::from_profiles(&built.profiles);
//! let source = NeighborhoodSource::new(Arc::new(matrix), Arc::new(built.item_matrix));
//!
//! let candidates = source.get_candidates(&RecommendationRequest::new(42));
//! ```

// Public modules
pub mod matrix;
pub mod neighborhood;
pub mod profile;
pub mod tfidf;
pub mod types;

// Re-export commonly used types
pub use matrix::SimilarityMatrix;
pub use neighborhood::NeighborhoodSource;
pub use profile::{CustomerItemMatrix, CustomerProfile, CustomerProfiles, build_profiles};
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use types::{DEFAULT_MIN_INVENTORY, DEFAULT_TOP_N, ItemCandidate, RecommendationRequest};
