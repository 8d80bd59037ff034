//! Filtering of ranked item candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::MinimumInventoryFilter;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(MinimumInventoryFilter::new(index.clone()));
//!
//! let filtered = pipeline.apply(candidates, &request)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
