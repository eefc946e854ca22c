//! nodegroupset-similarity: which node groups are interchangeable.
//!
//! Two node groups are similar when their representative templates would
//! schedule the same pods. The autoscaler only spreads a scale-up across
//! similar groups.
//!
//! # Components
//!
//! - **`comparator`**: `NodeInfoComparator` trait and the default
//!   label/taint/resource-ratio comparator
//! - **`matcher`**: `SimilarityMatcher`, filtering and partitioning groups
//!   with any comparator

pub mod comparator;
pub mod matcher;

pub use comparator::{DefaultComparator, NodeInfoComparator, relative_difference};
pub use matcher::SimilarityMatcher;
