//! nodegroupset: balancing scale-ups across similar node groups.
//!
//! The surrounding autoscaler partitions its node groups into sets of
//! similar groups, then spreads each scale-up over one such set. This crate
//! bundles both steps behind `NodeGroupSetProcessor` and re-exports the
//! building blocks.
//!
//! # Components
//!
//! - **`processor`**: `NodeGroupSetProcessor` trait and `BalancingProcessor`
//! - **`scenario`**: TOML scenario files (config + groups + templates)
//! - **`error`**: processor and scenario errors

pub mod error;
pub mod processor;
pub mod scenario;

pub use error::{ProcessorError, ProcessorResult};
pub use processor::{BalancingProcessor, NodeGroupSetProcessor};
pub use scenario::{Scenario, ScenarioGroup};

pub use nodegroupset_balance::{ScaleUpBalancer, ScaleUpInfo};
pub use nodegroupset_core::{
    BalanceError, BalanceResult, BalancingConfig, CloudProvider, ConfigError, ConfigResult, DifferenceRatios, NodeGroup,
    NodeGroupSnapshot, NodeTemplate, ResourceList, Taint, TaintEffect, basic_ignored_labels,
};
pub use nodegroupset_similarity::{DefaultComparator, NodeInfoComparator, SimilarityMatcher};
