//! nodegroupset-core: shared types for node group balancing.
//!
//! Holds the collaborator interface (`NodeGroup`), the representative node
//! descriptor used for similarity checks (`NodeTemplate`), and the balancing
//! configuration loaded from TOML (`BalancingConfig`).
//!
//! Nothing here performs I/O against a cloud provider. Node groups and
//! templates are read-only snapshots handed in by the caller.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BalancingConfig, CloudProvider, DifferenceRatios, basic_ignored_labels};
pub use error::{BalanceError, BalanceResult, ConfigError, ConfigResult};
pub use types::*;
