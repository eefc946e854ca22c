//! Scenario files.
//!
//! A scenario is a snapshot of node groups with their templates, plus the
//! balancing config to evaluate them with:
//!
//! ```toml
//! [config]
//! ignored_labels = ["example.com/ready"]
//!
//! [[groups]]
//! id = "ng1"
//! min_size = 1
//! max_size = 10
//! target_size = 3
//!
//! [groups.template]
//! name = "n1"
//! capacity = { cpu = 2000, memory = 8589934592 }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use nodegroupset_core::{BalanceResult, BalancingConfig, NodeGroup, NodeTemplate};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, ProcessorResult};

/// A node group together with its representative node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioGroup {
    pub id: String,
    pub min_size: u32,
    pub max_size: u32,
    pub target_size: u32,
    #[serde(default)]
    pub template: NodeTemplate,
}

impl NodeGroup for ScenarioGroup {
    fn id(&self) -> &str {
        &self.id
    }

    fn min_size(&self) -> u32 {
        self.min_size
    }

    fn max_size(&self) -> u32 {
        self.max_size
    }

    fn target_size(&self) -> BalanceResult<u32> {
        Ok(self.target_size)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: BalancingConfig,
    #[serde(default)]
    pub groups: Vec<ScenarioGroup>,
}

impl Scenario {
    pub fn from_file(path: &Path) -> ProcessorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate: ratios must be sane and group ids unique.
    pub fn from_toml_str(content: &str) -> ProcessorResult<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.config.validate()?;

        let mut seen = HashSet::new();
        for group in &scenario.groups {
            if !seen.insert(group.id.as_str()) {
                return Err(ProcessorError::DuplicateGroup(group.id.clone()));
            }
        }
        Ok(scenario)
    }

    pub fn group(&self, id: &str) -> ProcessorResult<&ScenarioGroup> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| ProcessorError::GroupNotFound(id.to_string()))
    }

    /// Groups with the given ids, in the order given.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> ProcessorResult<Vec<&ScenarioGroup>> {
        ids.iter().map(|id| self.group(id.as_ref())).collect()
    }

    /// Group id to template, as `NodeGroupSetProcessor` expects.
    pub fn templates(&self) -> HashMap<String, NodeTemplate> {
        self.groups
            .iter()
            .map(|g| (g.id.clone(), g.template.clone()))
            .collect()
    }
}
