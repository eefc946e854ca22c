//! Node group and node template types shared across the balancing crates.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BalanceResult;

/// Named resource quantities in base units.
///
/// `cpu` is in millicores, `memory` in bytes, everything else is a plain count.
pub type ResourceList = HashMap<String, u64>;

/// A horizontally scalable pool of nodes, as exposed by the cloud provider.
///
/// The balancing core only reads these accessors. Applying a new target size
/// is the provider's business.
pub trait NodeGroup {
    /// Unique identifier of the group.
    fn id(&self) -> &str;

    /// Minimum configured size.
    fn min_size(&self) -> u32;

    /// Maximum configured size.
    fn max_size(&self) -> u32;

    /// Current target size. May exceed `max_size` if the bounds were lowered
    /// after the group grew.
    fn target_size(&self) -> BalanceResult<u32>;
}

impl<T: NodeGroup + ?Sized> NodeGroup for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn min_size(&self) -> u32 {
        (**self).min_size()
    }

    fn max_size(&self) -> u32 {
        (**self).max_size()
    }

    fn target_size(&self) -> BalanceResult<u32> {
        (**self).target_size()
    }
}

impl<T: NodeGroup + ?Sized> NodeGroup for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn min_size(&self) -> u32 {
        (**self).min_size()
    }

    fn max_size(&self) -> u32 {
        (**self).max_size()
    }

    fn target_size(&self) -> BalanceResult<u32> {
        (**self).target_size()
    }
}

impl<T: NodeGroup + ?Sized> NodeGroup for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn min_size(&self) -> u32 {
        (**self).min_size()
    }

    fn max_size(&self) -> u32 {
        (**self).max_size()
    }

    fn target_size(&self) -> BalanceResult<u32> {
        (**self).target_size()
    }
}

/// Plain-data node group as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroupSnapshot {
    pub id: String,
    pub min_size: u32,
    pub max_size: u32,
    pub target_size: u32,
}

impl NodeGroupSnapshot {
    pub fn new(id: impl Into<String>, min_size: u32, max_size: u32, target_size: u32) -> Self {
        Self {
            id: id.into(),
            min_size,
            max_size,
            target_size,
        }
    }

    /// Nodes that can still be added before hitting `max_size`.
    pub fn headroom(&self) -> u32 {
        self.max_size.saturating_sub(self.target_size)
    }
}

impl NodeGroup for NodeGroupSnapshot {
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

/// Scheduling effect of a taint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaintEffect {
    NoSchedule,
    PreferNoSchedule,
    NoExecute,
}

impl fmt::Display for TaintEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaintEffect::NoSchedule => write!(f, "NoSchedule"),
            TaintEffect::PreferNoSchedule => write!(f, "PreferNoSchedule"),
            TaintEffect::NoExecute => write!(f, "NoExecute"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub effect: TaintEffect,
}

impl Taint {
    pub fn new(key: impl Into<String>, value: Option<&str>, effect: TaintEffect) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_string),
            effect,
        }
    }
}

impl fmt::Display for Taint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}:{}", self.key, v, self.effect),
            None => write!(f, "{}:{}", self.key, self.effect),
        }
    }
}

/// Representative node of a node group.
///
/// Built by the caller from the group's launch configuration; the balancing
/// core only compares templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Name of the representative node.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub taints: Vec<Taint>,
    #[serde(default)]
    pub capacity: ResourceList,
}

impl NodeTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_taint(mut self, taint: Taint) -> Self {
        self.taints.push(taint);
        self
    }

    pub fn with_capacity(mut self, resource: impl Into<String>, quantity: u64) -> Self {
        self.capacity.insert(resource.into(), quantity);
        self
    }

    pub fn quantity(&self, resource: &str) -> Option<u64> {
        self.capacity.get(resource).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_headroom_saturates() {
        assert_eq!(NodeGroupSnapshot::new("ng1", 1, 10, 3).headroom(), 7);
        assert_eq!(NodeGroupSnapshot::new("ng2", 1, 3, 6).headroom(), 0);
    }

    #[test]
    fn node_group_through_references() {
        let group = NodeGroupSnapshot::new("ng1", 1, 10, 4);
        let by_ref: &dyn NodeGroup = &group;
        let boxed: Box<dyn NodeGroup> = Box::new(group.clone());
        let shared = Arc::new(group.clone());

        assert_eq!(by_ref.id(), "ng1");
        assert_eq!(boxed.max_size(), 10);
        assert_eq!(shared.target_size().unwrap(), 4);
    }

    #[test]
    fn taint_display() {
        let with_value = Taint::new("dedicated", Some("gpu"), TaintEffect::NoSchedule);
        let without = Taint::new("spot", None, TaintEffect::PreferNoSchedule);
        assert_eq!(with_value.to_string(), "dedicated=gpu:NoSchedule");
        assert_eq!(without.to_string(), "spot:PreferNoSchedule");
    }

    #[test]
    fn parse_template_from_toml() {
        let toml_str = r#"
name = "n1"
taints = [{ key = "dedicated", value = "gpu", effect = "NoSchedule" }]

[labels]
"node.kubernetes.io/instance-type" = "m5.large"

[capacity]
cpu = 2000
memory = 8589934592
"#;
        let template: NodeTemplate = toml::from_str(toml_str).unwrap();
        assert_eq!(template.name, "n1");
        assert_eq!(template.quantity("cpu"), Some(2000));
        assert_eq!(template.taints[0].effect, TaintEffect::NoSchedule);
        assert_eq!(template.labels.len(), 1);
    }
}
