//! Balancing configuration parser.
//!
//! ```toml
//! ignored_labels = ["example.com/ready"]
//! include_basic_ignored_labels = true
//! provider = "aws"
//!
//! [difference_ratios]
//! cpu = 0.0
//! memory = 0.015
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Labels that legitimately differ between nodes of interchangeable groups.
const BASIC_IGNORED_LABELS: &[&str] = &[
    "kubernetes.io/hostname",
    "topology.kubernetes.io/zone",
    "topology.kubernetes.io/region",
    "failure-domain.beta.kubernetes.io/zone",
    "failure-domain.beta.kubernetes.io/region",
    "beta.kubernetes.io/fluentd-ds-ready",
];

const AWS_IGNORED_LABELS: &[&str] = &[
    "alpha.eksctl.io/instance-id",
    "alpha.eksctl.io/nodegroup-name",
    "eks.amazonaws.com/nodegroup",
    "k8s.amazonaws.com/eniConfig",
    "lifecycle",
    "topology.ebs.csi.aws.com/zone",
];

const AZURE_IGNORED_LABELS: &[&str] = &[
    "kubernetes.azure.com/agentpool",
    "agentpool",
    "kubernetes.azure.com/node-image-version",
    "topology.disk.csi.azure.com/zone",
];

const GCE_IGNORED_LABELS: &[&str] = &["cloud.google.com/gke-nodepool", "topology.gke.io/zone"];

/// Well-known per-node labels that never take part in similarity checks.
pub fn basic_ignored_labels() -> HashSet<String> {
    BASIC_IGNORED_LABELS.iter().map(|l| l.to_string()).collect()
}

/// Cloud provider whose per-group labels should be ignored as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gce,
}

impl CloudProvider {
    /// Labels the provider stamps per node group.
    pub fn ignored_labels(&self) -> &'static [&'static str] {
        match self {
            CloudProvider::Aws => AWS_IGNORED_LABELS,
            CloudProvider::Azure => AZURE_IGNORED_LABELS,
            CloudProvider::Gce => GCE_IGNORED_LABELS,
        }
    }
}

/// Maximum tolerated relative difference per resource.
///
/// Only resources listed here are compared. Iteration is ordered by resource
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifferenceRatios(BTreeMap<String, f64>);

impl DifferenceRatios {
    /// No resource is compared.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, resource: impl Into<String>, ratio: f64) -> Self {
        self.0.insert(resource.into(), ratio);
        self
    }

    pub fn get(&self, resource: &str) -> Option<f64> {
        self.0.get(resource).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Reject ratios that are negative or not finite.
    pub fn validate(&self) -> ConfigResult<()> {
        for (resource, ratio) in self.iter() {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(ConfigError::InvalidRatio {
                    resource: resource.to_string(),
                    ratio,
                });
            }
        }
        Ok(())
    }
}

impl Default for DifferenceRatios {
    /// Exact cpu match, 1.5% memory tolerance.
    fn default() -> Self {
        Self::empty().with("cpu", 0.0).with("memory", 0.015)
    }
}

/// Inputs of the default similarity comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancingConfig {
    /// Extra label keys excluded from the label equality check.
    pub ignored_labels: Vec<String>,
    pub include_basic_ignored_labels: bool,
    pub provider: Option<CloudProvider>,
    pub difference_ratios: DifferenceRatios,
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            ignored_labels: Vec::new(),
            include_basic_ignored_labels: true,
            provider: None,
            difference_ratios: DifferenceRatios::default(),
        }
    }
}

impl BalancingConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: BalancingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.difference_ratios.validate()
    }

    /// Full set of label keys the default comparator ignores.
    pub fn effective_ignored_labels(&self) -> HashSet<String> {
        let mut labels: HashSet<String> = self.ignored_labels.iter().cloned().collect();
        if self.include_basic_ignored_labels {
            labels.extend(basic_ignored_labels());
        }
        if let Some(provider) = self.provider {
            labels.extend(provider.ignored_labels().iter().map(|l| l.to_string()));
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = BalancingConfig::from_toml_str("").unwrap();
        assert_eq!(config, BalancingConfig::default());
        assert_eq!(config.difference_ratios.get("memory"), Some(0.015));
        assert_eq!(config.difference_ratios.get("cpu"), Some(0.0));
        assert!(config.effective_ignored_labels().contains("kubernetes.io/hostname"));
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
ignored_labels = ["example.com/ready"]
include_basic_ignored_labels = false
provider = "gce"

[difference_ratios]
memory = 0.05
"nvidia.com/gpu" = 0.0
"#;
        let config = BalancingConfig::from_toml_str(toml_str).unwrap();
        let ignored = config.effective_ignored_labels();
        assert!(ignored.contains("example.com/ready"));
        assert!(ignored.contains("cloud.google.com/gke-nodepool"));
        assert!(!ignored.contains("kubernetes.io/hostname"));

        // An explicit table replaces the defaults entirely.
        assert_eq!(config.difference_ratios.get("cpu"), None);
        assert_eq!(config.difference_ratios.get("nvidia.com/gpu"), Some(0.0));
    }

    #[test]
    fn test_rejects_negative_ratio() {
        let toml_str = r#"
[difference_ratios]
memory = -0.1
"#;
        let err = BalancingConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRatio { ref resource, .. } if resource == "memory"));
    }

    #[test]
    fn test_rejects_unknown_provider() {
        let err = BalancingConfig::from_toml_str(r#"provider = "openstack""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = BalancingConfig {
            ignored_labels: vec!["example.com/ready".to_string()],
            provider: Some(CloudProvider::Azure),
            ..BalancingConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("balancing.toml");
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = BalancingConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = BalancingConfig::from_file(Path::new("/nonexistent/balancing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
