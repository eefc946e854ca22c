//! Template comparison.
//!
//! The default comparator judges two templates similar when:
//! - their labels are equal once ignored keys are dropped,
//! - their taints are equal as sets,
//! - every configured resource differs by no more than its ratio.
//!
//! Callers can swap in any predicate through `NodeInfoComparator`.

use std::collections::HashSet;

use nodegroupset_core::{BalancingConfig, CloudProvider, DifferenceRatios, NodeTemplate, Taint, basic_ignored_labels};
use tracing::trace;

/// Decides whether two node templates are interchangeable.
///
/// Implementations need not be symmetric or transitive.
pub trait NodeInfoComparator: Send + Sync {
    fn similar(&self, a: &NodeTemplate, b: &NodeTemplate) -> bool;
}

impl<F> NodeInfoComparator for F
where
    F: Fn(&NodeTemplate, &NodeTemplate) -> bool + Send + Sync,
{
    fn similar(&self, a: &NodeTemplate, b: &NodeTemplate) -> bool {
        self(a, b)
    }
}

/// Relative difference `|a - b| / max(a, b, 1)`.
pub fn relative_difference(a: u64, b: u64) -> f64 {
    let larger = a.max(b);
    let smaller = a.min(b);
    (larger - smaller) as f64 / larger.max(1) as f64
}

/// Label, taint and resource-ratio comparator.
#[derive(Debug, Clone)]
pub struct DefaultComparator {
    ignored_labels: HashSet<String>,
    ratios: DifferenceRatios,
}

impl DefaultComparator {
    pub fn new<I, S>(ignored_labels: I, ratios: DifferenceRatios) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_labels: ignored_labels.into_iter().map(Into::into).collect(),
            ratios,
        }
    }

    pub fn from_config(config: &BalancingConfig) -> Self {
        Self {
            ignored_labels: config.effective_ignored_labels(),
            ratios: config.difference_ratios.clone(),
        }
    }

    /// Basic ignored labels plus the provider's per-group labels plus `extra`.
    pub fn for_provider<I, S>(provider: CloudProvider, extra: I, ratios: DifferenceRatios) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ignored_labels = basic_ignored_labels();
        ignored_labels.extend(provider.ignored_labels().iter().map(|l| l.to_string()));
        ignored_labels.extend(extra.into_iter().map(Into::into));
        Self {
            ignored_labels,
            ratios,
        }
    }

    fn labels_match(&self, a: &NodeTemplate, b: &NodeTemplate) -> bool {
        let relevant = |t: &NodeTemplate| {
            t.labels
                .keys()
                .filter(|k| !self.ignored_labels.contains(*k))
                .count()
        };
        if relevant(a) != relevant(b) {
            return false;
        }
        a.labels
            .iter()
            .filter(|(k, _)| !self.ignored_labels.contains(*k))
            .all(|(k, v)| b.labels.get(k).is_some_and(|bv| bv == v))
    }

    fn taints_match(a: &NodeTemplate, b: &NodeTemplate) -> bool {
        let left: HashSet<&Taint> = a.taints.iter().collect();
        let right: HashSet<&Taint> = b.taints.iter().collect();
        left == right
    }

    fn resources_within_tolerance(&self, a: &NodeTemplate, b: &NodeTemplate) -> bool {
        for (resource, ratio) in self.ratios.iter() {
            match (a.quantity(resource), b.quantity(resource)) {
                (None, None) => {}
                (Some(qa), Some(qb)) => {
                    let diff = relative_difference(qa, qb);
                    if diff > ratio {
                        trace!(resource, a = qa, b = qb, diff, ratio, "resource difference above ratio");
                        return false;
                    }
                }
                _ => {
                    trace!(resource, "resource missing from one template");
                    return false;
                }
            }
        }
        true
    }
}

impl Default for DefaultComparator {
    fn default() -> Self {
        Self::from_config(&BalancingConfig::default())
    }
}

impl NodeInfoComparator for DefaultComparator {
    fn similar(&self, a: &NodeTemplate, b: &NodeTemplate) -> bool {
        if !self.labels_match(a, b) {
            trace!(a = %a.name, b = %b.name, "labels differ");
            return false;
        }
        if !Self::taints_match(a, b) {
            trace!(a = %a.name, b = %b.name, "taints differ");
            return false;
        }
        self.resources_within_tolerance(a, b)
    }
}
