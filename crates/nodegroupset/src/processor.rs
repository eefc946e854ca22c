//! Node group set processing.
//!
//! `BalancingProcessor` answers the two questions the autoscaler asks when
//! it scales up: which other groups could take the new nodes, and how many
//! each of them should get.

use std::collections::HashMap;

use nodegroupset_balance::{ScaleUpBalancer, ScaleUpInfo};
use nodegroupset_core::{BalanceError, BalanceResult, BalancingConfig, NodeGroup, NodeTemplate};
use nodegroupset_similarity::{DefaultComparator, NodeInfoComparator, SimilarityMatcher};
use tracing::{debug, warn};

/// Finds similar node groups and balances scale-ups between them.
pub trait NodeGroupSetProcessor {
    /// Groups in `all_groups` similar to `group`, excluding `group` itself.
    ///
    /// `templates` maps group id to its representative node. Fails if
    /// `group` has no template; other groups without one are skipped.
    fn find_similar_node_groups<'a, G: NodeGroup>(
        &self,
        group: &G,
        all_groups: &'a [G],
        templates: &HashMap<String, NodeTemplate>,
    ) -> BalanceResult<Vec<&'a G>>;

    /// Spread `new_nodes` across `groups`. See `ScaleUpBalancer`.
    fn balance_scale_up_between_groups<'a, G: NodeGroup>(
        &self,
        groups: &'a [G],
        new_nodes: u32,
    ) -> BalanceResult<Vec<ScaleUpInfo<&'a G>>>;

    /// Release anything held between loop iterations.
    fn clean_up(&mut self) {}
}

/// Processor backed by a `SimilarityMatcher` and a `ScaleUpBalancer`.
#[derive(Debug, Clone, Default)]
pub struct BalancingProcessor<C = DefaultComparator> {
    matcher: SimilarityMatcher<C>,
    balancer: ScaleUpBalancer,
}

impl BalancingProcessor<DefaultComparator> {
    pub fn new(config: &BalancingConfig) -> Self {
        Self::with_comparator(DefaultComparator::from_config(config))
    }
}

impl<C: NodeInfoComparator> BalancingProcessor<C> {
    /// Processor using a caller-supplied comparator.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            matcher: SimilarityMatcher::new(comparator),
            balancer: ScaleUpBalancer::new(),
        }
    }
}

impl<C: NodeInfoComparator> NodeGroupSetProcessor for BalancingProcessor<C> {
    fn find_similar_node_groups<'a, G: NodeGroup>(
        &self,
        group: &G,
        all_groups: &'a [G],
        templates: &HashMap<String, NodeTemplate>,
    ) -> BalanceResult<Vec<&'a G>> {
        let group_id = group.id();
        let reference = templates
            .get(group_id)
            .ok_or_else(|| BalanceError::MissingTemplate(group_id.to_string()))?;

        let candidates = all_groups
            .iter()
            .filter(|candidate| candidate.id() != group_id)
            .filter_map(|candidate| match templates.get(candidate.id()) {
                Some(template) => Some((candidate, template)),
                None => {
                    warn!(group = %candidate.id(), "no node template for node group, skipping");
                    None
                }
            });

        let similar = self.matcher.find_similar(reference, candidates);
        debug!(group = %group_id, similar = similar.len(), "found similar node groups");
        Ok(similar)
    }

    fn balance_scale_up_between_groups<'a, G: NodeGroup>(
        &self,
        groups: &'a [G],
        new_nodes: u32,
    ) -> BalanceResult<Vec<ScaleUpInfo<&'a G>>> {
        self.balancer.balance_scale_up_between_groups(groups, new_nodes)
    }
}
