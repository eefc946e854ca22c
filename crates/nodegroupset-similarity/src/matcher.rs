//! Similarity matching over candidate node groups.

use nodegroupset_core::{BalancingConfig, NodeTemplate};
use tracing::debug;

use crate::comparator::{DefaultComparator, NodeInfoComparator};

/// Filters node groups down to those similar to a reference template.
///
/// Stateless apart from the comparator; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatcher<C = DefaultComparator> {
    comparator: C,
}

impl SimilarityMatcher<DefaultComparator> {
    /// Matcher using the default comparator built from `config`.
    pub fn from_config(config: &BalancingConfig) -> Self {
        Self::new(DefaultComparator::from_config(config))
    }
}

impl<C: NodeInfoComparator> SimilarityMatcher<C> {
    pub fn new(comparator: C) -> Self {
        Self { comparator }
    }

    /// Every candidate whose template is similar to `reference`, in input
    /// order.
    ///
    /// A candidate carrying the reference template itself is kept whenever
    /// the comparator accepts it, which the default comparator always does.
    pub fn find_similar<'t, G, I>(&self, reference: &NodeTemplate, candidates: I) -> Vec<G>
    where
        I: IntoIterator<Item = (G, &'t NodeTemplate)>,
    {
        candidates
            .into_iter()
            .filter(|(_, template)| self.comparator.similar(reference, template))
            .map(|(group, _)| group)
            .collect()
    }

    /// Greedy partition into similarity classes.
    ///
    /// The first unassigned candidate seeds a class; every later unassigned
    /// candidate similar to the seed joins it. Classes and their members keep
    /// input order.
    pub fn partition<'a, G: ?Sized>(&self, candidates: &[(&'a G, &NodeTemplate)]) -> Vec<Vec<&'a G>> {
        let mut assigned = vec![false; candidates.len()];
        let mut classes = Vec::new();

        for seed in 0..candidates.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;
            let (seed_group, seed_template) = candidates[seed];
            let mut class = vec![seed_group];

            for other in seed + 1..candidates.len() {
                if assigned[other] {
                    continue;
                }
                let (group, template) = candidates[other];
                if self.comparator.similar(seed_template, template) {
                    assigned[other] = true;
                    class.push(group);
                }
            }
            classes.push(class);
        }

        debug!(candidates = candidates.len(), classes = classes.len(), "partitioned node groups");
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegroupset_core::{DifferenceRatios, NodeGroup, NodeGroupSnapshot};

    fn make_template(name: &str, cpu: u64) -> NodeTemplate {
        NodeTemplate::new(name)
            .with_capacity("cpu", cpu)
            .with_capacity("memory", 8 * 1024 * 1024 * 1024)
            .with_label("kubernetes.io/hostname", name)
    }

    /// Three groups: n1 and n2 look alike, n3 has twice the cpu.
    fn basic_groups() -> Vec<(NodeGroupSnapshot, NodeTemplate)> {
        vec![
            (NodeGroupSnapshot::new("ng1", 1, 10, 1), make_template("n1", 1000)),
            (NodeGroupSnapshot::new("ng2", 1, 10, 1), make_template("n2", 1000)),
            (NodeGroupSnapshot::new("ng3", 1, 10, 1), make_template("n3", 2000)),
        ]
    }

    fn similar_ids<C: NodeInfoComparator>(
        matcher: &SimilarityMatcher<C>,
        groups: &[(NodeGroupSnapshot, NodeTemplate)],
        reference: usize,
    ) -> Vec<String> {
        let others = groups
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != reference)
            .map(|(_, (g, t))| (g, t));
        matcher
            .find_similar(&groups[reference].1, others)
            .into_iter()
            .map(|g| g.id().to_string())
            .collect()
    }

    #[test]
    fn finds_similar_groups_with_default_comparator() {
        let groups = basic_groups();
        let matcher = SimilarityMatcher::from_config(&BalancingConfig::default());

        assert_eq!(similar_ids(&matcher, &groups, 0), vec!["ng2"]);
        assert_eq!(similar_ids(&matcher, &groups, 1), vec!["ng1"]);
        assert!(similar_ids(&matcher, &groups, 2).is_empty());
    }

    #[test]
    fn reference_group_is_included_when_present() {
        let groups = basic_groups();
        let matcher = SimilarityMatcher::from_config(&BalancingConfig::default());
        let all = groups.iter().map(|(g, t)| (g, t));

        let ids: Vec<&str> = matcher.find_similar(&groups[0].1, all).into_iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec!["ng1", "ng2"]);
    }

    #[test]
    fn finds_similar_groups_with_custom_ignored_label() {
        let mut groups = basic_groups();
        groups[0].1.labels.insert("example.com/ready".to_string(), "true".to_string());
        groups[1].1.labels.insert("example.com/ready".to_string(), "false".to_string());

        let strict = SimilarityMatcher::from_config(&BalancingConfig::default());
        assert!(similar_ids(&strict, &groups, 0).is_empty());

        let config = BalancingConfig {
            ignored_labels: vec!["example.com/ready".to_string()],
            ..BalancingConfig::default()
        };
        let matcher = SimilarityMatcher::from_config(&config);
        assert_eq!(similar_ids(&matcher, &groups, 0), vec!["ng2"]);
        assert_eq!(similar_ids(&matcher, &groups, 1), vec!["ng1"]);
        assert!(similar_ids(&matcher, &groups, 2).is_empty());
    }

    #[test]
    fn finds_similar_groups_with_custom_comparator() {
        let groups = basic_groups();
        let matcher = SimilarityMatcher::new(|a: &NodeTemplate, b: &NodeTemplate| {
            (a.name == "n1" && b.name == "n2") || (a.name == "n2" && b.name == "n1")
        });

        assert_eq!(similar_ids(&matcher, &groups, 0), vec!["ng2"]);
        assert_eq!(similar_ids(&matcher, &groups, 1), vec!["ng1"]);
        assert!(similar_ids(&matcher, &groups, 2).is_empty());
    }

    #[test]
    fn no_ratios_ignores_resources() {
        let groups = basic_groups();
        let comparator = DefaultComparator::new(["kubernetes.io/hostname"], DifferenceRatios::empty());
        let matcher = SimilarityMatcher::new(comparator);

        assert_eq!(similar_ids(&matcher, &groups, 2), vec!["ng1", "ng2"]);
    }

    #[test]
    fn partition_keeps_input_order() {
        let groups = vec![
            (NodeGroupSnapshot::new("small-a", 0, 5, 1), make_template("a", 1000)),
            (NodeGroupSnapshot::new("large-a", 0, 5, 1), make_template("b", 4000)),
            (NodeGroupSnapshot::new("small-b", 0, 5, 2), make_template("c", 1000)),
            (NodeGroupSnapshot::new("large-b", 0, 5, 0), make_template("d", 4000)),
            (NodeGroupSnapshot::new("medium", 0, 5, 0), make_template("e", 2000)),
        ];
        let pairs: Vec<(&NodeGroupSnapshot, &NodeTemplate)> = groups.iter().map(|(g, t)| (g, t)).collect();
        let matcher = SimilarityMatcher::from_config(&BalancingConfig::default());

        let classes: Vec<Vec<&str>> = matcher
            .partition(&pairs)
            .into_iter()
            .map(|class| class.into_iter().map(|g| g.id()).collect())
            .collect();

        assert_eq!(
            classes,
            vec![vec!["small-a", "small-b"], vec!["large-a", "large-b"], vec!["medium"]]
        );
    }

    #[test]
    fn partition_of_nothing() {
        let matcher = SimilarityMatcher::from_config(&BalancingConfig::default());
        let pairs: Vec<(&NodeGroupSnapshot, &NodeTemplate)> = Vec::new();
        assert!(matcher.partition(&pairs).is_empty());
    }
}
