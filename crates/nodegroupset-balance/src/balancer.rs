//! Scale-up balancer.
//!
//! Distributes a number of new nodes across node groups so that their target
//! sizes converge, never exceeding any group's max size.

use std::fmt;

use nodegroupset_core::{BalanceError, BalanceResult, NodeGroup};
use tracing::{debug, info};

/// Planned size change for a single node group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleUpInfo<G> {
    pub group: G,
    /// Target size when the plan was computed.
    pub current_size: u32,
    pub new_size: u32,
    pub max_size: u32,
}

impl<G> ScaleUpInfo<G> {
    /// Nodes this entry adds. Zero for a hand-built entry that shrinks.
    pub fn delta(&self) -> u32 {
        self.new_size.saturating_sub(self.current_size)
    }
}

impl<G: NodeGroup> fmt::Display for ScaleUpInfo<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}->{} (max: {})",
            self.group.id(),
            self.current_size,
            self.new_size,
            self.max_size
        )
    }
}

/// Water-filling balancer.
///
/// Stateless: every call works on the sizes the groups report at that moment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleUpBalancer;

impl ScaleUpBalancer {
    pub fn new() -> Self {
        Self
    }

    /// Plan adding `new_nodes` nodes across `groups`.
    ///
    /// Groups already at or above their max size are left out. When the
    /// request exceeds the remaining capacity every group is raised to its
    /// max. Only groups whose size changes appear in the result, in input
    /// order.
    ///
    /// Which of several equally sized groups receives a leftover node is not
    /// part of the contract.
    pub fn balance_scale_up_between_groups<'a, G: NodeGroup>(
        &self,
        groups: &'a [G],
        new_nodes: u32,
    ) -> BalanceResult<Vec<ScaleUpInfo<&'a G>>> {
        if new_nodes == 0 {
            return Ok(Vec::new());
        }

        let mut infos = Vec::with_capacity(groups.len());
        let mut capacity: u64 = 0;
        for group in groups {
            let min_size = group.min_size();
            let max_size = group.max_size();
            if min_size > max_size {
                return Err(BalanceError::InvalidBounds {
                    group: group.id().to_string(),
                    min_size,
                    max_size,
                });
            }
            let current_size = group.target_size()?;
            if current_size >= max_size {
                debug!(group = %group.id(), current_size, max_size, "node group at max size, skipping");
                continue;
            }
            capacity += u64::from(max_size - current_size);
            infos.push(ScaleUpInfo {
                group,
                current_size,
                new_size: current_size,
                max_size,
            });
        }

        if infos.is_empty() {
            return Ok(Vec::new());
        }

        let mut total = u64::from(new_nodes);
        if total > capacity {
            info!(
                requested = new_nodes,
                capacity, "requested scale-up exceeds node group set capacity, capping"
            );
            total = capacity;
        }

        let level = water_level(&infos, total);
        let mut remaining = total;
        for info in infos.iter_mut() {
            info.new_size = level.saturating_sub(1).clamp(info.current_size, info.max_size);
            remaining -= u64::from(info.delta());
        }

        // Fewer leftover nodes than groups that can still reach the level.
        for info in infos.iter_mut() {
            if remaining == 0 {
                break;
            }
            if info.current_size < level && info.max_size >= level {
                info.new_size = level;
                remaining -= 1;
            }
        }
        debug_assert_eq!(remaining, 0);

        let plan: Vec<_> = infos
            .into_iter()
            .filter(|info| info.new_size > info.current_size)
            .collect();
        for info in &plan {
            debug!(
                group = %info.group.id(),
                from = info.current_size,
                to = info.new_size,
                max = info.max_size,
                "planned scale-up"
            );
        }
        Ok(plan)
    }
}

/// Nodes consumed when every group is raised to `level`, capped at its max.
fn consumed<G>(infos: &[ScaleUpInfo<G>], level: u32) -> u64 {
    infos
        .iter()
        .map(|info| u64::from(level.min(info.max_size).saturating_sub(info.current_size)))
        .sum()
}

/// Smallest integer level whose consumption reaches `total`.
///
/// `infos` is non-empty, every group has headroom, and `0 < total <= capacity`.
fn water_level<G>(infos: &[ScaleUpInfo<G>], total: u64) -> u32 {
    let mut low = infos.iter().map(|i| i.current_size).min().unwrap_or(0);
    let mut high = infos.iter().map(|i| i.max_size).max().unwrap_or(0);
    // consumed(low) == 0 < total <= consumed(high)
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if consumed(infos, mid) >= total {
            high = mid;
        } else {
            low = mid;
        }
    }
    high
}
