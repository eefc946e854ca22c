//! nodegroupset-balance: spread a scale-up across similar node groups.
//!
//! # Balancing Algorithm
//!
//! ```text
//! groups   = input groups with target_size < max_size
//! total    = min(requested, Σ (max_size - target_size))
//!
//! level L  = smallest integer with Σ clamp(L - target_i, 0, max_i - target_i) >= total
//! new_i    = clamp(L - 1, target_i, max_i)
//! leftover = total - Σ (new_i - target_i)
//!            one extra node each to groups that can still reach L
//! ```
//!
//! Sizes converge from the bottom: the smallest groups grow first and no
//! group is raised above the others by more than one node unless a max
//! size gets in the way.

pub mod balancer;

pub use balancer::{ScaleUpBalancer, ScaleUpInfo};
