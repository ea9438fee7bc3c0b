//! Node handles and per-node statistics views.
//!
//! A node is one recorded state. Its statistics are four parallel arrays over
//! the full action space, stored by [`crate::MctsTree`] in flat vectors and
//! exposed here as borrowed slices.

use engine_core::Player;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Borrowed statistics of one node, indexed by action.
#[derive(Debug, Clone, Copy)]
pub struct NodeStats<'a> {
    pub visit_count: &'a [u32],
    pub cumulative_value: &'a [f32],
    /// `cumulative_value / visit_count`, 0 when unvisited
    pub mean_value: &'a [f32],
    /// Oracle prior over the full action space
    pub prior: &'a [f32],
}

impl NodeStats<'_> {
    /// Sum of visit counts over all actions.
    pub fn total_visits(&self) -> u32 {
        self.visit_count.iter().sum()
    }

    pub fn action_space(&self) -> usize {
        self.visit_count.len()
    }
}

/// One edge taken during a descent: `player` chose `action` at `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub node: NodeId,
    pub player: Player,
    pub action: usize,
}

/// Edges from the search root down to, but excluding, the discovered leaf.
pub type Trajectory = Vec<Step>;
