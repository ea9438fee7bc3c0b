//! State-keyed tree store with arena allocation.
//!
//! Nodes are keyed by canonical [`StateKey`], so transpositions share one
//! record. Each node gets a dense [`NodeId`]; its four statistics arrays live
//! in flat vectors of length `nodes * action_space`, addressed by
//! `id * action_space + action`.
//!
//! A state is either wholly absent (a leaf) or fully present with all four
//! arrays sized to the action space. Records are created only by
//! [`MctsTree::create_node`], mutated only by [`MctsTree::backup`] and
//! discarded only by [`MctsTree::clear`].

use std::collections::HashMap;

use engine_core::StateKey;
use tracing::debug;

use crate::node::{NodeId, NodeStats, Step};
use crate::search::SearchError;

/// Tree store shared by every search over one game variant.
#[derive(Debug, Clone)]
pub struct MctsTree {
    action_space: usize,
    index: HashMap<StateKey, NodeId>,
    keys: Vec<StateKey>,
    visit_count: Vec<u32>,
    cumulative_value: Vec<f32>,
    mean_value: Vec<f32>,
    prior: Vec<f32>,
}

impl MctsTree {
    pub fn new(action_space: usize) -> Self {
        Self {
            action_space,
            index: HashMap::new(),
            keys: Vec::new(),
            visit_count: Vec::new(),
            cumulative_value: Vec::new(),
            mean_value: Vec::new(),
            prior: Vec::new(),
        }
    }

    #[inline]
    pub fn action_space(&self) -> usize {
        self.action_space
    }

    /// Number of recorded states.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True iff `state` has no record.
    #[inline]
    pub fn is_leaf(&self, state: &StateKey) -> bool {
        !self.index.contains_key(state)
    }

    #[inline]
    pub fn node_id(&self, state: &StateKey) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    /// Key of a recorded node.
    pub fn state(&self, node: NodeId) -> &StateKey {
        &self.keys[node.index()]
    }

    /// Record `state` with zeroed statistics and the given priors.
    pub fn create_node(&mut self, state: StateKey, priors: &[f32]) -> Result<NodeId, SearchError> {
        if priors.len() != self.action_space {
            return Err(SearchError::MalformedOracleOutput(format!(
                "prior length {} does not match action space {}",
                priors.len(),
                self.action_space
            )));
        }
        if self.index.contains_key(&state) {
            return Err(SearchError::NodeExists(state));
        }

        let id = NodeId(self.keys.len() as u32);
        let n = self.action_space;
        self.visit_count.resize(self.visit_count.len() + n, 0);
        self.cumulative_value
            .resize(self.cumulative_value.len() + n, 0.0);
        self.mean_value.resize(self.mean_value.len() + n, 0.0);
        self.prior.extend_from_slice(priors);
        self.index.insert(state.clone(), id);
        self.keys.push(state);
        Ok(id)
    }

    #[inline]
    fn range(&self, node: NodeId) -> std::ops::Range<usize> {
        let start = node.index() * self.action_space;
        start..start + self.action_space
    }

    /// Borrow the statistics of a recorded node.
    pub fn stats(&self, node: NodeId) -> NodeStats<'_> {
        let r = self.range(node);
        NodeStats {
            visit_count: &self.visit_count[r.clone()],
            cumulative_value: &self.cumulative_value[r.clone()],
            mean_value: &self.mean_value[r.clone()],
            prior: &self.prior[r],
        }
    }

    /// Statistics by state, or `UnknownState` if it has no record.
    pub fn stats_for(&self, state: &StateKey) -> Result<NodeStats<'_>, SearchError> {
        let node = self
            .node_id(state)
            .ok_or_else(|| SearchError::UnknownState(state.clone()))?;
        Ok(self.stats(node))
    }

    /// Sum of visit counts at `node`.
    pub fn total_visits(&self, node: NodeId) -> u32 {
        self.visit_count[self.range(node)].iter().sum()
    }

    /// Propagate a leaf value back along a trajectory.
    ///
    /// `value` is from the perspective of the player to move at the leaf, so
    /// the last step (taken by the opponent) is credited with `-value` and the
    /// sign alternates toward the root.
    pub fn backup(&mut self, value: f32, trajectory: &[Step]) {
        let mut current = -value;
        for step in trajectory.iter().rev() {
            let i = step.node.index() * self.action_space + step.action;
            self.visit_count[i] += 1;
            self.cumulative_value[i] += current;
            self.mean_value[i] = self.cumulative_value[i] / self.visit_count[i] as f32;
            current = -current;
        }
    }

    /// Move distribution derived from the visit counts at `state`.
    ///
    /// `temperature == 0` puts all mass on the lowest-index most-visited
    /// action. Otherwise each count is raised to `1 / temperature` and the
    /// result normalized.
    pub fn policy(&self, state: &StateKey, temperature: f32) -> Result<Vec<f32>, SearchError> {
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "temperature must be finite and non-negative, got {}",
                temperature
            )));
        }
        let stats = self.stats_for(state)?;
        let counts = stats.visit_count;
        let max = counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return Err(SearchError::NoVisits(state.clone()));
        }
        let mut policy = vec![0.0; counts.len()];

        if temperature == 0.0 {
            if let Some(best) = argmax_first(counts) {
                policy[best] = 1.0;
            }
            return Ok(policy);
        }

        // Scale by the max count first so large exponents stay finite.
        let inv_t = 1.0 / temperature as f64;
        let scaled: Vec<f64> = counts
            .iter()
            .map(|&c| (c as f64 / max as f64).powf(inv_t))
            .collect();
        let total: f64 = scaled.iter().sum();
        for (p, s) in policy.iter_mut().zip(&scaled) {
            *p = (s / total) as f32;
        }
        Ok(policy)
    }

    /// Discard every record.
    pub fn clear(&mut self) {
        debug!(nodes = self.len(), "Clearing tree store");
        self.index.clear();
        self.keys.clear();
        self.visit_count.clear();
        self.cumulative_value.clear();
        self.mean_value.clear();
        self.prior.clear();
    }

    /// Summary for logging; `root` visits are 0 when it has no record.
    pub fn summary(&self, root: &StateKey) -> TreeStats {
        let root_visits = self.node_id(root).map_or(0, |id| self.total_visits(id));
        TreeStats {
            total_nodes: self.len(),
            root_visits,
        }
    }
}

/// Lowest index holding the maximum count.
fn argmax_first(counts: &[u32]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &c) in counts.iter().enumerate() {
        if best.map_or(true, |(_, b)| c > b) {
            best = Some((i, c));
        }
    }
    best.map(|(i, _)| i)
}

/// Statistics about a tree store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
}
