//! MCTS configuration parameters.

use crate::search::SearchError;

/// Selection parameters for PUCT search.
///
/// The search budget (minibatches per move, descents per minibatch) is passed
/// to [`crate::MctsSearch::search_batch`] directly, since callers vary it per
/// phase (self-play vs. arena).
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant for the PUCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Dirichlet noise alpha for root exploration.
    /// Set to 0.0 to disable noise (for evaluation/inference).
    pub dirichlet_alpha: f32,

    /// Fraction of the root prior that comes from Dirichlet noise.
    /// 0.25 means 75% prior + 25% noise.
    pub dirichlet_epsilon: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            c_puct: 1.5,
            dirichlet_alpha: 0.03,
            dirichlet_epsilon: 0.25,
        }
    }
}

impl MctsConfig {
    /// Create config for training (with exploration noise).
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Create config for evaluation/inference (no noise).
    pub fn for_evaluation() -> Self {
        Self::default().without_noise()
    }

    /// Create a deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            c_puct: 1.5,
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
        }
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set root noise parameters.
    pub fn with_dirichlet(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Builder pattern: disable root noise.
    pub fn without_noise(mut self) -> Self {
        self.dirichlet_alpha = 0.0;
        self.dirichlet_epsilon = 0.0;
        self
    }

    /// Whether descents mix Dirichlet noise into the root priors.
    #[inline]
    pub fn noise_enabled(&self) -> bool {
        self.dirichlet_alpha > 0.0 && self.dirichlet_epsilon > 0.0
    }

    /// Reject values that would make scores NaN or the noise undefined.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "c_puct must be finite and non-negative, got {}",
                self.c_puct
            )));
        }
        if !self.dirichlet_alpha.is_finite() || self.dirichlet_alpha < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_alpha must be finite and non-negative, got {}",
                self.dirichlet_alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            )));
        }
        Ok(())
    }
}
