//! Oracle trait for batched position evaluation.
//!
//! The oracle provides policy priors and value estimates for encoded game
//! states. In training this is a neural network; for testing and bootstrapping
//! we provide a uniform oracle that returns equal priors.

use engine_core::EncodedBatch;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model error: {0}")]
    ModelError(String),
}

/// Result of evaluating one game state.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    /// Prior over the full action space, legal or not.
    /// Index i corresponds to action i.
    pub policy: Vec<f32>,

    /// Value estimate for the player to move.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

/// Batched policy/value oracle.
///
/// Called once per search minibatch with every newly discovered leaf; must
/// return exactly one [`EvalResult`] per sample, in order.
pub trait Oracle: Send + Sync {
    fn evaluate(&self, batch: &EncodedBatch) -> Result<Vec<EvalResult>, OracleError>;
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn evaluate(&self, batch: &EncodedBatch) -> Result<Vec<EvalResult>, OracleError> {
        (**self).evaluate(batch)
    }
}

impl<T: Oracle + ?Sized> Oracle for Box<T> {
    fn evaluate(&self, batch: &EncodedBatch) -> Result<Vec<EvalResult>, OracleError> {
        (**self).evaluate(batch)
    }
}

/// Oracle that assigns equal probability to every action and a neutral value.
///
/// It never sees legality, so illegal actions get prior mass too; the search
/// masks them out during selection.
#[derive(Debug, Clone)]
pub struct UniformOracle {
    action_space: usize,
}

impl UniformOracle {
    pub fn new(action_space: usize) -> Self {
        Self { action_space }
    }

    pub fn action_space(&self) -> usize {
        self.action_space
    }
}

impl Oracle for UniformOracle {
    fn evaluate(&self, batch: &EncodedBatch) -> Result<Vec<EvalResult>, OracleError> {
        if self.action_space == 0 {
            return Err(OracleError::InvalidInput(
                "action space must be non-empty".to_string(),
            ));
        }
        let prob = 1.0 / self.action_space as f32;
        Ok((0..batch.batch_size)
            .map(|_| EvalResult {
                policy: vec![prob; self.action_space],
                value: 0.0,
            })
            .collect())
    }
}
