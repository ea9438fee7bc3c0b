//! In-memory replay buffer for self-play training samples.
//!
//! Every move of a finished game becomes one [`ReplaySample`]: the position,
//! the player to move, the visit-count distribution the search produced and
//! the final outcome from that player's point of view. Samples are appended
//! through the [`ReplaySink`] trait so the self-play driver does not care
//! where they end up.

use std::collections::VecDeque;

use engine_core::{Player, StateKey};
use rand::seq::index;
use rand::Rng;
use thiserror::Error;
use tracing::trace;

/// Errors from reading the replay buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Requested {requested} samples but only {available} are stored")]
    NotEnoughSamples { requested: usize, available: usize },

    #[error("Replay capacity must be positive")]
    ZeroCapacity,
}

/// A single training example.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySample {
    pub state: StateKey,
    pub mover: Player,
    /// Visit-count policy over the full action space
    pub distribution: Vec<f32>,
    /// Final result for `mover`: +1 win, -1 loss, 0 draw
    pub outcome: f32,
}

/// Destination for finished-game samples.
pub trait ReplaySink {
    fn append(&mut self, sample: ReplaySample);
}

impl ReplaySink for Vec<ReplaySample> {
    fn append(&mut self, sample: ReplaySample) {
        self.push(sample);
    }
}

/// Bounded FIFO buffer. When full, the oldest sample is evicted.
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    samples: VecDeque<ReplaySample>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self, ReplayError> {
        if capacity == 0 {
            return Err(ReplayError::ZeroCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ReplaySample> {
        self.samples.iter()
    }

    /// Draw `n` distinct samples uniformly at random.
    pub fn sample_batch<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<&ReplaySample>, ReplayError> {
        if n > self.samples.len() {
            return Err(ReplayError::NotEnoughSamples {
                requested: n,
                available: self.samples.len(),
            });
        }
        Ok(index::sample(rng, self.samples.len(), n)
            .into_iter()
            .map(|i| &self.samples[i])
            .collect())
    }
}

impl ReplaySink for ReplayBuffer {
    fn append(&mut self, sample: ReplaySample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
            trace!(capacity = self.capacity, "Replay buffer full, evicted oldest sample");
        }
        self.samples.push_back(sample);
    }
}
