//! Simulated decision maker and its consultation schedule.

use std::cmp::Ordering;

use super::types::PreferenceModel;
use crate::error::ModelError;

/// Outcome of a pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The first candidate is preferred.
    First,
    /// The second candidate is preferred.
    Second,
    /// No preference.
    Indifferent,
}

/// Someone (or something) able to compare two candidates.
pub trait DecisionMaker: Send {
    /// Compares two objective vectors.
    fn compare(&mut self, a: &[f64], b: &[f64]) -> Result<Comparison, ModelError>;
}

/// A decision maker driven by a hidden preference model.
///
/// Used to simulate interactive runs: it answers every comparison according
/// to its model, without noise.
#[derive(Debug, Clone)]
pub struct ArtificialDecisionMaker<M> {
    model: M,
    comparisons: usize,
}

impl<M: PreferenceModel> ArtificialDecisionMaker<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            comparisons: 0,
        }
    }

    /// Number of comparisons answered so far.
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }
}

impl<M: PreferenceModel> DecisionMaker for ArtificialDecisionMaker<M> {
    fn compare(&mut self, a: &[f64], b: &[f64]) -> Result<Comparison, ModelError> {
        let ord = self.model.compare(a, b)?;
        self.comparisons += 1;
        Ok(match ord {
            Ordering::Less => Comparison::First,
            Ordering::Greater => Comparison::Second,
            Ordering::Equal => Comparison::Indifferent,
        })
    }
}

/// When the decision maker is consulted.
///
/// The prepare-step phase of generation `g` asks for one comparison when
/// `g >= start_generation`, `(g - start_generation) % interval == 0`, and
/// fewer than `max_interactions` comparisons were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionSchedule {
    /// First generation in which the decision maker is consulted.
    pub start_generation: usize,
    /// Generations between consultations.
    pub interval: usize,
    /// Upper bound on consultations. `None` for unlimited.
    pub max_interactions: Option<usize>,
}

impl InteractionSchedule {
    /// Consults every `interval` generations, starting with generation 1.
    pub fn every(interval: usize) -> Self {
        Self {
            start_generation: 1,
            interval,
            max_interactions: None,
        }
    }

    /// Sets the first consulted generation.
    pub fn starting_at(mut self, generation: usize) -> Self {
        self.start_generation = generation;
        self
    }

    /// Caps the number of consultations.
    pub fn limited_to(mut self, n: usize) -> Self {
        self.max_interactions = Some(n);
        self
    }

    /// Whether generation `generation` triggers a consultation.
    pub fn fires(&self, generation: usize, done: usize) -> bool {
        if self.interval == 0 || generation < self.start_generation {
            return false;
        }
        if self.max_interactions.is_some_and(|max| done >= max) {
            return false;
        }
        (generation - self.start_generation) % self.interval == 0
    }
}
