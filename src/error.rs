//! Error types for u-moea.
//!
//! Three families of failures exist:
//!
//! - [`ValidationError`]: raised while setting up a run, before any
//!   generation executes.
//! - [`PhaseError`]: raised by a phase's main action during `init()` or
//!   `step()`. Always fatal to the current run.
//! - [`ModelError`]: raised by a preference model that rejects an objective
//!   vector. The sort phase wraps it into a [`PhaseError`].

use thiserror::Error;

use crate::emoa::{PhaseKind, SpecimenId};

/// Error returned by a [`PreferenceModel`](crate::preference::PreferenceModel)
/// that cannot score an objective vector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// The objective vector has the wrong number of criteria.
    #[error("expected {expected} criteria, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The objective vector contains NaN or an infinity.
    #[error("objective {index} is not finite")]
    NonFinite { index: usize },

    /// Model-specific rejection.
    #[error("{0}")]
    Rejected(String),
}

/// Setup error, raised strictly before the first phase runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The problem and the preference model disagree on the criteria count.
    #[error("problem defines {problem} criteria but the preference model expects {model}")]
    CriteriaMismatch { problem: usize, model: usize },

    /// A substituted phase does not fill the slot it was placed into.
    #[error("phase slot `{slot}` cannot hold a `{found}` phase")]
    PhaseSlot { slot: PhaseKind, found: PhaseKind },
}

/// The cause carried by a [`PhaseError`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhaseFailure {
    /// A collection reached a phase that needs evaluated specimens.
    #[error("collection `{0}` has not been evaluated")]
    RequiresEvaluation(&'static str),

    /// The evaluator returned an objective vector of the wrong length.
    #[error("specimen {index} has {actual} objectives, expected {expected}")]
    ObjectiveLength {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// The evaluator returned NaN or an infinity.
    #[error("specimen {index} has a non-finite value for criterion {criterion}")]
    NonFiniteObjective { index: usize, criterion: usize },

    /// The preference model rejected a candidate of the ambiguous front.
    #[error("preference model rejected candidate {candidate} ({id:?})")]
    ModelEvaluation {
        candidate: usize,
        id: Option<SpecimenId>,
        #[source]
        source: ModelError,
    },

    /// A phase needs a non-empty collection.
    #[error("collection `{0}` is empty")]
    EmptyPopulation(&'static str),

    /// A size invariant of the population store does not hold.
    #[error("population holds {actual} specimens, expected {expected}")]
    SizeInvariant { expected: usize, actual: usize },

    /// The decision maker could not compare two candidates.
    #[error("decision maker failed")]
    Interaction(#[source] ModelError),
}

/// A failure inside one phase of the generational pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("phase `{phase}` failed: {cause}")]
pub struct PhaseError {
    /// The phase that failed.
    pub phase: PhaseKind,
    /// What went wrong.
    #[source]
    pub cause: PhaseFailure,
}

impl PhaseError {
    pub fn new(phase: PhaseKind, cause: PhaseFailure) -> Self {
        Self { phase, cause }
    }
}

/// Top-level error for running the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmoaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Phase(#[from] PhaseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_phase_error_message_names_phase() {
        let err = PhaseError::new(
            PhaseKind::Sort,
            PhaseFailure::SizeInvariant {
                expected: 4,
                actual: 5,
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("sort"), "{msg}");
        assert!(msg.contains("expected 4"), "{msg}");
    }

    #[test]
    fn test_model_error_is_chained() {
        let err = PhaseError::new(
            PhaseKind::Sort,
            PhaseFailure::ModelEvaluation {
                candidate: 3,
                id: None,
                source: ModelError::NonFinite { index: 1 },
            },
        );
        let cause = err.source().expect("phase error has a cause");
        let model = cause.source().expect("model error is chained");
        assert_eq!(model.to_string(), "objective 1 is not finite");
    }

    #[test]
    fn test_validation_converts_to_emoa_error() {
        let err: EmoaError = ValidationError::CriteriaMismatch {
            problem: 3,
            model: 2,
        }
        .into();
        assert!(matches!(err, EmoaError::Validation(_)));
    }
}
