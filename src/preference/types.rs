//! Decision-support contracts consumed by the interactive sort phase.

use std::cmp::Ordering;

use crate::error::ModelError;

/// Scores objective vectors according to the decision maker's preferences.
///
/// The engine only consults a model; how it was obtained is up to the
/// [`DecisionSupport`] that owns it.
pub trait PreferenceModel: Send + Sync {
    /// Maps an objective vector to a scalar relevance.
    fn evaluate(&self, objectives: &[f64]) -> Result<f64, ModelError>;

    /// Whether lower relevance values mean "more preferred".
    fn is_lower_more_preferred(&self) -> bool;

    /// Number of criteria the model expects, if fixed.
    fn criteria(&self) -> Option<usize> {
        None
    }

    /// Orders two objective vectors: `Less` means `a` is more preferred.
    fn compare(&self, a: &[f64], b: &[f64]) -> Result<Ordering, ModelError> {
        let ra = self.evaluate(a)?;
        let rb = self.evaluate(b)?;
        let ord = ra.partial_cmp(&rb).unwrap_or(Ordering::Equal);
        Ok(if self.is_lower_more_preferred() {
            ord
        } else {
            ord.reverse()
        })
    }
}

impl<M: PreferenceModel + ?Sized> PreferenceModel for Box<M> {
    fn evaluate(&self, objectives: &[f64]) -> Result<f64, ModelError> {
        (**self).evaluate(objectives)
    }

    fn is_lower_more_preferred(&self) -> bool {
        (**self).is_lower_more_preferred()
    }

    fn criteria(&self) -> Option<usize> {
        (**self).criteria()
    }
}

/// One piece of decision-maker feedback: `preferred` was chosen over `other`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceExample {
    /// Objective vector of the chosen candidate.
    pub preferred: Vec<f64>,
    /// Objective vector of the rejected candidate.
    pub other: Vec<f64>,
    /// Generation in which the comparison was made.
    pub generation: usize,
}

/// The decision-support subsystem as seen by the engine.
///
/// The interactive sort phase consults only
/// [`has_preference_examples`](Self::has_preference_examples) and
/// [`preference_model`](Self::preference_model); the interaction step feeds
/// new examples through [`register_example`](Self::register_example).
pub trait DecisionSupport: Send {
    /// Current preference model.
    fn preference_model(&self) -> &dyn PreferenceModel;

    /// Feedback history, oldest first.
    fn examples(&self) -> &[PreferenceExample];

    /// Records new feedback.
    fn register_example(&mut self, example: PreferenceExample);

    /// Whether at least one preference example exists.
    fn has_preference_examples(&self) -> bool {
        !self.examples().is_empty()
    }
}
