//! Concrete preference models.
//!
//! - [`WeightedSumModel`]: linear value function
//! - [`ChebyshevModel`]: weighted Chebyshev distance to a reference point
//!
//! Both reject vectors with the wrong number of criteria or non-finite
//! values, so a malformed candidate surfaces as an error instead of a
//! silently meaningless score.

use super::types::PreferenceModel;
use crate::error::ModelError;

fn check(objectives: &[f64], expected: usize) -> Result<(), ModelError> {
    if objectives.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            actual: objectives.len(),
        });
    }
    if let Some(index) = objectives.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite { index });
    }
    Ok(())
}

/// Linear value function `Σ wₖ·fₖ`.
///
/// Lower values are preferred by default, which suits minimized criteria;
/// [`higher_preferred`](Self::higher_preferred) flips the orientation for
/// utility-style weights.
///
/// ```
/// use u_moea::preference::{PreferenceModel, WeightedSumModel};
///
/// let model = WeightedSumModel::new(vec![0.5, 0.5]);
/// assert_eq!(model.evaluate(&[2.0, 4.0]).unwrap(), 3.0);
/// assert!(model.is_lower_more_preferred());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedSumModel {
    weights: Vec<f64>,
    lower_preferred: bool,
}

impl WeightedSumModel {
    pub fn new(weights: Vec<f64>) -> Self {
        Self {
            weights,
            lower_preferred: true,
        }
    }

    /// Treats higher weighted sums as more preferred.
    pub fn higher_preferred(mut self) -> Self {
        self.lower_preferred = false;
        self
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl PreferenceModel for WeightedSumModel {
    fn evaluate(&self, objectives: &[f64]) -> Result<f64, ModelError> {
        check(objectives, self.weights.len())?;
        Ok(self
            .weights
            .iter()
            .zip(objectives.iter())
            .map(|(w, f)| w * f)
            .sum())
    }

    fn is_lower_more_preferred(&self) -> bool {
        self.lower_preferred
    }

    fn criteria(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}

/// Weighted Chebyshev distance `maxₖ wₖ·|fₖ − zₖ|` to a reference point `z`.
///
/// Lower distance is preferred.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChebyshevModel {
    weights: Vec<f64>,
    reference: Vec<f64>,
}

impl ChebyshevModel {
    /// Creates the model.
    ///
    /// Returns an error if `weights` and `reference` differ in length.
    pub fn new(weights: Vec<f64>, reference: Vec<f64>) -> Result<Self, ModelError> {
        if weights.len() != reference.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                actual: reference.len(),
            });
        }
        Ok(Self { weights, reference })
    }
}

impl PreferenceModel for ChebyshevModel {
    fn evaluate(&self, objectives: &[f64]) -> Result<f64, ModelError> {
        check(objectives, self.weights.len())?;
        Ok(self
            .weights
            .iter()
            .zip(self.reference.iter())
            .zip(objectives.iter())
            .map(|((w, z), f)| w * (f - z).abs())
            .fold(0.0, f64::max))
    }

    fn is_lower_more_preferred(&self) -> bool {
        true
    }

    fn criteria(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}
