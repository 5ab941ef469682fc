//! Preference-driven survivor selection.
//!
//! Fronts that fit entirely are admitted exactly as in [`StandardSort`]. The
//! ambiguous front is ranked by the decision maker's preference model instead
//! of a diversity metric:
//!
//! ```text
//! r   = model.evaluate(objectives)
//! t   = (r - min r) / (max r - min r)    lower preferred
//! t   = (max r - r) / (max r - min r)    higher preferred
//! aux = passed_fronts + t
//! ```
//!
//! so `aux` is lower for more preferred members regardless of the model's
//! orientation. Without decision support, or before any preference example
//! exists, the phase behaves exactly like the standard sort.

use super::phase::{AlgorithmState, Phase, PhaseKind};
use super::standard_sort::{apply_admissions, ensure_sortable, Admission, StandardSort};
use super::types::{EmoaProblem, Specimen};
use crate::error::{ModelError, PhaseFailure};
use crate::pareto::{classify, ObjectiveSpace, Orientation};
use crate::preference::{DecisionSupport, PreferenceModel};

/// Survivor selection that consults the decision-support collaborator.
#[derive(Default)]
pub struct InteractiveSort {
    standard: StandardSort,
}

impl InteractiveSort {
    /// Uses `standard` for the passed fronts and for delegation.
    pub fn new(standard: StandardSort) -> Self {
        Self { standard }
    }

    fn select<D>(
        &self,
        population: &[Specimen<D>],
        model: &dyn PreferenceModel,
        space: Option<&ObjectiveSpace>,
        orientations: &[Orientation],
        capacity: usize,
    ) -> Result<Vec<Admission>, PhaseFailure> {
        let objectives: Vec<&[f64]> = population.iter().map(|s| s.objectives.as_slice()).collect();
        let fronts = classify(&objectives, orientations, capacity);
        let split = fronts.split(capacity);

        let mut admitted = self.standard.passed(&fronts, &split, &objectives, space);
        let Some(a) = split.ambiguous else {
            return Ok(admitted);
        };

        // Ties in preference keep the diversity order.
        let ordered = self.standard.diversity_order(&fronts.fronts[a], &objectives, space);
        let mut ranked = rank_by_preference(&ordered, population, model, a)?;
        ranked.sort_by(|x, y| x.aux_score.total_cmp(&y.aux_score));

        let take = split.remaining(capacity);
        log::trace!(
            "interactive sort: passed {} fronts ({} members), front {} ranked by preference, admitting {} of {}",
            split.passed_fronts,
            split.passed_members,
            a,
            take,
            ranked.len()
        );
        admitted.extend(ranked.into_iter().take(take));
        Ok(admitted)
    }
}

fn rank_by_preference<D>(
    ordered: &[usize],
    population: &[Specimen<D>],
    model: &dyn PreferenceModel,
    front: usize,
) -> Result<Vec<Admission>, PhaseFailure> {
    let mut relevance = Vec::with_capacity(ordered.len());
    for &candidate in ordered {
        let specimen = &population[candidate];
        let r = model
            .evaluate(&specimen.objectives)
            .and_then(|r| {
                if r.is_finite() {
                    Ok(r)
                } else {
                    Err(ModelError::Rejected(format!("relevance {r} is not finite")))
                }
            })
            .map_err(|source| PhaseFailure::ModelEvaluation {
                candidate,
                id: specimen.id,
                source,
            })?;
        relevance.push(r);
    }

    let lo = relevance.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = relevance.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Finite relevances can still have an infinite range; halve them first.
    let scale = if (hi - lo).is_finite() { 1.0 } else { 0.5 };
    let (lo, hi) = (lo * scale, hi * scale);
    let span = hi - lo;
    let lower_preferred = model.is_lower_more_preferred();

    Ok(ordered
        .iter()
        .zip(&relevance)
        .map(|(&index, &r)| {
            let r = r * scale;
            let t = if span > 0.0 {
                let t = if lower_preferred {
                    (r - lo) / span
                } else {
                    (hi - r) / span
                };
                t.clamp(0.0, 1.0)
            } else {
                0.0
            };
            Admission {
                index,
                front,
                aux_score: front as f64 + t,
            }
        })
        .collect())
}

fn consulted_model(support: &Option<Box<dyn DecisionSupport>>) -> Option<&dyn PreferenceModel> {
    support
        .as_deref()
        .filter(|s| s.has_preference_examples())
        .map(|s| s.preference_model())
}

impl<P: EmoaProblem> Phase<P> for InteractiveSort {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Sort
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let Some(model) = consulted_model(&state.decision_support) else {
            return self.standard.action(state);
        };
        ensure_sortable(&state.store)?;

        let admitted = self.select(
            &state.store.population.specimens,
            model,
            state.objective_space.as_ref(),
            &state.orientations,
            state.config.population_size,
        )?;
        apply_admissions(&mut state.store, &admitted);
        Ok(())
    }
}
