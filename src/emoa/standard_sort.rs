//! NSGA-II survivor selection.
//!
//! # Algorithm (Deb et al., 2002)
//!
//! 1. Classify fronts until `population_size` specimens are covered
//! 2. Admit every front that fits entirely, in front order
//! 3. If the cut falls inside a front, rank that front by a diversity
//!    metric (descending) and admit the top members
//!
//! Survivors stay in the population; everybody else moves to the store's
//! rejected buffer, dropped by the remove phase.

use super::phase::{AlgorithmState, Phase, PhaseKind};
use super::store::PopulationStore;
use super::types::EmoaProblem;
use crate::error::PhaseFailure;
use crate::pareto::{
    classify, CrowdingDistance, DiversityMetric, FrontSplit, Fronts, ObjectiveSpace, Orientation,
};

/// A specimen chosen by a sort phase, with the scores it will carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Admission {
    pub index: usize,
    pub front: usize,
    pub aux_score: f64,
}

/// Standard survivor selection: dominance rank first, diversity within the
/// ambiguous front.
///
/// Writes `aux_score = front + position / len` for every survivor, where
/// `position` is the member's place in its front ordered by descending
/// diversity. Lower is better.
pub struct StandardSort {
    diversity: Box<dyn DiversityMetric>,
}

/// Crowding distance normalized by the refreshed objective space once the
/// first step has produced one.
impl Default for StandardSort {
    fn default() -> Self {
        Self::new(CrowdingDistance::new().with_space_bounds())
    }
}

impl StandardSort {
    pub fn new<M: DiversityMetric + 'static>(diversity: M) -> Self {
        Self {
            diversity: Box::new(diversity),
        }
    }

    /// Name of the diversity metric in use.
    pub fn diversity_name(&self) -> &str {
        self.diversity.name()
    }

    /// Orders one front by descending diversity. Ties keep index order.
    pub(crate) fn diversity_order(
        &self,
        front: &[usize],
        objectives: &[&[f64]],
        space: Option<&ObjectiveSpace>,
    ) -> Vec<usize> {
        let views: Vec<&[f64]> = front.iter().map(|&i| objectives[i]).collect();
        let scores = self.diversity.scores(&views, space);

        let mut order: Vec<usize> = (0..front.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        order.into_iter().map(|k| front[k]).collect()
    }

    /// Admissions for the fronts that pass entirely.
    pub(crate) fn passed(
        &self,
        fronts: &Fronts,
        split: &FrontSplit,
        objectives: &[&[f64]],
        space: Option<&ObjectiveSpace>,
    ) -> Vec<Admission> {
        let mut admitted = Vec::with_capacity(split.passed_members);
        for (f, front) in fronts.fronts[..split.passed_fronts].iter().enumerate() {
            let ordered = self.diversity_order(front, objectives, space);
            admitted.extend(rank_within(&ordered, f));
        }
        admitted
    }

    /// Selects survivors without touching the store.
    pub(crate) fn select(
        &self,
        objectives: &[&[f64]],
        space: Option<&ObjectiveSpace>,
        orientations: &[Orientation],
        capacity: usize,
    ) -> Vec<Admission> {
        let fronts = classify(objectives, orientations, capacity);
        let split = fronts.split(capacity);
        log::trace!(
            "standard sort ({}): {} fronts, passed {} ({} members), ambiguous {:?}",
            self.diversity_name(),
            fronts.len(),
            split.passed_fronts,
            split.passed_members,
            split.ambiguous
        );

        let mut admitted = self.passed(&fronts, &split, objectives, space);
        if let Some(a) = split.ambiguous {
            let ordered = self.diversity_order(&fronts.fronts[a], objectives, space);
            let ranked = rank_within(&ordered, a);
            admitted.extend(ranked.into_iter().take(split.remaining(capacity)));
        }
        admitted
    }
}

/// `aux = front + position / len` for an already ordered front.
fn rank_within(ordered: &[usize], front: usize) -> Vec<Admission> {
    let len = ordered.len() as f64;
    ordered
        .iter()
        .enumerate()
        .map(|(pos, &index)| Admission {
            index,
            front,
            aux_score: front as f64 + pos as f64 / len,
        })
        .collect()
}

/// Checks the population is ready to be sorted.
pub(crate) fn ensure_sortable<D>(store: &PopulationStore<D>) -> Result<(), PhaseFailure> {
    let population = &store.population;
    if population.requires_evaluation {
        return Err(PhaseFailure::RequiresEvaluation(population.name()));
    }
    if population.is_empty() {
        return Err(PhaseFailure::EmptyPopulation(population.name()));
    }
    Ok(())
}

/// Keeps the admitted specimens, in admission order, and moves the rest to
/// the rejected buffer.
pub(crate) fn apply_admissions<D>(store: &mut PopulationStore<D>, admitted: &[Admission]) {
    let mut slots: Vec<Option<_>> = std::mem::take(&mut store.population.specimens)
        .into_iter()
        .map(Some)
        .collect();

    let mut survivors = Vec::with_capacity(admitted.len());
    for adm in admitted {
        if let Some(mut s) = slots[adm.index].take() {
            s.front = Some(adm.front);
            s.aux_score = adm.aux_score;
            survivors.push(s);
        }
    }

    store.rejected.extend(slots.into_iter().flatten().map(|mut s| {
        s.front = None;
        s.aux_score = f64::INFINITY;
        s
    }));
    store.population.specimens = survivors;
}

impl<P: EmoaProblem> Phase<P> for StandardSort {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Sort
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        ensure_sortable(&state.store)?;
        let admitted = {
            let objectives = state.store.population.objectives();
            self.select(
                &objectives,
                state.objective_space.as_ref(),
                &state.orientations,
                state.config.population_size,
            )
        };
        apply_admissions(&mut state.store, &admitted);
        Ok(())
    }
}
