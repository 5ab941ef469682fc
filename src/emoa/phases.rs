//! The default pipeline phases, except sorting.
//!
//! Each phase is a small stateless struct implementing [`Phase`] for every
//! problem type. Sorting lives in [`StandardSort`](super::StandardSort) and
//! [`InteractiveSort`](super::InteractiveSort).

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::phase::{AlgorithmState, Phase, PhaseKind};
use super::store::Target;
use super::types::{EmoaProblem, Specimen, SpecimenId};
use crate::error::PhaseFailure;
use crate::pareto::ObjectiveSpace;
use crate::preference::{Comparison, PreferenceExample};

/// Resets the generation counters before the initial population is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitStarts;

impl<P: EmoaProblem> Phase<P> for InitStarts {
    fn kind(&self) -> PhaseKind {
        PhaseKind::InitStarts
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        state.generation = 0;
        state.repeat = 0;
        state.steps = 0;
        state.objective_space = None;
        Ok(())
    }
}

/// Fills the population with `population_size` random decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructInitialPopulation;

impl<P: EmoaProblem> Phase<P> for ConstructInitialPopulation {
    fn kind(&self) -> PhaseKind {
        PhaseKind::ConstructInitialPopulation
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let problem = state.problem;
        let specimens = (0..state.config.population_size)
            .map(|_| Specimen::new(problem.create_decision(&mut state.rng)))
            .collect();
        state.store.population.fill(specimens);
        Ok(())
    }
}

/// Tags every specimen of a collection with a [`SpecimenId`].
#[derive(Debug, Clone, Copy)]
pub struct AssignIdentity {
    pub target: Target,
}

impl AssignIdentity {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl<P: EmoaProblem> Phase<P> for AssignIdentity {
    fn kind(&self) -> PhaseKind {
        PhaseKind::AssignIdentity
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let (algorithm, generation, repeat) =
            (state.config.algorithm_id, state.generation, state.repeat);
        let collection = state.store.collection_mut(self.target);
        if !collection.requires_identity {
            return Ok(());
        }
        for (index, specimen) in collection.specimens.iter_mut().enumerate() {
            specimen.id = Some(SpecimenId {
                algorithm,
                generation,
                repeat,
                index,
            });
        }
        collection.requires_identity = false;
        Ok(())
    }
}

/// Maps decisions to objective vectors.
///
/// Runs on the rayon pool when the `parallel` feature is enabled and the
/// configuration asks for it; results stay in index order either way.
#[derive(Debug, Clone, Copy)]
pub struct Evaluate {
    pub target: Target,
}

impl Evaluate {
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

impl<P: EmoaProblem> Phase<P> for Evaluate {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Evaluate
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let expected = state.criteria();
        let (problem, parallel) = (state.problem, state.config.parallel);
        let collection = state.store.collection_mut(self.target);
        if !collection.requires_evaluation {
            return Ok(());
        }

        evaluate_specimens(problem, &mut collection.specimens, parallel);

        for (index, s) in collection.specimens.iter().enumerate() {
            if s.objectives.len() != expected {
                return Err(PhaseFailure::ObjectiveLength {
                    index,
                    expected,
                    actual: s.objectives.len(),
                });
            }
            if let Some(criterion) = s.objectives.iter().position(|v| !v.is_finite()) {
                return Err(PhaseFailure::NonFiniteObjective { index, criterion });
            }
        }

        collection.requires_evaluation = false;
        Ok(())
    }
}

#[cfg(feature = "parallel")]
fn evaluate_specimens<P: EmoaProblem>(
    problem: &P,
    specimens: &mut [Specimen<P::Decision>],
    parallel: bool,
) {
    if parallel {
        specimens.par_iter_mut().for_each(|s| {
            s.objectives = problem.evaluate(&s.decision);
        });
    } else {
        for s in specimens.iter_mut() {
            s.objectives = problem.evaluate(&s.decision);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_specimens<P: EmoaProblem>(
    problem: &P,
    specimens: &mut [Specimen<P::Decision>],
    _parallel: bool,
) {
    for s in specimens.iter_mut() {
        s.objectives = problem.evaluate(&s.decision);
    }
}

/// Marks the end of initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitEnds;

impl<P: EmoaProblem> Phase<P> for InitEnds {
    fn kind(&self) -> PhaseKind {
        PhaseKind::InitEnds
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let front0 = count_front(&state.store.population.specimens, 0);
        log::info!(
            "algorithm {} initialized: population={} front0={}",
            state.config.algorithm_id,
            state.store.population.len(),
            front0
        );
        Ok(())
    }
}

/// Advances the generation counters and, when the interaction schedule
/// fires, asks the decision maker to compare two candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareStep;

impl<P: EmoaProblem> Phase<P> for PrepareStep {
    fn kind(&self) -> PhaseKind {
        PhaseKind::PrepareStep
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let repeats = state.config.steady_state_repeats.max(1);
        state.steps += 1;
        state.generation = (state.steps - 1) / repeats + 1;
        state.repeat = (state.steps - 1) % repeats;

        if state.repeat == 0 {
            interact(state)?;
        }
        Ok(())
    }
}

fn interact<P: EmoaProblem>(state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
    let Some(schedule) = state.config.interaction else {
        return Ok(());
    };
    if !schedule.fires(state.generation, state.interactions) {
        return Ok(());
    }
    let (Some(support), Some(maker)) = (
        state.decision_support.as_mut(),
        state.decision_maker.as_mut(),
    ) else {
        return Ok(());
    };

    let population = &state.store.population.specimens;
    let mut candidates: Vec<usize> = (0..population.len())
        .filter(|&i| population[i].front == Some(0))
        .collect();
    if candidates.len() < 2 {
        candidates = (0..population.len()).collect();
    }
    if candidates.len() < 2 {
        return Ok(());
    }

    let first = state.rng.random_range(0..candidates.len());
    let mut second = state.rng.random_range(0..candidates.len() - 1);
    if second >= first {
        second += 1;
    }
    let a = &population[candidates[first]].objectives;
    let b = &population[candidates[second]].objectives;

    let outcome = maker.compare(a, b).map_err(PhaseFailure::Interaction)?;
    state.interactions += 1;

    let (preferred, other) = match outcome {
        Comparison::First => (a, b),
        Comparison::Second => (b, a),
        Comparison::Indifferent => return Ok(()),
    };
    support.register_example(PreferenceExample {
        preferred: preferred.clone(),
        other: other.clone(),
        generation: state.generation,
    });
    log::debug!(
        "generation {}: decision maker feedback #{} recorded",
        state.generation,
        support.examples().len()
    );
    Ok(())
}

/// Copies the population into the mating pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructMatingPool;

impl<P: EmoaProblem> Phase<P> for ConstructMatingPool {
    fn kind(&self) -> PhaseKind {
        PhaseKind::ConstructMatingPool
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let store = &mut state.store;
        if store.population.is_empty() {
            return Err(PhaseFailure::EmptyPopulation(store.population.name()));
        }
        store.mating_pool.clear();
        store.mating_pool.specimens = store.population.specimens.clone();
        Ok(())
    }
}

/// Draws parents from the mating pool with the configured [`Selection`](super::Selection).
///
/// Draws `offspring_size` parents rounded up to an even count, so every
/// parent has a partner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectParents;

impl<P: EmoaProblem> Phase<P> for SelectParents {
    fn kind(&self) -> PhaseKind {
        PhaseKind::SelectParents
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let pool = &state.store.mating_pool;
        if pool.is_empty() {
            return Err(PhaseFailure::EmptyPopulation(pool.name()));
        }
        let count = state.config.offspring_size.next_multiple_of(2);
        let parents = state
            .config
            .selection
            .select_many(&pool.specimens, count, &mut state.rng);
        state.store.parents.clear();
        state.store.parents.specimens = parents;
        Ok(())
    }
}

/// Builds exactly `offspring_size` offspring from consecutive parent pairs.
///
/// Pairs are reused cyclically when crossover yields a single child.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reproduce;

impl<P: EmoaProblem> Phase<P> for Reproduce {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Reproduce
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        let problem = state.problem;
        let target = state.config.offspring_size;
        let parents = &state.store.parents.specimens;
        if parents.is_empty() {
            return Err(PhaseFailure::EmptyPopulation(state.store.parents.name()));
        }

        let mut offspring = Vec::with_capacity(target);
        let mut pair = 0usize;
        while offspring.len() < target {
            let p1 = &parents[(2 * pair) % parents.len()].decision;
            let p2 = &parents[(2 * pair + 1) % parents.len()].decision;
            pair += 1;

            let mut children = if state.rng.random_range(0.0..1.0) < state.config.crossover_rate {
                problem.crossover(p1, p2, &mut state.rng)
            } else {
                Vec::new()
            };
            if children.is_empty() {
                children.push(p1.clone());
            }

            for mut child in children {
                if offspring.len() >= target {
                    break;
                }
                if state.rng.random_range(0.0..1.0) < state.config.mutation_rate {
                    problem.mutate(&mut child, &mut state.rng);
                }
                offspring.push(Specimen::new(child));
            }
        }

        state.store.offspring.fill(offspring);
        Ok(())
    }
}

/// Appends the offspring to the population.
#[derive(Debug, Clone, Copy, Default)]
pub struct Merge;

impl<P: EmoaProblem> Phase<P> for Merge {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Merge
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        for s in state.store.offspring.specimens.iter_mut() {
            s.reset_rank();
        }
        state.store.merge_offspring();

        let expected = state.config.population_size + state.config.offspring_size;
        let actual = state.store.population.len();
        if actual != expected {
            return Err(PhaseFailure::SizeInvariant { expected, actual });
        }
        Ok(())
    }
}

/// Drops the specimens the sort phase rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Remove;

impl<P: EmoaProblem> Phase<P> for Remove {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Remove
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        state.store.rejected.clear();

        let expected = state.config.population_size;
        let actual = state.store.population.len();
        if actual != expected {
            return Err(PhaseFailure::SizeInvariant { expected, actual });
        }
        Ok(())
    }
}

/// Clears the breeding collections and notifies the problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalizeStep;

impl<P: EmoaProblem> Phase<P> for FinalizeStep {
    fn kind(&self) -> PhaseKind {
        PhaseKind::FinalizeStep
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        state.store.mating_pool.clear();
        state.store.parents.clear();

        let population = &state.store.population.specimens;
        state.problem.on_generation(state.generation, population);
        log::info!(
            "generation {}.{} done: front0={} interactions={}",
            state.generation,
            state.repeat,
            count_front(population, 0),
            state.interactions
        );
        Ok(())
    }
}

/// Refreshes the ideal/nadir bounds from the surviving population.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateObjectiveSpace;

impl<P: EmoaProblem> Phase<P> for UpdateObjectiveSpace {
    fn kind(&self) -> PhaseKind {
        PhaseKind::UpdateObjectiveSpace
    }

    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure> {
        if !state.config.update_objective_space {
            return Ok(());
        }
        let objectives = state.store.population.objectives();
        state.objective_space = ObjectiveSpace::from_objectives(&objectives, &state.orientations);
        Ok(())
    }
}

fn count_front<D>(specimens: &[Specimen<D>], front: usize) -> usize {
    specimens.iter().filter(|s| s.front == Some(front)).count()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::emoa::{EmoaConfig, PhaseReport};
    use crate::error::ModelError;
    use crate::preference::{
        DecisionMaker, InteractionSchedule, ModelDecisionSupport, WeightedSumModel,
    };

    /// Decision `d` maps to `(d, 0)`, except decision 2 which yields NaN.
    struct Points;

    impl EmoaProblem for Points {
        type Decision = usize;

        fn criteria(&self) -> usize {
            2
        }

        fn create_decision<R: Rng>(&self, _rng: &mut R) -> usize {
            0
        }

        fn evaluate(&self, d: &usize) -> Vec<f64> {
            let second = if *d == 2 { f64::NAN } else { 0.0 };
            vec![*d as f64, second]
        }
    }

    type Seen = Arc<Mutex<Vec<(Vec<f64>, Vec<f64>)>>>;

    /// Gives the same answer every time and records the pairs it was shown.
    struct Scripted {
        answer: Comparison,
        seen: Seen,
    }

    impl DecisionMaker for Scripted {
        fn compare(&mut self, a: &[f64], b: &[f64]) -> Result<Comparison, ModelError> {
            self.seen.lock().unwrap().push((a.to_vec(), b.to_vec()));
            Ok(self.answer)
        }
    }

    /// Member `i` has objectives `(i, 10 - i)` and front `fronts[i]`.
    fn interactive_state<'a>(
        problem: &'a Points,
        fronts: &[usize],
        answer: Comparison,
    ) -> (AlgorithmState<'a, Points>, Seen) {
        let config = EmoaConfig::default().with_interaction(InteractionSchedule::every(1));
        let mut state = AlgorithmState::new(problem, config);
        state.store.population.specimens = fronts
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut s = Specimen::with_objectives(i, vec![i as f64, 10.0 - i as f64]);
                s.front = Some(f);
                s
            })
            .collect();

        let seen = Seen::default();
        let support = ModelDecisionSupport::new(WeightedSumModel::new(vec![1.0, 1.0]));
        state.decision_support = Some(Box::new(support));
        state.decision_maker = Some(Box::new(Scripted {
            answer,
            seen: Arc::clone(&seen),
        }));
        (state, seen)
    }

    fn examples(state: &AlgorithmState<'_, Points>) -> Vec<PreferenceExample> {
        state
            .decision_support
            .as_ref()
            .map(|s| s.examples().to_vec())
            .unwrap_or_default()
    }

    // ---- Interaction ----

    #[test]
    fn test_first_answer_records_example() {
        let problem = Points;
        let (mut state, seen) = interactive_state(&problem, &[0, 0, 1], Comparison::First);

        PrepareStep.action(&mut state).unwrap();

        assert_eq!(state.generation, 1);
        assert_eq!(state.interactions, 1);
        let seen = seen.lock().unwrap();
        let (a, b) = &seen[0];
        // Only front 0 is offered while it has two members.
        assert!(a[0] < 2.0 && b[0] < 2.0);
        assert_eq!(
            examples(&state),
            vec![PreferenceExample {
                preferred: a.clone(),
                other: b.clone(),
                generation: 1,
            }]
        );
    }

    #[test]
    fn test_second_answer_swaps_example() {
        let problem = Points;
        let (mut state, seen) = interactive_state(&problem, &[0, 0, 1], Comparison::Second);

        PrepareStep.action(&mut state).unwrap();

        let seen = seen.lock().unwrap();
        let (a, b) = &seen[0];
        let recorded = examples(&state);
        assert_eq!(recorded.len(), 1);
        assert_eq!(&recorded[0].preferred, b);
        assert_eq!(&recorded[0].other, a);
    }

    #[test]
    fn test_indifferent_answer_counts_without_example() {
        let problem = Points;
        let (mut state, seen) = interactive_state(&problem, &[0, 0, 1], Comparison::Indifferent);

        PrepareStep.action(&mut state).unwrap();

        assert_eq!(state.interactions, 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(examples(&state).is_empty());
    }

    #[test]
    fn test_small_front_falls_back_to_population() {
        let problem = Points;
        let (mut state, seen) = interactive_state(&problem, &[1, 0], Comparison::First);

        PrepareStep.action(&mut state).unwrap();

        assert_eq!(state.interactions, 1);
        let seen = seen.lock().unwrap();
        let mut firsts = vec![seen[0].0[0], seen[0].1[0]];
        firsts.sort_by(f64::total_cmp);
        assert_eq!(firsts, vec![0.0, 1.0]);
    }

    #[test]
    fn test_no_interaction_without_decision_maker() {
        let problem = Points;
        let (mut state, _) = interactive_state(&problem, &[0, 0], Comparison::First);
        state.decision_maker = None;

        PrepareStep.action(&mut state).unwrap();

        assert_eq!(state.interactions, 0);
        assert!(examples(&state).is_empty());
    }

    // ---- Evaluation ----

    #[test]
    fn test_non_finite_objective_is_rejected() {
        let problem = Points;
        let config = EmoaConfig::default().with_parallel(false);
        let mut state = AlgorithmState::new(&problem, config);
        state.store.population.fill((0..4).map(Specimen::new).collect());

        let mut report = PhaseReport::new(PhaseKind::Evaluate);
        let err = Evaluate::new(Target::Population)
            .execute(&mut state, &mut report)
            .unwrap_err();

        assert_eq!(err.phase, PhaseKind::Evaluate);
        assert_eq!(
            err.cause,
            PhaseFailure::NonFiniteObjective {
                index: 2,
                criterion: 1
            }
        );
        assert!(state.store.population.requires_evaluation);
    }
}
