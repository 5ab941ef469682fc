//! Phase contract and shared algorithm state.
//!
//! A phase is one named step of the generational pipeline. The set of roles
//! is closed ([`PhaseKind`]); the scheduler runs them in a fixed order and
//! only lets a substitute fill the slot of its own kind.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::EmoaConfig;
use super::store::PopulationStore;
use super::types::EmoaProblem;
use crate::error::{PhaseError, PhaseFailure};
use crate::pareto::{ObjectiveSpace, Orientation};
use crate::preference::{DecisionMaker, DecisionSupport};

/// The roles a phase can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseKind {
    InitStarts,
    ConstructInitialPopulation,
    AssignIdentity,
    Evaluate,
    Sort,
    InitEnds,
    PrepareStep,
    ConstructMatingPool,
    SelectParents,
    Reproduce,
    Merge,
    Remove,
    FinalizeStep,
    UpdateObjectiveSpace,
}

impl PhaseKind {
    /// Slot order of the init stage.
    pub const INIT: [PhaseKind; 6] = [
        PhaseKind::InitStarts,
        PhaseKind::ConstructInitialPopulation,
        PhaseKind::AssignIdentity,
        PhaseKind::Evaluate,
        PhaseKind::Sort,
        PhaseKind::InitEnds,
    ];

    /// Slot order of the step stage.
    pub const STEP: [PhaseKind; 11] = [
        PhaseKind::PrepareStep,
        PhaseKind::ConstructMatingPool,
        PhaseKind::SelectParents,
        PhaseKind::Reproduce,
        PhaseKind::Evaluate,
        PhaseKind::AssignIdentity,
        PhaseKind::Merge,
        PhaseKind::Sort,
        PhaseKind::Remove,
        PhaseKind::FinalizeStep,
        PhaseKind::UpdateObjectiveSpace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PhaseKind::InitStarts => "init-starts",
            PhaseKind::ConstructInitialPopulation => "construct-initial-population",
            PhaseKind::AssignIdentity => "assign-identity",
            PhaseKind::Evaluate => "evaluate",
            PhaseKind::Sort => "sort",
            PhaseKind::InitEnds => "init-ends",
            PhaseKind::PrepareStep => "prepare-step",
            PhaseKind::ConstructMatingPool => "construct-mating-pool",
            PhaseKind::SelectParents => "select-parents",
            PhaseKind::Reproduce => "reproduce",
            PhaseKind::Merge => "merge",
            PhaseKind::Remove => "remove",
            PhaseKind::FinalizeStep => "finalize-step",
            PhaseKind::UpdateObjectiveSpace => "update-objective-space",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Init,
    Step,
}

impl Stage {
    /// Slot order of this stage.
    pub fn slots(self) -> &'static [PhaseKind] {
        match self {
            Stage::Init => &PhaseKind::INIT,
            Stage::Step => &PhaseKind::STEP,
        }
    }
}

/// What one phase execution reports back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseReport {
    /// The phase that ran.
    pub phase: PhaseKind,
    /// Wall-clock time of the main action, when timing is enabled.
    pub elapsed: Option<Duration>,
    /// Population size after the phase.
    pub population: usize,
}

impl PhaseReport {
    pub fn new(phase: PhaseKind) -> Self {
        Self {
            phase,
            elapsed: None,
            population: 0,
        }
    }
}

/// Mutable state threaded through every phase of one algorithm instance.
///
/// Owned by the [`Scheduler`](super::Scheduler); phases receive it by
/// `&mut` for the duration of a single call.
pub struct AlgorithmState<'a, P: EmoaProblem> {
    /// The problem being optimized.
    pub problem: &'a P,
    /// Run configuration.
    pub config: EmoaConfig,
    /// One orientation per criterion, cached from the problem.
    pub orientations: Vec<Orientation>,
    /// Candidate collections.
    pub store: PopulationStore<P::Decision>,
    /// Random source for every stochastic phase.
    pub rng: StdRng,
    /// Current generation (0 = initial population).
    pub generation: usize,
    /// Steady-state repeat inside the current generation.
    pub repeat: usize,
    /// Completed step stages.
    pub steps: usize,
    /// Population bounds from the last objective-space refresh.
    pub objective_space: Option<ObjectiveSpace>,
    /// Decision-support collaborator consulted by the interactive sort.
    pub decision_support: Option<Box<dyn DecisionSupport>>,
    /// Decision maker consulted by the interaction schedule.
    pub decision_maker: Option<Box<dyn DecisionMaker>>,
    /// Comparisons requested from the decision maker so far.
    pub interactions: usize,
}

impl<'a, P: EmoaProblem> AlgorithmState<'a, P> {
    pub fn new(problem: &'a P, config: EmoaConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self {
            problem,
            orientations: problem.orientations(),
            config,
            store: PopulationStore::new(),
            rng,
            generation: 0,
            repeat: 0,
            steps: 0,
            objective_space: None,
            decision_support: None,
            decision_maker: None,
            interactions: 0,
        }
    }

    /// Number of criteria.
    pub fn criteria(&self) -> usize {
        self.orientations.len()
    }
}

/// One step of the generational pipeline.
///
/// Implementors provide [`action`](Phase::action); the provided
/// [`execute`](Phase::execute) wraps it in the pre/post hooks and attributes
/// failures to [`kind`](Phase::kind).
pub trait Phase<P: EmoaProblem> {
    /// The slot this phase fills.
    fn kind(&self) -> PhaseKind;

    /// Phase-specific logic.
    fn action(&mut self, state: &mut AlgorithmState<'_, P>) -> Result<(), PhaseFailure>;

    /// Runs before the action. Starts a timer when timing is enabled.
    fn pre_action(&mut self, state: &AlgorithmState<'_, P>) -> Option<Instant> {
        state.config.measure_time.then(Instant::now)
    }

    /// Runs after a successful action. Stops the timer.
    fn post_action(
        &mut self,
        state: &AlgorithmState<'_, P>,
        timer: Option<Instant>,
        report: &mut PhaseReport,
    ) {
        report.elapsed = timer.map(|t| t.elapsed());
        report.population = state.store.population.len();
    }

    /// Runs the phase and fills `report`.
    fn execute(
        &mut self,
        state: &mut AlgorithmState<'_, P>,
        report: &mut PhaseReport,
    ) -> Result<(), PhaseError> {
        let timer = self.pre_action(state);
        self.action(state)
            .map_err(|cause| PhaseError::new(self.kind(), cause))?;
        self.post_action(state, timer, report);
        log::debug!(
            "phase {} done: population={} elapsed={:?}",
            report.phase,
            report.population,
            report.elapsed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_orders() {
        assert_eq!(Stage::Init.slots().len(), 6);
        assert_eq!(Stage::Step.slots().len(), 11);
        assert_eq!(Stage::Step.slots()[7], PhaseKind::Sort);
        assert_eq!(Stage::Init.slots()[4], PhaseKind::Sort);
    }

    #[test]
    fn test_slots_are_unique_per_stage() {
        for stage in [Stage::Init, Stage::Step] {
            let slots = stage.slots();
            for (i, a) in slots.iter().enumerate() {
                assert!(!slots[i + 1..].contains(a), "{a} repeated in {stage:?}");
            }
        }
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(PhaseKind::UpdateObjectiveSpace.to_string(), "update-objective-space");
        assert_eq!(PhaseKind::Sort.name(), "sort");
    }
}
