//! Generational phase scheduler.
//!
//! A [`Scheduler`] owns one [`AlgorithmState`] and one [`PhaseSet`] and runs
//! the phases of a stage strictly in slot order. The first failing phase
//! aborts the stage; nothing is retried or rolled back.

use super::config::EmoaConfig;
use super::interactive_sort::InteractiveSort;
use super::phase::{AlgorithmState, Phase, PhaseKind, PhaseReport, Stage};
use super::phases::{
    AssignIdentity, ConstructInitialPopulation, ConstructMatingPool, Evaluate, FinalizeStep,
    InitEnds, InitStarts, Merge, PrepareStep, Remove, Reproduce, SelectParents,
    UpdateObjectiveSpace,
};
use super::standard_sort::StandardSort;
use super::store::Target;
use super::types::{EmoaProblem, Specimen};
use crate::error::{PhaseError, ValidationError};
use crate::preference::{DecisionMaker, DecisionSupport};

/// The phases of both stages, one per slot.
pub struct PhaseSet<P: EmoaProblem> {
    init: Vec<Box<dyn Phase<P>>>,
    step: Vec<Box<dyn Phase<P>>>,
}

impl<P: EmoaProblem> PhaseSet<P> {
    /// NSGA-II: dominance rank plus crowding distance.
    pub fn nsga2() -> Self {
        Self::with_sorts(Box::new(StandardSort::default()), Box::new(StandardSort::default()))
    }

    /// NSGA-II whose sort consults the decision maker's preferences once
    /// feedback exists.
    pub fn interactive() -> Self {
        Self::with_sorts(
            Box::new(InteractiveSort::default()),
            Box::new(InteractiveSort::default()),
        )
    }

    fn with_sorts(init_sort: Box<dyn Phase<P>>, step_sort: Box<dyn Phase<P>>) -> Self {
        let init: Vec<Box<dyn Phase<P>>> = vec![
            Box::new(InitStarts),
            Box::new(ConstructInitialPopulation),
            Box::new(AssignIdentity::new(Target::Population)),
            Box::new(Evaluate::new(Target::Population)),
            init_sort,
            Box::new(InitEnds),
        ];
        let step: Vec<Box<dyn Phase<P>>> = vec![
            Box::new(PrepareStep),
            Box::new(ConstructMatingPool),
            Box::new(SelectParents),
            Box::new(Reproduce),
            Box::new(Evaluate::new(Target::Offspring)),
            Box::new(AssignIdentity::new(Target::Offspring)),
            Box::new(Merge),
            step_sort,
            Box::new(Remove),
            Box::new(FinalizeStep),
            Box::new(UpdateObjectiveSpace),
        ];
        Self { init, step }
    }

    /// Substitutes the phase filling `slot` in `stage`.
    ///
    /// Fails when the stage has no such slot or when `phase` reports a
    /// different kind.
    pub fn replace(
        mut self,
        stage: Stage,
        slot: PhaseKind,
        phase: Box<dyn Phase<P>>,
    ) -> Result<Self, ValidationError> {
        let found = phase.kind();
        if found != slot {
            return Err(ValidationError::PhaseSlot { slot, found });
        }
        let position = stage.slots().iter().position(|&k| k == slot).ok_or_else(|| {
            ValidationError::Config(format!("stage {stage:?} has no `{slot}` slot"))
        })?;
        self.phases_mut(stage)[position] = phase;
        Ok(self)
    }

    /// Substitutes the sort phase of both stages.
    pub fn with_sort<F>(self, make: F) -> Result<Self, ValidationError>
    where
        F: Fn() -> Box<dyn Phase<P>>,
    {
        self.replace(Stage::Init, PhaseKind::Sort, make())?
            .replace(Stage::Step, PhaseKind::Sort, make())
    }

    /// Kinds of the phases in `stage`, in execution order.
    pub fn kinds(&self, stage: Stage) -> Vec<PhaseKind> {
        self.phases(stage).iter().map(|p| p.kind()).collect()
    }

    fn phases(&self, stage: Stage) -> &[Box<dyn Phase<P>>] {
        match stage {
            Stage::Init => &self.init,
            Stage::Step => &self.step,
        }
    }

    fn phases_mut(&mut self, stage: Stage) -> &mut [Box<dyn Phase<P>>] {
        match stage {
            Stage::Init => &mut self.init,
            Stage::Step => &mut self.step,
        }
    }
}

impl<P: EmoaProblem> Default for PhaseSet<P> {
    fn default() -> Self {
        Self::nsga2()
    }
}

/// Reports of every phase run by one stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageReport {
    pub stage: Stage,
    /// Generation counter after the stage.
    pub generation: usize,
    pub phases: Vec<PhaseReport>,
}

/// Drives one algorithm instance through its init and step stages.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = Scheduler::new(&problem, EmoaConfig::fast(), PhaseSet::nsga2())?;
/// scheduler.init()?;
/// for _ in 0..10 {
///     scheduler.step()?;
/// }
/// let survivors = scheduler.population();
/// ```
pub struct Scheduler<'a, P: EmoaProblem> {
    state: AlgorithmState<'a, P>,
    phases: PhaseSet<P>,
}

impl<'a, P: EmoaProblem> Scheduler<'a, P> {
    /// Validates `config` against `problem` and prepares a fresh state.
    pub fn new(
        problem: &'a P,
        config: EmoaConfig,
        phases: PhaseSet<P>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        if problem.criteria() == 0 {
            return Err(ValidationError::Config(
                "problem must define at least one criterion".into(),
            ));
        }
        Ok(Self {
            state: AlgorithmState::new(problem, config),
            phases,
        })
    }

    /// Attaches the decision-support collaborator.
    ///
    /// Fails when its model expects a different number of criteria than the
    /// problem defines.
    pub fn with_decision_support(
        mut self,
        support: Box<dyn DecisionSupport>,
    ) -> Result<Self, ValidationError> {
        if let Some(model) = support.preference_model().criteria() {
            let problem = self.state.criteria();
            if model != problem {
                return Err(ValidationError::CriteriaMismatch { problem, model });
            }
        }
        self.state.decision_support = Some(support);
        Ok(self)
    }

    /// Attaches the decision maker consulted by the interaction schedule.
    pub fn with_decision_maker(mut self, maker: Box<dyn DecisionMaker>) -> Self {
        self.state.decision_maker = Some(maker);
        self
    }

    /// Runs the init stage.
    pub fn init(&mut self) -> Result<StageReport, PhaseError> {
        self.run(Stage::Init)
    }

    /// Runs one step stage.
    pub fn step(&mut self) -> Result<StageReport, PhaseError> {
        self.run(Stage::Step)
    }

    fn run(&mut self, stage: Stage) -> Result<StageReport, PhaseError> {
        let state = &mut self.state;
        let phases = self.phases.phases_mut(stage);
        let mut reports = Vec::with_capacity(phases.len());
        for phase in phases.iter_mut() {
            let mut report = PhaseReport::new(phase.kind());
            phase.execute(state, &mut report)?;
            reports.push(report);
        }
        Ok(StageReport {
            stage,
            generation: state.generation,
            phases: reports,
        })
    }

    pub fn state(&self) -> &AlgorithmState<'a, P> {
        &self.state
    }

    /// Current population.
    pub fn population(&self) -> &[Specimen<P::Decision>] {
        &self.state.store.population.specimens
    }

    /// Gives up the state, e.g. to collect the final population.
    pub fn into_state(self) -> AlgorithmState<'a, P> {
        self.state
    }
}
