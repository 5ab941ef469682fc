//! Core trait and record definitions for the engine.
//!
//! [`EmoaProblem`] is the contract between the generic engine and a
//! domain-specific problem: it creates, evaluates, recombines, and mutates
//! decisions. [`Specimen`] is the engine's record of one candidate.

use rand::Rng;

use crate::pareto::Orientation;

/// Traceability tag assigned once per lifecycle event.
///
/// Identities are never used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecimenId {
    /// Identifier of the algorithm instance that created the specimen.
    pub algorithm: usize,
    /// Generation in which the specimen was created (0 = initial population).
    pub generation: usize,
    /// Steady-state repeat within the generation.
    pub repeat: usize,
    /// Position in the collection at assignment time.
    pub index: usize,
}

impl std::fmt::Display for SpecimenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}.{}#{}",
            self.algorithm, self.generation, self.repeat, self.index
        )
    }
}

/// A candidate solution and its derived quantities.
///
/// - `objectives` is filled by the evaluation phase.
/// - `id` is set by the identity-assignment phase.
/// - `front` and `aux_score` are overwritten by every sort phase; they are
///   only meaningful until the next sort.
#[derive(Debug, Clone, PartialEq)]
pub struct Specimen<D> {
    /// Opaque candidate representation.
    pub decision: D,

    /// One score per criterion. Empty until evaluated.
    pub objectives: Vec<f64>,

    /// Transient rank proxy written by the last sort phase.
    /// Lower is more preferred; `f64::INFINITY` when unset.
    pub aux_score: f64,

    /// Front index from the last sort phase.
    pub front: Option<usize>,

    /// Traceability tag.
    pub id: Option<SpecimenId>,
}

impl<D> Specimen<D> {
    /// Creates an unevaluated specimen.
    pub fn new(decision: D) -> Self {
        Self {
            decision,
            objectives: Vec::new(),
            aux_score: f64::INFINITY,
            front: None,
            id: None,
        }
    }

    /// Creates a specimen with known objectives.
    pub fn with_objectives(decision: D, objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            ..Self::new(decision)
        }
    }

    /// Returns `true` once objectives are present.
    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// Clears sort-phase state; used when a specimen is re-entered as offspring.
    pub(crate) fn reset_rank(&mut self) {
        self.aux_score = f64::INFINITY;
        self.front = None;
    }
}

/// Defines a multi-objective optimization problem.
///
/// Covers the three external collaborators the engine needs:
///
/// 1. **Construction**: how to create random decisions
/// 2. **Evaluation**: how to map a decision to its objective vector
/// 3. **Reproduction**: how to recombine and perturb decisions
///
/// # Thread Safety
///
/// `EmoaProblem` must be `Send + Sync` because evaluation may run on a
/// rayon pool. Results keep their index order either way.
///
/// # Implementing
///
/// ```ignore
/// struct Schaffer;
///
/// impl EmoaProblem for Schaffer {
///     type Decision = f64;
///     fn criteria(&self) -> usize { 2 }
///     fn create_decision<R: Rng>(&self, rng: &mut R) -> f64 {
///         rng.random_range(-10.0..10.0)
///     }
///     fn evaluate(&self, x: &f64) -> Vec<f64> {
///         vec![x * x, (x - 2.0) * (x - 2.0)]
///     }
/// }
/// ```
pub trait EmoaProblem: Send + Sync {
    /// The decision (genotype) type.
    type Decision: Clone + Send + Sync;

    /// Number of criteria the evaluator produces.
    fn criteria(&self) -> usize;

    /// Optimization direction of criterion `k`.
    ///
    /// The default minimizes every criterion.
    fn orientation(&self, _criterion: usize) -> Orientation {
        Orientation::Minimize
    }

    /// All orientations, one per criterion.
    fn orientations(&self) -> Vec<Orientation> {
        (0..self.criteria()).map(|k| self.orientation(k)).collect()
    }

    /// Creates a random decision.
    fn create_decision<R: Rng>(&self, rng: &mut R) -> Self::Decision;

    /// Evaluates a decision and returns its objective vector.
    ///
    /// Must return exactly [`criteria`](Self::criteria) values.
    fn evaluate(&self, decision: &Self::Decision) -> Vec<f64>;

    /// Produces one or two offspring by recombining two parents.
    ///
    /// The default implementation clones parent1 (no crossover).
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Decision,
        _parent2: &Self::Decision,
        _rng: &mut R,
    ) -> Vec<Self::Decision> {
        vec![parent1.clone()]
    }

    /// Mutates a decision in place.
    ///
    /// The default implementation is a no-op.
    fn mutate<R: Rng>(&self, _decision: &mut Self::Decision, _rng: &mut R) {}

    /// Called after every completed step with the surviving population.
    fn on_generation(&self, _generation: usize, _population: &[Specimen<Self::Decision>]) {}
}
