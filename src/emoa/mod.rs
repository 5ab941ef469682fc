//! Phase-scheduled multi-objective evolutionary engine.
//!
//! Users define their problem by implementing [`EmoaProblem`]. The engine
//! keeps a population of [`Specimen`]s and evolves it through a fixed
//! sequence of phases driven by a [`Scheduler`].
//!
//! # Stages
//!
//! ```text
//! init: init-starts → construct-initial-population → assign-identity
//!       → evaluate → sort → init-ends
//! step: prepare-step → construct-mating-pool → select-parents → reproduce
//!       → evaluate → assign-identity → merge → sort → remove
//!       → finalize-step → update-objective-space
//! ```
//!
//! Every slot may be filled by a substitute [`Phase`] of the same
//! [`PhaseKind`]. The sort slot decides the selection policy:
//!
//! - [`StandardSort`]: dominance rank, crowding distance on the cut front (NSGA-II)
//! - [`InteractiveSort`]: dominance rank, decision-maker preference on the cut front
//!
//! # Key Types
//!
//! - [`EmoaConfig`]: Algorithm parameters (sizes, rates, presets)
//! - [`Scheduler`]: Runs init and step stages over one [`AlgorithmState`]
//! - [`EmoaRunner`]: Complete runs with cancellation
//! - [`EmoaResult`]: Final population, Pareto front, and statistics
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
mod interactive_sort;
mod phase;
mod phases;
mod runner;
mod scheduler;
mod selection;
mod standard_sort;
mod store;
mod types;

pub use config::EmoaConfig;
pub use interactive_sort::InteractiveSort;
pub use phase::{AlgorithmState, Phase, PhaseKind, PhaseReport, Stage};
pub use phases::{
    AssignIdentity, ConstructInitialPopulation, ConstructMatingPool, Evaluate, FinalizeStep,
    InitEnds, InitStarts, Merge, PrepareStep, Remove, Reproduce, SelectParents,
    UpdateObjectiveSpace,
};
pub use runner::{EmoaResult, EmoaRunner};
pub use scheduler::{PhaseSet, Scheduler, StageReport};
pub use selection::Selection;
pub use standard_sort::StandardSort;
pub use store::{Collection, PopulationStore, Target};
pub use types::{EmoaProblem, Specimen, SpecimenId};
