//! Population store shared by all phases.

use super::types::Specimen;

/// A named collection of specimens with readiness flags.
#[derive(Debug, Clone)]
pub struct Collection<D> {
    name: &'static str,

    /// The specimens, in index order.
    pub specimens: Vec<Specimen<D>>,

    /// Set when specimens were added and not yet evaluated.
    pub requires_evaluation: bool,

    /// Set when specimens were added and have no identity yet.
    pub requires_identity: bool,
}

impl<D> Collection<D> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            specimens: Vec::new(),
            requires_evaluation: false,
            requires_identity: false,
        }
    }

    /// Collection name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.specimens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specimens.is_empty()
    }

    /// Replaces the contents with fresh specimens and raises both flags.
    pub fn fill(&mut self, specimens: Vec<Specimen<D>>) {
        self.specimens = specimens;
        self.requires_evaluation = true;
        self.requires_identity = true;
    }

    /// Removes all specimens and clears both flags.
    pub fn clear(&mut self) {
        self.specimens.clear();
        self.requires_evaluation = false;
        self.requires_identity = false;
    }

    /// Objective vectors as slices, in index order.
    pub fn objectives(&self) -> Vec<&[f64]> {
        self.specimens.iter().map(|s| s.objectives.as_slice()).collect()
    }
}

/// Which collection a phase operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Population,
    Offspring,
    MatingPool,
    Parents,
}

/// The mutable record of candidate solutions for one algorithm instance.
///
/// After the merge phase `population` holds `population_size +
/// offspring_size` specimens; the sort phase keeps exactly
/// `population_size` of them and moves the rest to `rejected`, which the
/// remove phase drops.
#[derive(Debug, Clone)]
pub struct PopulationStore<D> {
    /// Current survivors.
    pub population: Collection<D>,
    /// Newly reproduced specimens, not yet merged.
    pub offspring: Collection<D>,
    /// Candidates eligible for parent selection.
    pub mating_pool: Collection<D>,
    /// Selected breeding set.
    pub parents: Collection<D>,
    /// Non-survivors awaiting removal.
    pub rejected: Vec<Specimen<D>>,
}

impl<D> Default for PopulationStore<D> {
    fn default() -> Self {
        Self {
            population: Collection::new("population"),
            offspring: Collection::new("offspring"),
            mating_pool: Collection::new("mating-pool"),
            parents: Collection::new("parents"),
            rejected: Vec::new(),
        }
    }
}

impl<D> PopulationStore<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, target: Target) -> &Collection<D> {
        match target {
            Target::Population => &self.population,
            Target::Offspring => &self.offspring,
            Target::MatingPool => &self.mating_pool,
            Target::Parents => &self.parents,
        }
    }

    pub fn collection_mut(&mut self, target: Target) -> &mut Collection<D> {
        match target {
            Target::Population => &mut self.population,
            Target::Offspring => &mut self.offspring,
            Target::MatingPool => &mut self.mating_pool,
            Target::Parents => &mut self.parents,
        }
    }

    /// Moves all offspring to the end of the population.
    ///
    /// The population inherits the offspring's readiness flags.
    pub fn merge_offspring(&mut self) {
        let offspring = &mut self.offspring;
        self.population.requires_evaluation |= offspring.requires_evaluation;
        self.population.requires_identity |= offspring.requires_identity;
        self.population.specimens.append(&mut offspring.specimens);
        offspring.clear();
    }
}
