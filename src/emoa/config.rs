//! Engine configuration.
//!
//! [`EmoaConfig`] holds all parameters that control the generational loop.

use super::selection::Selection;
use crate::error::ValidationError;
use crate::preference::InteractionSchedule;

/// Configuration for the multi-objective evolutionary engine.
///
/// # Defaults
///
/// ```
/// use u_moea::emoa::EmoaConfig;
///
/// let config = EmoaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.offspring_size, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::emoa::{EmoaConfig, Selection};
///
/// let config = EmoaConfig::default()
///     .with_population_size(40)
///     .with_offspring_size(20)
///     .with_selection(Selection::Tournament(3))
///     .with_mutation_rate(0.2)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmoaConfig {
    /// Number of survivors kept after every sort.
    pub population_size: usize,

    /// Number of offspring produced per step.
    ///
    /// Equal to `population_size` for a generational NSGA-II; smaller values
    /// give a steady-state flavour.
    pub offspring_size: usize,

    /// Number of generations executed by [`EmoaRunner`](super::EmoaRunner).
    pub max_generations: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability of applying mutation to an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Whether to evaluate specimens in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether phases measure their wall-clock time.
    pub measure_time: bool,

    /// Steps per generation. Identities carry the repeat counter; the
    /// generation number advances once every `steady_state_repeats` steps.
    pub steady_state_repeats: usize,

    /// Identifier written into every [`SpecimenId`](super::SpecimenId).
    pub algorithm_id: usize,

    /// Whether the update-objective-space phase refreshes the bounds.
    pub update_objective_space: bool,

    /// When the decision maker is consulted. `None` disables interaction.
    pub interaction: Option<InteractionSchedule>,
}

impl Default for EmoaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            offspring_size: 100,
            max_generations: 250,
            selection: Selection::default(),
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            parallel: true,
            seed: None,
            measure_time: false,
            steady_state_repeats: 1,
            algorithm_id: 0,
            update_objective_space: true,
            interaction: None,
        }
    }
}

impl EmoaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the offspring size.
    pub fn with_offspring_size(mut self, n: usize) -> Self {
        self.offspring_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables per-phase timing.
    pub fn with_measure_time(mut self, measure: bool) -> Self {
        self.measure_time = measure;
        self
    }

    /// Sets the number of steps per generation.
    pub fn with_steady_state_repeats(mut self, repeats: usize) -> Self {
        self.steady_state_repeats = repeats;
        self
    }

    /// Sets the algorithm instance identifier.
    pub fn with_algorithm_id(mut self, id: usize) -> Self {
        self.algorithm_id = id;
        self
    }

    /// Enables or disables the objective-space refresh.
    pub fn with_update_objective_space(mut self, update: bool) -> Self {
        self.update_objective_space = update;
        self
    }

    /// Sets the decision-maker interaction schedule.
    pub fn with_interaction(mut self, schedule: InteractionSchedule) -> Self {
        self.interaction = Some(schedule);
        self
    }

    /// Preset for fast runs: small population, few generations.
    ///
    /// - Population: 40, Offspring: 40, Generations: 50
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            offspring_size: 40,
            max_generations: 50,
            ..Self::default()
        }
    }

    /// Preset for balanced runs.
    ///
    /// - Population: 100, Offspring: 100, Generations: 200
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            offspring_size: 100,
            max_generations: 200,
            ..Self::default()
        }
    }

    /// Preset for quality runs: large population, many generations.
    ///
    /// - Population: 200, Offspring: 200, Generations: 500
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            offspring_size: 200,
            max_generations: 500,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fail = |msg: &str| Err(ValidationError::Config(msg.into()));

        if self.population_size < 2 {
            return fail("population_size must be at least 2");
        }
        if self.offspring_size == 0 {
            return fail("offspring_size must be at least 1");
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1");
        }
        if self.steady_state_repeats == 0 {
            return fail("steady_state_repeats must be at least 1");
        }
        if let Selection::Tournament(0) = self.selection {
            return fail("tournament size must be at least 1");
        }
        if let Some(schedule) = &self.interaction {
            if schedule.interval == 0 {
                return fail("interaction interval must be at least 1");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmoaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.offspring_size, 100);
        assert_eq!(config.max_generations, 250);
        assert_eq!(config.selection, Selection::Tournament(2));
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(!config.measure_time);
        assert_eq!(config.steady_state_repeats, 1);
        assert!(config.update_objective_space);
        assert!(config.interaction.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EmoaConfig::default()
            .with_population_size(20)
            .with_offspring_size(10)
            .with_max_generations(30)
            .with_selection(Selection::Rank)
            .with_crossover_rate(0.7)
            .with_mutation_rate(0.3)
            .with_parallel(false)
            .with_seed(42)
            .with_measure_time(true)
            .with_steady_state_repeats(2)
            .with_algorithm_id(5)
            .with_update_objective_space(false)
            .with_interaction(InteractionSchedule::every(5));

        assert_eq!(config.population_size, 20);
        assert_eq!(config.offspring_size, 10);
        assert_eq!(config.max_generations, 30);
        assert_eq!(config.selection, Selection::Rank);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert!((config.mutation_rate - 0.3).abs() < 1e-10);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
        assert!(config.measure_time);
        assert_eq!(config.steady_state_repeats, 2);
        assert_eq!(config.algorithm_id, 5);
        assert!(!config.update_objective_space);
        assert_eq!(config.interaction.map(|s| s.interval), Some(5));
    }

    #[test]
    fn test_clamp_rates() {
        let config = EmoaConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(EmoaConfig::default().validate().is_ok());
        assert!(EmoaConfig::fast().validate().is_ok());
        assert!(EmoaConfig::balanced().validate().is_ok());
        assert!(EmoaConfig::quality().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = EmoaConfig::default().with_population_size(1);
        assert!(matches!(config.validate(), Err(ValidationError::Config(_))));
    }

    #[test]
    fn test_validate_zero_offspring() {
        assert!(EmoaConfig::default().with_offspring_size(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        assert!(EmoaConfig::default().with_max_generations(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = EmoaConfig::default().with_selection(Selection::Tournament(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_interaction_interval() {
        let config = EmoaConfig::default().with_interaction(InteractionSchedule::every(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_chainable() {
        let config = EmoaConfig::fast().with_population_size(30).with_seed(1);
        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_generations, 50);
        assert_eq!(config.seed, Some(1));
    }
}
