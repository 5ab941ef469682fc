//! Complete optimization runs.
//!
//! [`EmoaRunner`] wraps a [`Scheduler`]: init, then `max_generations`
//! generations of `steady_state_repeats` steps each, with optional
//! cancellation between generations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::config::EmoaConfig;
use super::phase::PhaseKind;
use super::scheduler::{PhaseSet, Scheduler, StageReport};
use super::types::{EmoaProblem, Specimen};
use crate::error::EmoaError;
use crate::preference::{DecisionMaker, DecisionSupport};

/// Result of a multi-objective run.
#[derive(Debug, Clone)]
pub struct EmoaResult<D> {
    /// Final population, `population_size` specimens.
    pub population: Vec<Specimen<D>>,

    /// Members of the final population's first front.
    pub pareto_front: Vec<Specimen<D>>,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Comparisons answered by the decision maker.
    pub interactions: usize,

    /// Accumulated time per phase kind, in first-run order. Empty unless
    /// `measure_time` is set.
    pub phase_times: Vec<(PhaseKind, Duration)>,
}

/// Executes complete runs.
///
/// # Usage
///
/// ```ignore
/// let config = EmoaConfig::fast().with_seed(42);
/// let result = EmoaRunner::run(&problem, &config)?;
/// println!("{} non-dominated", result.pareto_front.len());
/// ```
pub struct EmoaRunner;

impl EmoaRunner {
    /// Runs NSGA-II.
    pub fn run<P: EmoaProblem>(
        problem: &P,
        config: &EmoaConfig,
    ) -> Result<EmoaResult<P::Decision>, EmoaError> {
        Self::run_with_cancel(problem, config, None, None, None)
    }

    /// Runs the interactive variant: the sort phase consults `support` once
    /// it holds feedback, and `maker` is asked for comparisons according to
    /// `config.interaction`.
    pub fn run_interactive<P: EmoaProblem>(
        problem: &P,
        config: &EmoaConfig,
        support: Box<dyn DecisionSupport>,
        maker: Option<Box<dyn DecisionMaker>>,
    ) -> Result<EmoaResult<P::Decision>, EmoaError> {
        Self::run_with_cancel(problem, config, Some(support), maker, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// The interactive phase set is used when `support` is present. If
    /// `cancel` is set to `true`, the run stops before the next generation
    /// and returns the population reached so far.
    pub fn run_with_cancel<P: EmoaProblem>(
        problem: &P,
        config: &EmoaConfig,
        support: Option<Box<dyn DecisionSupport>>,
        maker: Option<Box<dyn DecisionMaker>>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EmoaResult<P::Decision>, EmoaError> {
        let phases = if support.is_some() {
            PhaseSet::interactive()
        } else {
            PhaseSet::nsga2()
        };
        let mut scheduler = Scheduler::new(problem, config.clone(), phases)?;
        if let Some(support) = support {
            scheduler = scheduler.with_decision_support(support)?;
        }
        if let Some(maker) = maker {
            scheduler = scheduler.with_decision_maker(maker);
        }

        let mut phase_times = Vec::new();
        let report = scheduler.init()?;
        accumulate(&mut phase_times, &report);

        let mut generations = 0usize;
        let mut cancelled = false;
        for _ in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            for _ in 0..config.steady_state_repeats {
                let report = scheduler.step()?;
                accumulate(&mut phase_times, &report);
            }
            generations += 1;
        }

        let state = scheduler.into_state();
        let interactions = state.interactions;
        let population = state.store.population.specimens;
        let pareto_front = population
            .iter()
            .filter(|s| s.front == Some(0))
            .cloned()
            .collect();

        log::info!(
            "run finished: generations={} cancelled={} front0={}",
            generations,
            cancelled,
            population.iter().filter(|s| s.front == Some(0)).count()
        );

        Ok(EmoaResult {
            population,
            pareto_front,
            generations,
            cancelled,
            interactions,
            phase_times,
        })
    }
}

fn accumulate(totals: &mut Vec<(PhaseKind, Duration)>, report: &StageReport) {
    for phase in &report.phases {
        let Some(elapsed) = phase.elapsed else {
            continue;
        };
        match totals.iter_mut().find(|(k, _)| *k == phase.phase) {
            Some((_, total)) => *total += elapsed,
            None => totals.push((phase.phase, elapsed)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
