//! Property-based tests for u-moea
//!
//! Uses proptest to verify the survivor-selection invariants of both sort
//! phases and of complete runs.

use proptest::prelude::*;
use rand::Rng;
use u_moea::emoa::{
    AlgorithmState, EmoaConfig, EmoaProblem, EmoaRunner, InteractiveSort, Phase, Specimen,
    StandardSort,
};
use u_moea::pareto::{classify, dominates, non_dominated_sort, Orientation};
use u_moea::preference::{
    ArtificialDecisionMaker, InteractionSchedule, ModelDecisionSupport, PreferenceExample,
    PreferenceModel, WeightedSumModel,
};

// ==================== Fixtures ====================

/// Objective vectors are injected directly; the decision is the index.
struct Grid {
    criteria: usize,
}

impl EmoaProblem for Grid {
    type Decision = usize;

    fn criteria(&self) -> usize {
        self.criteria
    }

    fn create_decision<R: Rng>(&self, _rng: &mut R) -> usize {
        0
    }

    fn evaluate(&self, _decision: &usize) -> Vec<f64> {
        vec![0.0; self.criteria]
    }
}

/// Two-criteria problem on a line segment, used for complete runs.
struct Segment;

impl EmoaProblem for Segment {
    type Decision = f64;

    fn criteria(&self) -> usize {
        2
    }

    fn create_decision<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(-4.0..4.0)
    }

    fn evaluate(&self, x: &f64) -> Vec<f64> {
        vec![x.abs(), (x - 1.0).abs()]
    }

    fn crossover<R: Rng>(&self, a: &f64, b: &f64, rng: &mut R) -> Vec<f64> {
        let t: f64 = rng.random_range(0.0..1.0);
        vec![t * a + (1.0 - t) * b]
    }

    fn mutate<R: Rng>(&self, x: &mut f64, rng: &mut R) {
        *x += rng.random_range(-0.3..0.3);
    }
}

const CRITERIA: usize = 3;

/// Small integer grid so that dominance, ties, and duplicates all occur.
fn population() -> impl Strategy<Value = (Vec<Vec<f64>>, usize)> {
    prop::collection::vec(prop::collection::vec(0u8..6, CRITERIA), 2..40).prop_flat_map(|raw| {
        let n = raw.len();
        let objs: Vec<Vec<f64>> = raw
            .into_iter()
            .map(|v| v.into_iter().map(f64::from).collect())
            .collect();
        (Just(objs), 1..=n)
    })
}

fn weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u8..4).prop_map(f64::from), CRITERIA)
}

fn state<'a>(problem: &'a Grid, objs: &[Vec<f64>], cap: usize) -> AlgorithmState<'a, Grid> {
    let mut state = AlgorithmState::new(problem, EmoaConfig::default().with_population_size(cap));
    state.store.population.specimens = objs
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, o)| Specimen::with_objectives(i, o))
        .collect();
    state
}

fn example() -> PreferenceExample {
    PreferenceExample {
        preferred: vec![0.0; CRITERIA],
        other: vec![1.0; CRITERIA],
        generation: 1,
    }
}

fn with_feedback(state: &mut AlgorithmState<'_, Grid>, weights: Vec<f64>) {
    let support = ModelDecisionSupport::new(WeightedSumModel::new(weights))
        .with_examples(vec![example()]);
    state.decision_support = Some(Box::new(support));
}

fn survivors(state: &AlgorithmState<'_, Grid>) -> Vec<usize> {
    let mut v: Vec<usize> = state
        .store
        .population
        .specimens
        .iter()
        .map(|s| s.decision)
        .collect();
    v.sort_unstable();
    v
}

fn fingerprint(state: &AlgorithmState<'_, Grid>) -> Vec<(usize, Option<usize>, u64)> {
    state
        .store
        .population
        .specimens
        .iter()
        .map(|s| (s.decision, s.front, s.aux_score.to_bits()))
        .collect()
}

proptest! {
    // ==================== Front Classification ====================

    #[test]
    fn fronts_are_monotone((objs, _) in population()) {
        let orientations = [Orientation::Minimize; CRITERIA];
        let fronts = non_dominated_sort(&objs, &orientations);

        prop_assert_eq!(fronts.classified(), objs.len());
        for (f, front) in fronts.fronts.iter().enumerate() {
            for later in &fronts.fronts[f + 1..] {
                for &a in front {
                    for &b in later {
                        prop_assert!(!dominates(&objs[b], &objs[a], &orientations));
                    }
                }
            }
            if f > 0 {
                for &b in front {
                    let covered = fronts.fronts[f - 1]
                        .iter()
                        .any(|&a| dominates(&objs[a], &objs[b], &orientations));
                    prop_assert!(covered, "member {} of front {} has no dominator in front {}", b, f, f - 1);
                }
            }
        }
    }

    #[test]
    fn early_stop_agrees_with_full_sort((objs, cap) in population()) {
        let orientations = [Orientation::Minimize; CRITERIA];
        let partial = classify(&objs, &orientations, cap);
        let full = non_dominated_sort(&objs, &orientations);

        prop_assert!(partial.classified() >= cap);
        prop_assert_eq!(&full.fronts[..partial.len()], &partial.fronts[..]);
    }

    // ==================== Size Invariant ====================

    #[test]
    fn standard_sort_keeps_population_size((objs, cap) in population()) {
        let problem = Grid { criteria: CRITERIA };
        let mut state = state(&problem, &objs, cap);
        StandardSort::default().action(&mut state).unwrap();

        prop_assert_eq!(state.store.population.len(), cap);
        prop_assert_eq!(state.store.rejected.len(), objs.len() - cap);
    }

    #[test]
    fn interactive_sort_keeps_population_size((objs, cap) in population(), w in weights()) {
        let problem = Grid { criteria: CRITERIA };
        let mut state = state(&problem, &objs, cap);
        with_feedback(&mut state, w);
        InteractiveSort::default().action(&mut state).unwrap();

        prop_assert_eq!(state.store.population.len(), cap);
        prop_assert_eq!(state.store.rejected.len(), objs.len() - cap);
    }

    // ==================== Delegation ====================

    #[test]
    fn interactive_without_examples_matches_standard((objs, cap) in population(), w in weights()) {
        let problem = Grid { criteria: CRITERIA };

        let mut standard = state(&problem, &objs, cap);
        StandardSort::default().action(&mut standard).unwrap();

        let mut bare = state(&problem, &objs, cap);
        InteractiveSort::default().action(&mut bare).unwrap();

        let mut silent = state(&problem, &objs, cap);
        silent.decision_support = Some(Box::new(ModelDecisionSupport::new(WeightedSumModel::new(w))));
        InteractiveSort::default().action(&mut silent).unwrap();

        prop_assert_eq!(fingerprint(&bare), fingerprint(&standard));
        prop_assert_eq!(fingerprint(&silent), fingerprint(&standard));
    }

    #[test]
    fn standard_sort_is_idempotent((objs, cap) in population()) {
        let problem = Grid { criteria: CRITERIA };
        let mut state = state(&problem, &objs, cap);
        let mut sort = StandardSort::default();

        sort.action(&mut state).unwrap();
        let once = survivors(&state);
        state.store.rejected.clear();

        sort.action(&mut state).unwrap();
        prop_assert_eq!(survivors(&state), once);
        prop_assert!(state.store.rejected.is_empty());
    }

    // ==================== Preference ====================

    #[test]
    fn earlier_fronts_always_pass((objs, cap) in population(), w in weights()) {
        let problem = Grid { criteria: CRITERIA };
        let orientations = [Orientation::Minimize; CRITERIA];
        let fronts = non_dominated_sort(&objs, &orientations);
        let split = fronts.split(cap);

        let mut state = state(&problem, &objs, cap);
        with_feedback(&mut state, w);
        InteractiveSort::default().action(&mut state).unwrap();
        let kept = survivors(&state);

        for (i, rank) in fronts.ranks.iter().enumerate() {
            let Some(rank) = *rank else { continue };
            if rank < split.passed_fronts {
                prop_assert!(kept.contains(&i), "member {} of passed front {} was dropped", i, rank);
            } else if split.ambiguous.map_or(true, |a| rank > a) {
                prop_assert!(!kept.contains(&i), "member {} of front {} was admitted", i, rank);
            }
        }
    }

    #[test]
    fn preferred_members_win_the_cut((objs, cap) in population(), w in weights()) {
        let problem = Grid { criteria: CRITERIA };
        let orientations = [Orientation::Minimize; CRITERIA];
        let model = WeightedSumModel::new(w.clone());
        let fronts = non_dominated_sort(&objs, &orientations);
        let split = fronts.split(cap);

        let mut state = state(&problem, &objs, cap);
        with_feedback(&mut state, w);
        InteractiveSort::default().action(&mut state).unwrap();
        let kept = survivors(&state);

        if let Some(a) = split.ambiguous {
            let front = &fronts.fronts[a];
            for &x in front.iter().filter(|i| kept.contains(i)) {
                for &y in front.iter().filter(|i| !kept.contains(i)) {
                    let rx = model.evaluate(&objs[x]).unwrap();
                    let ry = model.evaluate(&objs[y]).unwrap();
                    prop_assert!(rx <= ry, "admitted {} (r={}) over {} (r={})", x, rx, y, ry);
                }
            }
        }
    }

    #[test]
    fn aux_scores_separate_fronts((objs, cap) in population(), w in weights()) {
        let problem = Grid { criteria: CRITERIA };
        let mut state = state(&problem, &objs, cap);
        with_feedback(&mut state, w);
        InteractiveSort::default().action(&mut state).unwrap();

        for s in &state.store.population.specimens {
            let front = s.front.unwrap() as f64;
            prop_assert!(s.aux_score >= front && s.aux_score <= front + 1.0);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    // ==================== Complete Runs ====================

    #[test]
    fn runs_keep_population_size(
        seed in any::<u64>(),
        pop in 4usize..24,
        offspring in 1usize..24,
        interactive in any::<bool>()
    ) {
        let config = EmoaConfig::default()
            .with_population_size(pop)
            .with_offspring_size(offspring)
            .with_max_generations(8)
            .with_seed(seed)
            .with_parallel(false)
            .with_interaction(InteractionSchedule::every(2));

        let result = if interactive {
            let model = WeightedSumModel::new(vec![1.0, 2.0]);
            EmoaRunner::run_interactive(
                &Segment,
                &config,
                Box::new(ModelDecisionSupport::new(model.clone())),
                Some(Box::new(ArtificialDecisionMaker::new(model))),
            )
        } else {
            EmoaRunner::run(&Segment, &config)
        };
        let result = result.unwrap();

        prop_assert_eq!(result.population.len(), pop);
        prop_assert_eq!(result.generations, 8);
        prop_assert!(!result.pareto_front.is_empty());
        prop_assert!(result.population.iter().all(|s| s.id.is_some()));
    }
}
