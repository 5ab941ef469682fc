//! Parent selection strategies.
//!
//! Selection reads the auxiliary score written by the last sort phase:
//! lower is more preferred, whichever sort phase produced it.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), crowded-comparison tournament in NSGA-II

use rand::Rng;

use super::types::Specimen;

/// Selection strategy for choosing parents from the mating pool.
///
/// # Examples
///
/// ```
/// use u_moea::emoa::Selection;
///
/// // Binary tournament on the auxiliary score (NSGA-II default)
/// let sel = Selection::Tournament(2);
///
/// // Uniform sampling
/// let sel = Selection::Random;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` specimens at random, select the one
    /// with the lowest auxiliary score.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Linear ranking on the auxiliary score.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection
    Rank,

    /// Uniform random sampling with replacement.
    Random,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// Select a parent index from the pool.
    ///
    /// Returns `None` if `pool` is empty.
    pub fn select<D, R: Rng>(&self, pool: &[Specimen<D>], rng: &mut R) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }

        Some(match self {
            Selection::Tournament(k) => tournament(pool, *k, rng),
            Selection::Rank => rank(pool, rng),
            Selection::Random => rng.random_range(0..pool.len()),
        })
    }

    /// Selects `count` parents (with replacement), cloning them out of the pool.
    pub fn select_many<D: Clone, R: Rng>(
        &self,
        pool: &[Specimen<D>],
        count: usize,
        rng: &mut R,
    ) -> Vec<Specimen<D>> {
        (0..count)
            .filter_map(|_| self.select(pool, rng))
            .map(|i| pool[i].clone())
            .collect()
    }
}

fn tournament<D, R: Rng>(pool: &[Specimen<D>], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = pool.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if pool[idx].aux_score < pool[best_idx].aux_score {
            best_idx = idx;
        }
    }
    best_idx
}

fn rank<D, R: Rng>(pool: &[Specimen<D>], rng: &mut R) -> usize {
    let n = pool.len();
    if n == 1 {
        return 0;
    }

    let mut indexed: Vec<(usize, f64)> = pool
        .iter()
        .enumerate()
        .map(|(i, s)| (i, s.aux_score))
        .collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    // weight_i = n - rank_i
    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &(original_idx, _)) in indexed.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed[n - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_pool(scores: &[f64]) -> Vec<Specimen<()>> {
        scores
            .iter()
            .map(|&s| {
                let mut sp = Specimen::new(());
                sp.aux_score = s;
                sp
            })
            .collect()
    }

    #[test]
    fn test_tournament_favors_lowest_score() {
        let pool = make_pool(&[2.5, 1.2, 0.0, 1.9]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            let idx = Selection::Tournament(4).select(&pool, &mut rng).unwrap();
            counts[idx] += 1;
        }
        assert!(
            counts[2] > 6000,
            "expected best to be selected >60% of the time, got {}/{n}",
            counts[2]
        );
    }

    #[test]
    fn test_rank_favors_lowest_score() {
        let pool = make_pool(&[3.0, 2.0, 0.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(7);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[Selection::Rank.select(&pool, &mut rng).unwrap()] += 1;
        }
        assert!(counts[2] > counts[0], "{counts:?}");
    }

    #[test]
    fn test_random_is_roughly_uniform() {
        let pool = make_pool(&[0.0, 0.0, 5.0, 9.0]);
        let mut rng = StdRng::seed_from_u64(3);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[Selection::Random.select(&pool, &mut rng).unwrap()] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got {counts:?}");
        }
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let pool: Vec<Specimen<()>> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Selection::Tournament(2).select(&pool, &mut rng).is_none());
        assert!(Selection::Tournament(2)
            .select_many(&pool, 5, &mut rng)
            .is_empty());
    }

    #[test]
    fn test_select_many_count() {
        let pool = make_pool(&[0.0, 1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(9);
        let parents = Selection::default().select_many(&pool, 7, &mut rng);
        assert_eq!(parents.len(), 7);
    }
}
