//! Diversity metrics used to break ties inside a front.

use super::space::ObjectiveSpace;

/// Scores how isolated each member of a front is in objective space.
///
/// Higher scores mean more diverse. Implementations must return exactly one
/// score per input vector, in input order, and must not depend on anything
/// but the vectors and the optional bounds.
pub trait DiversityMetric: Send + Sync {
    /// Returns a human-readable name for this metric.
    fn name(&self) -> &str;

    /// Computes one diversity score per objective vector.
    ///
    /// `space`, when present, holds population-wide bounds that may be used
    /// for normalization.
    fn scores(&self, objectives: &[&[f64]], space: Option<&ObjectiveSpace>) -> Vec<f64>;
}

/// NSGA-II crowding distance.
///
/// With `use_space_bounds` set and bounds available, each criterion is
/// normalized by the population-wide range instead of the front's own range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrowdingDistance {
    /// Normalize by [`ObjectiveSpace`] bounds when available.
    pub use_space_bounds: bool,
}

impl CrowdingDistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes by population-wide bounds when the scheduler provides them.
    pub fn with_space_bounds(mut self) -> Self {
        self.use_space_bounds = true;
        self
    }
}

impl DiversityMetric for CrowdingDistance {
    fn name(&self) -> &str {
        "crowding-distance"
    }

    fn scores(&self, objectives: &[&[f64]], space: Option<&ObjectiveSpace>) -> Vec<f64> {
        let bounds = if self.use_space_bounds { space } else { None };
        crowding_distance_with(objectives, bounds)
    }
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value
/// 2. Assign infinity to boundary solutions
/// 3. For interior solutions, add normalized distance to neighbors
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::pareto::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance<O: AsRef<[f64]>>(objectives: &[O]) -> Vec<f64> {
    let views: Vec<&[f64]> = objectives.iter().map(|o| o.as_ref()).collect();
    crowding_distance_with(&views, None)
}

fn crowding_distance_with(objectives: &[&[f64]], bounds: Option<&ObjectiveSpace>) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];
    let mut indices: Vec<usize> = (0..n).collect();

    for obj_idx in 0..m {
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = match bounds {
            Some(space) if obj_idx < space.criteria() && space.range(obj_idx) > 0.0 => {
                space.range(obj_idx)
            }
            _ => objectives[indices[n - 1]][obj_idx] - objectives[indices[0]][obj_idx],
        };

        // An overflowing range carries no usable spacing information.
        if range > 0.0 && range.is_finite() {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}
