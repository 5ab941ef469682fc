//! Objective-space bounds.

use super::dominance::Orientation;

/// Ideal and nadir points of a population, per criterion.
///
/// `ideal[k]` is the best value observed for criterion `k` and `nadir[k]`
/// the worst, both respecting the criterion's [`Orientation`]. Diversity
/// metrics use the bounds to normalize distances across generations
/// instead of per front.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveSpace {
    /// Best value per criterion.
    pub ideal: Vec<f64>,
    /// Worst value per criterion.
    pub nadir: Vec<f64>,
}

impl ObjectiveSpace {
    /// Computes the bounds of a set of objective vectors.
    ///
    /// Returns `None` if `objectives` is empty.
    pub fn from_objectives<O: AsRef<[f64]>>(
        objectives: &[O],
        orientations: &[Orientation],
    ) -> Option<Self> {
        let first = objectives.first()?.as_ref();
        let mut ideal = first.to_vec();
        let mut nadir = first.to_vec();

        for obj in &objectives[1..] {
            for (k, (&v, &dir)) in obj.as_ref().iter().zip(orientations.iter()).enumerate() {
                ideal[k] = dir.best(ideal[k], v);
                nadir[k] = dir.worst(nadir[k], v);
            }
        }

        Some(Self { ideal, nadir })
    }

    /// Number of criteria.
    pub fn criteria(&self) -> usize {
        self.ideal.len()
    }

    /// Absolute extent of criterion `k`.
    pub fn range(&self, k: usize) -> f64 {
        (self.nadir[k] - self.ideal[k]).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_minimize() {
        let objs = vec![vec![1.0, 5.0], vec![3.0, 2.0], vec![2.0, 4.0]];
        let space = ObjectiveSpace::from_objectives(&objs, &[Orientation::Minimize; 2]).unwrap();
        assert_eq!(space.ideal, vec![1.0, 2.0]);
        assert_eq!(space.nadir, vec![3.0, 5.0]);
        assert!((space.range(1) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_mixed_orientation() {
        let objs = vec![vec![1.0, 5.0], vec![3.0, 2.0]];
        let dirs = [Orientation::Minimize, Orientation::Maximize];
        let space = ObjectiveSpace::from_objectives(&objs, &dirs).unwrap();
        assert_eq!(space.ideal, vec![1.0, 5.0]);
        assert_eq!(space.nadir, vec![3.0, 2.0]);
    }

    #[test]
    fn test_empty_has_no_bounds() {
        let objs: Vec<Vec<f64>> = Vec::new();
        assert!(ObjectiveSpace::from_objectives(&objs, &[Orientation::Minimize]).is_none());
    }
}
