//! Non-dominated sorting into Pareto fronts.
//!
//! # Algorithm (Deb et al., 2002)
//!
//! 1. For each pair of solutions, determine dominance
//! 2. Solutions dominated by no other belong to front 0
//! 3. Remove front 0, repeat to find subsequent fronts
//!
//! Front construction stops as soon as the produced fronts hold at least
//! `capacity` members, so survivor selection never pays for fronts it will
//! discard.
//!
//! # Complexity
//!
//! O(m * n²) where m = number of criteria, n = number of solutions

use super::dominance::{dominance_cmp, Dominance, Orientation};

/// Result of non-dominated sorting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fronts {
    /// Indices grouped by front: `fronts[0]` holds the non-dominated set.
    /// No front is ever empty.
    pub fronts: Vec<Vec<usize>>,

    /// Front index per solution, `None` for solutions left unclassified
    /// because classification stopped early.
    pub ranks: Vec<Option<usize>>,
}

/// How a capacity cut falls across a list of fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontSplit {
    /// Number of leading fronts admitted entirely.
    pub passed_fronts: usize,

    /// Number of solutions in the entirely admitted fronts.
    pub passed_members: usize,

    /// Index of the front the cut falls inside, if any.
    pub ambiguous: Option<usize>,
}

impl FrontSplit {
    /// Number of members still to admit from the ambiguous front.
    pub fn remaining(&self, capacity: usize) -> usize {
        capacity.saturating_sub(self.passed_members)
    }
}

impl Fronts {
    /// Number of fronts.
    pub fn len(&self) -> usize {
        self.fronts.len()
    }

    /// Returns `true` if no front was produced.
    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }

    /// Total number of classified solutions.
    pub fn classified(&self) -> usize {
        self.fronts.iter().map(Vec::len).sum()
    }

    /// Locates the ambiguous front for a target of `capacity` survivors.
    ///
    /// Leading fronts that fit entirely are passed; the first front whose
    /// admission would overshoot `capacity` is ambiguous. When the passed
    /// fronts hit `capacity` exactly (or all fronts fit) there is none.
    pub fn split(&self, capacity: usize) -> FrontSplit {
        let mut passed_fronts = 0;
        let mut passed_members = 0;

        for front in &self.fronts {
            if passed_members == capacity {
                break;
            }
            if passed_members + front.len() > capacity {
                return FrontSplit {
                    passed_fronts,
                    passed_members,
                    ambiguous: Some(passed_fronts),
                };
            }
            passed_fronts += 1;
            passed_members += front.len();
        }

        FrontSplit {
            passed_fronts,
            passed_members,
            ambiguous: None,
        }
    }
}

/// Classifies solutions into Pareto fronts.
///
/// Fronts are emitted in non-decreasing dominance rank and classification
/// stops once the emitted fronts cover at least `capacity` solutions. Pass
/// `usize::MAX` (or any value `>= objectives.len()`) to classify everything.
///
/// An empty input yields no fronts.
///
/// # Example
///
/// ```
/// use u_moea::pareto::{classify, Orientation};
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // A
///     vec![3.0, 3.0],  // B
///     vec![5.0, 1.0],  // C
///     vec![4.0, 4.0],  // D, dominated by B
///     vec![6.0, 6.0],  // E, dominated by D
/// ];
/// let dirs = [Orientation::Minimize; 2];
///
/// let all = classify(&objectives, &dirs, usize::MAX);
/// assert_eq!(all.fronts, vec![vec![0, 1, 2], vec![3], vec![4]]);
///
/// // Three survivors are covered by front 0 alone.
/// let partial = classify(&objectives, &dirs, 3);
/// assert_eq!(partial.len(), 1);
/// assert_eq!(partial.ranks[4], None);
/// ```
pub fn classify<O: AsRef<[f64]>>(
    objectives: &[O],
    orientations: &[Orientation],
    capacity: usize,
) -> Fronts {
    let n = objectives.len();
    if n == 0 {
        return Fronts::default();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![None; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(objectives[i].as_ref(), objectives[j].as_ref(), orientations) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let capacity = capacity.min(n);
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut covered = 0usize;
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    while !current.is_empty() {
        let rank = fronts.len();
        for &i in &current {
            ranks[i] = Some(rank);
        }
        covered += current.len();

        let mut next = Vec::new();
        if covered < capacity {
            for &i in &current {
                for &j in &dominated_by[i] {
                    domination_count[j] -= 1;
                    if domination_count[j] == 0 {
                        next.push(j);
                    }
                }
            }
        }

        fronts.push(current);
        current = next;
    }

    Fronts { fronts, ranks }
}

/// Full non-dominated sort: every solution receives a front.
pub fn non_dominated_sort<O: AsRef<[f64]>>(objectives: &[O], orientations: &[Orientation]) -> Fronts {
    classify(objectives, orientations, usize::MAX)
}
