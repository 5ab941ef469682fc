//! Pareto dominance with per-criterion orientation.

/// Optimization direction of a single criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Lower values are better.
    #[default]
    Minimize,
    /// Higher values are better.
    Maximize,
}

impl Orientation {
    /// Returns `true` if `a` is strictly better than `b` under this orientation.
    #[inline]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Orientation::Minimize => a < b,
            Orientation::Maximize => a > b,
        }
    }

    /// The better of two values.
    #[inline]
    pub fn best(self, a: f64, b: f64) -> f64 {
        if self.is_better(b, a) {
            b
        } else {
            a
        }
    }

    /// The worse of two values.
    #[inline]
    pub fn worst(self, a: f64, b: f64) -> f64 {
        if self.is_better(b, a) {
            a
        } else {
            b
        }
    }
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or equal).
    Neither,
}

/// Compares two objective vectors for Pareto dominance.
///
/// `a` dominates `b` iff `a` is no worse than `b` in every criterion and
/// strictly better in at least one. Equal vectors yield
/// [`Dominance::Neither`].
///
/// `orientations` must have one entry per criterion.
pub fn dominance_cmp(a: &[f64], b: &[f64], orientations: &[Orientation]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors differ in length");
    debug_assert_eq!(a.len(), orientations.len(), "one orientation per criterion");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for ((&va, &vb), &dir) in a.iter().zip(b.iter()).zip(orientations.iter()) {
        if dir.is_better(va, vb) {
            a_better_in_some = true;
        } else if dir.is_better(vb, va) {
            b_better_in_some = true;
        }
        if a_better_in_some && b_better_in_some {
            return Dominance::Neither;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Returns `true` if `a` dominates `b`.
pub fn dominates(a: &[f64], b: &[f64], orientations: &[Orientation]) -> bool {
    dominance_cmp(a, b, orientations) == Dominance::Left
}
