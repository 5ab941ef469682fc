//! Pareto-dominance utilities.
//!
//! Domain-agnostic building blocks for Pareto-based survivor selection,
//! generalized to per-criterion [`Orientation`].
//!
//! - [`classify`]: Fast non-dominated sorting with early stop (Deb et al., 2002)
//! - [`Fronts::split`]: Locates the front a survivor cut falls inside
//! - [`CrowdingDistance`]: Crowding distance for diversity preservation
//! - [`ObjectiveSpace`]: Ideal/nadir bounds for normalization
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

mod diversity;
mod dominance;
mod fronts;
mod space;

pub use diversity::{crowding_distance, CrowdingDistance, DiversityMetric};
pub use dominance::{dominance_cmp, dominates, Dominance, Orientation};
pub use fronts::{classify, non_dominated_sort, FrontSplit, Fronts};
pub use space::ObjectiveSpace;
