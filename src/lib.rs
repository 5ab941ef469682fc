//! Interactive multi-objective evolutionary optimization.
//!
//! Provides a phase-scheduled evolutionary engine for problems with several
//! conflicting criteria:
//!
//! - **Pareto utilities** ([`pareto`]): per-criterion orientation, dominance,
//!   non-dominated front classification, crowding distance, and
//!   objective-space bounds.
//! - **Engine** ([`emoa`]): a fixed pipeline of named phases (construct,
//!   evaluate, select, reproduce, merge, sort, remove) over a single-owner
//!   algorithm state. Any phase can be substituted by one of the same kind.
//! - **Preferences** ([`preference`]): decision-support contracts, concrete
//!   preference models, and a simulated decision maker. The interactive sort
//!   phase uses them to break ties inside the front where the survivor cut
//!   falls.
//! - **Errors** ([`error`]): validation errors raised before a run and
//!   phase-attributed errors raised during one.
//!
//! # Example
//!
//! ```
//! use rand::Rng;
//! use u_moea::emoa::{EmoaConfig, EmoaProblem, EmoaRunner};
//!
//! struct Schaffer;
//!
//! impl EmoaProblem for Schaffer {
//!     type Decision = f64;
//!
//!     fn criteria(&self) -> usize {
//!         2
//!     }
//!
//!     fn create_decision<R: Rng>(&self, rng: &mut R) -> f64 {
//!         rng.random_range(-10.0..10.0)
//!     }
//!
//!     fn evaluate(&self, x: &f64) -> Vec<f64> {
//!         vec![x * x, (x - 2.0) * (x - 2.0)]
//!     }
//!
//!     fn mutate<R: Rng>(&self, x: &mut f64, rng: &mut R) {
//!         *x += rng.random_range(-0.5..0.5);
//!     }
//! }
//!
//! let config = EmoaConfig::fast().with_seed(1).with_parallel(false);
//! let result = EmoaRunner::run(&Schaffer, &config).unwrap();
//! assert_eq!(result.population.len(), config.population_size);
//! assert!(!result.pareto_front.is_empty());
//! ```

pub mod emoa;
pub mod error;
pub mod pareto;
pub mod preference;
