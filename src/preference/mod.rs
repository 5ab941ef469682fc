//! Decision-support collaborators.
//!
//! The engine consults a [`DecisionSupport`] through two capabilities only:
//! whether any preference example exists, and the current
//! [`PreferenceModel`]. How models are learned from feedback is outside this
//! crate; [`ModelDecisionSupport`] simply owns a fixed model next to the
//! feedback history.
//!
//! # Key Types
//!
//! - [`PreferenceModel`]: scalar relevance per objective vector
//! - [`DecisionSupport`]: model + feedback history
//! - [`DecisionMaker`]: answers pairwise comparisons
//! - [`ArtificialDecisionMaker`]: simulated decision maker with a hidden model
//! - [`InteractionSchedule`]: when the decision maker is consulted

mod decision_maker;
mod models;
mod support;
mod types;

pub use decision_maker::{ArtificialDecisionMaker, Comparison, DecisionMaker, InteractionSchedule};
pub use models::{ChebyshevModel, WeightedSumModel};
pub use support::ModelDecisionSupport;
pub use types::{DecisionSupport, PreferenceExample, PreferenceModel};
