//! Decision support backed by a fixed preference model.

use super::types::{DecisionSupport, PreferenceExample, PreferenceModel};

/// Owns a preference model and the feedback history.
///
/// The model is not refitted when examples arrive; the history only decides
/// whether the interactive sort consults the model at all.
#[derive(Debug, Clone)]
pub struct ModelDecisionSupport<M> {
    model: M,
    examples: Vec<PreferenceExample>,
}

impl<M: PreferenceModel> ModelDecisionSupport<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            examples: Vec::new(),
        }
    }

    /// Starts with an existing feedback history.
    pub fn with_examples(mut self, examples: Vec<PreferenceExample>) -> Self {
        self.examples = examples;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: PreferenceModel> DecisionSupport for ModelDecisionSupport<M> {
    fn preference_model(&self) -> &dyn PreferenceModel {
        &self.model
    }

    fn examples(&self) -> &[PreferenceExample] {
        &self.examples
    }

    fn register_example(&mut self, example: PreferenceExample) {
        self.examples.push(example);
    }
}
