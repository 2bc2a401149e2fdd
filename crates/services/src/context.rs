use practice_core::model::LearnerId;

/// Identity of the learner a session runs for.
///
/// Passed explicitly to whatever needs it instead of living in global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerContext {
    learner_id: LearnerId,
    display_name: String,
}

impl LearnerContext {
    #[must_use]
    pub fn new(learner_id: LearnerId, display_name: impl Into<String>) -> Self {
        Self {
            learner_id,
            display_name: display_name.into(),
        }
    }

    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
