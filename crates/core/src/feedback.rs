use serde::Serialize;

use crate::model::{AttemptOutcome, Difficulty};
use crate::settings::PracticeSettings;

/// Classification of one scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub outcome: AttemptOutcome,
    pub message: &'static str,
    pub threshold: f64,
    pub similarity: f64,
}

/// Maps a similarity score and a difficulty tier to a feedback category.
///
/// For a success threshold `T` and warning band `W`, `[0, 1]` splits into
/// `Fail` below `T - W`, `Warning` in `[T - W, T)` and `Success` from `T` up.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackPolicy {
    settings: PracticeSettings,
}

impl FeedbackPolicy {
    #[must_use]
    pub fn new(settings: PracticeSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn threshold(&self, difficulty: Difficulty) -> f64 {
        self.settings.threshold(difficulty)
    }

    #[must_use]
    pub fn classify(&self, similarity: f64, difficulty: Difficulty) -> Feedback {
        let threshold = self.threshold(difficulty);
        let similarity = if similarity.is_finite() {
            similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let outcome = if similarity >= threshold {
            AttemptOutcome::Success
        } else if similarity >= threshold - self.settings.warning_band() {
            AttemptOutcome::Warning
        } else {
            AttemptOutcome::Fail
        };

        Feedback {
            outcome,
            message: message_for(outcome),
            threshold,
            similarity,
        }
    }
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        Self::new(PracticeSettings::default())
    }
}

fn message_for(outcome: AttemptOutcome) -> &'static str {
    match outcome {
        AttemptOutcome::Success => "Excellent pronunciation!",
        AttemptOutcome::Warning => "Almost perfect! Try once more.",
        AttemptOutcome::Fail => "Keep practicing. Listen again and repeat.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_per_tier() {
        let policy = FeedbackPolicy::default();
        assert_eq!(policy.threshold(Difficulty::Beginner), 0.60);
        assert_eq!(policy.threshold(Difficulty::Intermediate), 0.75);
        assert_eq!(policy.threshold(Difficulty::Advanced), 0.85);
    }

    #[test]
    fn beginner_boundaries() {
        let policy = FeedbackPolicy::default();
        let d = Difficulty::Beginner;
        assert_eq!(policy.classify(0.60, d).outcome, AttemptOutcome::Success);
        assert_eq!(policy.classify(0.59, d).outcome, AttemptOutcome::Warning);
        assert_eq!(policy.classify(0.40, d).outcome, AttemptOutcome::Warning);
        assert_eq!(policy.classify(0.39, d).outcome, AttemptOutcome::Fail);
        assert_eq!(policy.classify(0.0, d).outcome, AttemptOutcome::Fail);
        assert_eq!(policy.classify(1.0, d).outcome, AttemptOutcome::Success);
    }

    #[test]
    fn advanced_is_stricter() {
        let policy = FeedbackPolicy::default();
        assert_eq!(
            policy.classify(0.8, Difficulty::Advanced).outcome,
            AttemptOutcome::Warning
        );
        assert_eq!(
            policy.classify(0.8, Difficulty::Beginner).outcome,
            AttemptOutcome::Success
        );
        assert_eq!(
            policy.classify(0.6, Difficulty::Advanced).outcome,
            AttemptOutcome::Fail
        );
    }

    #[test]
    fn outcomes_partition_the_unit_interval() {
        let policy = FeedbackPolicy::default();
        for difficulty in Difficulty::ALL {
            let mut previous = AttemptOutcome::Fail;
            let mut changes = 0;
            for step in 0..=1000 {
                let similarity = f64::from(step) / 1000.0;
                let outcome = policy.classify(similarity, difficulty).outcome;
                if outcome != previous {
                    changes += 1;
                    let expected = match previous {
                        AttemptOutcome::Fail => AttemptOutcome::Warning,
                        AttemptOutcome::Warning => AttemptOutcome::Success,
                        AttemptOutcome::Success => unreachable!("success is the top range"),
                    };
                    assert_eq!(outcome, expected, "{difficulty} at {similarity}");
                    previous = outcome;
                }
            }
            assert_eq!(changes, 2, "{difficulty}");
        }
    }

    #[test]
    fn non_finite_similarity_fails() {
        let policy = FeedbackPolicy::default();
        let feedback = policy.classify(f64::NAN, Difficulty::Beginner);
        assert_eq!(feedback.outcome, AttemptOutcome::Fail);
        assert_eq!(feedback.similarity, 0.0);
    }

    #[test]
    fn feedback_carries_message_and_threshold() {
        let feedback = FeedbackPolicy::default().classify(0.7, Difficulty::Intermediate);
        assert_eq!(feedback.outcome, AttemptOutcome::Warning);
        assert_eq!(feedback.threshold, 0.75);
        assert_eq!(feedback.message, "Almost perfect! Try once more.");
    }
}
