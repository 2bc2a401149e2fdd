use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//
// ─── RECOGNITION RESULT ────────────────────────────────────────────────────────
//

/// Text produced by speech recognition for one capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub transcript: String,
    pub confidence: Option<f32>,
}

impl RecognitionResult {
    #[must_use]
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            confidence: None,
        }
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Feedback category assigned to a scored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptOutcome {
    /// At or above the success threshold; the phrase counts as completed.
    Success,
    /// Near miss, within the warning band below the threshold.
    Warning,
    /// Too far off; the learner should listen again.
    Fail,
}

impl AttemptOutcome {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

//
// ─── ATTEMPT RECORD ────────────────────────────────────────────────────────────
//

/// One scored attempt at a phrase. Records are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    phrase_index: usize,
    transcript: String,
    similarity: f64,
    outcome: AttemptOutcome,
    attempt_number: u32,
    timestamp: DateTime<Utc>,
}

impl AttemptRecord {
    #[must_use]
    pub fn new(
        phrase_index: usize,
        transcript: impl Into<String>,
        similarity: f64,
        outcome: AttemptOutcome,
        attempt_number: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            phrase_index,
            transcript: transcript.into(),
            similarity: similarity.clamp(0.0, 1.0),
            outcome,
            attempt_number,
            timestamp,
        }
    }

    #[must_use]
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    #[must_use]
    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    #[must_use]
    pub fn outcome(&self) -> AttemptOutcome {
        self.outcome
    }

    /// 1-based attempt counter within the phrase.
    #[must_use]
    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Points earned by this attempt: similarity as a 0-100 percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn score(&self) -> u32 {
        (self.similarity * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn score_rounds_similarity_percentage() {
        let record = AttemptRecord::new(0, "helo", 0.8, AttemptOutcome::Success, 1, fixed_now());
        assert_eq!(record.score(), 80);

        let record = AttemptRecord::new(0, "x", 0.655, AttemptOutcome::Success, 1, fixed_now());
        assert_eq!(record.score(), 66);
    }

    #[test]
    fn similarity_is_clamped() {
        let record = AttemptRecord::new(2, "x", 1.5, AttemptOutcome::Success, 3, fixed_now());
        assert_eq!(record.similarity(), 1.0);
        assert_eq!(record.score(), 100);
        assert_eq!(record.attempt_number(), 3);
        assert_eq!(record.phrase_index(), 2);
    }

    #[test]
    fn recognition_result_confidence_is_optional() {
        let result = RecognitionResult::new("hola");
        assert_eq!(result.confidence, None);
        assert_eq!(result.with_confidence(0.9).confidence, Some(0.9));
    }
}
