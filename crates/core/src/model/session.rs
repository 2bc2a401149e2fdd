use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AttemptOutcome, AttemptRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many attempts for a single session: {len}")]
    TooManyAttempts { len: usize },
}

/// Aggregate summary for a finished practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    phrase_count: u32,
    phrases_completed: u32,
    total_attempts: u32,
    successes: u32,
    warnings: u32,
    fails: u32,
    total_score: u32,
    best_streak: u32,
}

impl SessionSummary {
    /// Build a summary from the attempts recorded during a session.
    ///
    /// The total score only counts the best successful attempt of each phrase,
    /// so retries never inflate it.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::TooManyAttempts` if the attempt count cannot fit in `u32`.
    pub fn from_attempts<'a>(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        phrase_count: usize,
        attempts: impl IntoIterator<Item = &'a AttemptRecord>,
        best_streak: u32,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }

        let mut len = 0_usize;
        let mut successes = 0_u32;
        let mut warnings = 0_u32;
        let mut fails = 0_u32;
        let mut best: BTreeMap<usize, u32> = BTreeMap::new();

        for attempt in attempts {
            len += 1;
            match attempt.outcome() {
                AttemptOutcome::Success => {
                    successes = successes.saturating_add(1);
                    let entry = best.entry(attempt.phrase_index()).or_insert(0);
                    *entry = (*entry).max(attempt.score());
                }
                AttemptOutcome::Warning => warnings = warnings.saturating_add(1),
                AttemptOutcome::Fail => fails = fails.saturating_add(1),
            }
        }

        let total_attempts = u32::try_from(len)
            .map_err(|_| SessionSummaryError::TooManyAttempts { len })?;
        let phrase_count = u32::try_from(phrase_count).unwrap_or(u32::MAX);
        let phrases_completed = u32::try_from(best.len()).unwrap_or(u32::MAX);
        let total_score = best.values().fold(0_u32, |acc, s| acc.saturating_add(*s));

        Ok(Self {
            started_at,
            completed_at,
            phrase_count,
            phrases_completed,
            total_attempts,
            successes,
            warnings,
            fails,
            total_score,
            best_streak,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn phrase_count(&self) -> u32 {
        self.phrase_count
    }

    #[must_use]
    pub fn phrases_completed(&self) -> u32 {
        self.phrases_completed
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn successes(&self) -> u32 {
        self.successes
    }

    #[must_use]
    pub fn warnings(&self) -> u32 {
        self.warnings
    }

    #[must_use]
    pub fn fails(&self) -> u32 {
        self.fails
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Mean score over completed phrases, rounded; 0 when nothing was completed.
    #[must_use]
    pub fn average_score(&self) -> u32 {
        if self.phrases_completed == 0 {
            return 0;
        }
        let avg = f64::from(self.total_score) / f64::from(self.phrases_completed);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let avg = avg.round() as u32;
        avg
    }
}
