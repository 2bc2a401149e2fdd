use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use practice_core::feedback::Feedback;
use practice_core::model::{AttemptRecord, SessionSummary, TargetPhrase};

use super::progress::{PhraseStatus, SessionProgress};
use crate::error::SessionError;

//
// ─── TRANSITION ────────────────────────────────────────────────────────────────
//

/// Where the session went after a scored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Success; the session moved on to `next_index`.
    Advanced { next_index: usize },
    /// Warning or fail; the same phrase is up again.
    Retry,
    /// Success on the last phrase.
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one practice run over an ordered list of phrases.
///
/// Knows nothing about speech. `current` is always a valid phrase index, or
/// equals the phrase count once the session is complete. A phrase is in the
/// completed set only after a successful attempt, and `total_score` is the sum
/// of each completed phrase's best score.
pub struct PracticeSession {
    phrases: Vec<TargetPhrase>,
    current: usize,
    attempts: BTreeMap<usize, Vec<AttemptRecord>>,
    best_scores: BTreeMap<usize, u32>,
    total_score: u32,
    current_streak: u32,
    best_streak: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl PracticeSession {
    /// Create a session over `phrases`, starting at the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no phrases are provided.
    pub fn new(phrases: Vec<TargetPhrase>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if phrases.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            phrases,
            current: 0,
            attempts: BTreeMap::new(),
            best_scores: BTreeMap::new(),
            total_score: 0,
            current_streak: 0,
            best_streak: 0,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn phrases(&self) -> &[TargetPhrase] {
        &self.phrases
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_phrase(&self) -> Option<&TargetPhrase> {
        self.phrases.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.phrases.len()
    }

    #[must_use]
    pub fn is_phrase_completed(&self, index: usize) -> bool {
        self.best_scores.contains_key(&index)
    }

    /// Indexes of phrases with at least one successful attempt.
    pub fn completed(&self) -> impl Iterator<Item = usize> + '_ {
        self.best_scores.keys().copied()
    }

    #[must_use]
    pub fn attempts_for(&self, index: usize) -> &[AttemptRecord] {
        self.attempts
            .get(&index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of attempts recorded across all phrases.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.attempts.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the session first reached its end.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Append a scored attempt for the current phrase and apply its outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if every phrase is already behind us.
    pub fn record_attempt(
        &mut self,
        transcript: &str,
        feedback: &Feedback,
        at: DateTime<Utc>,
    ) -> Result<(AttemptRecord, Transition), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        let index = self.current;
        let history = self.attempts.entry(index).or_default();
        let attempt_number = u32::try_from(history.len()).unwrap_or(u32::MAX).saturating_add(1);
        let record = AttemptRecord::new(
            index,
            transcript.trim(),
            feedback.similarity,
            feedback.outcome,
            attempt_number,
            at,
        );
        history.push(record.clone());

        if !record.outcome().is_success() {
            self.current_streak = 0;
            return Ok((record, Transition::Retry));
        }

        self.credit(index, record.score());
        self.current_streak = self.current_streak.saturating_add(1);
        self.best_streak = self.best_streak.max(self.current_streak);

        self.current += 1;
        let transition = if self.is_complete() {
            if self.completed_at.is_none() {
                self.completed_at = Some(at);
            }
            Transition::Completed
        } else {
            Transition::Advanced {
                next_index: self.current,
            }
        };
        Ok((record, transition))
    }

    // A phrase contributes its best score once; a better retry raises it.
    fn credit(&mut self, index: usize, score: u32) {
        let previous = self.best_scores.get(&index).copied();
        if previous.is_some_and(|best| best >= score) {
            return;
        }
        self.best_scores.insert(index, score);
        self.total_score = self.total_score - previous.unwrap_or(0) + score;
    }

    /// Jump to any phrase, re-opening a completed session if needed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSuchPhrase` if `index` is out of range.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.phrases.len() {
            return Err(SessionError::NoSuchPhrase { index });
        }
        self.current = index;
        Ok(())
    }

    /// Move to the following phrase without attempting the current one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSuchPhrase` on the last phrase or after the end.
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.go_to(self.current + 1)
    }

    /// Move back one phrase; from a completed session, back to the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSuchPhrase` on the first phrase.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        let index = self
            .current
            .min(self.phrases.len())
            .checked_sub(1)
            .ok_or(SessionError::NoSuchPhrase { index: 0 })?;
        self.go_to(index)
    }

    /// Drop all progress and start over at the first phrase.
    pub fn reset(&mut self, started_at: DateTime<Utc>) {
        self.current = 0;
        self.attempts.clear();
        self.best_scores.clear();
        self.total_score = 0;
        self.current_streak = 0;
        self.best_streak = 0;
        self.started_at = started_at;
        self.completed_at = None;
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.phrases.len();
        let completed = self.best_scores.len();
        let average_score = if completed == 0 {
            0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let mean = f64::from(self.total_score) / completed as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let mean = mean.round() as u32;
            mean
        };

        SessionProgress {
            total,
            current_index: self.current,
            completed,
            attempts: self.attempt_count(),
            progress_percent: percent(self.current, total),
            total_score: self.total_score,
            average_score,
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            is_complete: self.is_complete(),
        }
    }

    /// Per-phrase overview, in phrase order.
    #[must_use]
    pub fn phrase_statuses(&self) -> Vec<PhraseStatus> {
        self.phrases
            .iter()
            .enumerate()
            .map(|(index, phrase)| PhraseStatus {
                index,
                text: phrase.text().to_string(),
                attempts: self.attempts_for(index).len(),
                best_score: self.best_scores.get(&index).copied(),
                success: self.is_phrase_completed(index),
            })
            .collect()
    }

    /// Summarize the session up to `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if `completed_at` precedes the start.
    pub fn build_summary(&self, completed_at: DateTime<Utc>) -> Result<SessionSummary, SessionError> {
        Ok(SessionSummary::from_attempts(
            self.started_at,
            completed_at,
            self.phrases.len(),
            self.attempts.values().flatten(),
            self.best_streak,
        )?)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("phrases_len", &self.phrases.len())
            .field("current", &self.current)
            .field("completed", &self.best_scores.len())
            .field("total_score", &self.total_score)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
