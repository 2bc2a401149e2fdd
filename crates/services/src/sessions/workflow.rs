use std::sync::Arc;

use practice_core::model::SessionSummary;
use practice_core::settings::PracticeSettings;
use practice_core::Clock;
use rand::seq::SliceRandom;
use speech::{SpeechCaptureAdapter, SpeechPlaybackAdapter};

use super::controller::PracticeSessionController;
use super::service::PracticeSession;
use crate::context::LearnerContext;
use crate::error::SessionError;
use crate::ports::{LessonRef, PhraseProvider, ProgressRecorder, ProgressReport};

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub summary: SessionSummary,
    pub report: ProgressReport,
}

/// Builds sessions from a phrase provider and reports finished ones.
#[derive(Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    settings: PracticeSettings,
    phrases: Arc<dyn PhraseProvider>,
    progress: Arc<dyn ProgressRecorder>,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: PracticeSettings,
        phrases: Arc<dyn PhraseProvider>,
        progress: Arc<dyn ProgressRecorder>,
    ) -> Self {
        Self {
            clock,
            settings,
            phrases,
            progress,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    /// Load the lesson's phrases and wrap them in a ready controller.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Port` if the phrases cannot be loaded and
    /// `SessionError::Empty` if the lesson has none.
    pub async fn start_session(
        &self,
        lesson: &LessonRef,
        capture: SpeechCaptureAdapter,
        playback: SpeechPlaybackAdapter,
    ) -> Result<PracticeSessionController, SessionError> {
        let mut phrases = self.phrases.phrases(lesson).await?;
        if self.settings.shuffle_phrases() {
            phrases.shuffle(&mut rand::rng());
        }

        let session = PracticeSession::new(phrases, self.clock.now())?;
        tracing::info!(
            language = %lesson.language_code,
            unit = lesson.unit,
            lesson = lesson.lesson,
            phrases = session.phrases().len(),
            "practice session started"
        );
        Ok(PracticeSessionController::new(
            session,
            capture,
            playback,
            self.settings.clone(),
            self.clock,
        ))
    }

    /// Summarize a completed session and hand its score to the recorder.
    ///
    /// Every call records a report, so a caller retrying after a recorder
    /// failure gets exactly one stored report per success.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the last phrase is passed,
    /// or `SessionError::Port` if the recorder fails.
    pub async fn finish(
        &self,
        learner: &LearnerContext,
        lesson: &LessonRef,
        controller: &PracticeSessionController,
    ) -> Result<SessionOutcome, SessionError> {
        if !controller.session().is_complete() {
            return Err(SessionError::NotFinished);
        }
        let summary = controller.summary()?;
        let report = ProgressReport {
            language_code: lesson.language_code.clone(),
            unit: lesson.unit,
            lesson: lesson.lesson,
            score: summary.total_score(),
        };

        self.progress.record(learner, &report).await.inspect_err(|err| {
            tracing::warn!(learner = %learner.learner_id(), error = %err, "failed to record progress");
        })?;
        tracing::info!(
            learner = %learner.learner_id(),
            name = learner.display_name(),
            score = report.score,
            attempts = summary.total_attempts(),
            "practice session recorded"
        );
        Ok(SessionOutcome { summary, report })
    }
}
