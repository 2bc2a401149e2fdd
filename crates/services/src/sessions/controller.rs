use std::fmt;

use practice_core::feedback::{Feedback, FeedbackPolicy};
use practice_core::model::{AttemptRecord, SessionSummary, TargetPhrase};
use practice_core::settings::PracticeSettings;
use practice_core::similarity;
use practice_core::Clock;
use speech::{
    Capability, CaptureEvent, CaptureSignal, CaptureTicket, PlaybackEvent, PlaybackSignal,
    SpeechCaptureAdapter, SpeechError, SpeechPlaybackAdapter, UtteranceId,
};

use super::progress::{PhraseStatus, SessionProgress};
use super::service::{PracticeSession, Transition};
use crate::error::SessionError;

/// Observable phase of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready for the next attempt at the current phrase.
    NotStarted,
    /// Waiting for the recognizer to finish.
    Listening,
    /// Grading a transcript.
    Scoring,
    /// Every phrase has been passed.
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::NotStarted => "not started",
            SessionPhase::Listening => "listening",
            SessionPhase::Scoring => "scoring",
            SessionPhase::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Everything the caller needs to render one graded attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptReport {
    pub record: AttemptRecord,
    pub feedback: Feedback,
    pub transition: Transition,
}

/// Drives a practice session: playback, capture, scoring and advancing.
///
/// Single-threaded and event driven. The host forwards platform callbacks
/// through [`on_capture_signal`](Self::on_capture_signal) and
/// [`on_playback_signal`](Self::on_playback_signal). Every capture started by
/// [`request_attempt`](Self::request_attempt) ends in exactly one attempt
/// record or one returned error.
pub struct PracticeSessionController {
    session: PracticeSession,
    capture: SpeechCaptureAdapter,
    playback: SpeechPlaybackAdapter,
    policy: FeedbackPolicy,
    settings: PracticeSettings,
    clock: Clock,
    phase: SessionPhase,
}

impl PracticeSessionController {
    #[must_use]
    pub fn new(
        session: PracticeSession,
        capture: SpeechCaptureAdapter,
        playback: SpeechPlaybackAdapter,
        settings: PracticeSettings,
        clock: Clock,
    ) -> Self {
        let phase = if session.is_complete() {
            SessionPhase::Completed
        } else {
            SessionPhase::NotStarted
        };
        Self {
            session,
            capture,
            playback,
            policy: FeedbackPolicy::new(settings.clone()),
            settings,
            clock,
            phase,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    #[must_use]
    pub fn current_phrase(&self) -> Option<&TargetPhrase> {
        self.session.current_phrase()
    }

    #[must_use]
    pub fn capture_capability(&self) -> Capability {
        self.capture.capability()
    }

    #[must_use]
    pub fn playback_capability(&self) -> Capability {
        self.playback.capability()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn phrase_statuses(&self) -> Vec<PhraseStatus> {
        self.session.phrase_statuses()
    }

    /// Summary of the session so far, closed at completion time if finished.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the clock runs behind the start.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let completed_at = self.session.completed_at().unwrap_or_else(|| self.clock.now());
        self.session.build_summary(completed_at)
    }

    //
    // ─── CAPTURE ──────────────────────────────────────────────────────────────
    //

    /// Starts listening for an attempt at the current phrase.
    ///
    /// Any playing utterance is cancelled first; recognizers cannot tell it
    /// apart from the learner's voice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while listening or scoring,
    /// `SessionError::Completed` after the last phrase, and
    /// `SessionError::Speech` when capture is unsupported or fails to start.
    /// The session is left untouched in every case.
    pub fn request_attempt(&mut self) -> Result<CaptureTicket, SessionError> {
        self.ensure_ready()?;
        let tag = self
            .session
            .current_phrase()
            .map(|phrase| phrase.language_tag().clone())
            .ok_or(SessionError::Completed)?;

        if self.playback.cancel().is_some() {
            tracing::debug!("cancelled playback before listening");
        }

        self.capture.configure(&tag);
        let ticket = self.capture.start().inspect_err(|err| {
            tracing::warn!(error = %err, "could not start listening");
        })?;

        self.phase = SessionPhase::Listening;
        tracing::debug!(
            index = self.session.current_index(),
            ticket = ticket.value(),
            "listening for attempt"
        );
        Ok(ticket)
    }

    /// Handles a recognizer callback.
    ///
    /// Returns `Ok(Some(_))` for a graded attempt and `Ok(None)` when the
    /// signal was stale.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Speech` for a recognition error and
    /// `SessionError::NoSpeech` when the recognizer heard nothing. The
    /// session stays on the same phrase.
    pub fn on_capture_signal(
        &mut self,
        ticket: CaptureTicket,
        signal: CaptureSignal,
    ) -> Result<Option<AttemptReport>, SessionError> {
        match self.capture.deliver(ticket, signal) {
            Some(event) => self.finish_capture(event).map(Some),
            None => Ok(None),
        }
    }

    /// Cancels the current listen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSpeech` for the cancelled listen. Calling it
    /// again, or while idle, returns `Ok(())`.
    pub fn stop_listening(&mut self) -> Result<(), SessionError> {
        match self.capture.stop() {
            Some(event) => self.finish_capture(event).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Grades a typed transcript, for platforms without speech capture.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while listening and
    /// `SessionError::Completed` after the last phrase.
    pub fn submit_transcript(&mut self, transcript: &str) -> Result<AttemptReport, SessionError> {
        self.ensure_ready()?;
        self.score(transcript)
    }

    fn finish_capture(&mut self, event: CaptureEvent) -> Result<AttemptReport, SessionError> {
        self.phase = self.resting_phase();
        match event {
            CaptureEvent::Result(result) => self.score(&result.transcript),
            CaptureEvent::Error { reason } => {
                tracing::warn!(%reason, "speech recognition failed");
                Err(SpeechError::Recognition { reason }.into())
            }
            CaptureEvent::Ended => {
                tracing::debug!("listen ended without speech");
                Err(SessionError::NoSpeech)
            }
        }
    }

    fn score(&mut self, transcript: &str) -> Result<AttemptReport, SessionError> {
        let (target, difficulty) = self
            .session
            .current_phrase()
            .map(|phrase| (phrase.text().to_string(), phrase.difficulty()))
            .ok_or(SessionError::Completed)?;

        self.phase = SessionPhase::Scoring;
        let similarity = similarity::score(transcript, &target);
        let feedback = self.policy.classify(similarity, difficulty);
        let recorded = self
            .session
            .record_attempt(transcript, &feedback, self.clock.now());
        self.phase = self.resting_phase();
        let (record, transition) = recorded?;

        tracing::debug!(
            index = record.phrase_index(),
            attempt = record.attempt_number(),
            similarity,
            outcome = ?record.outcome(),
            ?transition,
            total_score = self.session.total_score(),
            "attempt scored"
        );

        Ok(AttemptReport {
            record,
            feedback,
            transition,
        })
    }

    //
    // ─── PLAYBACK ─────────────────────────────────────────────────────────────
    //

    /// Reads the current phrase aloud at its difficulty's rate.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while listening, `SessionError::Completed`
    /// after the last phrase, and `SessionError::Speech` when playback is
    /// unsupported or rejected.
    pub fn play_current(&mut self) -> Result<UtteranceId, SessionError> {
        self.ensure_not_busy()?;
        let phrase = self.session.current_phrase().ok_or(SessionError::Completed)?;
        let rate = self.settings.playback_rate(phrase.difficulty());
        Ok(self.playback.speak(phrase.text(), phrase.language_tag(), rate)?)
    }

    /// Handles a synthesizer callback.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Speech` when the platform reports a playback failure.
    pub fn on_playback_signal(
        &mut self,
        id: UtteranceId,
        signal: PlaybackSignal,
    ) -> Result<Option<PlaybackEvent>, SessionError> {
        match self.playback.deliver(id, signal) {
            Some(PlaybackEvent::Error { reason }) => Err(SpeechError::Playback { reason }.into()),
            other => Ok(other),
        }
    }

    pub fn cancel_playback(&mut self) -> Option<PlaybackEvent> {
        self.playback.cancel()
    }

    //
    // ─── NAVIGATION ───────────────────────────────────────────────────────────
    //

    /// Skips to the next phrase, stopping any playback.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while listening or scoring, and
    /// `SessionError::NoSuchPhrase` on the last phrase.
    pub fn next_phrase(&mut self) -> Result<(), SessionError> {
        self.ensure_not_busy()?;
        self.playback.cancel();
        let moved = self.session.next();
        self.phase = self.resting_phase();
        moved
    }

    /// Goes back one phrase, stopping any playback.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while listening or scoring, and
    /// `SessionError::NoSuchPhrase` on the first phrase.
    pub fn previous_phrase(&mut self) -> Result<(), SessionError> {
        self.ensure_not_busy()?;
        self.playback.cancel();
        let moved = self.session.previous();
        self.phase = self.resting_phase();
        moved
    }

    /// Jumps to the phrase at `index`, stopping any playback.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while listening or scoring, and
    /// `SessionError::NoSuchPhrase` if `index` is out of range.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_not_busy()?;
        self.playback.cancel();
        let moved = self.session.go_to(index);
        self.phase = self.resting_phase();
        moved
    }

    /// Clears all attempts and scores and returns to the first phrase.
    ///
    /// Allowed in any phase. A listen in progress is abandoned: it records no
    /// attempt and its terminal event is discarded, as is any playback.
    pub fn reset(&mut self) {
        if self.capture.stop().is_some() {
            tracing::debug!("abandoned listen on reset");
        }
        self.playback.cancel();
        self.session.reset(self.clock.now());
        self.phase = SessionPhase::NotStarted;
        tracing::debug!("session reset");
    }

    //
    // ─── HELPERS ──────────────────────────────────────────────────────────────
    //

    fn ensure_ready(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::NotStarted => Ok(()),
            SessionPhase::Completed => Err(SessionError::Completed),
            phase @ (SessionPhase::Listening | SessionPhase::Scoring) => {
                Err(SessionError::Busy { phase })
            }
        }
    }

    fn ensure_not_busy(&self) -> Result<(), SessionError> {
        match self.phase {
            phase @ (SessionPhase::Listening | SessionPhase::Scoring) => {
                Err(SessionError::Busy { phase })
            }
            SessionPhase::NotStarted | SessionPhase::Completed => Ok(()),
        }
    }

    fn resting_phase(&self) -> SessionPhase {
        if self.session.is_complete() {
            SessionPhase::Completed
        } else {
            SessionPhase::NotStarted
        }
    }
}

impl fmt::Debug for PracticeSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSessionController")
            .field("phase", &self.phase)
            .field("session", &self.session)
            .field("capture", &self.capture)
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{AttemptOutcome, Difficulty, LanguageTag, RecognitionResult};
    use practice_core::time::fixed_now;
    use speech::{ScriptedRecognizer, ScriptedSynthesizer};

    struct Rig {
        controller: PracticeSessionController,
        mic: ScriptedRecognizer,
        voice: ScriptedSynthesizer,
    }

    fn phrase(text: &str, difficulty: Difficulty) -> TargetPhrase {
        TargetPhrase::new(text, LanguageTag::resolve("es").unwrap(), difficulty).unwrap()
    }

    fn rig(phrases: Vec<TargetPhrase>) -> Rig {
        let mic = ScriptedRecognizer::new();
        let voice = ScriptedSynthesizer::new();
        let session = PracticeSession::new(phrases, fixed_now()).unwrap();
        let controller = PracticeSessionController::new(
            session,
            SpeechCaptureAdapter::new(Some(Box::new(mic.clone()))),
            SpeechPlaybackAdapter::new(Some(Box::new(voice.clone()))),
            PracticeSettings::default(),
            Clock::fixed(fixed_now()),
        );
        Rig {
            controller,
            mic,
            voice,
        }
    }

    fn text_only(phrases: Vec<TargetPhrase>) -> PracticeSessionController {
        let session = PracticeSession::new(phrases, fixed_now()).unwrap();
        PracticeSessionController::new(
            session,
            SpeechCaptureAdapter::unavailable(),
            SpeechPlaybackAdapter::unavailable(),
            PracticeSettings::default(),
            Clock::fixed(fixed_now()),
        )
    }

    fn say(controller: &mut PracticeSessionController, words: &str) -> AttemptReport {
        let ticket = controller.request_attempt().unwrap();
        controller
            .on_capture_signal(ticket, CaptureSignal::Transcript(RecognitionResult::new(words)))
            .unwrap()
            .expect("terminal event")
    }

    #[test]
    fn three_phrase_beginner_walkthrough() {
        // similarities: 9/10, 10/20 then 13/20, and an exact match
        let mut rig = rig(vec![
            phrase("abcdefghij", Difficulty::Beginner),
            phrase("abcdefghijklmnopqrst", Difficulty::Beginner),
            phrase("hola", Difficulty::Beginner),
        ]);
        let c = &mut rig.controller;

        let report = say(c, "abcdefghiX");
        assert_eq!(report.feedback.outcome, AttemptOutcome::Success);
        assert_eq!(report.transition, Transition::Advanced { next_index: 1 });
        assert_eq!(c.session().total_score(), 90);
        assert_eq!(c.phase(), SessionPhase::NotStarted);

        let report = say(c, "abcdefghijXXXXXXXXXX");
        assert!(!report.feedback.outcome.is_success());
        assert_eq!(report.transition, Transition::Retry);
        assert_eq!(c.session().current_index(), 1);
        assert_eq!(c.session().total_score(), 90);

        let report = say(c, "abcdefghijklmXXXXXXX");
        assert_eq!(report.feedback.outcome, AttemptOutcome::Success);
        assert_eq!(report.record.attempt_number(), 2);
        assert_eq!(c.session().total_score(), 155);

        let report = say(c, "Hola");
        assert_eq!(report.transition, Transition::Completed);
        assert_eq!(c.phase(), SessionPhase::Completed);
        assert_eq!(c.session().total_score(), 255);
        assert_eq!(c.session().current_index(), 3);
        assert!(!rig.mic.is_mic_open());
    }

    #[test]
    fn second_request_while_listening_is_rejected() {
        let mut rig = rig(vec![phrase("hola", Difficulty::Beginner)]);
        rig.controller.request_attempt().unwrap();
        let err = rig.controller.request_attempt().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Busy {
                phase: SessionPhase::Listening
            }
        ));
        assert!(matches!(
            rig.controller.submit_transcript("hola"),
            Err(SessionError::Busy { .. })
        ));
        assert_eq!(rig.mic.opened(), 1);
    }

    #[test]
    fn unsupported_capture_surfaces_error_without_record() {
        let mut controller = text_only(vec![phrase("hola", Difficulty::Beginner)]);
        assert_eq!(controller.capture_capability(), Capability::Unavailable);

        let err = controller.request_attempt().unwrap_err();
        assert!(matches!(err, SessionError::Speech(SpeechError::Unsupported)));
        assert_eq!(controller.phase(), SessionPhase::NotStarted);
        assert_eq!(controller.session().attempt_count(), 0);
    }

    #[test]
    fn typed_transcripts_work_without_speech() {
        let mut controller = text_only(vec![
            phrase("Bonjour", Difficulty::Beginner),
            phrase("Merci", Difficulty::Beginner),
        ]);
        let report = controller.submit_transcript("bonjour").unwrap();
        assert_eq!(report.feedback.similarity, 1.0);
        assert_eq!(controller.session().current_index(), 1);

        let report = controller.submit_transcript("merci").unwrap();
        assert_eq!(report.transition, Transition::Completed);
        assert!(matches!(
            controller.submit_transcript("merci"),
            Err(SessionError::Completed)
        ));
        assert!(matches!(controller.play_current(), Err(SessionError::Completed)));
    }

    #[test]
    fn recognition_error_is_surfaced_once_and_recoverable() {
        let mut rig = rig(vec![phrase("hola", Difficulty::Beginner)]);
        let c = &mut rig.controller;

        let ticket = c.request_attempt().unwrap();
        let err = c
            .on_capture_signal(ticket, CaptureSignal::Failed { reason: "network".into() })
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Speech(SpeechError::Recognition { ref reason }) if reason == "network"
        ));
        assert_eq!(c.phase(), SessionPhase::NotStarted);
        assert_eq!(c.session().attempt_count(), 0);

        // the trailing end callback of the failed listen is dropped
        assert_eq!(c.on_capture_signal(ticket, CaptureSignal::Ended).unwrap(), None);

        let report = say(c, "hola");
        assert_eq!(report.transition, Transition::Completed);
    }

    #[test]
    fn silence_is_reported_as_no_speech() {
        let mut rig = rig(vec![phrase("hola", Difficulty::Beginner)]);
        let ticket = rig.controller.request_attempt().unwrap();
        let err = rig
            .controller
            .on_capture_signal(ticket, CaptureSignal::Ended)
            .unwrap_err();
        assert!(matches!(err, SessionError::NoSpeech));
        assert_eq!(rig.controller.phase(), SessionPhase::NotStarted);
        assert_eq!(rig.controller.session().attempt_count(), 0);
    }

    #[test]
    fn stop_listening_twice_surfaces_one_event() {
        let mut rig = rig(vec![phrase("hola", Difficulty::Beginner)]);
        rig.controller.request_attempt().unwrap();

        assert!(matches!(rig.controller.stop_listening(), Err(SessionError::NoSpeech)));
        assert!(rig.controller.stop_listening().is_ok());
        assert_eq!(rig.controller.phase(), SessionPhase::NotStarted);
        assert_eq!(rig.mic.released(), 1);
        assert!(rig.controller.request_attempt().is_ok());
    }

    #[test]
    fn playback_uses_difficulty_rate_and_yields_to_capture() {
        let mut rig = rig(vec![
            phrase("Hola", Difficulty::Beginner),
            phrase("Pronunciación", Difficulty::Advanced),
        ]);
        let c = &mut rig.controller;

        let id = c.play_current().unwrap();
        assert_eq!(
            c.on_playback_signal(id, PlaybackSignal::Started).unwrap(),
            Some(PlaybackEvent::Started)
        );
        assert_eq!(rig.voice.spoken()[0].rate, 0.8);
        assert_eq!(rig.voice.spoken()[0].language_tag.as_str(), "es-ES");

        c.request_attempt().unwrap();
        assert!(!c.is_playing());
        assert_eq!(rig.voice.cancels(), 1);
        assert!(matches!(c.play_current(), Err(SessionError::Busy { .. })));

        c.stop_listening().unwrap_err();
        c.next_phrase().unwrap();
        c.play_current().unwrap();
        assert_eq!(rig.voice.spoken()[1].rate, 1.0);
    }

    #[test]
    fn playback_failure_is_surfaced() {
        let mut rig = rig(vec![phrase("Hola", Difficulty::Beginner)]);
        let id = rig.controller.play_current().unwrap();
        let err = rig
            .controller
            .on_playback_signal(id, PlaybackSignal::Failed { reason: "audio-busy".into() })
            .unwrap_err();
        assert!(matches!(err, SessionError::Speech(SpeechError::Playback { .. })));
        assert!(!rig.controller.is_playing());
    }

    #[test]
    fn unsupported_playback_is_reported() {
        let mut controller = text_only(vec![phrase("Hola", Difficulty::Beginner)]);
        assert!(matches!(
            controller.play_current(),
            Err(SessionError::Speech(SpeechError::Unsupported))
        ));
    }

    #[test]
    fn reset_from_listening_releases_microphone() {
        let mut rig = rig(vec![
            phrase("Hola", Difficulty::Beginner),
            phrase("Gracias", Difficulty::Beginner),
        ]);
        say(&mut rig.controller, "hola");
        let ticket = rig.controller.request_attempt().unwrap();

        rig.controller.reset();
        assert_eq!(rig.controller.phase(), SessionPhase::NotStarted);
        assert_eq!(rig.controller.session().current_index(), 0);
        assert_eq!(rig.controller.session().total_score(), 0);
        assert!(!rig.mic.is_mic_open());

        // a result for the abandoned listen is ignored
        let late = rig
            .controller
            .on_capture_signal(ticket, CaptureSignal::Transcript(RecognitionResult::new("gracias")))
            .unwrap();
        assert_eq!(late, None);
        assert_eq!(rig.controller.session().attempt_count(), 0);
    }

    #[test]
    fn navigation_while_listening_is_rejected() {
        let mut rig = rig(vec![
            phrase("Hola", Difficulty::Beginner),
            phrase("Gracias", Difficulty::Beginner),
        ]);
        let c = &mut rig.controller;
        let ticket = c.request_attempt().unwrap();

        let busy = |result: Result<(), SessionError>| {
            matches!(
                result,
                Err(SessionError::Busy {
                    phase: SessionPhase::Listening
                })
            )
        };
        assert!(busy(c.next_phrase()));
        assert!(busy(c.go_to(1)));
        assert!(busy(c.previous_phrase()));
        assert_eq!(c.phase(), SessionPhase::Listening);
        assert!(rig.mic.is_mic_open());

        // the listen is still live and grades the phrase it started on
        let report = c
            .on_capture_signal(ticket, CaptureSignal::Transcript(RecognitionResult::new("hola")))
            .unwrap()
            .expect("graded");
        assert_eq!(report.record.phrase_index(), 0);
        assert_eq!(c.session().attempt_count(), 1);
        assert_eq!(c.session().current_index(), 1);
    }

    #[test]
    fn go_to_jumps_between_phrases() {
        let mut controller = text_only(vec![
            phrase("Hola", Difficulty::Beginner),
            phrase("Gracias", Difficulty::Beginner),
            phrase("Hermoso", Difficulty::Intermediate),
        ]);
        controller.go_to(2).unwrap();
        assert_eq!(controller.current_phrase().unwrap().text(), "Hermoso");

        let report = controller.submit_transcript("hermoso").unwrap();
        assert_eq!(report.transition, Transition::Completed);
        assert_eq!(controller.phase(), SessionPhase::Completed);

        assert!(matches!(
            controller.go_to(3),
            Err(SessionError::NoSuchPhrase { index: 3 })
        ));
        controller.go_to(0).unwrap();
        assert_eq!(controller.phase(), SessionPhase::NotStarted);
        assert_eq!(controller.session().total_score(), 100);
        assert!(controller.session().is_phrase_completed(2));
    }

    #[test]
    fn cancel_playback_emits_ended_once() {
        let mut rig = rig(vec![phrase("Hola", Difficulty::Beginner)]);
        let c = &mut rig.controller;
        let id = c.play_current().unwrap();
        c.on_playback_signal(id, PlaybackSignal::Started).unwrap();

        assert_eq!(c.cancel_playback(), Some(PlaybackEvent::Ended));
        assert_eq!(c.cancel_playback(), None);
        assert!(!c.is_playing());
        assert_eq!(rig.voice.cancels(), 1);

        // late platform callbacks for the cancelled utterance
        assert_eq!(c.on_playback_signal(id, PlaybackSignal::Started).unwrap(), None);
        assert_eq!(c.on_playback_signal(id, PlaybackSignal::Ended).unwrap(), None);
    }

    #[test]
    fn playback_signals_after_end_are_ignored() {
        let mut rig = rig(vec![phrase("Hola", Difficulty::Beginner)]);
        let c = &mut rig.controller;
        let id = c.play_current().unwrap();
        c.on_playback_signal(id, PlaybackSignal::Started).unwrap();
        assert_eq!(
            c.on_playback_signal(id, PlaybackSignal::Ended).unwrap(),
            Some(PlaybackEvent::Ended)
        );

        assert_eq!(c.on_playback_signal(id, PlaybackSignal::Started).unwrap(), None);
        assert!(
            c.on_playback_signal(id, PlaybackSignal::Failed { reason: "late".into() })
                .unwrap()
                .is_none()
        );
        assert_eq!(c.cancel_playback(), None);
    }

    #[test]
    fn navigation_stops_playback() {
        let mut rig = rig(vec![
            phrase("Hola", Difficulty::Beginner),
            phrase("Gracias", Difficulty::Beginner),
        ]);
        rig.controller.play_current().unwrap();
        rig.controller.next_phrase().unwrap();
        assert!(!rig.controller.is_playing());
        assert_eq!(rig.voice.cancels(), 1);
    }

    #[test]
    fn revisiting_a_completed_session() {
        let mut controller = text_only(vec![phrase("Hola", Difficulty::Beginner)]);
        controller.submit_transcript("hola").unwrap();
        assert_eq!(controller.phase(), SessionPhase::Completed);

        controller.previous_phrase().unwrap();
        assert_eq!(controller.phase(), SessionPhase::NotStarted);
        controller.submit_transcript("hola").unwrap();
        assert_eq!(controller.session().total_score(), 100);
        assert_eq!(controller.phase(), SessionPhase::Completed);
    }

    #[test]
    fn summary_closes_at_completion() {
        let mut controller = text_only(vec![phrase("Hola", Difficulty::Beginner)]);
        controller.submit_transcript("ola").unwrap();
        let summary = controller.summary().unwrap();
        assert_eq!(summary.completed_at(), fixed_now());
        assert_eq!(summary.total_score(), 75);
        assert_eq!(summary.phrases_completed(), 1);
    }
}
