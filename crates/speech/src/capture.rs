use std::fmt;

use practice_core::model::{LanguageTag, RecognitionResult};

use crate::capability::Capability;
use crate::error::SpeechError;

//
// ─── PLATFORM BRIDGE ───────────────────────────────────────────────────────────
//

/// Platform speech-to-text service.
///
/// Implementations listen for a single utterance per `begin` (non-continuous,
/// no interim results) and report back through
/// [`SpeechCaptureAdapter::deliver`].
pub trait SpeechRecognizer: Send {
    /// Selects the recognition locale for subsequent listens.
    fn set_language(&mut self, tag: &LanguageTag);

    /// Opens the microphone and starts listening.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Recognition` if the platform refuses to start
    /// (permission denied, device busy). The microphone must not stay open.
    fn begin(&mut self) -> Result<(), SpeechError>;

    /// Stops listening if still active and releases the microphone.
    ///
    /// Called after every listen, including ones the platform already ended,
    /// so implementations must tolerate repeated calls.
    fn release(&mut self);
}

//
// ─── SIGNALS & EVENTS ──────────────────────────────────────────────────────────
//

/// Raw callback from the platform recognizer.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureSignal {
    Transcript(RecognitionResult),
    Failed { reason: String },
    /// The platform stopped listening without hearing anything.
    Ended,
}

/// Terminal event of one capture cycle. Exactly one per successful `start()`.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    Result(RecognitionResult),
    Error { reason: String },
    Ended,
}

impl From<CaptureSignal> for CaptureEvent {
    fn from(signal: CaptureSignal) -> Self {
        match signal {
            CaptureSignal::Transcript(result) => CaptureEvent::Result(result),
            CaptureSignal::Failed { reason } => CaptureEvent::Error { reason },
            CaptureSignal::Ended => CaptureEvent::Ended,
        }
    }
}

/// Identifies one `start()`..terminal-event cycle.
///
/// Platform callbacks are delivered with the ticket of the listen they belong
/// to, so a late callback from a stopped listen cannot end a newer one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureTicket(u64);

impl CaptureTicket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CaptureTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CaptureTicket({})", self.0)
    }
}

//
// ─── ADAPTER ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Idle,
    Listening(CaptureTicket),
}

/// Single-utterance capture with a strict one-terminal-event contract.
pub struct SpeechCaptureAdapter {
    backend: Option<Box<dyn SpeechRecognizer>>,
    language: Option<LanguageTag>,
    state: CaptureState,
    issued: u64,
}

impl SpeechCaptureAdapter {
    /// Wraps a platform recognizer; `None` means the platform has none.
    #[must_use]
    pub fn new(backend: Option<Box<dyn SpeechRecognizer>>) -> Self {
        let adapter = Self {
            backend,
            language: None,
            state: CaptureState::Idle,
            issued: 0,
        };
        match adapter.capability() {
            Capability::Available => tracing::debug!("speech capture available"),
            Capability::Unavailable => {
                tracing::warn!("speech capture unavailable; falling back to typed transcripts");
            }
        }
        adapter
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn capability(&self) -> Capability {
        if self.backend.is_some() {
            Capability::Available
        } else {
            Capability::Unavailable
        }
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        matches!(self.state, CaptureState::Listening(_))
    }

    #[must_use]
    pub fn language(&self) -> Option<&LanguageTag> {
        self.language.as_ref()
    }

    /// Sets the recognition locale. No-op when capture is unavailable.
    pub fn configure(&mut self, tag: &LanguageTag) {
        if let Some(backend) = self.backend.as_mut() {
            backend.set_language(tag);
            self.language = Some(tag.clone());
        }
    }

    /// Starts listening for one utterance.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Unsupported` without a platform recognizer,
    /// `SpeechError::AlreadyListening` while a listen is in progress, or the
    /// recognizer's own error if it fails to start.
    pub fn start(&mut self) -> Result<CaptureTicket, SpeechError> {
        if self.is_listening() {
            return Err(SpeechError::AlreadyListening);
        }
        let Some(backend) = self.backend.as_mut() else {
            return Err(SpeechError::Unsupported);
        };

        if let Err(err) = backend.begin() {
            backend.release();
            tracing::warn!(error = %err, "speech capture failed to start");
            return Err(err);
        }

        self.issued += 1;
        let ticket = CaptureTicket(self.issued);
        self.state = CaptureState::Listening(ticket);
        tracing::debug!(ticket = ticket.value(), "speech capture listening");
        Ok(ticket)
    }

    /// Cancels an in-progress listen.
    ///
    /// Returns the `Ended` terminal event for the cancelled cycle, or `None`
    /// when nothing was listening.
    pub fn stop(&mut self) -> Option<CaptureEvent> {
        let CaptureState::Listening(ticket) = self.state else {
            return None;
        };
        self.finish_cycle();
        tracing::debug!(ticket = ticket.value(), "speech capture stopped");
        Some(CaptureEvent::Ended)
    }

    /// Feeds a platform callback for the cycle identified by `ticket`.
    ///
    /// Returns the terminal event when the signal ends the active cycle.
    /// Signals for stale tickets, or arriving after the cycle already
    /// ended, are dropped.
    pub fn deliver(&mut self, ticket: CaptureTicket, signal: CaptureSignal) -> Option<CaptureEvent> {
        match self.state {
            CaptureState::Listening(active) if active == ticket => {
                self.finish_cycle();
                let event = CaptureEvent::from(signal);
                tracing::debug!(ticket = ticket.value(), ?event, "speech capture finished");
                Some(event)
            }
            _ => {
                tracing::trace!(ticket = ticket.value(), "dropping stale capture signal");
                None
            }
        }
    }

    fn finish_cycle(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.release();
        }
        self.state = CaptureState::Idle;
    }
}

impl Drop for SpeechCaptureAdapter {
    fn drop(&mut self) {
        if self.is_listening() {
            self.finish_cycle();
        }
    }
}

impl fmt::Debug for SpeechCaptureAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechCaptureAdapter")
            .field("capability", &self.capability())
            .field("language", &self.language)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedRecognizer;

    fn adapter() -> (SpeechCaptureAdapter, ScriptedRecognizer) {
        let probe = ScriptedRecognizer::new();
        let adapter = SpeechCaptureAdapter::new(Some(Box::new(probe.clone())));
        (adapter, probe)
    }

    #[test]
    fn unavailable_capture_reports_unsupported() {
        let mut capture = SpeechCaptureAdapter::unavailable();
        assert_eq!(capture.capability(), Capability::Unavailable);
        capture.configure(&LanguageTag::resolve("fr").unwrap());
        assert_eq!(capture.language(), None);
        assert_eq!(capture.start().unwrap_err(), SpeechError::Unsupported);
        assert_eq!(capture.stop(), None);
    }

    #[test]
    fn configure_sets_backend_language() {
        let (mut capture, probe) = adapter();
        capture.configure(&LanguageTag::resolve("de").unwrap());
        assert_eq!(probe.language().as_deref(), Some("de-DE"));
        assert_eq!(capture.language().unwrap().as_str(), "de-DE");
    }

    #[test]
    fn second_start_while_listening_is_rejected() {
        let (mut capture, probe) = adapter();
        capture.start().unwrap();
        assert_eq!(capture.start().unwrap_err(), SpeechError::AlreadyListening);
        assert_eq!(probe.opened(), 1);
    }

    #[test]
    fn one_terminal_event_per_start() {
        let (mut capture, probe) = adapter();
        let ticket = capture.start().unwrap();

        let first = capture.deliver(ticket, CaptureSignal::Transcript(RecognitionResult::new("hola")));
        assert_eq!(first, Some(CaptureEvent::Result(RecognitionResult::new("hola"))));

        // platforms commonly fire an end callback after the result
        assert_eq!(capture.deliver(ticket, CaptureSignal::Ended), None);
        assert!(!capture.is_listening());
        assert!(!probe.is_mic_open());

        let again = capture.start().unwrap();
        assert_ne!(again, ticket);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut capture, probe) = adapter();
        capture.start().unwrap();
        assert_eq!(capture.stop(), Some(CaptureEvent::Ended));
        assert_eq!(capture.stop(), None);
        assert_eq!(probe.released(), 1);
        assert!(!probe.is_mic_open());
    }

    #[test]
    fn late_signal_from_stopped_listen_is_dropped() {
        let (mut capture, _probe) = adapter();
        let old = capture.start().unwrap();
        capture.stop();
        let current = capture.start().unwrap();

        let stale = capture.deliver(old, CaptureSignal::Failed { reason: "aborted".into() });
        assert_eq!(stale, None);
        assert!(capture.is_listening());

        let event = capture.deliver(current, CaptureSignal::Ended);
        assert_eq!(event, Some(CaptureEvent::Ended));
    }

    #[test]
    fn failed_begin_leaves_adapter_idle() {
        let (mut capture, probe) = adapter();
        probe.fail_next_begin("not-allowed");
        let err = capture.start().unwrap_err();
        assert_eq!(err, SpeechError::recognition("not-allowed"));
        assert!(!capture.is_listening());
        assert!(!probe.is_mic_open());
        assert!(capture.start().is_ok());
    }

    #[test]
    fn microphone_never_leaks_across_cycles() {
        let (mut capture, probe) = adapter();
        for round in 0..10 {
            let ticket = capture.start().unwrap();
            assert!(probe.is_mic_open());
            if round % 2 == 0 {
                capture.stop();
            } else {
                capture.deliver(ticket, CaptureSignal::Failed { reason: "network".into() });
            }
            assert!(!probe.is_mic_open());
        }
        assert_eq!(probe.opened(), 10);
    }

    #[test]
    fn dropping_a_listening_adapter_releases_the_microphone() {
        let (mut capture, probe) = adapter();
        capture.start().unwrap();
        drop(capture);
        assert!(!probe.is_mic_open());
    }
}
