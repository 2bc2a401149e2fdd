use std::fmt;

use practice_core::model::LanguageTag;

use crate::capability::Capability;
use crate::error::SpeechError;

/// One phrase to be read aloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language_tag: LanguageTag,
    /// Speed multiplier, 1.0 being the platform's normal rate.
    pub rate: f32,
}

/// Platform text-to-speech service.
pub trait SpeechSynthesizer: Send {
    /// Queues `utterance` for playback.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Playback` if the platform rejects it.
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stops whatever is playing and drops the queue.
    fn cancel(&mut self);
}

/// Raw callback from the platform synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackSignal {
    Started,
    Ended,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started,
    Ended,
    Error { reason: String },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(u64);

impl UtteranceId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UtteranceId({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackState {
    Idle,
    Queued(UtteranceId),
    Playing(UtteranceId),
}

/// Plays at most one utterance at a time; a new `speak` preempts the old one.
pub struct SpeechPlaybackAdapter {
    backend: Option<Box<dyn SpeechSynthesizer>>,
    state: PlaybackState,
    issued: u64,
}

impl SpeechPlaybackAdapter {
    #[must_use]
    pub fn new(backend: Option<Box<dyn SpeechSynthesizer>>) -> Self {
        let adapter = Self {
            backend,
            state: PlaybackState::Idle,
            issued: 0,
        };
        if !adapter.capability().is_available() {
            tracing::warn!("speech playback unavailable; phrases will not be read aloud");
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

    /// True from `speak` until the utterance ends, fails or is cancelled.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        !matches!(self.state, PlaybackState::Idle)
    }

    /// Cancels any current utterance, then plays `text`.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Unsupported` without a platform synthesizer, or
    /// the synthesizer's error if it rejects the utterance.
    pub fn speak(
        &mut self,
        text: &str,
        language_tag: &LanguageTag,
        rate: f32,
    ) -> Result<UtteranceId, SpeechError> {
        let Some(backend) = self.backend.as_mut() else {
            return Err(SpeechError::Unsupported);
        };

        if !matches!(self.state, PlaybackState::Idle) {
            backend.cancel();
            self.state = PlaybackState::Idle;
            tracing::debug!("preempting current utterance");
        }

        let utterance = Utterance {
            text: text.to_string(),
            language_tag: language_tag.clone(),
            rate,
        };
        backend.speak(&utterance)?;

        self.issued += 1;
        let id = UtteranceId(self.issued);
        self.state = PlaybackState::Queued(id);
        tracing::debug!(utterance = id.value(), rate, language = %language_tag, "utterance queued");
        Ok(id)
    }

    /// Stops playback. Returns `Ended` for the cancelled utterance, or
    /// `None` when nothing was playing.
    pub fn cancel(&mut self) -> Option<PlaybackEvent> {
        if matches!(self.state, PlaybackState::Idle) {
            return None;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.cancel();
        }
        self.state = PlaybackState::Idle;
        Some(PlaybackEvent::Ended)
    }

    /// Feeds a platform callback for utterance `id`; stale ids are dropped.
    pub fn deliver(&mut self, id: UtteranceId, signal: PlaybackSignal) -> Option<PlaybackEvent> {
        let current = match self.state {
            PlaybackState::Queued(current) | PlaybackState::Playing(current) => current,
            PlaybackState::Idle => return None,
        };
        if current != id {
            return None;
        }

        match (self.state, signal) {
            (PlaybackState::Queued(_), PlaybackSignal::Started) => {
                self.state = PlaybackState::Playing(id);
                Some(PlaybackEvent::Started)
            }
            (_, PlaybackSignal::Started) => None,
            (_, PlaybackSignal::Ended) => {
                self.state = PlaybackState::Idle;
                Some(PlaybackEvent::Ended)
            }
            (_, PlaybackSignal::Failed { reason }) => {
                self.state = PlaybackState::Idle;
                tracing::warn!(utterance = id.value(), %reason, "speech playback failed");
                Some(PlaybackEvent::Error { reason })
            }
        }
    }
}

impl fmt::Debug for SpeechPlaybackAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechPlaybackAdapter")
            .field("capability", &self.capability())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
