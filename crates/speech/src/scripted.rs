//! In-memory speech backends for tests and headless hosts.
//!
//! Both types are cheap handles over shared state: keep a clone as a probe
//! and hand the other to an adapter.

use std::sync::{Arc, Mutex};

use practice_core::model::LanguageTag;

use crate::capture::SpeechRecognizer;
use crate::error::SpeechError;
use crate::playback::{SpeechSynthesizer, Utterance};

#[derive(Debug, Default)]
struct RecognizerState {
    language: Option<String>,
    mic_open: bool,
    opened: u32,
    released: u32,
    fail_next_begin: Option<String>,
}

/// Recognizer that never hears anything on its own; results are delivered by
/// the host through the adapter. Tracks microphone open/release calls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecognizer {
    state: Arc<Mutex<RecognizerState>>,
}

impl ScriptedRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `begin` fail with a recognition error.
    pub fn fail_next_begin(&self, reason: impl Into<String>) {
        if let Ok(mut guard) = self.state.lock() {
            guard.fail_next_begin = Some(reason.into());
        }
    }

    #[must_use]
    pub fn language(&self) -> Option<String> {
        self.state.lock().ok().and_then(|g| g.language.clone())
    }

    #[must_use]
    pub fn is_mic_open(&self) -> bool {
        self.state.lock().is_ok_and(|g| g.mic_open)
    }

    /// Number of successful `begin` calls.
    #[must_use]
    pub fn opened(&self) -> u32 {
        self.state.lock().map_or(0, |g| g.opened)
    }

    /// Number of times an open microphone was released.
    #[must_use]
    pub fn released(&self) -> u32 {
        self.state.lock().map_or(0, |g| g.released)
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn set_language(&mut self, tag: &LanguageTag) {
        if let Ok(mut guard) = self.state.lock() {
            guard.language = Some(tag.as_str().to_string());
        }
    }

    fn begin(&mut self) -> Result<(), SpeechError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| SpeechError::recognition(e.to_string()))?;
        if let Some(reason) = guard.fail_next_begin.take() {
            return Err(SpeechError::Recognition { reason });
        }
        guard.mic_open = true;
        guard.opened += 1;
        Ok(())
    }

    fn release(&mut self) {
        if let Ok(mut guard) = self.state.lock() {
            if guard.mic_open {
                guard.mic_open = false;
                guard.released += 1;
            }
        }
    }
}

#[derive(Debug, Default)]
struct SynthesizerState {
    spoken: Vec<Utterance>,
    cancels: u32,
    fail_next_speak: Option<String>,
}

/// Synthesizer that records utterances instead of producing audio.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSynthesizer {
    state: Arc<Mutex<SynthesizerState>>,
}

impl ScriptedSynthesizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_speak(&self, reason: impl Into<String>) {
        if let Ok(mut guard) = self.state.lock() {
            guard.fail_next_speak = Some(reason.into());
        }
    }

    /// Every utterance accepted so far, oldest first.
    #[must_use]
    pub fn spoken(&self) -> Vec<Utterance> {
        self.state.lock().map(|g| g.spoken.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn cancels(&self) -> u32 {
        self.state.lock().map_or(0, |g| g.cancels)
    }
}

impl SpeechSynthesizer for ScriptedSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| SpeechError::playback(e.to_string()))?;
        if let Some(reason) = guard.fail_next_speak.take() {
            return Err(SpeechError::Playback { reason });
        }
        guard.spoken.push(utterance.clone());
        Ok(())
    }

    fn cancel(&mut self) {
        if let Ok(mut guard) = self.state.lock() {
            guard.cancels += 1;
        }
    }
}
