//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::model::{PhraseError, SessionSummaryError};
use speech::SpeechError;

use crate::sessions::SessionPhase;

/// Errors emitted by the phrase provider and progress recorder ports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortError {
    #[error("no phrases for this lesson")]
    NotFound,
    #[error("backend error: {0}")]
    Backend(String),
    #[error(transparent)]
    Phrase(#[from] PhraseError),
}

/// Errors emitted by practice sessions.
///
/// None of these end a session: after any of them the controller is back at
/// an actionable phase on the same phrase.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no phrases available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("session is not finished yet")]
    NotFinished,
    #[error("session is busy ({phase})")]
    Busy { phase: SessionPhase },
    #[error("no phrase at index {index}")]
    NoSuchPhrase { index: usize },
    #[error("no speech was detected")]
    NoSpeech,
    #[error(transparent)]
    Speech(#[from] SpeechError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Port(#[from] PortError),
}
