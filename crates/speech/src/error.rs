//! Speech error taxonomy. Every variant is recoverable.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech services are not supported on this platform")]
    Unsupported,

    #[error("speech capture is already listening")]
    AlreadyListening,

    #[error("speech recognition failed: {reason}")]
    Recognition { reason: String },

    #[error("speech playback failed: {reason}")]
    Playback { reason: String },
}

impl SpeechError {
    #[must_use]
    pub fn recognition(reason: impl Into<String>) -> Self {
        Self::Recognition {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn playback(reason: impl Into<String>) -> Self {
        Self::Playback {
            reason: reason.into(),
        }
    }
}
