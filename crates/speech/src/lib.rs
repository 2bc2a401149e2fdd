//! Boundary to platform speech services.
//!
//! Platform recognizers and synthesizers plug in through the
//! [`SpeechRecognizer`] and [`SpeechSynthesizer`] traits. The adapters wrap
//! them with the lifecycle rules the practice engine relies on: one terminal
//! event per capture, at most one utterance playing, and a capability flag
//! decided once at construction.

#![forbid(unsafe_code)]

pub mod capability;
pub mod capture;
pub mod error;
pub mod playback;
pub mod scripted;

pub use capability::Capability;
pub use capture::{CaptureEvent, CaptureSignal, CaptureTicket, SpeechCaptureAdapter, SpeechRecognizer};
pub use error::SpeechError;
pub use playback::{
    PlaybackEvent, PlaybackSignal, SpeechPlaybackAdapter, SpeechSynthesizer, Utterance, UtteranceId,
};
pub use scripted::{ScriptedRecognizer, ScriptedSynthesizer};
